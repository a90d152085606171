//! Dataset construction integration tests.

use approx::assert_abs_diff_eq;
use artist_rating::*;

mod common;
use common::*;

fn reference_ratings() -> RatingTable {
    RatingTable::training(vec![("A1", "U1", 80.0), ("A1", "U2", 60.0), ("A2", "U1", 40.0)]).unwrap()
}

fn reference_words() -> RawWordsTable {
    words_table(&[
        vec!["A1", "U1", "Yes", "Own a lot", "1", "0"],
        vec!["A1", "U2", "Yes", "", "0", "1"],
        vec!["A2", "U1", "No", "Own a lot", "1", ""],
        vec!["A3", "U1", "", "", "0", "0"],
    ])
}

fn column(matrix: &FeatureMatrix, name: &str) -> Vec<f64> {
    matrix.column(name).unwrap().to_vec()
}

#[test]
fn test_reference_scenario() {
    let target = RatingTable::target(vec![("A3", "U1"), ("A1", "U2")]).unwrap();
    let users = users_table(&[user_row("U1"), user_row("U2")]);

    let built = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(reference_ratings(), target, reference_words(), users)
        .unwrap();

    let a1 = built.statistics.artist("A1").unwrap();
    assert_abs_diff_eq!(a1.mean, 70.0);
    assert_abs_diff_eq!(a1.min, 60.0);
    assert_abs_diff_eq!(a1.max, 80.0);
    assert_abs_diff_eq!(a1.median, 70.0);
    assert_eq!(built.statistics.artist("A2").unwrap().values(), [40.0; 4]);
    assert!(built.statistics.artist("A3").is_none());

    // A3 never occurs in training
    let a1_values = a1.values();
    for (name, a1_value) in AGGREGATE_COLUMNS[4..].iter().zip(a1_values) {
        assert_eq!(column(&built.target_features, name), vec![-999.0, a1_value]);
    }
    assert_eq!(column(&built.target_features, "mean_user_rating"), vec![60.0, 60.0]);
    assert_eq!(column(&built.target_features, "min_user_rating"), vec![40.0, 60.0]);

    assert_eq!(column(&built.features, "HEARD_OF"), vec![2.0, 2.0, 1.0]);
    assert_eq!(column(&built.target_features, "HEARD_OF"), vec![1.0, 2.0]);
    assert_eq!(built.target_vector.to_vec(), vec![80.0, 60.0, 40.0]);
    assert_eq!(built.target_ids, vec!["0", "1"]);
}

#[test]
fn test_train_and_target_share_columns() {
    let data = SyntheticData::generate(8, 15, 42);
    let built = DatasetBuilder::new(small_config(false))
        .unwrap()
        .build_from_tables(data.tables())
        .unwrap();

    assert_eq!(built.features.columns(), built.target_features.columns());
    assert_eq!(built.features.num_rows(), data.train.rows.len());
    assert_eq!(built.target_features.num_rows(), data.test.rows.len());
    assert_eq!(built.target_vector.len(), data.train.rows.len());
    assert_eq!(&built.features.columns()[0], "Time");
    assert_eq!(
        &built.features.columns()[built.features.num_features() - 8..],
        AGGREGATE_COLUMNS.map(String::from).as_slice()
    );
    assert!(built.features.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_unseen_entities_in_target_get_sentinel() {
    let data = SyntheticData::generate(6, 10, 7);
    let built = DatasetBuilder::new(small_config(false))
        .unwrap()
        .build_from_tables(data.tables())
        .unwrap();

    let rows = built.target_features.num_rows();
    let new_artist = rows - 2;
    let new_user = rows - 1;
    for name in &AGGREGATE_COLUMNS[4..] {
        assert_eq!(built.target_features.column(name).unwrap()[new_artist], -999.0);
    }
    for name in &AGGREGATE_COLUMNS[..4] {
        assert_eq!(built.target_features.column(name).unwrap()[new_user], -999.0);
    }
    assert_eq!(built.target_features.column("AGE").unwrap()[new_user], -999.0);
}

#[test]
fn test_build_is_deterministic() {
    let data = SyntheticData::generate(8, 12, 3);
    let builder = DatasetBuilder::new(small_config(false)).unwrap();

    let first = builder.build_from_tables(data.tables()).unwrap();
    let second = builder.build_from_tables(data.tables()).unwrap();
    assert_eq!(first.features, second.features);
    assert_eq!(first.target_features, second.target_features);
    assert_eq!(first.statistics, second.statistics);
}

#[test]
fn test_parallel_matches_sequential() {
    let data = SyntheticData::generate(10, 20, 11);

    let sequential = DatasetBuilder::new(small_config(false))
        .unwrap()
        .build_from_tables(data.tables())
        .unwrap();
    let parallel = DatasetBuilder::new(small_config(true))
        .unwrap()
        .build_from_tables(data.tables())
        .unwrap();

    assert_eq!(sequential.features, parallel.features);
    assert_eq!(sequential.target_features, parallel.target_features);
    assert_eq!(sequential.target_vector, parallel.target_vector);
}

#[test]
fn test_empty_side_tables_keep_every_row() {
    let target = RatingTable::target(vec![("A1", "U1")]).unwrap();
    let built = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(reference_ratings(), target, words_table(&[]), users_table(&[]))
        .unwrap();

    assert_eq!(built.features.num_rows(), 3);
    assert_eq!(built.target_features.num_rows(), 1);
    assert_eq!(column(&built.features, "Edgy"), vec![-999.0; 3]);
    assert_eq!(column(&built.features, "GENDER"), vec![-999.0; 3]);
    assert_eq!(column(&built.target_features, "mean_artist_rating"), vec![70.0]);
}

#[test]
fn test_target_ratings_do_not_leak() {
    let schema = SchemaConfig::default();
    let with_ratings = raw(
        "test",
        &["Artist", "User", "Rating"],
        &[vec!["A1", "U1", "0"], vec!["A9", "U2", "100"]],
    );
    let target = RatingTable::from_raw(&with_ratings, Partition::Target, &schema).unwrap();
    assert!(target.records().iter().all(|r| r.rating.is_none()));

    let users = users_table(&[user_row("U1"), user_row("U2")]);
    let built = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(reference_ratings(), target, reference_words(), users)
        .unwrap();

    let expected = AggregateStatistics::compute(&reference_ratings()).unwrap();
    assert_eq!(built.statistics, expected);
    assert_eq!(built.features.columns(), built.target_features.columns());
}

#[test]
fn test_duplicate_words_pair_is_a_join_error() {
    let words = words_table(&[
        vec!["A1", "U1", "Yes", "", "1", "0"],
        vec!["A1", "U1", "No", "", "0", "0"],
    ]);
    let err = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(
            reference_ratings(),
            RatingTable::target(vec![("A1", "U2")]).unwrap(),
            words,
            users_table(&[user_row("U1")]),
        )
        .unwrap_err();
    assert_eq!(err.category(), "join_cardinality");
}

#[test]
fn test_duplicate_respondent_is_a_join_error() {
    let err = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(
            reference_ratings(),
            RatingTable::target(vec![("A1", "U2")]).unwrap(),
            reference_words(),
            users_table(&[user_row("U1"), user_row("U1")]),
        )
        .unwrap_err();
    assert_eq!(err.category(), "join_cardinality");
}

#[test]
fn test_missing_users_column_is_a_schema_error() {
    let headers: Vec<&str> = USERS_HEADERS.iter().copied().filter(|h| *h != "AGE").collect();
    let table = raw("users", &headers, &[]);
    let err = RawUsersTable::from_raw(&table, &SchemaConfig::default()).unwrap_err();
    assert_eq!(err.category(), "schema");
}

#[test]
fn test_non_numeric_age_is_a_data_error() {
    let mut row = user_row("U1");
    row[2] = "about thirty";
    let err = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(
            reference_ratings(),
            RatingTable::target(vec![("A1", "U3")]).unwrap(),
            reference_words(),
            users_table(&[row]),
        )
        .unwrap_err();
    assert_eq!(err.category(), "data_integrity");
}

#[test]
fn test_sentinel_inside_rating_range_is_rejected() {
    let config = ConfigBuilder::new().sentinel(50.0).build().unwrap();
    let err = DatasetBuilder::new(config)
        .unwrap()
        .build(
            reference_ratings(),
            RatingTable::target(vec![("A1", "U3")]).unwrap(),
            reference_words(),
            users_table(&[]),
        )
        .unwrap_err();
    assert_eq!(err.category(), "invalid_parameter");
}

#[test]
fn test_partitions_cannot_be_swapped() {
    let err = DatasetBuilder::new(Config::default())
        .unwrap()
        .build(
            RatingTable::target(vec![("A1", "U3")]).unwrap(),
            reference_ratings(),
            reference_words(),
            users_table(&[]),
        )
        .unwrap_err();
    assert_eq!(err.category(), "invalid_parameter");
}
