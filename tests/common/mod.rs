//! Common fixtures for artist-rating integration tests.
#![allow(dead_code)]

use artist_rating::dataset::{InputTables, RawTable};
use artist_rating::*;
use rand::prelude::*;
use std::path::Path;

pub const RATINGS_HEADERS: [&str; 4] = ["Artist", "User", "Rating", "Time"];
pub const TARGET_HEADERS: [&str; 3] = ["Artist", "User", "Time"];
pub const WORDS_HEADERS: [&str; 6] = ["Artist", "User", "HEARD_OF", "OWN_ARTIST_MUSIC", "Edgy", "Catchy"];
pub const USERS_HEADERS: [&str; 12] = [
    "RESPID", "GENDER", "AGE", "WORKING", "REGION", "MUSIC", "LIST_OWN", "LIST_BACK", "Q1", "Q16",
    "Q18", "Q19",
];

/// Config with small model parameters suitable for tiny datasets
pub fn small_config(parallel: bool) -> Config {
    ConfigBuilder::new()
        .parallel(parallel)
        .select_k(8)
        .num_iterations(20)
        .max_depth(3)
        .min_data_in_leaf(2)
        .build()
        .unwrap()
}

pub fn raw(name: &str, headers: &[&str], rows: &[Vec<&str>]) -> RawTable {
    RawTable::from_rows(name, headers, rows).unwrap()
}

pub fn words_table(rows: &[Vec<&str>]) -> RawWordsTable {
    RawWordsTable::from_raw(&raw("words", &WORDS_HEADERS, rows), &SchemaConfig::default()).unwrap()
}

pub fn users_table(rows: &[Vec<&str>]) -> RawUsersTable {
    RawUsersTable::from_raw(&raw("users", &USERS_HEADERS, rows), &SchemaConfig::default()).unwrap()
}

/// A complete, valid users row
pub fn user_row(id: &str) -> Vec<&str> {
    vec![
        id, "Female", "34", "Employed 30+ hours a week", "North", "I like music", "2 hours",
        "16+ hours", "55", "3", "4", "2",
    ]
}

/// Owned string rows with their header, as read from a CSV file
#[derive(Debug, Clone)]
pub struct Rows {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Rows {
    fn new(headers: &[&'static str]) -> Self {
        Rows {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn borrowed(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect()
    }

    pub fn to_raw(&self, name: &str) -> RawTable {
        raw(name, &self.headers, &self.borrowed())
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) {
        let mut writer = csv::Writer::from_path(path).unwrap();
        writer.write_record(&self.headers).unwrap();
        for row in &self.rows {
            writer.write_record(row).unwrap();
        }
        writer.flush().unwrap();
    }
}

/// Randomly generated but reproducible input tables
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub train: Rows,
    pub test: Rows,
    pub words: Rows,
    pub users: Rows,
}

impl SyntheticData {
    /// Every (artist, user) pair lands in train, test or neither. The test
    /// partition additionally gets one unseen artist and one unseen user.
    pub fn generate(num_artists: usize, num_users: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = SyntheticData {
            train: Rows::new(&RATINGS_HEADERS),
            test: Rows::new(&TARGET_HEADERS),
            words: Rows::new(&WORDS_HEADERS),
            users: Rows::new(&USERS_HEADERS),
        };

        let artist_base: Vec<f64> = (0..num_artists).map(|_| rng.gen_range(10.0..90.0)).collect();
        let user_bias: Vec<f64> = (0..num_users).map(|_| rng.gen_range(-10.0..10.0)).collect();

        let heard = ["Heard of", "Never heard of", "Heard of and listened to music", ""];
        let own = ["Own a lot of their music", "Own none of their music", ""];
        for a in 0..num_artists {
            for u in 0..num_users {
                let artist = format!("A{}", a);
                let user = format!("U{}", u);
                let time = rng.gen_range(0..24).to_string();
                if rng.gen_bool(0.6) {
                    let rating = (artist_base[a] + user_bias[u] + rng.gen_range(-5.0..5.0))
                        .clamp(0.0, 100.0)
                        .round();
                    data.train
                        .rows
                        .push(vec![artist.clone(), user.clone(), rating.to_string(), time]);
                } else if rng.gen_bool(0.5) {
                    data.test.rows.push(vec![artist.clone(), user.clone(), time]);
                }

                if rng.gen_bool(0.8) {
                    let flag = |rng: &mut StdRng| ["0", "1", ""].choose(rng).unwrap().to_string();
                    data.words.rows.push(vec![
                        artist,
                        user,
                        heard.choose(&mut rng).unwrap().to_string(),
                        own.choose(&mut rng).unwrap().to_string(),
                        flag(&mut rng),
                        flag(&mut rng),
                    ]);
                }
            }
        }
        data.test
            .rows
            .push(vec!["A_new".into(), "U0".into(), "12".into()]);
        data.test
            .rows
            .push(vec!["A0".into(), "U_new".into(), "3".into()]);

        let genders = ["Male", "Female", ""];
        let working = ["Employed 30+ hours a week", "Full-time student", "Retired", ""];
        let regions = ["North", "South", "Midlands", "Centre"];
        let music = ["Music is important to me", "I like music", "Music means a lot to me"];
        let hours = ["Less than an hour", "1 hour", "3 hours", "16+ hours", ""];
        for u in 0..num_users {
            let maybe = |rng: &mut StdRng, value: String| if rng.gen_bool(0.9) { value } else { String::new() };
            let age = rng.gen_range(16..70).to_string();
            let q1 = rng.gen_range(0..100).to_string();
            let q16 = rng.gen_range(1..6).to_string();
            let q18 = rng.gen_range(1..6).to_string();
            let q19 = rng.gen_range(1..6).to_string();
            data.users.rows.push(vec![
                format!("U{}", u),
                genders.choose(&mut rng).unwrap().to_string(),
                maybe(&mut rng, age),
                working.choose(&mut rng).unwrap().to_string(),
                regions.choose(&mut rng).unwrap().to_string(),
                music.choose(&mut rng).unwrap().to_string(),
                hours.choose(&mut rng).unwrap().to_string(),
                hours.choose(&mut rng).unwrap().to_string(),
                maybe(&mut rng, q1),
                maybe(&mut rng, q16),
                maybe(&mut rng, q18),
                maybe(&mut rng, q19),
            ]);
        }

        data
    }

    /// Validated tables, as the CSV loader would produce them
    pub fn tables(&self) -> InputTables {
        let schema = SchemaConfig::default();
        InputTables {
            train: RatingTable::from_raw(&self.train.to_raw("train"), Partition::Training, &schema)
                .unwrap(),
            test: RatingTable::from_raw(&self.test.to_raw("test"), Partition::Target, &schema)
                .unwrap(),
            words: RawWordsTable::from_raw(&self.words.to_raw("words"), &schema).unwrap(),
            users: RawUsersTable::from_raw(&self.users.to_raw("users"), &schema).unwrap(),
        }
    }

    /// Write train.csv, test.csv, words.csv and users.csv into `dir`
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) {
        let dir = dir.as_ref();
        self.train.write_csv(dir.join("train.csv"));
        self.test.write_csv(dir.join("test.csv"));
        self.words.write_csv(dir.join("words.csv"));
        self.users.write_csv(dir.join("users.csv"));
    }
}
