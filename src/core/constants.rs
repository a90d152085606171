//! Constants shared across the dataset builder and the model pipeline.
//!
//! Column names below are the defaults of [`crate::config::SchemaConfig`];
//! every one of them can be overridden from a configuration file.

/// Reserved out-of-domain value marking "missing" or "unseen in training".
/// Ratings live in a small bounded range (0-100), so this can never collide
/// with a real rating or a real aggregate.
pub const DEFAULT_SENTINEL: f64 = -999.0;

/// Artist identifier column shared by ratings and words tables.
pub const DEFAULT_ARTIST_COLUMN: &str = "Artist";

/// User identifier column shared by ratings and words tables.
pub const DEFAULT_USER_COLUMN: &str = "User";

/// Rating column of the training partition.
pub const DEFAULT_RATING_COLUMN: &str = "Rating";

/// Primary key of the users table.
pub const DEFAULT_RESPONDENT_COLUMN: &str = "RESPID";

/// "Heard of" categorical column of the words table.
pub const DEFAULT_HEARD_OF_COLUMN: &str = "HEARD_OF";

/// "Own artist music" categorical column of the words table.
pub const DEFAULT_OWN_ARTIST_MUSIC_COLUMN: &str = "OWN_ARTIST_MUSIC";

/// Users table demographic columns.
pub const DEFAULT_GENDER_COLUMN: &str = "GENDER";
/// Age column, a numeric-scale field.
pub const DEFAULT_AGE_COLUMN: &str = "AGE";
/// Working status column.
pub const DEFAULT_WORKING_COLUMN: &str = "WORKING";
/// Region column.
pub const DEFAULT_REGION_COLUMN: &str = "REGION";
/// Music-genre preference column.
pub const DEFAULT_MUSIC_COLUMN: &str = "MUSIC";

/// Free-text "hours listening to own music" column.
pub const DEFAULT_LIST_OWN_COLUMN: &str = "LIST_OWN";
/// Free-text "hours listening to background music" column.
pub const DEFAULT_LIST_BACK_COLUMN: &str = "LIST_BACK";

/// Likert-style question columns treated as numeric scales.
pub const DEFAULT_SCALE_QUESTIONS: [&str; 3] = ["Q16", "Q18", "Q19"];

/// Aggregate feature names, in the order they are appended to a partition.
pub const AGGREGATE_COLUMNS: [&str; 8] = [
    "mean_user_rating",
    "min_user_rating",
    "max_user_rating",
    "median_user_rating",
    "mean_artist_rating",
    "min_artist_rating",
    "max_artist_rating",
    "median_artist_rating",
];

/// Default number of features kept by the univariate selector.
pub const DEFAULT_SELECT_K: usize = 50;

/// Default number of boosting iterations.
pub const DEFAULT_NUM_ITERATIONS: usize = 100;

/// Default learning rate (shrinkage) for gradient boosting.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default maximum depth of each regression tree.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Default minimum number of rows in a leaf.
pub const DEFAULT_MIN_DATA_IN_LEAF: usize = 20;

/// Epsilon value for floating point comparisons.
pub const EPSILON: f64 = 1e-12;
