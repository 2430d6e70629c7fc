//! Line-level parsing primitives.
//!
//! - [`classifier`] - header dialects and continuation rules
//! - [`timestamp`] - raw date/time tokens to epoch milliseconds

pub mod classifier;
pub mod timestamp;

pub use classifier::{Dialect, HeaderMatch, LineClass, LineClassifier, has_date_prefix};
pub use timestamp::parse_timestamp;
