pub mod prompt_log;
pub mod providers;

pub use prompt_log::{JsonFileStore, RecordStore};
