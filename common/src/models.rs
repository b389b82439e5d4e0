pub mod outcome;
pub mod progress;
pub mod summary;
