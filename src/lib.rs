pub mod config;
pub mod course;
pub mod error;
pub mod grading;
pub mod mark;
pub mod output;
pub mod prompt;
pub mod records;
pub mod scheme;
pub mod stats;
pub mod telemetry;
