pub mod config;
pub mod policy;
pub mod transcript;
pub mod validation;

pub use config::{default_bands, GradeBand, GradingConfig};
pub use policy::{classify_honours, semester_gpa, weighted_gpa, GradeScale, Honours};
pub use transcript::{transcript, Transcript, TranscriptRow};
pub use validation::{validate_grade_bands, validate_grading};
