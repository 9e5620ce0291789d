pub mod formatter;

pub use formatter::{
    format_breakdown, format_course_statistics, format_gpa, format_mark, format_scheme,
    format_transcript, should_use_colors,
};
