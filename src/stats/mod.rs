pub mod engine;

pub use engine::{
    average_for_component, average_for_main, average_for_sub, course_statistics,
    overall_average, ComponentStats, CourseStatistics, SubComponentStats,
};
