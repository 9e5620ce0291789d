pub mod aggregate;
pub mod types;

pub use aggregate::{
    breakdown, compute_main_component_mark, compute_overall_mark, ComponentContribution,
    MarkBreakdown,
};
pub use types::{MainComponentMark, Mark, SubComponentMark};
