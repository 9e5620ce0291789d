pub mod builder;
pub mod types;
pub mod validation;

pub use builder::{build_scheme, BuilderState, MainHeader, SchemeBuilder, SchemeInput};
pub use types::{AssessmentScheme, ComponentRef, LeafKey, MainComponent, SubComponent, EXAM};
pub use validation::{validate_scheme, validate_sub_components};
