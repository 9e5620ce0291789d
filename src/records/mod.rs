pub mod storage;
pub mod types;

pub use storage::{load_records, save_records};
pub use types::Records;
