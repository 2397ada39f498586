pub mod engine;
pub mod jdbc;
pub mod paths;
pub mod patcher;

pub use crate::domain::model::{PatchReport, RunPlan, RunReport};
pub use crate::domain::ports::{EnvSource, Publisher, Storage};
pub use crate::utils::error::Result;
