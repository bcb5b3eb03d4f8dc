// spokehub/src/engine/mod.rs

//! The step-pipeline runner every wizard operation is built on.

pub mod context_data;
pub mod control;
pub mod handler;
pub mod pipeline;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use handler::Handler;
pub use pipeline::Pipeline;
pub use step::{SkipCondition, StepDef};
