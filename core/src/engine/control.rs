// spokehub/src/engine/control.rs

//! Flow-control signals between handlers and the pipeline runner.

/// Returned by a handler to tell the runner whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Halt the run right here. Nothing after this handler executes.
  Stop,
}

/// How a full pipeline run ended when no handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
