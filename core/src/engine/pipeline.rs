// spokehub/src/engine/pipeline.rs

//! `Pipeline<TData, Err>`: an ordered list of named steps, each with before/on/after
//! handler phases, run against one shared [`ContextData`].

use crate::engine::context_data::ContextData;
use crate::engine::control::{PipelineControl, PipelineResult};
use crate::engine::handler::Handler;
use crate::engine::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;
use std::future::Future;
use tracing::{event, Instrument, Level};

#[derive(Clone, Copy, Debug)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn label(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// A named workflow. `Err` is what handlers fail with; it must absorb [`FlowError`]
/// so the runner can report configuration problems such as a required step with
/// no handlers.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  name: String,
  steps: Vec<StepDef<TData>>,
  before: HashMap<String, Vec<Handler<TData, Err>>>,
  on: HashMap<String, Vec<Handler<TData, Err>>>,
  after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(step_name, optional, skip_if)` triples, in run order.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional, skip_if)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  // Registering a handler against an unknown step is a wiring bug in the caller.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "pipeline '{}' has no step named '{}'; check the step list passed to Pipeline::new",
        self.name, step_name
      );
    }
  }

  fn register<F, UserErr>(
    &mut self,
    phase: Phase,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    let table = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    table.entry(step_name.to_string()).or_default().push(handler);
  }

  pub fn before_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::Before, step_name, handler_fn);
  }

  /// Registers the main handler for a step. Several `on` handlers run in
  /// registration order.
  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::On, step_name, handler_fn);
  }

  pub fn after_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::After, step_name, handler_fn);
  }

  fn has_handlers(&self, step_name: &str) -> bool {
    [&self.before, &self.on, &self.after]
      .iter()
      .any(|table| table.get(step_name).is_some_and(|v| !v.is_empty()))
  }

  /// Runs one phase of a step. `Some(result)` means the run is over.
  async fn run_phase(
    &self,
    phase: Phase,
    step_name: &str,
    ctx_data: &ContextData<TData>,
  ) -> Option<Result<PipelineResult, Err>> {
    let table = match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    };
    let handlers = table.get(step_name)?;

    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let span = tracing::debug_span!("handler", phase = phase.label(), handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step = step_name, phase = phase.label(), "Pipeline stopped by handler.");
          return Some(Ok(PipelineResult::Stopped));
        }
        Err(e) => {
          event!(Level::WARN, step = step_name, phase = phase.label(), error = %e, "Handler failed.");
          return Some(Err(e));
        }
      }
    }
    None
  }

  /// Executes every step in order against `ctx_data`.
  ///
  /// Skip conditions are evaluated first. Optional steps without handlers are passed
  /// over; a required step without handlers fails with `FlowError::HandlerMissing`.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    let run_span = tracing::info_span!("pipeline_run", pipeline = %self.name, num_steps = self.steps.len());

    async move {
      event!(Level::DEBUG, "Pipeline execution starting.");

      for (step_idx, step_def) in self.steps.iter().enumerate() {
        let step_name = step_def.name.as_str();

        if let Some(skip_if) = &step_def.skip_if {
          if skip_if(ctx_data.clone()) {
            event!(Level::DEBUG, step = step_name, "Step skipped by condition.");
            continue;
          }
        }

        if !self.has_handlers(step_name) {
          if step_def.optional {
            event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
            continue;
          }
          event!(Level::ERROR, step = step_name, "Required step has no handlers.");
          return Err(Err::from(FlowError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }

        let step_span = tracing::debug_span!("pipeline_step", step = step_name, step_index = step_idx);
        let outcome = async {
          for phase in [Phase::Before, Phase::On, Phase::After] {
            if let Some(done) = self.run_phase(phase, step_name, &ctx_data).await {
              return Some(done);
            }
          }
          None
        }
        .instrument(step_span)
        .await;

        if let Some(done) = outcome {
          return done;
        }
      }

      event!(Level::DEBUG, "Pipeline execution completed.");
      Ok(PipelineResult::Completed)
    }
    .instrument(run_span)
    .await
  }
}

impl<TData, Err> std::fmt::Debug for Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.steps)
      .finish()
  }
}
