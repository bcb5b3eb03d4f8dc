// spokehub/src/engine/handler.rs

use crate::engine::context_data::ContextData;
use crate::engine::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A boxed async step handler.
///
/// Handlers own a clone of the run's `ContextData<TData>`, take short-lived locks on
/// it, and resolve to a [`PipelineControl`] or the pipeline's error type. Lock guards
/// must be released before the handler awaits anything.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
