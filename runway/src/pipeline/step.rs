//! Step and cleanup action traits plus closure adapters.

use super::engine::StepContext;
use crate::core::StepOutcome;
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

/// Trait for step actions.
///
/// A step is a single named unit of asynchronous work executed in queue
/// order. The action must produce exactly one [`StepOutcome`]; an action
/// that never returns stalls the pipeline, which is accepted engine
/// behavior.
#[async_trait]
pub trait StepAction: Send + Sync + Debug {
    /// Executes the step.
    ///
    /// The context allows the action to register further steps and cleanups
    /// while the pipeline is running.
    async fn run(&self, ctx: &StepContext) -> StepOutcome;
}

/// Trait for cleanup actions.
///
/// Cleanups run in reverse registration order during the drain, or out of
/// band via `run_cleanup`. `erroring` is true when the pipeline has already
/// recorded a failure, so a cleanup can branch its behavior on whether the
/// run is going down.
#[async_trait]
pub trait CleanupAction: Send + Sync + Debug {
    /// Executes the cleanup.
    async fn run(&self, ctx: &StepContext, erroring: bool) -> StepOutcome;
}

/// An async closure-based step action.
pub struct FnStep<F, Fut>
where
    F: Fn(StepContext) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    func: F,
    _marker: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnStep<F, Fut>
where
    F: Fn(StepContext) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    /// Creates a new closure-based step action.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut> Debug for FnStep<F, Fut>
where
    F: Fn(StepContext) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep").finish()
    }
}

#[async_trait]
impl<F, Fut> StepAction for FnStep<F, Fut>
where
    F: Fn(StepContext) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    async fn run(&self, ctx: &StepContext) -> StepOutcome {
        (self.func)(ctx.clone()).await
    }
}

/// An async closure-based cleanup action.
pub struct FnCleanup<F, Fut>
where
    F: Fn(StepContext, bool) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    func: F,
    _marker: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnCleanup<F, Fut>
where
    F: Fn(StepContext, bool) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    /// Creates a new closure-based cleanup action.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut> Debug for FnCleanup<F, Fut>
where
    F: Fn(StepContext, bool) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCleanup").finish()
    }
}

#[async_trait]
impl<F, Fut> CleanupAction for FnCleanup<F, Fut>
where
    F: Fn(StepContext, bool) -> Fut + Send + Sync,
    Fut: Future<Output = StepOutcome> + Send,
{
    async fn run(&self, ctx: &StepContext, erroring: bool) -> StepOutcome {
        (self.func)(ctx.clone(), erroring).await
    }
}

/// A queued step: a title plus the action that performs it.
#[derive(Debug)]
pub(crate) struct Step {
    pub(crate) title: String,
    pub(crate) action: Box<dyn StepAction>,
}

/// A registered cleanup: a title plus the action that performs it.
#[derive(Debug)]
pub(crate) struct CleanupEntry {
    pub(crate) title: String,
    pub(crate) action: Box<dyn CleanupAction>,
}
