//! The pipeline engine: FIFO step queue, LIFO cleanup stack, drain logic.

use super::step::{CleanupAction, CleanupEntry, Step, StepAction};
use crate::core::{PipelineEvent, Progress, StepOutcome};
use crate::errors::PipelineError;
use crate::events::{EventSink, NoOpEventSink};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Mutable engine state. Lives behind one mutex; the lock is never held
/// across an await point.
#[derive(Debug, Default)]
struct EngineState {
    steps: VecDeque<Step>,
    cleanup_order: Vec<String>,
    cleanup_store: HashMap<String, CleanupEntry>,
    total_steps: usize,
    current_step: usize,
    has_errored: bool,
}

impl EngineState {
    /// Removes one cleanup entry from the order list and the store.
    ///
    /// Both structures are updated together so every ordered id always has
    /// a stored entry, and vice versa.
    fn take_cleanup(&mut self, id: &str) -> Option<CleanupEntry> {
        let idx = self.cleanup_order.iter().position(|entry| entry == id)?;
        self.cleanup_order.remove(idx);
        self.cleanup_store.remove(id)
    }

    /// Removes and returns the most recently registered cleanup entry.
    fn pop_cleanup(&mut self) -> Option<(String, CleanupEntry)> {
        let id = self.cleanup_order.pop()?;
        let entry = self.cleanup_store.remove(&id)?;
        Some((id, entry))
    }
}

struct Shared {
    state: Mutex<EngineState>,
    sink: RwLock<Arc<dyn EventSink>>,
}

impl Shared {
    fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            sink: RwLock::new(sink),
        }
    }

    fn sink(&self) -> Arc<dyn EventSink> {
        self.sink.read().clone()
    }

    async fn emit(&self, event: PipelineEvent) {
        self.sink().emit(&event).await;
    }

    fn add_step(&self, title: String, action: Box<dyn StepAction>) {
        let mut state = self.state.lock();
        state.total_steps += 1;
        debug!(title = %title, total = state.total_steps, "step registered");
        state.steps.push_back(Step { title, action });
    }

    fn add_cleanup_step(
        &self,
        id: String,
        title: String,
        action: Box<dyn CleanupAction>,
    ) -> Result<(), PipelineError> {
        let mut state = self.state.lock();
        if state.cleanup_store.contains_key(&id) {
            return Err(PipelineError::DuplicateCleanupId { id });
        }
        debug!(id = %id, title = %title, "cleanup step registered");
        state.cleanup_order.push(id.clone());
        state.cleanup_store.insert(id, CleanupEntry { title, action });
        Ok(())
    }

    fn expect_additional(&self, n: usize) {
        self.state.lock().total_steps += n;
    }

    /// Removes the named cleanup entry and runs it out of band.
    ///
    /// Bypasses the progress machinery: no counter increment, no events.
    async fn run_cleanup(shared: &Arc<Self>, id: &str) -> Result<StepOutcome, PipelineError> {
        let (entry, erroring) = {
            let mut state = shared.state.lock();
            let entry = state
                .take_cleanup(id)
                .ok_or_else(|| PipelineError::unknown_cleanup_id(id))?;
            (entry, state.has_errored)
        };

        let ctx = StepContext {
            shared: Arc::clone(shared),
        };
        Ok(entry.action.run(&ctx, erroring).await)
    }

    fn counters(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.current_step, state.total_steps)
    }

    /// Advances the executed-items counter for the item about to run and
    /// returns the counters to report on its begin event.
    fn begin_item(&self) -> (usize, usize) {
        let mut state = self.state.lock();
        state.current_step += 1;
        (state.current_step, state.total_steps)
    }
}

/// The sequential step-execution engine.
///
/// Steps run strictly one at a time in registration order; cleanups drain
/// in reverse registration order when the queue is exhausted or the first
/// failure occurs. Registration is supported before [`Pipeline::run`] or,
/// through the [`StepContext`] handed to actions, from within a running
/// step; mutating the pipeline from outside during a run is unsupported.
pub struct Pipeline {
    shared: Arc<Shared>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates an empty pipeline that discards its events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_sink(Arc::new(NoOpEventSink))
    }

    /// Creates an empty pipeline that emits its events to `sink`.
    #[must_use]
    pub fn with_event_sink(sink: Arc<dyn EventSink>) -> Self {
        Self {
            shared: Arc::new(Shared::new(sink)),
        }
    }

    /// Replaces the event sink. Must happen before `run()` for the sink to
    /// see every event.
    pub fn set_event_sink(&self, sink: Arc<dyn EventSink>) {
        *self.shared.sink.write() = sink;
    }

    /// Appends a step to the queue and grows the expected total by one.
    pub fn add_step<A>(&self, title: impl Into<String>, action: A)
    where
        A: StepAction + 'static,
    {
        self.shared.add_step(title.into(), Box::new(action));
    }

    /// Registers a cleanup entry under a unique id.
    ///
    /// Fails with [`PipelineError::DuplicateCleanupId`] if the id is
    /// already registered.
    pub fn add_cleanup_step<A>(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        action: A,
    ) -> Result<(), PipelineError>
    where
        A: CleanupAction + 'static,
    {
        self.shared
            .add_cleanup_step(id.into(), title.into(), Box::new(action))
    }

    /// Grows the expected total by `n` without adding steps.
    ///
    /// Used when a step will register further steps or cleanups
    /// dynamically, so reported totals stay meaningful.
    pub fn expect_additional(&self, n: usize) {
        self.shared.expect_additional(n);
    }

    /// Runs and removes one specific cleanup entry out of order, bypassing
    /// the stack. The entry's action receives the current error flag.
    pub async fn run_cleanup(&self, id: &str) -> Result<StepOutcome, PipelineError> {
        Shared::run_cleanup(&self.shared, id).await
    }

    /// Returns the `(current, total)` progress counters.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.shared.counters()
    }

    /// Returns the number of steps still queued.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.shared.state.lock().steps.len()
    }

    /// Returns the number of cleanup entries not yet run.
    #[must_use]
    pub fn pending_cleanups(&self) -> usize {
        self.shared.state.lock().cleanup_order.len()
    }

    /// Returns true once any step or cleanup has reported failure.
    #[must_use]
    pub fn has_errored(&self) -> bool {
        self.shared.state.lock().has_errored
    }

    pub(crate) fn context(&self) -> StepContext {
        StepContext {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Starts the pipeline and returns a handle on the running task.
    ///
    /// Single-shot: consumes the pipeline. Nothing executes synchronously
    /// on the caller's stack; the first step begins on a separately
    /// scheduled task, so sinks attached before this call see every event.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn run(self) -> RunHandle {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", run_id = %run_id);
        let join = tokio::spawn(drive(self.shared).instrument(span));
        RunHandle { run_id, join }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Pipeline")
            .field("remaining_steps", &state.steps.len())
            .field("pending_cleanups", &state.cleanup_order.len())
            .field("current_step", &state.current_step)
            .field("total_steps", &state.total_steps)
            .field("has_errored", &state.has_errored)
            .finish()
    }
}

/// Engine handle passed to running actions.
///
/// Lets a step register further steps and cleanups, adjust the expected
/// total, or run a specific cleanup out of band while the pipeline is
/// executing. Safe to use only from within running actions; the engine is
/// single-threaded and cooperative.
#[derive(Clone)]
pub struct StepContext {
    shared: Arc<Shared>,
}

impl StepContext {
    /// Appends a step to the queue; it runs after the steps already queued.
    pub fn add_step<A>(&self, title: impl Into<String>, action: A)
    where
        A: StepAction + 'static,
    {
        self.shared.add_step(title.into(), Box::new(action));
    }

    /// Registers a cleanup entry under a unique id.
    pub fn add_cleanup_step<A>(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        action: A,
    ) -> Result<(), PipelineError>
    where
        A: CleanupAction + 'static,
    {
        self.shared
            .add_cleanup_step(id.into(), title.into(), Box::new(action))
    }

    /// Grows the expected total by `n` without adding steps.
    pub fn expect_additional(&self, n: usize) {
        self.shared.expect_additional(n);
    }

    /// Runs and removes one specific cleanup entry out of order.
    pub async fn run_cleanup(&self, id: &str) -> Result<StepOutcome, PipelineError> {
        Shared::run_cleanup(&self.shared, id).await
    }

    /// Returns true once any step or cleanup has reported failure.
    #[must_use]
    pub fn has_errored(&self) -> bool {
        self.shared.state.lock().has_errored
    }

    /// Returns the `(current, total)` progress counters.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.shared.counters()
    }
}

impl std::fmt::Debug for StepContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (current, total) = self.shared.counters();
        f.debug_struct("StepContext")
            .field("current_step", &current)
            .field("total_steps", &total)
            .finish()
    }
}

/// Handle on a started pipeline run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: Uuid,
    join: JoinHandle<Result<(), PipelineError>>,
}

impl RunHandle {
    /// Returns the id assigned to this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Waits for the run to reach its terminal outcome.
    ///
    /// Returns `Ok(())` if no step or initiating cleanup failed, or the
    /// first error encountered otherwise. The cleanup drain has already
    /// completed by the time this resolves.
    pub async fn wait(self) -> Result<(), PipelineError> {
        match self.join.await {
            Ok(result) => result,
            Err(err) => Err(PipelineError::Runtime(err.to_string())),
        }
    }
}

/// Runs one item (step or drained cleanup) through the progress machinery
/// and returns its outcome.
async fn run_item<Fut>(shared: &Arc<Shared>, title: &str, action: Fut) -> StepOutcome
where
    Fut: std::future::Future<Output = StepOutcome>,
{
    let (current, total) = shared.begin_item();
    shared
        .emit(PipelineEvent::Progress(Progress::begin(title, current, total)))
        .await;

    let outcome = action.await;

    let (current, total) = shared.counters();
    shared
        .emit(PipelineEvent::Progress(Progress::end(
            outcome.status(),
            current,
            total,
        )))
        .await;

    outcome
}

/// The drive loop: consumes the step queue, then drains the cleanup stack,
/// then fires exactly one terminal event.
async fn drive(shared: Arc<Shared>) -> Result<(), PipelineError> {
    let ctx = StepContext {
        shared: Arc::clone(&shared),
    };
    let mut first_error: Option<PipelineError> = None;

    // Step phase: front to back, stopping at the first failure.
    loop {
        let step = shared.state.lock().steps.pop_front();
        let Some(step) = step else { break };

        let outcome = run_item(&shared, &step.title, step.action.run(&ctx)).await;

        if let StepOutcome::Fail(message) = outcome {
            shared.state.lock().has_errored = true;
            first_error = Some(PipelineError::StepFailed {
                title: step.title,
                message,
            });
            break;
        }
    }

    // Drain phase: most recently registered first, never stopping early.
    loop {
        let popped = shared.state.lock().pop_cleanup();
        let Some((id, entry)) = popped else { break };

        let erroring = shared.state.lock().has_errored;
        let outcome = run_item(&shared, &entry.title, entry.action.run(&ctx, erroring)).await;

        if let StepOutcome::Fail(message) = outcome {
            if first_error.is_none() {
                shared.state.lock().has_errored = true;
                first_error = Some(PipelineError::CleanupFailed { id, message });
            } else {
                warn!(id = %id, error = %message, "cleanup failed during recovery drain");
            }
        }
    }

    let (current, total) = shared.counters();
    match first_error {
        None => {
            shared.emit(PipelineEvent::Finished { current, total }).await;
            Ok(())
        }
        Some(error) => {
            shared
                .emit(PipelineEvent::Failed {
                    error: error.to_string(),
                    current,
                    total,
                })
                .await;
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FnCleanup, FnStep};
    use pretty_assertions::assert_eq;

    fn noop_step() -> impl StepAction {
        FnStep::new(|_ctx| async { StepOutcome::ok() })
    }

    fn noop_cleanup() -> impl CleanupAction {
        FnCleanup::new(|_ctx, _erroring| async { StepOutcome::ok() })
    }

    #[test]
    fn test_registration_counts() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.progress(), (0, 0));

        pipeline.add_step("one", noop_step());
        pipeline.add_step("two", noop_step());
        assert_eq!(pipeline.progress(), (0, 2));
        assert_eq!(pipeline.remaining_steps(), 2);

        pipeline.add_cleanup_step("c1", "cleanup", noop_cleanup()).unwrap();
        assert_eq!(pipeline.pending_cleanups(), 1);
        // Cleanup registration does not grow the expected total
        assert_eq!(pipeline.progress(), (0, 2));
    }

    #[test]
    fn test_expect_additional_grows_total_only() {
        let pipeline = Pipeline::new();
        pipeline.add_step("one", noop_step());
        pipeline.expect_additional(3);
        assert_eq!(pipeline.progress(), (0, 4));
        assert_eq!(pipeline.remaining_steps(), 1);
    }

    #[test]
    fn test_duplicate_cleanup_id_rejected() {
        let pipeline = Pipeline::new();
        pipeline.add_cleanup_step("tmp", "first", noop_cleanup()).unwrap();

        let err = pipeline
            .add_cleanup_step("tmp", "second", noop_cleanup())
            .unwrap_err();
        assert_eq!(err, PipelineError::DuplicateCleanupId { id: "tmp".to_string() });

        // The original entry is untouched
        assert_eq!(pipeline.pending_cleanups(), 1);
    }

    #[tokio::test]
    async fn test_run_cleanup_unknown_id() {
        let pipeline = Pipeline::new();
        let err = pipeline.run_cleanup("ghost").await.unwrap_err();
        assert_eq!(err, PipelineError::unknown_cleanup_id("ghost"));
    }

    #[tokio::test]
    async fn test_run_cleanup_removes_entry() {
        let pipeline = Pipeline::new();
        pipeline.add_cleanup_step("tmp", "cleanup", noop_cleanup()).unwrap();

        let outcome = pipeline.run_cleanup("tmp").await.unwrap();
        assert_eq!(outcome, StepOutcome::Ok);
        assert_eq!(pipeline.pending_cleanups(), 0);

        let err = pipeline.run_cleanup("tmp").await.unwrap_err();
        assert_eq!(err, PipelineError::unknown_cleanup_id("tmp"));
    }

    #[tokio::test]
    async fn test_run_cleanup_passes_error_flag() {
        let pipeline = Pipeline::new();
        pipeline
            .add_cleanup_step(
                "probe",
                "probe",
                FnCleanup::new(|_ctx, erroring| async move {
                    if erroring {
                        StepOutcome::fail("saw an erroring pipeline")
                    } else {
                        StepOutcome::ok()
                    }
                }),
            )
            .unwrap();

        // No failure recorded yet, the flag must be false
        let outcome = pipeline.run_cleanup("probe").await.unwrap();
        assert_eq!(outcome, StepOutcome::Ok);
    }

    #[test]
    fn test_pipeline_debug_output() {
        let pipeline = Pipeline::new();
        pipeline.add_step("one", noop_step());
        let rendered = format!("{pipeline:?}");
        assert!(rendered.contains("remaining_steps: 1"));
        assert!(rendered.contains("has_errored: false"));
    }
}
