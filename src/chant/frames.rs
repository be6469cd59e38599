use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Handle to a running per-frame callback.
pub trait FrameTask {
    /// Stop rescheduling. Idempotent.
    fn cancel(&mut self);
}

/// Source of per-frame callbacks for the glow loop.
///
/// The task checks `active` at the top of every frame and stops
/// rescheduling itself once it is cleared; that flag is the only
/// cancellation signal a task needs.
pub trait FrameScheduler {
    type Task: FrameTask;

    fn request_frames(&mut self, active: Arc<AtomicBool>) -> Self::Task;
}
