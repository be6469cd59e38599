use crate::chant::frames::{FrameScheduler, FrameTask};
use crate::state::messages::UiEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Glow frame clock: posts `UiEvent::GlowFrame` into the UI loop at a fixed
/// rate for as long as the chant's active flag stays set.
pub struct TokioFrames {
    events: mpsc::Sender<UiEvent>,
    period: Duration,
}

impl TokioFrames {
    pub fn new(events: mpsc::Sender<UiEvent>, fps: u32) -> Self {
        Self {
            events,
            period: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        }
    }
}

pub struct FrameLoop {
    handle: JoinHandle<()>,
}

impl FrameTask for FrameLoop {
    fn cancel(&mut self) {
        self.handle.abort();
    }
}

impl FrameScheduler for TokioFrames {
    type Task = FrameLoop;

    fn request_frames(&mut self, active: Arc<AtomicBool>) -> FrameLoop {
        let events = self.events.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !active.load(Ordering::Acquire) {
                    break;
                }
                // a busy UI loop drops frames instead of queueing them
                match events.try_send(UiEvent::GlowFrame) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        FrameLoop { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn emits_frames_while_active() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut frames = TokioFrames::new(tx, 144);
        let active = Arc::new(AtomicBool::new(true));
        let _task = frames.request_frames(Arc::clone(&active));

        for _ in 0..3 {
            let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
            assert!(matches!(event, Some(UiEvent::GlowFrame)));
        }
    }

    #[tokio::test]
    async fn clearing_the_flag_ends_the_task() {
        let (tx, _rx) = mpsc::channel(8);
        let mut frames = TokioFrames::new(tx, 144);
        let active = Arc::new(AtomicBool::new(true));
        let task = frames.request_frames(Arc::clone(&active));

        active.store(false, Ordering::Release);
        timeout(Duration::from_secs(2), task.handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn cancel_aborts_the_task() {
        let (tx, _rx) = mpsc::channel(8);
        let mut frames = TokioFrames::new(tx, 10);
        let mut task = frames.request_frames(Arc::new(AtomicBool::new(true)));

        task.cancel();
        let joined = timeout(Duration::from_secs(2), task.handle).await.unwrap();
        assert!(joined.unwrap_err().is_cancelled());
    }
}
