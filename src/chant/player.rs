use crate::chant::frames::{FrameScheduler, FrameTask};
use crate::chant::glow::{GlowParams, GlowSurfaces};
use crate::chant::graph::{AudioGraph, ContextState, GraphSource};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stopping is instantaneous, so it never shows up as a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChantState {
    Idle,
    Playing,
}

/// Drives the hero glow from the chant's bass energy.
///
/// The audio graph is opened lazily on the first `start` and kept for the
/// player's lifetime. `dispose` (or drop) releases it exactly once.
pub struct ChantPlayer<S: GraphSource, F: FrameScheduler> {
    source: S,
    scheduler: F,
    graph: Option<S::Graph>,
    bins: Vec<u8>,
    active: Arc<AtomicBool>,
    pending: Option<F::Task>,
    surfaces: GlowSurfaces,
    state: ChantState,
    disposed: bool,
}

impl<S: GraphSource, F: FrameScheduler> ChantPlayer<S, F> {
    pub fn new(source: S, scheduler: F) -> Self {
        Self {
            source,
            scheduler,
            graph: None,
            bins: Vec::new(),
            active: Arc::new(AtomicBool::new(false)),
            pending: None,
            surfaces: GlowSurfaces::default(),
            state: ChantState::Idle,
            disposed: false,
        }
    }

    pub fn state(&self) -> ChantState {
        self.state
    }

    pub fn surfaces(&self) -> &GlowSurfaces {
        &self.surfaces
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Play from the top. While already playing this rewinds without
    /// rebuilding anything.
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }

        if self.graph.is_none() {
            match self.source.open() {
                Ok(graph) => {
                    self.bins = vec![0; graph.frequency_bin_count()];
                    self.graph = Some(graph);
                }
                Err(e) => {
                    warn!("chant unavailable: {e}");
                    return;
                }
            }
        }
        let Some(graph) = self.graph.as_mut() else {
            return;
        };

        let resumed = match graph.context_state() {
            ContextState::Suspended => graph.resume(),
            _ => Ok(()),
        };

        if let Err(e) = resumed.and_then(|()| graph.restart()) {
            warn!("chant playback failed: {e}");
            self.stop();
            return;
        }

        self.active.store(true, Ordering::Release);
        self.state = ChantState::Playing;
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frames(Arc::clone(&self.active)));
        }
        info!("chant started");
    }

    /// One glow frame. Returns whether the surfaces changed.
    pub fn on_frame(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(graph) = self.graph.as_mut() else {
            return false;
        };

        if graph.has_ended() {
            debug!("chant ended");
            self.stop();
            return true;
        }

        graph.byte_frequency_data(&mut self.bins);
        self.surfaces.apply(GlowParams::from_bins(&self.bins));
        true
    }

    pub fn stop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.surfaces.clear();
        if let Some(mut task) = self.pending.take() {
            task.cancel();
        }
        self.state = ChantState::Idle;
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        if let Some(mut graph) = self.graph.take() {
            graph.close();
        }
        self.disposed = true;
        debug!("chant player disposed");
    }
}

impl<S: GraphSource, F: FrameScheduler> Drop for ChantPlayer<S, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
