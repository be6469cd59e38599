use crate::chant::ChantError;
use crate::chant::analyser::{FFT_SIZE, FrequencyAnalyser};
use crate::chant::decoder::{self, DecodedTrack};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// Audio context, playback source and analysis node, treated as one unit.
pub trait AudioGraph {
    fn context_state(&self) -> ContextState;
    fn resume(&mut self) -> Result<(), ChantError>;
    /// Rewind to the start and play.
    fn restart(&mut self) -> Result<(), ChantError>;
    fn has_ended(&self) -> bool;
    fn frequency_bin_count(&self) -> usize;
    fn byte_frequency_data(&mut self, out: &mut [u8]);
    /// Release the context. Safe to call more than once.
    fn close(&mut self);
}

/// Builds the graph on first use.
pub trait GraphSource {
    type Graph: AudioGraph;

    fn open(&mut self) -> Result<Self::Graph, ChantError>;
}

// ---------------------------------------------------------------------------
// Playback state shared with the output callback
// ---------------------------------------------------------------------------

struct Playback {
    samples: Vec<f32>,
    position: f64,
    /// Track samples advanced per output frame.
    step: f64,
    playing: bool,
    ended: bool,
    /// Most recently played samples, oldest first.
    recent: VecDeque<f32>,
}

impl Playback {
    fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0.0,
            step: 1.0,
            playing: false,
            ended: false,
            recent: VecDeque::with_capacity(FFT_SIZE),
        }
    }

    fn rewind_and_play(&mut self) {
        self.position = 0.0;
        self.playing = true;
        self.ended = false;
        self.recent.clear();
    }

    fn next_sample(&mut self) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let index = self.position as usize;
        let Some(&sample) = self.samples.get(index) else {
            self.playing = false;
            self.ended = true;
            return 0.0;
        };
        self.position += self.step;

        if self.recent.len() == FFT_SIZE {
            self.recent.pop_front();
        }
        self.recent.push_back(sample);
        sample
    }
}

enum GraphCommand {
    Resume(SyncSender<Result<(), ChantError>>),
    Close,
}

// ---------------------------------------------------------------------------
// cpal implementation
// ---------------------------------------------------------------------------

pub struct CpalGraphSource {
    path: PathBuf,
}

impl CpalGraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for CpalGraphSource {
    type Graph = CpalGraph;

    fn open(&mut self) -> Result<CpalGraph, ChantError> {
        let track = decoder::decode_file(&self.path)?;
        let duration = track.duration_secs();
        let DecodedTrack { samples, sample_rate } = track;
        let playback = Arc::new(Mutex::new(Playback::new(samples)));

        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let shared = Arc::clone(&playback);

        let worker = thread::Builder::new()
            .name("chant-audio".into())
            .spawn(move || run_audio_thread(sample_rate, shared, command_rx, ready_tx))
            .map_err(|e| ChantError::Stream(format!("could not spawn audio thread: {e}")))?;

        let ready = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(ChantError::Stream("audio thread exited during setup".into())));
        if let Err(e) = ready {
            let _ = worker.join();
            return Err(e);
        }

        info!("chant audio graph opened for {} ({duration:.1}s)", self.path.display());
        Ok(CpalGraph {
            playback,
            commands: command_tx,
            worker: Some(worker),
            state: ContextState::Suspended,
            analyser: FrequencyAnalyser::new(),
            window: Vec::with_capacity(FFT_SIZE),
        })
    }
}

/// The output stream lives on its own thread because `cpal::Stream` is not
/// `Send`; this handle talks to it over a channel.
pub struct CpalGraph {
    playback: Arc<Mutex<Playback>>,
    commands: Sender<GraphCommand>,
    worker: Option<JoinHandle<()>>,
    state: ContextState,
    analyser: FrequencyAnalyser,
    window: Vec<f32>,
}

impl AudioGraph for CpalGraph {
    fn context_state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), ChantError> {
        if self.state == ContextState::Closed {
            return Err(ChantError::Closed);
        }
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.commands
            .send(GraphCommand::Resume(reply_tx))
            .map_err(|_| ChantError::Closed)?;
        reply_rx.recv().map_err(|_| ChantError::Closed)??;
        self.state = ContextState::Running;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), ChantError> {
        if self.state == ContextState::Closed {
            return Err(ChantError::Closed);
        }
        self.playback.lock().rewind_and_play();
        self.analyser.reset();
        Ok(())
    }

    fn has_ended(&self) -> bool {
        self.playback.lock().ended
    }

    fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.window.clear();
        self.window.extend(self.playback.lock().recent.iter().copied());
        self.analyser.byte_frequency_data(&self.window, out);
    }

    fn close(&mut self) {
        if self.state == ContextState::Closed {
            return;
        }
        self.state = ContextState::Closed;
        self.playback.lock().playing = false;
        let _ = self.commands.send(GraphCommand::Close);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("chant audio thread panicked");
        }
        debug!("chant audio graph closed");
    }
}

impl Drop for CpalGraph {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_audio_thread(
    track_rate: u32,
    playback: Arc<Mutex<Playback>>,
    commands: Receiver<GraphCommand>,
    ready: SyncSender<Result<(), ChantError>>,
) {
    let stream = match build_stream(track_rate, &playback) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    // a fresh context starts suspended until the first play
    if let Err(e) = stream.pause() {
        debug!("could not suspend new chant stream: {e}");
    }
    if ready.send(Ok(())).is_err() {
        return;
    }

    while let Ok(command) = commands.recv() {
        match command {
            GraphCommand::Resume(reply) => {
                let result = stream.play().map_err(|e| ChantError::Stream(e.to_string()));
                let _ = reply.send(result);
            }
            GraphCommand::Close => break,
        }
    }
    drop(stream);
}

fn build_stream(track_rate: u32, playback: &Arc<Mutex<Playback>>) -> Result<cpal::Stream, ChantError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(ChantError::NoOutputDevice)?;
    let config = device
        .default_output_config()
        .map_err(|e| ChantError::Stream(e.to_string()))?;

    let device_rate = config.sample_rate().0;
    let channels = usize::from(config.channels()).max(1);
    playback.lock().step = f64::from(track_rate) / f64::from(device_rate.max(1));
    debug!("chant output: {device_rate} Hz, {channels} channels, track at {track_rate} Hz");

    let shared = Arc::clone(playback);
    device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                // never block the audio thread; on contention play silence
                let Some(mut playback) = shared.try_lock() else {
                    data.fill(0.0);
                    return;
                };
                for frame in data.chunks_mut(channels) {
                    frame.fill(playback.next_sample());
                }
            },
            |err| warn!("chant stream error: {err}"),
            None,
        )
        .map_err(|e| ChantError::Stream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_playback_is_silent() {
        let mut playback = Playback::new(vec![0.5; 8]);
        assert_eq!(playback.next_sample(), 0.0);
        assert!(playback.recent.is_empty());
        assert!(!playback.ended);
    }

    #[test]
    fn playback_runs_to_the_end() {
        let mut playback = Playback::new(vec![0.1, 0.2, 0.3]);
        playback.rewind_and_play();
        let played: Vec<f32> = (0..4).map(|_| playback.next_sample()).collect();
        assert_eq!(played, vec![0.1, 0.2, 0.3, 0.0]);
        assert!(playback.ended);
        assert!(!playback.playing);
    }

    #[test]
    fn rewind_restarts_from_zero() {
        let mut playback = Playback::new(vec![0.1, 0.2]);
        playback.rewind_and_play();
        playback.next_sample();
        playback.next_sample();
        playback.next_sample();
        assert!(playback.ended);

        playback.rewind_and_play();
        assert!(!playback.ended);
        assert!(playback.recent.is_empty());
        assert_eq!(playback.next_sample(), 0.1);
    }

    #[test]
    fn step_resamples_by_rate_ratio() {
        // 22.05 kHz track on a 44.1 kHz device repeats each sample twice
        let mut playback = Playback::new(vec![0.1, 0.2]);
        playback.step = 0.5;
        playback.rewind_and_play();
        let played: Vec<f32> = (0..4).map(|_| playback.next_sample()).collect();
        assert_eq!(played, vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn analysis_window_keeps_latest_samples() {
        let samples: Vec<f32> = (0..FFT_SIZE + 10).map(|i| i as f32).collect();
        let mut playback = Playback::new(samples);
        playback.rewind_and_play();
        for _ in 0..FFT_SIZE + 10 {
            playback.next_sample();
        }
        assert_eq!(playback.recent.len(), FFT_SIZE);
        assert_eq!(playback.recent.front().copied(), Some(10.0));
        assert_eq!(playback.recent.back().copied(), Some((FFT_SIZE + 9) as f32));
    }
}
