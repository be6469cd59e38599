//! Frequency analysis matching the byte output of a browser analyser node.

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// 1024-point transform, 512 usable bins.
pub const FFT_SIZE: usize = 1024;
pub const FREQUENCY_BIN_COUNT: usize = FFT_SIZE / 2;

const SMOOTHING: f32 = 0.8;
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

pub struct FrequencyAnalyser {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    windowed: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, carried between calls.
    smoothed: Vec<f32>,
}

impl Default for FrequencyAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyAnalyser {
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let spectrum = fft.make_output_vec();

        Self {
            fft,
            window: blackman_window(FFT_SIZE),
            windowed: vec![0.0; FFT_SIZE],
            spectrum,
            smoothed: vec![0.0; FREQUENCY_BIN_COUNT],
        }
    }

    pub fn frequency_bin_count(&self) -> usize {
        FREQUENCY_BIN_COUNT
    }

    /// Analyse the most recent `FFT_SIZE` samples (zero-padded at the front
    /// when fewer are given) and write one byte per bin into `out`.
    pub fn byte_frequency_data(&mut self, recent: &[f32], out: &mut [u8]) {
        let take = recent.len().min(FFT_SIZE);
        let pad = FFT_SIZE - take;
        let tail = &recent[recent.len() - take..];

        self.windowed[..pad].fill(0.0);
        for (i, &sample) in tail.iter().enumerate() {
            self.windowed[pad + i] = sample * self.window[pad + i];
        }

        if self.fft.process(&mut self.windowed, &mut self.spectrum).is_err() {
            out.fill(0);
            return;
        }

        let scale = 1.0 / FFT_SIZE as f32;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(&self.spectrum) {
            let magnitude = bin.norm() * scale;
            let next = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * magnitude;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }

        for (byte, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            *byte = magnitude_to_byte(magnitude);
        }
    }

    /// Forget smoothing history, e.g. when playback restarts.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }
}

fn blackman_window(len: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42f32, 0.5f32, 0.08f32);
    let n = len as f32;
    (0..len)
        .map(|i| {
            let x = i as f32 / n;
            a0 - a1 * (2.0 * std::f32::consts::PI * x).cos()
                + a2 * (4.0 * std::f32::consts::PI * x).cos()
        })
        .collect()
}

fn magnitude_to_byte(magnitude: f32) -> u8 {
    let db = 20.0 * magnitude.log10();
    let scaled = (255.0 / (MAX_DECIBELS - MIN_DECIBELS)) * (db - MIN_DECIBELS);
    // log10(0) is -inf, which clamps to 0
    scaled.floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * freq_bin as f32 * i as f32 / FFT_SIZE as f32;
                amplitude * phase.sin()
            })
            .collect()
    }

    #[test]
    fn silence_reads_as_zero() {
        let mut analyser = FrequencyAnalyser::new();
        let mut out = vec![7u8; FREQUENCY_BIN_COUNT];
        analyser.byte_frequency_data(&[0.0; FFT_SIZE], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn short_input_is_zero_padded() {
        let mut analyser = FrequencyAnalyser::new();
        let mut out = vec![0u8; FREQUENCY_BIN_COUNT];
        analyser.byte_frequency_data(&[], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn low_tone_lands_in_low_bins() {
        let mut analyser = FrequencyAnalyser::new();
        let mut out = vec![0u8; FREQUENCY_BIN_COUNT];
        let tone = sine(8, 0.9);
        for _ in 0..20 {
            analyser.byte_frequency_data(&tone, &mut out);
        }
        let peak = out.iter().enumerate().max_by_key(|(_, b)| **b).map(|(i, _)| i).unwrap();
        assert!((7..=9).contains(&peak), "peak at {peak}");
        assert!(out[8] > 200, "{}", out[8]);
        assert!(out[400] < out[8]);
    }

    #[test]
    fn smoothing_ramps_up_over_frames() {
        let mut analyser = FrequencyAnalyser::new();
        let mut first = vec![0u8; FREQUENCY_BIN_COUNT];
        let mut later = vec![0u8; FREQUENCY_BIN_COUNT];
        let tone = sine(4, 0.5);
        analyser.byte_frequency_data(&tone, &mut first);
        for _ in 0..10 {
            analyser.byte_frequency_data(&tone, &mut later);
        }
        assert!(later[4] > first[4]);

        analyser.reset();
        analyser.byte_frequency_data(&tone, &mut later);
        assert_eq!(later[4], first[4]);
    }

    #[test]
    fn byte_mapping_clamps_to_decibel_range() {
        assert_eq!(magnitude_to_byte(0.0), 0);
        assert_eq!(magnitude_to_byte(1e-6), 0); // -120 dB
        assert_eq!(magnitude_to_byte(1.0), 255); // 0 dB
        // -65 dB sits halfway
        assert_eq!(magnitude_to_byte(10f32.powf(-65.0 / 20.0)), 127);
    }
}
