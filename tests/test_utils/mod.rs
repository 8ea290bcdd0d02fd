// tests/test_utils/mod.rs
//
// Shared helpers for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use uuid::Uuid;
use wavframe::core::audio::CHANNEL_LEFT;
use wavframe::core::analysis::FRAME_NFFT;
use wavframe::AudioContainer;

pub const SAMPLE_RATE: f64 = 11025.0;

/// Unique path in the system temp directory
pub fn temp_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wavframe-{}.{}", Uuid::new_v4(), extension))
}

/// Container holding a full-scale tone
pub fn tone(freq: f64) -> AudioContainer {
    let mut audio = AudioContainer::new();
    audio.fill_waveform(freq, CHANNEL_LEFT);
    audio
}

/// Frequency that lands exactly on DFT bin `k`
pub fn bin_frequency(k: usize) -> f64 {
    k as f64 * SAMPLE_RATE / FRAME_NFFT as f64
}

/// Index of the largest value in `values[range]`
pub fn argmax(values: &[f64], range: std::ops::Range<usize>) -> usize {
    let mut best = range.start;
    for i in range {
        if values[i] > values[best] {
            best = i;
        }
    }
    best
}

pub struct TempFile(pub PathBuf);

impl TempFile {
    pub fn new(extension: &str) -> Self {
        Self(temp_path(extension))
    }

    pub fn name(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
