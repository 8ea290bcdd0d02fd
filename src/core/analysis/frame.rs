// src/core/analysis/frame.rs
//
// One 512-sample analysis frame: window, direct DFT, periodogram, then the
// Mel filterbank / DCT stages of the configured cepstral strategy.

use std::ops::Range;

use super::mfcc::{CepstralStrategy, StandardMelCepstrum};
use crate::core::audio::{AudioContainer, CHANNEL_LEFT};
use crate::core::complex::Complex;
use crate::core::dsp::dft::{dft_trig, periodogram};
use crate::core::dsp::peaks;
use crate::core::dsp::windows::{window_value, WindowType};
use crate::error::{FrameError, FrameResult};

/// Samples per frame (≈46 ms at 11025 Hz)
pub const FRAME_SIZE: usize = 512;
/// Samples between frame starts (10 ms at 11025 Hz)
pub const FRAME_STRIDE: usize = 110;
/// Frames that fit in one second of audio at [`FRAME_STRIDE`]
pub const FRAMES_PER_SEC: usize = 96;
pub const FRAME_NFFT: usize = 512;
/// Cepstral coefficients per frame
pub const MFCC_COUNT: usize = 12;

/// Real-part peak scan: lower half of the spectrum, DC skipped.
pub const FRAME_REAL_PEAK_RANGE: Range<usize> = 1..FRAME_SIZE / 2;
/// Power peak scan: lower half of the spectrum, bins 0 and 1 skipped.
pub const FRAME_POWER_PEAK_RANGE: Range<usize> = 2..FRAME_SIZE / 2;

/// Pipeline progress of a frame. Derived buffers are only meaningful once
/// the state has reached the step that fills them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrameState {
    Empty,
    Windowed,
    DftComputed,
    PowerComputed,
    MelComputed,
    MfccComputed,
}

pub struct AnalysisFrame {
    pub dft_output: Vec<Complex>,
    pub power_spectrum: Vec<f64>,
    fft_in: Vec<Complex>,
    mel_energies: Vec<f64>,
    mfcc: [f64; MFCC_COUNT],
    frame_idx: usize,
    sample_rate: u32,
    state: FrameState,
    strategy: Box<dyn CepstralStrategy>,
}

impl Default for AnalysisFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnalysisFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisFrame")
            .field("frame_idx", &self.frame_idx)
            .field("sample_rate", &self.sample_rate)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AnalysisFrame {
    /// Frame using the standard Mel cepstrum
    pub fn new() -> Self {
        Self::with_strategy(Box::new(StandardMelCepstrum::default()))
    }

    pub fn with_strategy(strategy: Box<dyn CepstralStrategy>) -> Self {
        Self {
            dft_output: vec![Complex::new(0.0, 0.0); FRAME_SIZE],
            power_spectrum: vec![0.0; FRAME_SIZE],
            fft_in: vec![Complex::new(0.0, 0.0); FRAME_SIZE],
            mel_energies: Vec::new(),
            mfcc: [0.0; MFCC_COUNT],
            frame_idx: 0,
            sample_rate: 0,
            state: FrameState::Empty,
            strategy,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frame_index(&self) -> usize {
        self.frame_idx
    }

    pub fn set_frame_index(&mut self, index: usize) {
        self.frame_idx = index;
    }

    /// Log filter energies, once the filterbank stage has run
    pub fn mel_energies(&self) -> Option<&[f64]> {
        (self.state >= FrameState::MelComputed).then_some(self.mel_energies.as_slice())
    }

    /// Cepstral coefficients, once the whole pipeline has run
    pub fn mfcc(&self) -> Option<&[f64; MFCC_COUNT]> {
        (self.state == FrameState::MfccComputed).then_some(&self.mfcc)
    }

    /// DFT and periodogram of the first frame of `wav`.
    pub fn calc_dft(&mut self, wav: &AudioContainer) -> FrameResult<()> {
        self.calc_dft_at(wav, 0)
    }

    /// DFT and periodogram of the frame starting at sample `start`.
    ///
    /// Samples are windowed as stored, without removing the silence
    /// baseline. Positions past the end of the container read as silence.
    pub fn calc_dft_at(&mut self, wav: &AudioContainer, start: usize) -> FrameResult<()> {
        self.state = FrameState::Empty;
        if start >= wav.capacity() {
            return Err(FrameError::EmptyFrame {
                start,
                capacity: wav.capacity(),
            });
        }

        self.sample_rate = wav.header.sample_rate;

        for (i, slot) in self.fft_in.iter_mut().enumerate() {
            let window = window_value(i, FRAME_SIZE, WindowType::HannPinnedStart);
            let sample = wav.get_sample(start + i, CHANNEL_LEFT) as f64;
            *slot = Complex::new(sample * window, 0.0);
        }
        self.state = FrameState::Windowed;

        dft_trig(&self.fft_in, &mut self.dft_output);
        self.state = FrameState::DftComputed;

        periodogram(&self.dft_output, &mut self.power_spectrum);
        self.state = FrameState::PowerComputed;

        log::debug!("Frame {} (start {}): power spectrum ready", self.frame_idx, start);
        Ok(())
    }

    /// Runs the strategy's filterbank stage over the power spectrum.
    pub fn calc_mel_filterbank(&mut self) -> FrameResult<()> {
        if self.state < FrameState::PowerComputed {
            return Err(FrameError::MissingPowerSpectrum);
        }
        self.mel_energies = self.strategy.mel_filterbank(&self.power_spectrum, self.sample_rate)?;
        self.state = FrameState::MelComputed;
        Ok(())
    }

    /// Runs the strategy's DCT over the log filter energies.
    pub fn calc_dct(&mut self) -> FrameResult<()> {
        if self.state < FrameState::MelComputed {
            return Err(FrameError::MissingFilterbank);
        }
        self.mfcc = self.strategy.dct(&self.mel_energies)?;
        self.state = FrameState::MfccComputed;
        Ok(())
    }

    /// DFT → filterbank → DCT for the first frame; stops at the first failing stage.
    pub fn calc_mfcc(&mut self, wav: &AudioContainer) -> FrameResult<()> {
        self.calc_mfcc_at(wav, 0)
    }

    pub fn calc_mfcc_at(&mut self, wav: &AudioContainer, start: usize) -> FrameResult<()> {
        self.calc_dft_at(wav, start)?;
        self.calc_mel_filterbank()?;
        self.calc_dct()
    }

    /// Largest real DFT part over [`FRAME_REAL_PEAK_RANGE`]
    pub fn find_max_real_output(&self) -> f64 {
        peaks::find_max(&self.dft_output, FRAME_REAL_PEAK_RANGE, |c| c.re)
    }

    /// Largest power value over [`FRAME_POWER_PEAK_RANGE`]
    pub fn find_max_power_output(&self) -> f64 {
        peaks::find_max(&self.power_spectrum, FRAME_POWER_PEAK_RANGE, |&p| p)
    }

    /// Bin holding the power peak over [`FRAME_POWER_PEAK_RANGE`]
    pub fn peak_power_bin(&self) -> Option<(usize, f64)> {
        peaks::peak_bin(&self.power_spectrum, FRAME_POWER_PEAK_RANGE, |&p| p)
    }

    /// Hz between adjacent bins at the last analysed sample rate
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate as f64 / FRAME_NFFT as f64
    }
}
