// src/core/analysis/mfcc.rs
//
// Mel filterbank and DCT stages of the MFCC pipeline, behind a strategy
// trait so the frame orchestration does not depend on one filter design.

use std::f64::consts::PI;

use super::frame::MFCC_COUNT;
use crate::config::MelConfig;
use crate::error::{FrameError, FrameResult};

/// The two stages after the power spectrum.
pub trait CepstralStrategy {
    /// Projects a full-length power spectrum onto the filterbank and returns
    /// the log energy of each filter.
    fn mel_filterbank(&self, power_spectrum: &[f64], sample_rate: u32) -> FrameResult<Vec<f64>>;

    /// DCT of the log energies. Coefficients past the strategy's count are 0.
    fn dct(&self, log_energies: &[f64]) -> FrameResult<[f64; MFCC_COUNT]>;

    /// Leading coefficients [`CepstralStrategy::dct`] fills in.
    fn num_coefficients(&self) -> usize;
}

/// Strategy with neither stage implemented; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedCepstrum;

impl CepstralStrategy for UnimplementedCepstrum {
    fn mel_filterbank(&self, _power_spectrum: &[f64], _sample_rate: u32) -> FrameResult<Vec<f64>> {
        Err(FrameError::StageUnimplemented("mel filterbank"))
    }

    fn dct(&self, _log_energies: &[f64]) -> FrameResult<[f64; MFCC_COUNT]> {
        Err(FrameError::StageUnimplemented("dct"))
    }

    fn num_coefficients(&self) -> usize {
        0
    }
}

/// Triangular filters evenly spaced on the Mel scale, natural-log energies
/// and an orthonormal DCT-II.
#[derive(Debug, Clone, Default)]
pub struct StandardMelCepstrum {
    config: MelConfig,
}

impl StandardMelCepstrum {
    pub fn new(config: MelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MelConfig {
        &self.config
    }
}

impl CepstralStrategy for StandardMelCepstrum {
    fn mel_filterbank(&self, power_spectrum: &[f64], sample_rate: u32) -> FrameResult<Vec<f64>> {
        let nfft = power_spectrum.len();
        if nfft < 2 {
            return Err(FrameError::MissingPowerSpectrum);
        }
        self.config.check_band(sample_rate)?;

        let bank = build_mel_filterbank(
            self.config.num_filters,
            nfft,
            sample_rate as f64,
            self.config.low_freq_hz,
            self.config.high_freq(sample_rate),
        );
        let energies = apply_filterbank(&power_spectrum[..nfft / 2 + 1], &bank);

        Ok(energies
            .into_iter()
            .map(|e| e.max(self.config.log_floor).ln())
            .collect())
    }

    fn dct(&self, log_energies: &[f64]) -> FrameResult<[f64; MFCC_COUNT]> {
        if log_energies.is_empty() {
            return Err(FrameError::MissingFilterbank);
        }

        let cepstra = dct_ii(log_energies);
        let mut out = [0.0; MFCC_COUNT];
        let count = self.num_coefficients().min(cepstra.len());
        out[..count].copy_from_slice(&cepstra[..count]);
        Ok(out)
    }

    fn num_coefficients(&self) -> usize {
        self.config.num_coefficients.min(MFCC_COUNT)
    }
}

/// `mel = 2595 · log10(1 + hz / 700)`
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Inverse of [`hz_to_mel`]
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// `num_filters` rows of `nfft / 2 + 1` triangular weights.
pub fn build_mel_filterbank(
    num_filters: usize,
    nfft: usize,
    sample_rate: f64,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let n_bins = nfft / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    let num_points = num_filters + 2;
    let bins: Vec<usize> = (0..num_points)
        .map(|i| {
            let mel = mel_low + (mel_high - mel_low) * i as f64 / (num_points - 1) as f64;
            let bin = ((nfft as f64 + 1.0) * mel_to_hz(mel) / sample_rate).floor() as usize;
            bin.min(n_bins - 1)
        })
        .collect();

    (1..=num_filters)
        .map(|m| {
            let (left, center, right) = (bins[m - 1], bins[m], bins[m + 1]);
            let mut row = vec![0.0; n_bins];

            for (k, w) in row.iter_mut().enumerate().take(center).skip(left) {
                *w = (k - left) as f64 / (center - left) as f64;
            }
            for (k, w) in row.iter_mut().enumerate().take(right + 1).skip(center) {
                *w = if right == center {
                    1.0
                } else {
                    (right - k) as f64 / (right - center) as f64
                };
            }
            row
        })
        .collect()
}

/// Weighted sum of the spectrum under each filter.
pub fn apply_filterbank(power: &[f64], bank: &[Vec<f64>]) -> Vec<f64> {
    bank.iter()
        .map(|row| row.iter().zip(power).map(|(w, p)| w * p).sum())
        .collect()
}

/// Orthonormal DCT-II: `c[k] = s_k · Σ_m x[m]·cos(π·k·(m + ½)/M)`.
pub fn dct_ii(input: &[f64]) -> Vec<f64> {
    let m = input.len();
    let scale0 = (1.0 / m as f64).sqrt();
    let scale = (2.0 / m as f64).sqrt();

    (0..m)
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (PI * k as f64 * (i as f64 + 0.5) / m as f64).cos())
                .sum();
            sum * if k == 0 { scale0 } else { scale }
        })
        .collect()
}
