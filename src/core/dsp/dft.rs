//! Direct O(N²) discrete Fourier transform and periodogram
//!
//! Frames are transformed term by term; there is no FFT plan or scratch buffer.

use std::f64::consts::PI;
use std::ops::Range;

use super::peaks;
use super::windows::{window_value, WindowType};
use crate::core::audio::{AudioContainer, CHANNEL_LEFT};
use crate::core::complex::{twiddle, Complex, ComplexExt};

pub const DFT_FRAME_SIZE: usize = 512;
pub const DFT_NFFT: usize = 512;

/// Real-part peak scan of the standalone engine: every bin except DC.
pub const ENGINE_REAL_PEAK_RANGE: Range<usize> = 1..DFT_FRAME_SIZE;

/// `X[k] = Σ_t x[t]·exp(-i·2π·k·t/N)` with explicit sine and cosine per term.
pub fn dft_trig(input: &[Complex], output: &mut [Complex]) {
    let n = input.len();
    let pi2 = -2.0 * PI;
    let invs = 1.0 / n as f64;

    for (y, out) in output.iter_mut().enumerate().take(n) {
        let mut sum = Complex::new(0.0, 0.0);
        for (x, sample) in input.iter().enumerate() {
            let angle = pi2 * (y * x) as f64 * invs;
            let (sine, cosine) = angle.sin_cos();
            sum.re += sample.re * cosine - sample.im * sine;
            sum.im += sample.re * sine + sample.im * cosine;
        }
        *out = sum;
    }
}

/// Same transform as [`dft_trig`], built from twiddle factors.
pub fn dft_twiddle(input: &[Complex], output: &mut [Complex]) {
    let n = input.len();
    for (k, out) in output.iter_mut().enumerate().take(n) {
        let mut sum = Complex::new(0.0, 0.0);
        for (t, sample) in input.iter().enumerate() {
            sum += sample * twiddle(k, t, n);
        }
        *out = sum;
    }
}

/// `P[k] = |X[k]|² / N`
pub fn periodogram(dft: &[Complex], power: &mut [f64]) {
    let invs = 1.0 / dft.len() as f64;
    for (p, bin) in power.iter_mut().zip(dft) {
        *p = invs * bin.magnitude().powi(2);
    }
}

/// Reusable direct-DFT calculator with fixed input and output buffers.
///
/// `output` keeps the previous result until [`DftEngine::calculate_dft`]
/// runs again.
#[derive(Debug, Clone)]
pub struct DftEngine {
    pub input: Vec<Complex>,
    pub output: Vec<Complex>,
    inverse: f64,
}

impl Default for DftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DftEngine {
    pub fn new() -> Self {
        Self {
            input: vec![Complex::new(0.0, 0.0); DFT_FRAME_SIZE],
            output: vec![Complex::new(0.0, 0.0); DFT_FRAME_SIZE],
            inverse: 1.0 / DFT_FRAME_SIZE as f64,
        }
    }

    /// Windows the first 512 samples of `wav` (silence baseline removed)
    /// into `input`, then transforms them.
    pub fn calculate_dft_from(&mut self, wav: &AudioContainer) {
        log::debug!("DFT starting");
        let silence = wav.silence() as f64;

        for (i, slot) in self.input.iter_mut().enumerate() {
            let window = window_value(i, DFT_FRAME_SIZE, WindowType::Hann);
            let real = (wav.get_sample(i, CHANNEL_LEFT) as f64 - silence) * window;
            *slot = Complex::new(real, 0.0);
        }
        log::debug!("DFT windowing done");

        self.calculate_dft();
    }

    /// Transforms whatever is currently in `input`.
    pub fn calculate_dft(&mut self) {
        dft_twiddle(&self.input, &mut self.output);
        log::debug!("DFT computed {} bins", self.output.len());
    }

    /// `|output[k]|² / N`, or 0 for `k` past the last bin.
    pub fn power_coef(&self, index: usize) -> f64 {
        match self.output.get(index) {
            Some(bin) => self.inverse * bin.magnitude().powi(2),
            None => 0.0,
        }
    }

    /// Largest real part over [`ENGINE_REAL_PEAK_RANGE`].
    pub fn find_max_real_output(&self) -> f64 {
        peaks::find_max(&self.output, ENGINE_REAL_PEAK_RANGE, |c| c.re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(n: usize) -> Vec<Complex> {
        let mut v = vec![Complex::new(0.0, 0.0); n];
        v[0] = Complex::new(1.0, 0.0);
        v
    }

    #[test]
    fn test_impulse_is_flat() {
        let input = impulse(16);
        let mut output = vec![Complex::new(0.0, 0.0); 16];
        dft_trig(&input, &mut output);
        for bin in &output {
            assert!((bin.re - 1.0).abs() < 1e-12);
            assert!(bin.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_trig_and_twiddle_agree() {
        let input: Vec<Complex> = (0..64)
            .map(|i| Complex::new((i as f64 * 0.37).sin() * 100.0, 0.0))
            .collect();
        let mut a = vec![Complex::new(0.0, 0.0); 64];
        let mut b = vec![Complex::new(0.0, 0.0); 64];
        dft_trig(&input, &mut a);
        dft_twiddle(&input, &mut b);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).norm() < 1e-8);
        }
    }

    #[test]
    fn test_periodogram_of_constant() {
        let input = vec![Complex::new(2.0, 0.0); 8];
        let mut dft = vec![Complex::new(0.0, 0.0); 8];
        let mut power = vec![0.0; 8];
        dft_trig(&input, &mut dft);
        periodogram(&dft, &mut power);

        // DC bin = 16, power = 256 / 8
        assert!((power[0] - 32.0).abs() < 1e-9);
        assert!(power[1..].iter().all(|&p| p < 1e-12));
    }

    #[test]
    fn test_power_coef_out_of_range() {
        let engine = DftEngine::new();
        assert_eq!(engine.power_coef(DFT_FRAME_SIZE), 0.0);
        assert_eq!(engine.power_coef(10_000), 0.0);
    }

    #[test]
    fn test_engine_on_silence() {
        let mut engine = DftEngine::new();
        engine.calculate_dft_from(&AudioContainer::new());
        assert_eq!(engine.find_max_real_output(), 0.0);
        assert_eq!(engine.power_coef(5), 0.0);
    }

    #[test]
    fn test_engine_removes_silence_baseline() {
        let mut audio = AudioContainer::new();
        audio.header.bits_per_sample = 8;
        for i in 0..DFT_FRAME_SIZE {
            audio.set_sample(i, 0, 64);
        }

        let mut engine = DftEngine::new();
        engine.calculate_dft_from(&audio);
        assert!(engine.input.iter().all(|c| c.re == 0.0));
        assert!(engine.power_coef(0) < 1e-12);
    }

    #[test]
    fn test_output_is_stale_until_recomputed() {
        let mut engine = DftEngine::new();
        engine.input[0] = Complex::new(1.0, 0.0);
        engine.calculate_dft();
        let first = engine.output.clone();

        engine.input[0] = Complex::new(5.0, 0.0);
        assert_eq!(engine.output, first);
        engine.calculate_dft();
        assert!((engine.output[3].re - 5.0).abs() < 1e-9);
    }
}
