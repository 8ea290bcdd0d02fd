//! Digital Signal Processing utilities

pub mod dft;
pub mod peaks;
pub mod windows;

pub use dft::{dft_trig, dft_twiddle, periodogram, DftEngine, DFT_FRAME_SIZE, DFT_NFFT, ENGINE_REAL_PEAK_RANGE};
pub use windows::{create_window, window_value, WindowType};
