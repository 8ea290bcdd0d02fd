//! Raised-cosine (Hann family) analysis windows

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// `w[i] = -0.5·cos(2π·i/N) + 0.5` for every index
    Hann,
    /// Same curve, but index 0 is weighted 0.5 instead of the formula's 0
    HannPinnedStart,
}

/// Weight of sample `i` in a window of `size` samples
pub fn window_value(i: usize, size: usize, window_type: WindowType) -> f64 {
    match window_type {
        WindowType::HannPinnedStart if i == 0 => 0.5,
        WindowType::Hann | WindowType::HannPinnedStart => {
            -0.5 * (2.0 * PI * i as f64 / size as f64).cos() + 0.5
        }
    }
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    (0..size).map(|i| window_value(i, size, window_type)).collect()
}
