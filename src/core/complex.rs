//! Complex arithmetic used by every transform.
//!
//! The value type is `num_complex::Complex64`, which already provides
//! construction, `+`, `+=` and `*`. [`ComplexExt`] adds the two operations
//! the transforms lean on: the Euclidean magnitude and the imaginary-only
//! exponential used to build twiddle factors.

pub use num_complex::Complex64 as Complex;

/// Extra operations on [`Complex`] needed by the DFT code.
pub trait ComplexExt {
    /// `sqrt(re² + im²)`
    fn magnitude(&self) -> f64;

    /// Treats the value as `(0, θ)` and returns `(cos θ, sin θ)`.
    ///
    /// The real part is ignored: this is the twiddle-factor special case,
    /// not the general complex exponential.
    fn imag_exp(&self) -> Complex;
}

impl ComplexExt for Complex {
    fn magnitude(&self) -> f64 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    fn imag_exp(&self) -> Complex {
        Complex::new(self.im.cos(), self.im.sin())
    }
}

/// Twiddle factor `exp(-i·2π·k·t/n)`.
pub fn twiddle(k: usize, t: usize, n: usize) -> Complex {
    let angle = 2.0 * std::f64::consts::PI * (t * k) as f64 / n as f64;
    Complex::new(0.0, -angle).imag_exp()
}
