//! wavframe - capture container and frame analysis
//!
//! A fixed one-second mono PCM container with its canonical WAV layout, and
//! the per-frame spectral pipeline built on it: raised-cosine window, direct
//! DFT, periodogram, Mel filterbank, DCT and MFCCs.
//!
//! ## Module Structure
//!
//! - `core` - Container, serializer, storage streams, DFT and frame analysis
//! - `cli` - Command-line interface
//! - `config` - Framing and Mel parameters
//! - `error` - Error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wavframe::core::{AnalysisFrame, AudioContainer, FsStorage, WavFile};
//!
//! let files = WavFile::new(FsStorage::cwd());
//! let mut audio = AudioContainer::new();
//! files.load_file("capture.wav", &mut audio)?;
//!
//! let mut frame = AnalysisFrame::new();
//! frame.calc_mfcc(&audio)?;
//! println!("{:?}", frame.mfcc());
//! ```
//!
//! ## Frame Layout
//!
//! | Constant         | Value | Meaning                         |
//! |------------------|-------|---------------------------------|
//! | `FRAME_SIZE`     | 512   | samples per frame (~46 ms)      |
//! | `FRAME_STRIDE`   | 110   | samples between frames (10 ms)  |
//! | `FRAMES_PER_SEC` | 96    | frames in one container         |
//! | `MFCC_COUNT`     | 12    | cepstral coefficients per frame |

// Core container and analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Analysis configuration
pub mod config;

pub mod error;

// Re-export commonly used types at crate root for convenience
pub use config::{AnalysisConfig, MelConfig};
pub use error::{FrameError, SampleError, WavError};
pub use crate::core::{
    AnalysisFrame, AudioContainer, CepstralStrategy, Complex, ComplexExt, DftEngine,
    FrameState, FsStorage, MemoryStorage, MfccMatrix, StandardMelCepstrum, WavFile, WavHeader,
};
