//! Core container, serialization and analysis modules

pub mod analysis;
pub mod audio;
pub mod complex;
pub mod dsp;
pub mod storage;
pub mod wav_file;

pub use analysis::{AnalysisFrame, CepstralStrategy, FrameState, MfccMatrix, StandardMelCepstrum};
pub use audio::{import_pcm_wav, AudioContainer, WavHeader};
pub use complex::{Complex, ComplexExt};
pub use dsp::DftEngine;
pub use storage::{FsStorage, MemoryStorage, OpenMode, StorageProvider};
pub use wav_file::{DftExport, MfccExport, WavFile};
