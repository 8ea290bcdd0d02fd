//! Frame analysis
//!
//! Contains the per-frame feature pipeline:
//! - Windowing, direct DFT and periodogram of one 512-sample frame
//! - Mel filterbank and DCT stages behind a swappable strategy
//! - Multi-frame MFCC extraction over a whole container

mod frame;
mod framing;
mod mfcc;

pub use frame::{
    AnalysisFrame, FrameState, FRAMES_PER_SEC, FRAME_NFFT, FRAME_POWER_PEAK_RANGE,
    FRAME_REAL_PEAK_RANGE, FRAME_SIZE, FRAME_STRIDE, MFCC_COUNT,
};
pub use framing::{extract_mfcc, frame_count, MfccMatrix};
pub use mfcc::{
    apply_filterbank, build_mel_filterbank, dct_ii, hz_to_mel, mel_to_hz, CepstralStrategy,
    StandardMelCepstrum, UnimplementedCepstrum,
};
