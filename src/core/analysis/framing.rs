// src/core/analysis/framing.rs
//
// Multi-frame MFCC extraction over a whole container

use super::frame::{AnalysisFrame, FRAME_SIZE, MFCC_COUNT};
use super::mfcc::CepstralStrategy;
use crate::config::AnalysisConfig;
use crate::core::audio::AudioContainer;
use crate::core::storage::StorageProvider;
use crate::core::wav_file::WavFile;
use crate::error::{FrameResult, WavResult};

/// MFCC rows for consecutive frames of one container
#[derive(Debug, Clone, PartialEq)]
pub struct MfccMatrix {
    pub rows: Vec<[f64; MFCC_COUNT]>,
    pub frame_size: usize,
    pub frame_stride: usize,
    pub cepstra: usize,
}

impl MfccMatrix {
    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    /// Writes the matrix through the serializer's MFCC export.
    pub fn save<S: StorageProvider>(&self, files: &WavFile<S>, path: &str) -> WavResult<()> {
        files.save_mfcc(
            path,
            self.rows.len() as u32,
            self.frame_size as u32,
            self.frame_stride as u32,
            self.cepstra as u32,
            &self.rows,
        )
    }
}

/// Number of whole frames that fit in `capacity` samples at `stride`, capped at `max_frames`.
pub fn frame_count(capacity: usize, stride: usize, max_frames: usize) -> usize {
    if capacity < FRAME_SIZE || stride == 0 {
        return 0;
    }
    ((capacity - FRAME_SIZE) / stride + 1).min(max_frames)
}

/// Computes MFCCs for up to `config.max_frames` frames spaced `config.frame_stride` apart.
///
/// Filter design and coefficient count come from `strategy`, not `config.mel`.
///
/// With `config.pre_emphasis` set the filter runs on a copy; `wav` is never
/// modified. The first failing frame aborts the extraction.
pub fn extract_mfcc(
    wav: &AudioContainer,
    config: &AnalysisConfig,
    strategy: Box<dyn CepstralStrategy>,
) -> FrameResult<MfccMatrix> {
    config.validate()?;

    let emphasized;
    let source = if config.pre_emphasis {
        let mut copy = wav.clone();
        copy.apply_preemphasis();
        emphasized = copy;
        &emphasized
    } else {
        wav
    };

    let count = frame_count(source.capacity(), config.frame_stride, config.max_frames);
    let cepstra = strategy.num_coefficients();
    log::info!(
        "Extracting MFCCs from {} frames (stride {}, {} cepstra)",
        count,
        config.frame_stride,
        cepstra
    );

    let mut frame = AnalysisFrame::with_strategy(strategy);
    let mut rows = Vec::with_capacity(count);

    for index in 0..count {
        frame.set_frame_index(index);
        if let Err(e) = frame.calc_mfcc_at(source, index * config.frame_stride) {
            log::error!("MFCC extraction failed at frame {}: {}", index, e);
            return Err(e);
        }
        if let Some(coefficients) = frame.mfcc() {
            rows.push(*coefficients);
        }
    }

    Ok(MfccMatrix {
        rows,
        frame_size: FRAME_SIZE,
        frame_stride: config.frame_stride,
        cepstra,
    })
}
