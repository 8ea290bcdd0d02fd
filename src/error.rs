//! Error types for container serialization, sample access and frame analysis.

use thiserror::Error;

/// Result alias for serializer operations
pub type WavResult<T> = Result<T, WavError>;

/// Result alias for frame-analysis operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Failures while moving a container or feature set through a storage stream.
#[derive(Error, Debug)]
pub enum WavError {
    /// The storage provider could not open the named stream.
    #[error("could not open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Fewer than 44 header bytes were available.
    #[error("short header read: got {read} of 44 bytes")]
    ShortHeaderRead { read: usize },

    /// The stream accepted fewer than 44 header bytes.
    #[error("short header write: wrote {written} of 44 bytes")]
    ShortHeaderWrite { written: usize },

    #[error("invalid file format, must be RIFF (found {0:#010x})")]
    InvalidRiff(u32),

    #[error("invalid data format, must be WAVE (found {0:#010x})")]
    InvalidWave(u32),

    #[error("invalid fmt chunk size {0}, expected 16")]
    InvalidFmtSize(u32),

    #[error("invalid audio format {0}, must be PCM (1)")]
    NotPcm(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feature documents are JSON; malformed ones land here.
    #[error("feature export error: {0}")]
    Export(#[from] serde_json::Error),

    #[error("PCM import failed: {0}")]
    Import(#[from] hound::Error),

    #[error("unsupported PCM input: {0}")]
    UnsupportedImport(String),
}

/// Checked sample access outside the container's bounds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("sample ({position}, channel {channel}) out of range: capacity {capacity}, {channels} channel(s)")]
    OutOfRange {
        position: usize,
        channel: u16,
        capacity: usize,
        channels: u16,
    },
}

/// Failures in the per-frame transform pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// A pipeline stage has no implementation in the active strategy.
    #[error("{0} stage is not implemented")]
    StageUnimplemented(&'static str),

    #[error("power spectrum has not been computed for this frame")]
    MissingPowerSpectrum,

    #[error("mel filterbank energies have not been computed for this frame")]
    MissingFilterbank,

    /// The frame start lies past the end of the container.
    #[error("frame starting at sample {start} does not fit in {capacity} samples")]
    EmptyFrame { start: usize, capacity: usize },

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}
