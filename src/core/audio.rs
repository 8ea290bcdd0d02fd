// src/core/audio.rs
//
// Fixed-capacity mono PCM container and its canonical 44-byte WAV header.

use std::path::Path;

use crate::error::{SampleError, WavError, WavResult};

/// One second of audio at the default sample rate.
pub const MAX_SAMPLES: usize = 11025;

pub const DEFAULT_SAMPLE_RATE: u32 = 11025;

/// Size of the canonical RIFF/WAVE/fmt/data header on disk.
pub const HEADER_SIZE: usize = 44;

pub const HDR_RIFF: u32 = 0x4646_4952; // "RIFF"
pub const HDR_WAVE: u32 = 0x4556_4157; // "WAVE"
pub const HDR_FMT: u32 = 0x2074_6D66; // "fmt "
pub const HDR_DATA: u32 = 0x6174_6164; // "data"
pub const FMT_CHUNK_SIZE_PCM: u32 = 16;
pub const FMT_PCM: u16 = 1;

pub const SILENCE: i16 = 0;
/// Mid-point used for 8-bit containers. Unsigned 8-bit PCM centres on 128;
/// 64 is what the capture hardware has always produced, so it stays.
pub const SILENCE_8BIT: i16 = 64;

pub const CHANNEL_LEFT: u16 = 0;
pub const CHANNEL_RIGHT: u16 = 1;

/// Amplitude used by [`AudioContainer::fill_waveform`].
const WAVEFORM_AMPLITUDE: f64 = 32000.0;

const PREEMPHASIS_COEF: f64 = 0.95;

/// Narrows a stored sample to the single byte written on save (keeps the low byte).
pub fn narrow_sample(sample: i16) -> u8 {
    sample as u8
}

/// Widens a byte read from a stream into a stored sample.
pub fn widen_sample(byte: u8) -> i16 {
    byte as i16
}

/// WAV header record mirroring the on-disk chunk layout field for field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_header: u32,
    /// File size - 8
    pub wav_size: u32,
    pub wave_header: u32,
    pub fmt_header: u32,
    pub fmt_chunk_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub sample_alignment: u16,
    pub bits_per_sample: u16,
    pub data_header: u32,
    pub data_bytes: u32,
}

impl Default for WavHeader {
    fn default() -> Self {
        let num_channels = 1;
        let bits_per_sample = 16;
        let bytes_per_sample = bits_per_sample as u32 / 8;
        let data_bytes = MAX_SAMPLES as u32 * num_channels as u32 * bytes_per_sample;

        Self {
            riff_header: HDR_RIFF,
            wav_size: (HEADER_SIZE as u32 - 8) + data_bytes,
            wave_header: HDR_WAVE,
            fmt_header: HDR_FMT,
            fmt_chunk_size: FMT_CHUNK_SIZE_PCM,
            audio_format: FMT_PCM,
            num_channels,
            sample_rate: DEFAULT_SAMPLE_RATE,
            byte_rate: DEFAULT_SAMPLE_RATE * num_channels as u32 * bytes_per_sample,
            sample_alignment: num_channels * bytes_per_sample as u16,
            bits_per_sample,
            data_header: HDR_DATA,
            data_bytes,
        }
    }
}

impl WavHeader {
    /// Little-endian encoding at the fixed offsets of the canonical layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.riff_header.to_le_bytes());
        out[4..8].copy_from_slice(&self.wav_size.to_le_bytes());
        out[8..12].copy_from_slice(&self.wave_header.to_le_bytes());
        out[12..16].copy_from_slice(&self.fmt_header.to_le_bytes());
        out[16..20].copy_from_slice(&self.fmt_chunk_size.to_le_bytes());
        out[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        out[22..24].copy_from_slice(&self.num_channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[32..34].copy_from_slice(&self.sample_alignment.to_le_bytes());
        out[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out[36..40].copy_from_slice(&self.data_header.to_le_bytes());
        out[40..44].copy_from_slice(&self.data_bytes.to_le_bytes());
        out
    }

    /// Decodes the raw fields without validating them; see [`WavHeader::validate`].
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let u32_at = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);

        Self {
            riff_header: u32_at(0),
            wav_size: u32_at(4),
            wave_header: u32_at(8),
            fmt_header: u32_at(12),
            fmt_chunk_size: u32_at(16),
            audio_format: u16_at(20),
            num_channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            sample_alignment: u16_at(32),
            bits_per_sample: u16_at(34),
            data_header: u32_at(36),
            data_bytes: u32_at(40),
        }
    }

    /// Checks the fields a loader must reject: RIFF and WAVE magic, a 16-byte
    /// fmt chunk and PCM encoding. The fmt and data markers are not checked.
    pub fn validate(&self) -> WavResult<()> {
        if self.riff_header != HDR_RIFF {
            return Err(WavError::InvalidRiff(self.riff_header));
        }
        if self.wave_header != HDR_WAVE {
            return Err(WavError::InvalidWave(self.wave_header));
        }
        if self.fmt_chunk_size != FMT_CHUNK_SIZE_PCM {
            return Err(WavError::InvalidFmtSize(self.fmt_chunk_size));
        }
        if self.audio_format != FMT_PCM {
            return Err(WavError::NotPcm(self.audio_format));
        }
        Ok(())
    }

    pub fn bytes_per_sample(&self) -> u32 {
        self.bits_per_sample as u32 / 8
    }
}

/// Fixed-capacity mono sample buffer plus its WAV header.
///
/// Holds exactly [`MAX_SAMPLES`] samples. The header may declare more than one
/// channel but storage is mono: every channel index maps onto the same sample.
#[derive(Debug, Clone)]
pub struct AudioContainer {
    pub header: WavHeader,
    samples: Vec<i16>,
}

impl Default for AudioContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioContainer {
    pub fn new() -> Self {
        Self {
            header: WavHeader::default(),
            samples: vec![SILENCE; MAX_SAMPLES],
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.header.num_channels
    }

    /// Sets the declared channel count. Values other than 1 are recorded in the
    /// header (and its derived rate fields) but storage stays mono.
    pub fn set_channels(&mut self, num_channels: u16) {
        self.header.num_channels = num_channels;
        let bytes_per_sample = self.header.bytes_per_sample();
        self.header.byte_rate = self.header.sample_rate * num_channels as u32 * bytes_per_sample;
        self.header.sample_alignment = num_channels * bytes_per_sample as u16;
    }

    /// Baseline value for "no signal": 64 for 8-bit containers, 0 otherwise.
    pub fn silence(&self) -> i16 {
        if self.header.bits_per_sample == 8 {
            SILENCE_8BIT
        } else {
            SILENCE
        }
    }

    fn in_bounds(&self, position: usize, channel: u16) -> bool {
        position < self.samples.len() && channel < self.header.num_channels
    }

    fn out_of_range(&self, position: usize, channel: u16) -> SampleError {
        SampleError::OutOfRange {
            position,
            channel,
            capacity: self.samples.len(),
            channels: self.header.num_channels,
        }
    }

    pub fn try_get_sample(&self, position: usize, channel: u16) -> Result<i16, SampleError> {
        if self.in_bounds(position, channel) {
            Ok(self.samples[position])
        } else {
            Err(self.out_of_range(position, channel))
        }
    }

    pub fn try_set_sample(&mut self, position: usize, channel: u16, sample: i16) -> Result<(), SampleError> {
        if self.in_bounds(position, channel) {
            self.samples[position] = sample;
            Ok(())
        } else {
            Err(self.out_of_range(position, channel))
        }
    }

    /// Sample at `position`, or [`AudioContainer::silence`] when out of range.
    pub fn get_sample(&self, position: usize, channel: u16) -> i16 {
        self.try_get_sample(position, channel)
            .unwrap_or_else(|_| self.silence())
    }

    /// Sample minus the silence baseline, or the raw silence value when out of range.
    pub fn get_normalized_sample(&self, position: usize, channel: u16) -> i16 {
        match self.try_get_sample(position, channel) {
            Ok(sample) => sample.wrapping_sub(self.silence()),
            Err(_) => self.silence(),
        }
    }

    /// Writes `sample` if in range; out-of-range writes are dropped.
    pub fn set_sample(&mut self, position: usize, channel: u16, sample: i16) {
        let _ = self.try_set_sample(position, channel, sample);
    }

    /// First-order high-pass: `s[i] -= 0.95 * s[i-1]`.
    ///
    /// Runs from the last sample down to index 1 so each step reads the
    /// unfiltered predecessor.
    pub fn apply_preemphasis(&mut self) {
        for i in (1..self.samples.len()).rev() {
            let filtered = self.samples[i] as f64 - PREEMPHASIS_COEF * self.samples[i - 1] as f64;
            self.samples[i] = filtered as i16;
        }
    }

    /// Overwrites every sample with `32000 · sin(2π·freq·i / sample_rate)`.
    ///
    /// A non-positive (or NaN) frequency leaves the buffer alone. A zero sample
    /// rate is replaced by the 11025 Hz default first. Storage is mono, so
    /// `channel` does not select anything.
    pub fn fill_waveform(&mut self, freq: f64, _channel: u16) {
        if !(freq > 0.0) {
            return;
        }
        if self.header.sample_rate == 0 {
            self.header.sample_rate = DEFAULT_SAMPLE_RATE;
        }

        let two_pi_scaled = 2.0 * std::f64::consts::PI * freq / self.header.sample_rate as f64;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = (WAVEFORM_AMPLITUDE * (i as f64 * two_pi_scaled).sin()) as i16;
        }
        log::debug!("Filled container with {:.1} Hz tone", freq);
    }
}

/// Reads an ordinary 16-bit mono PCM WAV file into a container.
///
/// Samples beyond the container's capacity are dropped; a shorter file leaves
/// the tail silent. The header is rebuilt for the imported sample rate.
pub fn import_pcm_wav<P: AsRef<Path>>(path: P) -> WavResult<AudioContainer> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(WavError::UnsupportedImport(format!(
            "{} channels (mono only)",
            spec.channels
        )));
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(WavError::UnsupportedImport(format!(
            "{}-bit {:?} samples (16-bit integer only)",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let mut container = AudioContainer::new();
    container.header.sample_rate = spec.sample_rate;
    container.set_channels(1);

    let mut count = 0usize;
    for (i, sample) in reader.samples::<i16>().take(container.capacity()).enumerate() {
        container.set_sample(i, CHANNEL_LEFT, sample?);
        count += 1;
    }

    let data_bytes = (container.capacity() * 2) as u32;
    container.header.data_bytes = data_bytes;
    container.header.wav_size = (HEADER_SIZE as u32 - 8) + data_bytes;

    log::info!(
        "Imported {} samples at {} Hz from {}",
        count,
        spec.sample_rate,
        path.as_ref().display()
    );
    Ok(container)
}
