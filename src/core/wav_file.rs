// src/core/wav_file.rs
//
// Container serializer: canonical WAV layout in and out of a storage stream,
// plus JSON export of per-frame DFT and MFCC features.

use std::io::{self, BufReader, Read, Write};

use serde::{Deserialize, Serialize};

use super::analysis::MFCC_COUNT;
use super::audio::{narrow_sample, widen_sample, AudioContainer, WavHeader, CHANNEL_LEFT, HEADER_SIZE};
use super::complex::Complex;
use super::storage::{OpenMode, StorageProvider};
use crate::error::{WavError, WavResult};

/// Exported DFT of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DftExport {
    pub bin_count: usize,
    /// Hz between adjacent bins
    pub delta_freq: f64,
    /// `[re, im]` per bin
    pub spectrum: Vec<[f64; 2]>,
}

/// Exported MFCC matrix, one row per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccExport {
    pub frame_count: u32,
    pub frame_size: u32,
    pub frame_stride: u32,
    pub cepstra: u32,
    pub mfcc: Vec<[f64; MFCC_COUNT]>,
}

/// Reads and writes containers and feature sets through a storage provider.
pub struct WavFile<S> {
    storage: S,
}

impl<S: StorageProvider> WavFile<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn open(&self, path: &str, mode: OpenMode) -> WavResult<S::Stream> {
        self.storage.open(path, mode).map_err(|source| {
            log::error!("Error opening {}: {}", path, source);
            WavError::Open {
                path: path.to_string(),
                source,
            }
        })
    }

    /// Loads a WAV stream into `wav`.
    ///
    /// The header is read in one go and validated before anything in `wav`
    /// changes. Sample data is read one byte per channel per position for
    /// `min(data_bytes, capacity)` positions. Data that ends early stops the
    /// read with a warning; what was read is kept.
    pub fn load_file(&self, path: &str, wav: &mut AudioContainer) -> WavResult<()> {
        log::info!("Loading WAV file: {}", path);
        let mut stream = BufReader::new(self.open(path, OpenMode::Read)?);

        let mut raw = [0u8; HEADER_SIZE];
        let read = read_fully(&mut stream, &mut raw)?;
        if read < HEADER_SIZE {
            log::error!("Error reading from WAV file {}: {} header bytes", path, read);
            return Err(WavError::ShortHeaderRead { read });
        }

        let header = WavHeader::from_bytes(&raw);
        if let Err(e) = header.validate() {
            log::error!("Rejecting {}: {}", path, e);
            return Err(e);
        }

        log::debug!("# Channels:   {}", header.num_channels);
        log::debug!("Sample rate:  {}", header.sample_rate);
        log::debug!("Byte rate:    {}", header.byte_rate);
        log::debug!("Sample align: {}", header.sample_alignment);
        log::debug!("Bits/sample:  {}", header.bits_per_sample);
        log::debug!("Data bytes:   {}", header.data_bytes);

        wav.header = header;
        let positions = (header.data_bytes as usize).min(wav.capacity());

        let mut byte = [0u8; 1];
        'samples: for i in 0..positions {
            for channel in 0..header.num_channels {
                if stream.read(&mut byte)? == 0 {
                    log::warn!("{}: sample data ended at position {} of {}", path, i, positions);
                    break 'samples;
                }
                wav.set_sample(i, channel, widen_sample(byte[0]));
            }
        }

        log::info!("WAV file {} successfully read", path);
        Ok(())
    }

    /// Writes the header verbatim followed by `capacity` one-byte samples.
    ///
    /// Each 16-bit sample is narrowed to its low byte.
    pub fn save_file(&self, path: &str, wav: &AudioContainer) -> WavResult<()> {
        log::info!("Saving WAV file: {}", path);
        let mut stream = self.open(path, OpenMode::Write)?;

        let written = write_fully(&mut stream, &wav.header.to_bytes())?;
        if written < HEADER_SIZE {
            log::error!("Error writing to WAV file {}: {} header bytes", path, written);
            return Err(WavError::ShortHeaderWrite { written });
        }

        let data: Vec<u8> = (0..wav.capacity())
            .map(|i| narrow_sample(wav.get_sample(i, CHANNEL_LEFT)))
            .collect();
        stream.write_all(&data)?;
        stream.flush()?;

        log::info!("WAV file {} successfully created", path);
        Ok(())
    }

    /// Exports the first `bin_count` bins of a DFT, or every bin when `dft` is shorter.
    pub fn save_dft(&self, path: &str, bin_count: usize, delta_freq: f64, dft: &[Complex]) -> WavResult<()> {
        let spectrum: Vec<[f64; 2]> = dft.iter().take(bin_count).map(|c| [c.re, c.im]).collect();
        if spectrum.len() < bin_count {
            log::warn!("{}: {} DFT bins requested, {} available", path, bin_count, spectrum.len());
        }
        let doc = DftExport {
            bin_count: spectrum.len(),
            delta_freq,
            spectrum,
        };
        self.write_json(path, &doc)?;
        log::info!("Saved {} DFT bins to {}", doc.spectrum.len(), path);
        Ok(())
    }

    /// Exports the first `frame_count` rows of an MFCC matrix.
    pub fn save_mfcc(
        &self,
        path: &str,
        frame_count: u32,
        frame_size: u32,
        frame_stride: u32,
        cepstra: u32,
        mfcc: &[[f64; MFCC_COUNT]],
    ) -> WavResult<()> {
        let doc = MfccExport {
            frame_count,
            frame_size,
            frame_stride,
            cepstra,
            mfcc: mfcc.iter().take(frame_count as usize).copied().collect(),
        };
        self.write_json(path, &doc)?;
        log::info!("Saved {} MFCC frames to {}", doc.mfcc.len(), path);
        Ok(())
    }

    pub fn load_dft(&self, path: &str) -> WavResult<DftExport> {
        self.read_json(path)
    }

    pub fn load_mfcc(&self, path: &str) -> WavResult<MfccExport> {
        self.read_json(path)
    }

    fn write_json<T: Serialize>(&self, path: &str, doc: &T) -> WavResult<()> {
        let mut stream = self.open(path, OpenMode::Write)?;
        serde_json::to_writer_pretty(&mut stream, doc)?;
        stream.flush()?;
        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> WavResult<T> {
        let stream = BufReader::new(self.open(path, OpenMode::Read)?);
        Ok(serde_json::from_reader(stream)?)
    }
}

/// Reads until `buf` is full or the stream runs dry; returns bytes read.
fn read_fully<R: Read>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match stream.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Writes until `buf` is drained or the stream stops accepting; returns bytes written.
fn write_fully<W: Write>(stream: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match stream.write(&buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
