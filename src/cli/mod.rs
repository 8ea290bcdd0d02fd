// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

use std::path::Path;

use anyhow::{Context, Result};
use colorful::Colorful;

use crate::config::AnalysisConfig;
use crate::core::analysis::{extract_mfcc, AnalysisFrame, StandardMelCepstrum, FRAME_STRIDE};
use crate::core::audio::{import_pcm_wav, AudioContainer, CHANNEL_LEFT};
use crate::core::dsp::DftEngine;
use crate::core::storage::FsStorage;
use crate::core::wav_file::WavFile;

pub use args::{Args, Command};
pub use output::{format_mfcc, format_report, FrameReport};

/// Run the CLI
pub fn run(args: Args) -> Result<()> {
    let files = WavFile::new(FsStorage::cwd());

    match args.command {
        Command::Tone { output, freq, pre_emphasis } => {
            let mut audio = AudioContainer::new();
            audio.fill_waveform(freq, CHANNEL_LEFT);
            if pre_emphasis {
                audio.apply_preemphasis();
            }
            files
                .save_file(&path_str(&output), &audio)
                .with_context(|| format!("Failed to save {}", output.display()))?;
            println!("{} {} Hz tone -> {}", "✓".green(), freq, output.display());
        }

        Command::Analyze { input, pcm, frame, export_dft } => {
            let audio = load(&files, &input, pcm)?;

            let mut analysis = AnalysisFrame::new();
            analysis.set_frame_index(frame);
            analysis
                .calc_dft_at(&audio, frame_start(frame)?)
                .with_context(|| format!("Frame {} is outside {}", frame, input.display()))?;

            let mut engine = DftEngine::new();
            engine.calculate_dft_from(&audio);

            let report = FrameReport {
                file: input.display().to_string(),
                sample_rate: audio.header.sample_rate,
                frame_index: frame,
                bin_width_hz: analysis.bin_width_hz(),
                peak: analysis.peak_power_bin(),
                frame_max_real: analysis.find_max_real_output(),
                frame_max_power: analysis.find_max_power_output(),
                engine_max_real: engine.find_max_real_output(),
            };
            print!("{}", format_report(&report, args.verbose));

            if let Some(path) = export_dft {
                let bins = analysis.dft_output.len() / 2;
                files
                    .save_dft(&path_str(&path), bins, analysis.bin_width_hz(), &analysis.dft_output)
                    .with_context(|| format!("Failed to export DFT to {}", path.display()))?;
                println!("  DFT saved to: {}", path.display());
            }
        }

        Command::Mfcc { input, pcm, config, out } => {
            let audio = load(&files, &input, pcm)?;
            let config = match config {
                Some(path) => AnalysisConfig::load(&path)?,
                None => AnalysisConfig::default(),
            };

            let strategy = Box::new(StandardMelCepstrum::new(config.mel.clone()));
            let matrix = extract_mfcc(&audio, &config, strategy)
                .with_context(|| format!("MFCC extraction failed for {}", input.display()))?;

            println!("Analyzing: {}", input.display().to_string().cyan());
            print!("{}", format_mfcc(&matrix, args.verbose));

            if let Some(path) = out {
                matrix
                    .save(&files, &path_str(&path))
                    .with_context(|| format!("Failed to export MFCCs to {}", path.display()))?;
                println!("  MFCCs saved to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn load(files: &WavFile<FsStorage>, path: &Path, pcm: bool) -> Result<AudioContainer> {
    if pcm {
        return import_pcm_wav(path).with_context(|| format!("Failed to import {}", path.display()));
    }
    let mut audio = AudioContainer::new();
    files
        .load_file(&path_str(path), &mut audio)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(audio)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// First sample of frame `frame`
fn frame_start(frame: usize) -> Result<usize> {
    frame
        .checked_mul(FRAME_STRIDE)
        .with_context(|| format!("Frame index {} is too large", frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_start() {
        assert_eq!(frame_start(0).unwrap(), 0);
        assert_eq!(frame_start(3).unwrap(), 3 * FRAME_STRIDE);
        let err = frame_start(usize::MAX).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
