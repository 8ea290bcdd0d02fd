//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wavframe")]
#[command(about = "Capture-container WAV tool: tone synthesis, frame DFT and MFCC features")]
pub struct Args {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesise a one-second tone and save it as a container file
    Tone {
        /// Output file
        output: PathBuf,

        /// Tone frequency in Hz
        #[arg(short, long, default_value_t = 440.0)]
        freq: f64,

        /// Apply pre-emphasis before saving
        #[arg(long)]
        pre_emphasis: bool,
    },

    /// Run the frame DFT and standalone DFT over a file and report the peaks
    Analyze {
        /// Input file
        input: PathBuf,

        /// Read an ordinary 16-bit PCM WAV instead of a container file
        #[arg(long)]
        pcm: bool,

        /// Frame index to analyse (frames start every 110 samples)
        #[arg(long, default_value_t = 0)]
        frame: usize,

        /// Export the frame's DFT bins as JSON
        #[arg(long)]
        export_dft: Option<PathBuf>,
    },

    /// Compute MFCCs for consecutive frames
    Mfcc {
        /// Input file
        input: PathBuf,

        /// Read an ordinary 16-bit PCM WAV instead of a container file
        #[arg(long)]
        pcm: bool,

        /// Analysis config (JSON)
        #[arg(short, long, env = "WAVFRAME_CONFIG")]
        config: Option<PathBuf>,

        /// Write the MFCC matrix as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tone() {
        let args = Args::try_parse_from(["wavframe", "tone", "a.wav", "--freq", "100"]).unwrap();
        match args.command {
            Command::Tone { output, freq, pre_emphasis } => {
                assert_eq!(output, PathBuf::from("a.wav"));
                assert_eq!(freq, 100.0);
                assert!(!pre_emphasis);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_defaults() {
        let args = Args::try_parse_from(["wavframe", "-v", "analyze", "in.wav"]).unwrap();
        assert!(args.verbose);
        match args.command {
            Command::Analyze { pcm, frame, export_dft, .. } => {
                assert!(!pcm);
                assert_eq!(frame, 0);
                assert!(export_dft.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_input() {
        assert!(Args::try_parse_from(["wavframe", "mfcc"]).is_err());
    }
}
