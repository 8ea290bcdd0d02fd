//! Output formatting for CLI results

use colorful::Colorful;

use crate::core::analysis::MfccMatrix;

/// Peaks found in one analysed frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub file: String,
    pub sample_rate: u32,
    pub frame_index: usize,
    pub bin_width_hz: f64,
    pub peak: Option<(usize, f64)>,
    pub frame_max_real: f64,
    pub frame_max_power: f64,
    pub engine_max_real: f64,
}

/// Format a frame report for terminal output
pub fn format_report(report: &FrameReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Analyzing: {}\n", report.file.clone().cyan()));
    output.push_str(&format!("  Sample Rate: {} Hz\n", report.sample_rate));
    output.push_str(&format!("  Frame: {}\n", report.frame_index));

    match report.peak {
        Some((bin, power)) => {
            output.push_str(&format!(
                "  Peak: bin {} (~{:.1} Hz), power {:.3e}\n",
                bin,
                bin as f64 * report.bin_width_hz,
                power
            ));
        }
        None => output.push_str(&format!("  Peak: {}\n", "silent frame".yellow())),
    }

    if verbose {
        output.push_str("\n  Technical Details:\n");
        output.push_str(&format!("    Bin width: {:.2} Hz\n", report.bin_width_hz));
        output.push_str(&format!("    Frame max real: {:.3}\n", report.frame_max_real));
        output.push_str(&format!("    Frame max power: {:.3}\n", report.frame_max_power));
        output.push_str(&format!("    Engine max real: {:.3}\n", report.engine_max_real));
    }

    output
}

/// One line per frame with the leading coefficients
pub fn format_mfcc(matrix: &MfccMatrix, verbose: bool) -> String {
    let mut output = format!(
        "  {} frame(s), size {}, stride {}, {} cepstra\n",
        matrix.frame_count(),
        matrix.frame_size,
        matrix.frame_stride,
        matrix.cepstra
    );

    if verbose {
        for (i, row) in matrix.rows.iter().enumerate() {
            let shown: Vec<String> = row
                .iter()
                .take(matrix.cepstra)
                .map(|c| format!("{:8.3}", c))
                .collect();
            output.push_str(&format!("    {:3}: {}\n", i, shown.join(" ")));
        }
    }

    output
}
