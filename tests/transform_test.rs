// tests/transform_test.rs
//
// Frame pipeline and standalone DFT engine on synthetic tones.

mod test_utils;

use rustfft::FftPlanner;
use test_utils::{argmax, bin_frequency, tone, TempFile};
use wavframe::core::analysis::{
    extract_mfcc, FRAME_POWER_PEAK_RANGE, FRAME_REAL_PEAK_RANGE, FRAME_SIZE, MFCC_COUNT,
};
use wavframe::core::analysis::UnimplementedCepstrum;
use wavframe::core::dsp::{peaks, window_value, WindowType, DFT_FRAME_SIZE, ENGINE_REAL_PEAK_RANGE};
use wavframe::{
    AnalysisConfig, AnalysisFrame, AudioContainer, Complex, DftEngine, FrameError, FrameState,
    StandardMelCepstrum,
};

#[test]
fn test_100hz_tone_peaks_near_bin_5() {
    let audio = tone(100.0);
    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&audio).unwrap();

    let k = argmax(&frame.power_spectrum, 1..FRAME_SIZE / 2);
    assert!((4..=6).contains(&k), "peak at bin {}", k);
}

#[test]
fn test_bin_centred_tones() {
    for k0 in [3usize, 10, 37, 100, 200] {
        let audio = tone(bin_frequency(k0));

        let mut frame = AnalysisFrame::new();
        frame.calc_dft(&audio).unwrap();
        let (k, _) = frame.peak_power_bin().unwrap();
        assert!(k.abs_diff(k0) <= 1, "frame: expected {} got {}", k0, k);

        let mut engine = DftEngine::new();
        engine.calculate_dft_from(&audio);
        let power: Vec<f64> = (0..DFT_FRAME_SIZE).map(|i| engine.power_coef(i)).collect();
        let k = argmax(&power, 1..DFT_FRAME_SIZE / 2);
        assert!(k.abs_diff(k0) <= 1, "engine: expected {} got {}", k0, k);
    }
}

#[test]
fn test_frame_dft_matches_fft() {
    let audio = tone(1234.0);
    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&audio).unwrap();

    let mut buffer: Vec<Complex> = (0..FRAME_SIZE)
        .map(|i| {
            let w = window_value(i, FRAME_SIZE, WindowType::HannPinnedStart);
            Complex::new(audio.get_sample(i, 0) as f64 * w, 0.0)
        })
        .collect();
    FftPlanner::<f64>::new()
        .plan_fft_forward(FRAME_SIZE)
        .process(&mut buffer);

    let scale = buffer.iter().map(|c| c.norm()).fold(0.0, f64::max);
    for (k, (direct, fast)) in frame.dft_output.iter().zip(&buffer).enumerate() {
        assert!((direct - fast).norm() < 1e-7 * scale, "bin {} differs", k);
    }
}

#[test]
fn test_parseval() {
    let audio = tone(777.0);
    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&audio).unwrap();

    let energy: f64 = (0..FRAME_SIZE)
        .map(|i| {
            let x = audio.get_sample(i, 0) as f64 * window_value(i, FRAME_SIZE, WindowType::HannPinnedStart);
            x * x
        })
        .sum();
    let power: f64 = frame.power_spectrum.iter().sum();
    assert!((energy - power).abs() < 1e-6 * energy);
}

#[test]
fn test_engine_and_frame_agree_on_zero_start_signal() {
    // A sine starts at 0, so the two windows' different first weight does not matter.
    let audio = tone(500.0);

    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&audio).unwrap();
    let mut engine = DftEngine::new();
    engine.calculate_dft_from(&audio);

    let peak = frame.find_max_power_output();
    for k in 0..FRAME_SIZE {
        let p = engine.power_coef(k);
        assert!((frame.power_spectrum[k] - p).abs() < 1e-8 * peak, "bin {}", k);
    }
}

#[test]
fn test_peaks_positive_only_for_signal() {
    let silent = AudioContainer::new();
    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&silent).unwrap();
    let mut engine = DftEngine::new();
    engine.calculate_dft_from(&silent);

    assert_eq!(frame.find_max_real_output(), 0.0);
    assert_eq!(frame.find_max_power_output(), 0.0);
    assert_eq!(engine.find_max_real_output(), 0.0);

    let audio = tone(bin_frequency(20));
    frame.calc_dft(&audio).unwrap();
    engine.calculate_dft_from(&audio);

    assert!(frame.find_max_real_output() > 0.0);
    assert!(frame.find_max_power_output() > 0.0);
    assert!(engine.find_max_real_output() > 0.0);
}

#[test]
fn test_peak_ranges_stay_distinct() {
    assert_eq!(FRAME_REAL_PEAK_RANGE, 1..256);
    assert_eq!(FRAME_POWER_PEAK_RANGE, 2..256);
    assert_eq!(ENGINE_REAL_PEAK_RANGE, 1..512);

    let mut engine = DftEngine::new();
    engine.output[400] = Complex::new(9.0, 0.0);
    engine.output[1] = Complex::new(2.0, 0.0);

    assert_eq!(engine.find_max_real_output(), 9.0);
    assert_eq!(peaks::find_max(&engine.output, FRAME_REAL_PEAK_RANGE, |c| c.re), 2.0);

    let mut power = vec![0.0; FRAME_SIZE];
    power[1] = 50.0;
    power[3] = 4.0;
    assert_eq!(peaks::find_max(&power, FRAME_POWER_PEAK_RANGE, |&p| p), 4.0);
}

#[test]
fn test_mfcc_fails_without_filterbank() {
    let audio = tone(440.0);
    let mut frame = AnalysisFrame::with_strategy(Box::new(UnimplementedCepstrum));

    assert_eq!(
        frame.calc_mfcc(&audio),
        Err(FrameError::StageUnimplemented("mel filterbank"))
    );
    assert!(frame.mfcc().is_none());
    // The DFT stage still ran.
    assert_eq!(frame.state(), FrameState::PowerComputed);
    assert!(frame.find_max_power_output() > 0.0);
}

#[test]
fn test_mfcc_separates_tones() {
    let mut low = AnalysisFrame::new();
    low.calc_mfcc(&tone(200.0)).unwrap();
    let mut high = AnalysisFrame::new();
    high.calc_mfcc(&tone(3000.0)).unwrap();

    let a = low.mfcc().unwrap();
    let b = high.mfcc().unwrap();
    assert_eq!(a.len(), MFCC_COUNT);
    let distance: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt();
    assert!(distance > 1.0, "distance {}", distance);
}

#[test]
fn test_fewer_coefficients_zero_the_tail() {
    let mut config = AnalysisConfig::default();
    config.mel.num_coefficients = 5;
    config.max_frames = 2;

    let strategy = Box::new(StandardMelCepstrum::new(config.mel.clone()));
    let matrix = extract_mfcc(&tone(600.0), &config, strategy).unwrap();

    assert_eq!(matrix.cepstra, 5);
    for row in &matrix.rows {
        assert!(row[..5].iter().any(|&c| c != 0.0));
        assert!(row[5..].iter().all(|&c| c == 0.0));
    }
}

#[test]
fn test_later_frames_see_later_samples() {
    let mut audio = AudioContainer::new();
    for i in 2000..2512 {
        audio.set_sample(i, 0, if i % 2 == 0 { 8000 } else { -8000 });
    }

    let mut frame = AnalysisFrame::new();
    frame.calc_dft_at(&audio, 0).unwrap();
    assert_eq!(frame.find_max_power_output(), 0.0);

    frame.calc_dft_at(&audio, 2000).unwrap();
    // Alternating signs put everything at Nyquist, outside the scanned half.
    assert!(frame.power_spectrum[FRAME_SIZE / 2] > 0.0);
}

#[test]
fn test_imported_pcm_tone() {
    let tmp = TempFile::new("wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 11025,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&tmp.0, spec).unwrap();
    let freq = bin_frequency(40);
    for i in 0..20000 {
        let v = 12000.0 * (2.0 * std::f64::consts::PI * freq * i as f64 / 11025.0).sin();
        writer.write_sample(v as i16).unwrap();
    }
    writer.finalize().unwrap();

    let audio = wavframe::core::import_pcm_wav(&tmp.0).unwrap();
    assert_eq!(audio.header.sample_rate, 11025);
    assert_eq!(audio.capacity(), 11025);

    let mut frame = AnalysisFrame::new();
    frame.calc_dft(&audio).unwrap();
    let (k, _) = frame.peak_power_bin().unwrap();
    assert!(k.abs_diff(40) <= 1);
}

#[test]
fn test_import_rejects_stereo() {
    let tmp = TempFile::new("wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 11025,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&tmp.0, spec).unwrap();
    writer.write_sample(0i16).unwrap();
    writer.write_sample(0i16).unwrap();
    writer.finalize().unwrap();

    assert!(matches!(
        wavframe::core::import_pcm_wav(&tmp.0),
        Err(wavframe::WavError::UnsupportedImport(_))
    ));
}
