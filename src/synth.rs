// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Turning tone descriptions into sampled waveforms.
//!
//! All functions in here are pure: the same arguments always produce the same buffer.

use std::f64::consts::PI;

use snafu::Snafu;

use crate::note;
use crate::wave::{SampleBuffer, FULL_SCALE};

/// Amplitude of tones produced from note names.
pub const NOTE_AMPLITUDE: f64 = 0.5;

/// Upper bound on the length of a single segment.
pub const MAX_SEGMENT_SAMPLES: usize = i32::MAX as usize;

/// The shape used when rendering a named note.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaveType {
    Sine,
    /// A sine shifted by a phase, see [`synthesize_cosine`].
    Cosine,
}

#[derive(Debug, PartialEq, Snafu)]
pub enum SynthError {
    #[snafu(display("invalid {} {}: {}", argument, value, reason))]
    InvalidArgument {
        argument: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[snafu(display("unknown note {:?}, expected one of {}", name, known_notes()))]
    UnknownNote { name: String },
}

/// Generate a sine tone.
///
/// Produces `floor(sample_rate * duration)` samples where sample `i` is
/// `round(amplitude * 32767 * sin(2π * frequency * i / sample_rate))`.
///
/// # Examples
///
/// ```
/// use voix::synth::synthesize_sine;
///
/// // one cycle sampled at its quarter points
/// let wave = synthesize_sine(1.0, 1.0, 4, 1.0).unwrap();
/// assert_eq!(wave.samples(), &[0, 32767, 0, -32767]);
/// ```
pub fn synthesize_sine(
    frequency: f64,
    duration: f64,
    sample_rate: u32,
    amplitude: f64,
) -> Result<SampleBuffer, SynthError> {
    render(frequency, duration, sample_rate, amplitude, 0.0)
}

/// Generate a phase shifted tone.
///
/// NOTE: despite the name this evaluates `sin(2π * frequency * t + phase)`, not a cosine.
/// Scripts depend on the exact output, so the formula stays as it is.
/// A real cosine is obtained with `phase = π/2`.
pub fn synthesize_cosine(
    frequency: f64,
    duration: f64,
    sample_rate: u32,
    amplitude: f64,
    phase: f64,
) -> Result<SampleBuffer, SynthError> {
    if !phase.is_finite() {
        return Err(invalid("phase", phase, "must be finite"));
    }
    render(frequency, duration, sample_rate, amplitude, phase)
}

/// Generate a sine tone at [`NOTE_AMPLITUDE`] for a note from the note table.
pub fn note_to_sine(name: &str, duration: f64, sample_rate: u32) -> Result<SampleBuffer, SynthError> {
    note_to_wave(name, WaveType::Sine, duration, sample_rate)
}

/// Generate a tone of the given shape for a note from the note table.
/// The cosine variant uses a phase of zero.
pub fn note_to_wave(
    name: &str,
    wave: WaveType,
    duration: f64,
    sample_rate: u32,
) -> Result<SampleBuffer, SynthError> {
    let frequency = note::frequency(name).ok_or_else(|| SynthError::UnknownNote {
        name: name.to_owned(),
    })?;
    match wave {
        WaveType::Sine => synthesize_sine(frequency, duration, sample_rate, NOTE_AMPLITUDE),
        WaveType::Cosine => {
            synthesize_cosine(frequency, duration, sample_rate, NOTE_AMPLITUDE, 0.0)
        }
    }
}

/// Number of samples for a segment, i.e. `floor(sample_rate * duration)`.
pub fn sample_count(duration: f64, sample_rate: u32) -> usize {
    (sample_rate as f64 * duration).floor() as usize
}

fn render(
    frequency: f64,
    duration: f64,
    sample_rate: u32,
    amplitude: f64,
    phase: f64,
) -> Result<SampleBuffer, SynthError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(invalid("frequency", frequency, "must be positive"));
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(invalid("duration", duration, "must be positive"));
    }
    if sample_rate == 0 {
        return Err(invalid("sample rate", 0.0, "must be positive"));
    }
    // also rejects NaN
    if !(0.0..=1.0).contains(&amplitude) {
        return Err(invalid("amplitude", amplitude, "must be between 0 and 1"));
    }

    let len = sample_rate as f64 * duration;
    if len < 1.0 {
        return Err(invalid("duration", duration, "is shorter than one sample"));
    }
    if len > MAX_SEGMENT_SAMPLES as f64 {
        return Err(invalid("duration", duration, "is too long for one segment"));
    }
    let len = sample_count(duration, sample_rate);

    let rate = sample_rate as f64;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / rate;
            let value = amplitude * FULL_SCALE * (2.0 * PI * frequency * t + phase).sin();
            // |value| <= 32767, so the cast never saturates
            value.round() as i16
        })
        .collect();
    Ok(SampleBuffer::new(samples, sample_rate))
}

fn known_notes() -> String {
    note::names().collect::<Vec<_>>().join(", ")
}

fn invalid(argument: &'static str, value: f64, reason: &'static str) -> SynthError {
    SynthError::InvalidArgument {
        argument,
        value,
        reason,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_in_range(buffer: &SampleBuffer) {
        assert!(buffer.samples().iter().all(|s| (-32767..=32767).contains(s)));
    }

    #[test]
    fn length_is_floor_of_rate_times_duration() {
        let cases: &[(f64, u32)] = &[(1.0, 44100), (0.01, 8000), (0.5, 11025), (0.123, 8000), (2.0, 1)];
        for &(duration, rate) in cases {
            let wave = synthesize_sine(440.0, duration, rate, 0.5).unwrap();
            assert_eq!(
                wave.len(),
                (rate as f64 * duration).floor() as usize,
                "duration {} at {} Hz",
                duration,
                rate
            );
            assert_eq!(wave.sample_rate(), rate);
        }
    }

    #[test]
    fn starts_at_zero() {
        for &freq in &[1.0, 261.63, 440.0, 12345.6] {
            let wave = synthesize_sine(freq, 0.1, 44100, 1.0).unwrap();
            assert_eq!(wave.samples()[0], 0);
        }
    }

    #[test]
    fn quarter_period_is_full_scale() {
        // 1 kHz at 4 kHz puts sample 1 exactly at the crest
        let wave = synthesize_sine(1000.0, 0.01, 4000, 1.0).unwrap();
        assert_eq!(wave.samples()[1], 32767);
        assert_eq!(wave.samples()[3], -32767);
        assert_in_range(&wave);
    }

    #[test]
    fn values_stay_in_range() {
        for &amp in &[0.0, 0.25, 0.5, 1.0] {
            let wave = synthesize_sine(439.7, 0.05, 44100, amp).unwrap();
            assert_in_range(&wave);
            let peak = wave.samples().iter().map(|s| s.abs()).max().unwrap();
            assert!(peak as f64 <= (amp * 32767.0).round());
        }
    }

    #[test]
    fn zero_amplitude_is_silence() {
        let wave = synthesize_sine(440.0, 0.01, 8000, 0.0).unwrap();
        assert!(wave.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn cosine_with_zero_phase_is_sine() {
        let sine = synthesize_sine(523.25, 0.2, 22050, 0.8).unwrap();
        let cosine = synthesize_cosine(523.25, 0.2, 22050, 0.8, 0.0).unwrap();
        assert_eq!(sine, cosine);
    }

    #[test]
    fn cosine_is_phase_shifted_sine() {
        // phase of π/2 starts at the crest
        let wave = synthesize_cosine(1.0, 1.0, 4, 1.0, PI / 2.0).unwrap();
        assert_eq!(wave.samples()[0], 32767);
        assert_eq!(wave.samples()[2], -32767);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // the crests land on exactly ±16383.5
        let wave = synthesize_cosine(1.0, 1.0, 4, 0.5, PI / 2.0).unwrap();
        assert_eq!(wave.samples()[0], 16384);
        assert_eq!(wave.samples()[2], -16384);
    }

    #[test]
    fn note_matches_table_frequency() {
        let from_note = note_to_sine("C4", 1.0, 44100).unwrap();
        let direct = synthesize_sine(261.63, 1.0, 44100, 0.5).unwrap();
        assert_eq!(from_note, direct);
    }

    #[test]
    fn cosine_note() {
        let from_note = note_to_wave("A4", WaveType::Cosine, 0.1, 8000).unwrap();
        let direct = synthesize_cosine(440.0, 0.1, 8000, 0.5, 0.0).unwrap();
        assert_eq!(from_note, direct);
    }

    #[test]
    fn unknown_note() {
        assert_eq!(
            note_to_sine("H4", 1.0, 44100),
            Err(SynthError::UnknownNote {
                name: "H4".to_owned()
            })
        );
    }

    #[test]
    fn invalid_arguments() {
        let bad = [
            synthesize_sine(0.0, 1.0, 8000, 0.5),
            synthesize_sine(-440.0, 1.0, 8000, 0.5),
            synthesize_sine(f64::NAN, 1.0, 8000, 0.5),
            synthesize_sine(440.0, 0.0, 8000, 0.5),
            synthesize_sine(440.0, -1.0, 8000, 0.5),
            synthesize_sine(440.0, f64::INFINITY, 8000, 0.5),
            synthesize_sine(440.0, 1.0, 0, 0.5),
            synthesize_sine(440.0, 1.0, 8000, 1.5),
            synthesize_sine(440.0, 1.0, 8000, -0.1),
            synthesize_sine(440.0, 1.0, 8000, f64::NAN),
            synthesize_sine(440.0, 0.0001, 8000, 0.5),
            synthesize_cosine(440.0, 1.0, 8000, 0.5, f64::NAN),
        ];
        for (i, result) in bad.iter().enumerate() {
            match result {
                Err(SynthError::InvalidArgument { .. }) => {}
                other => panic!("case {}: expected invalid argument, got {:?}", i, other),
            }
        }
    }

    #[test]
    fn error_messages() {
        let err = synthesize_sine(440.0, 1.0, 8000, 2.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid amplitude 2: must be between 0 and 1");
        let err = note_to_sine("H4", 1.0, 8000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown note \"H4\", expected one of C4, D4, E4, F4, G4, A4, B4, C5"
        );
    }
}
