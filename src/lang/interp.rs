// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Running scripts line by line.

use std::fmt;

use log::{debug, error, info, trace, warn};
use snafu::Snafu;

use super::command::{self, Command, ParseError};
use crate::output::{Playback, PlaybackError};
use crate::queue::PlaybackQueue;
use crate::synth::{self, SynthError};

/// Everything that can go wrong on a single line.
///
/// Only [`LineError::Device`] ends a run, all other errors skip the line.
#[derive(Debug, Snafu)]
pub enum LineError {
    #[snafu(display("{}", source))]
    Parse { source: ParseError },
    #[snafu(display("unknown keyword {:?}", keyword))]
    UnknownKeyword { keyword: String },
    #[snafu(display("{}", source))]
    Synth { source: SynthError },
    #[snafu(display(
        "cannot queue a segment at {} Hz after segments at {} Hz, play them first",
        found,
        expected
    ))]
    SampleRateMismatch { expected: u32, found: u32 },
    #[snafu(display("playback failed: {}", source))]
    Device { source: PlaybackError },
}

impl LineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LineError::Device { .. })
    }
}

/// An error together with the (1-based) number of the line it occurred on.
#[derive(Debug)]
pub struct Diagnostic {
    pub line: usize,
    pub error: LineError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// What a successfully processed line did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A segment of this many samples was appended to the queue.
    Queued { samples: usize },
    /// The queue was played, this many samples in total.
    Played { samples: usize },
    /// A flush found the queue empty.
    NothingToPlay,
    /// The line had a recoverable error, which was added to the report.
    Skipped,
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct Report {
    /// Number of lines processed.
    pub lines: usize,
    /// Number of segments that were queued.
    pub segments: usize,
    /// Number of flushes that reached the output.
    pub flushes: usize,
    /// Number of samples sent to the output.
    pub samples_played: usize,
    /// Recoverable errors, in the order they occurred.
    pub diagnostics: Vec<Diagnostic>,
}

/// Executes script lines, queuing the synthesized segments until they are flushed to `output`.
pub struct Interpreter<P> {
    queue: PlaybackQueue,
    /// Rate of the most recently queued segment.
    current_sample_rate: Option<u32>,
    output: P,
    report: Report,
}

impl<P: Playback> Interpreter<P> {
    pub fn new(output: P) -> Self {
        Self {
            queue: PlaybackQueue::new(),
            current_sample_rate: None,
            output,
            report: Report::default(),
        }
    }

    /// Run all lines of a script.
    ///
    /// Recoverable errors are collected in the [`Report`], the first device error stops the run.
    pub fn run(&mut self, script: &str) -> Result<(), Diagnostic> {
        for (index, line) in script.lines().enumerate() {
            self.run_line(index + 1, line)?;
        }
        if !self.queue.is_empty() {
            warn!(
                "{} segment(s) were queued but never played, end the script with {}",
                self.queue.len(),
                command::PLAY_FLOW
            );
        }
        Ok(())
    }

    /// Run a single line, recording recoverable errors in the report.
    pub fn run_line(&mut self, number: usize, line: &str) -> Result<Outcome, Diagnostic> {
        trace!(
            "line {}: {:?}",
            number,
            line.split_whitespace().collect::<Vec<_>>()
        );
        self.report.lines += 1;
        match self.execute_line(line) {
            Ok(outcome) => Ok(outcome),
            Err(error) if error.is_fatal() => {
                let diagnostic = Diagnostic {
                    line: number,
                    error,
                };
                error!("{}", diagnostic);
                Err(diagnostic)
            }
            Err(error) => {
                let diagnostic = Diagnostic {
                    line: number,
                    error,
                };
                warn!("{}", diagnostic);
                self.report.diagnostics.push(diagnostic);
                Ok(Outcome::Skipped)
            }
        }
    }

    /// Parse and execute one line without recording anything in the report.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, LineError> {
        let command = command::parse_line(line).map_err(|source| LineError::Parse { source })?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, LineError> {
        let segment = match command {
            Command::Sine {
                amplitude,
                frequency,
                duration,
                sample_rate,
            } => synth::synthesize_sine(frequency, duration, sample_rate, amplitude),
            Command::Cosine {
                amplitude,
                frequency,
                duration,
                sample_rate,
                phase,
            } => synth::synthesize_cosine(frequency, duration, sample_rate, amplitude, phase),
            Command::Note {
                name,
                duration,
                sample_rate,
                wave,
            } => synth::note_to_wave(&name, wave, duration, sample_rate),
            Command::Flush => return self.flush(),
            Command::Unknown { keyword } => return Err(LineError::UnknownKeyword { keyword }),
        }
        .map_err(|source| LineError::Synth { source })?;

        let samples = segment.len();
        let sample_rate = segment.sample_rate();
        self.queue
            .push(segment)
            .map_err(|mismatch| LineError::SampleRateMismatch {
                expected: mismatch.expected,
                found: mismatch.rejected.sample_rate(),
            })?;
        self.current_sample_rate = Some(sample_rate);
        self.report.segments += 1;
        debug!(
            "queued {} samples at {} Hz, {} segment(s) waiting",
            samples,
            sample_rate,
            self.queue.len()
        );
        Ok(Outcome::Queued { samples })
    }

    /// Play everything queued so far and empty the queue.
    pub fn flush(&mut self) -> Result<Outcome, LineError> {
        let audio = match self.queue.flush() {
            Some(audio) => audio,
            None => {
                info!("no audio to play");
                return Ok(Outcome::NothingToPlay);
            }
        };
        debug_assert_eq!(Some(audio.sample_rate()), self.current_sample_rate);
        info!(
            "playing {} samples ({:.2} seconds) at {} Hz",
            audio.len(),
            audio.seconds(),
            audio.sample_rate()
        );
        self.output
            .play(&audio)
            .map_err(|source| LineError::Device { source })?;
        self.report.flushes += 1;
        self.report.samples_played += audio.len();
        Ok(Outcome::Played {
            samples: audio.len(),
        })
    }

    /// Rate of the most recently queued segment, if any segment was queued yet.
    pub fn current_sample_rate(&self) -> Option<u32> {
        self.current_sample_rate
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    pub fn into_parts(self) -> (P, Report) {
        (self.output, self.report)
    }
}
