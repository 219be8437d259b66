// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Parsing a single line of a script into a command.
//!
//! A line is a keyword followed by whitespace separated arguments:
//!
//! ```text
//! sine      <amplitude> <frequency> <duration> <sample_rate>
//! cosine    <amplitude> <frequency> <duration> <sample_rate> <phase>
//! note      <name> <duration> <sample_rate> [sine|cosine]
//! play_flow
//! ```

use std::str::SplitWhitespace;

use snafu::Snafu;

use crate::synth::WaveType;

pub const SINE: &str = "sine";
pub const COSINE: &str = "cosine";
pub const NOTE: &str = "note";
pub const PLAY_FLOW: &str = "play_flow";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Sine {
        amplitude: f64,
        frequency: f64,
        duration: f64,
        sample_rate: u32,
    },
    /// Phase shifted sine, see [`crate::synth::synthesize_cosine`].
    Cosine {
        amplitude: f64,
        frequency: f64,
        duration: f64,
        sample_rate: u32,
        phase: f64,
    },
    Note {
        name: String,
        duration: f64,
        sample_rate: u32,
        wave: WaveType,
    },
    /// Play everything queued so far.
    Flush,
    /// The first token is not a known keyword. The rest of the line is ignored.
    Unknown { keyword: String },
}

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum ParseError {
    #[snafu(display("empty line"))]
    EmptyLine,
    #[snafu(display("{}: missing argument <{}>", command, argument))]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[snafu(display("{}: unexpected argument {:?}", command, token))]
    UnexpectedArgument { command: &'static str, token: String },
    #[snafu(display(
        "{}: argument <{}> must be {}, got {:?}",
        command,
        argument,
        expected,
        token
    ))]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        expected: &'static str,
        token: String,
    },
    #[snafu(display("{}: unknown wave type {:?}, expected sine or cosine", command, token))]
    UnknownWaveType { command: &'static str, token: String },
}

/// Parse one line of a script.
///
/// Leading and trailing whitespace is ignored.
///
/// # Examples
///
/// ```
/// use voix::lang::command::{parse_line, Command};
///
/// assert_eq!(parse_line("  play_flow "), Ok(Command::Flush));
/// assert!(parse_line("sine 0.5 440").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next().ok_or(ParseError::EmptyLine)?;
    let command = match keyword {
        SINE => {
            let mut args = Args::new(SINE, tokens);
            let command = Command::Sine {
                amplitude: args.float("amplitude")?,
                frequency: args.float("frequency")?,
                duration: args.float("duration")?,
                sample_rate: args.rate()?,
            };
            args.finish()?;
            command
        }
        COSINE => {
            let mut args = Args::new(COSINE, tokens);
            let command = Command::Cosine {
                amplitude: args.float("amplitude")?,
                frequency: args.float("frequency")?,
                duration: args.float("duration")?,
                sample_rate: args.rate()?,
                phase: args.float("phase")?,
            };
            args.finish()?;
            command
        }
        NOTE => {
            let mut args = Args::new(NOTE, tokens);
            let command = Command::Note {
                name: args.word("name")?.to_owned(),
                duration: args.float("duration")?,
                sample_rate: args.rate()?,
                wave: args.wave()?,
            };
            args.finish()?;
            command
        }
        PLAY_FLOW => {
            Args::new(PLAY_FLOW, tokens).finish()?;
            Command::Flush
        }
        other => Command::Unknown {
            keyword: other.to_owned(),
        },
    };
    Ok(command)
}

/// Pulls the arguments of one command off the token stream.
struct Args<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(command: &'static str, tokens: SplitWhitespace<'a>) -> Self {
        Self { command, tokens }
    }

    fn word(&mut self, argument: &'static str) -> Result<&'a str, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn float(&mut self, argument: &'static str) -> Result<f64, ParseError> {
        let token = self.word(argument)?;
        token
            .parse()
            .map_err(|_| self.invalid_number(argument, "a number", token))
    }

    fn rate(&mut self) -> Result<u32, ParseError> {
        let argument = "sample_rate";
        let token = self.word(argument)?;
        token
            .parse()
            .map_err(|_| self.invalid_number(argument, "a whole number", token))
    }

    /// The optional wave type of a note, sine if absent.
    fn wave(&mut self) -> Result<WaveType, ParseError> {
        match self.tokens.next() {
            None | Some(SINE) => Ok(WaveType::Sine),
            Some(COSINE) => Ok(WaveType::Cosine),
            Some(other) => Err(ParseError::UnknownWaveType {
                command: self.command,
                token: other.to_owned(),
            }),
        }
    }

    /// Ensure the whole line was consumed.
    fn finish(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(token) => Err(ParseError::UnexpectedArgument {
                command: self.command,
                token: token.to_owned(),
            }),
        }
    }

    fn invalid_number(&self, argument: &'static str, expected: &'static str, token: &str) -> ParseError {
        ParseError::InvalidNumber {
            command: self.command,
            argument,
            expected,
            token: token.to_owned(),
        }
    }
}
