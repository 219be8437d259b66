// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Getting the synthesized audio out of the process.

pub mod sox;

use std::io;

use snafu::Snafu;

use crate::wave::SampleBuffer;

/// Something that can render mono 16 bit audio.
pub trait Playback {
    /// Render the buffer at its own sample rate. Blocks until the audio has been consumed.
    fn play(&mut self, audio: &SampleBuffer) -> Result<(), PlaybackError>;
}

impl<P: Playback + ?Sized> Playback for &mut P {
    fn play(&mut self, audio: &SampleBuffer) -> Result<(), PlaybackError> {
        (**self).play(audio)
    }
}

/// Failures of the audio output. Once one of these occurred, the output should be considered unusable.
#[derive(Debug, Snafu)]
pub enum PlaybackError {
    #[snafu(display("could not start {}: {}", program, source))]
    Spawn { program: String, source: io::Error },
    #[snafu(display("could not stream audio to {}: {}", program, source))]
    Stream { program: String, source: io::Error },
    #[snafu(display("{} failed with {}", program, status))]
    Exit {
        program: String,
        status: std::process::ExitStatus,
    },
    #[snafu(display(
        "output was opened at {} Hz, cannot continue at {} Hz",
        opened,
        requested
    ))]
    RateChanged { opened: u32, requested: u32 },
}

impl From<PlaybackError> for io::Error {
    fn from(err: PlaybackError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
