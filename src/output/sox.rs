// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Easy interface for getting sound to play using a sox subprocess.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use log::{debug, error, info};
use snafu::ResultExt;

use super::{Playback, PlaybackError, Spawn, Stream};
use crate::wave::SampleBuffer;

pub enum SoxTarget {
    /// Play on the default audio device.
    Play,
    /// Write all audio of the run into one file of any sox-supported format.
    File(PathBuf),
}

pub struct SoxSink {
    target: SoxTarget,
    /// The sox process writing to the output file, started on the first flush.
    recording: Option<Recording>,
}

struct Recording {
    sox: Child,
    audio_stream: ChildStdin,
    sample_rate: u32,
}

impl SoxSink {
    pub fn new(target: SoxTarget) -> Self {
        Self {
            target,
            recording: None,
        }
    }

    pub fn speakers() -> Self {
        Self::new(SoxTarget::Play)
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(SoxTarget::File(path.into()))
    }

    /// Close the output file, if one was written. Nothing to do when playing on speakers.
    pub fn finish(mut self) -> Result<(), PlaybackError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), PlaybackError> {
        if let Some(Recording {
            mut sox,
            audio_stream,
            ..
        }) = self.recording.take()
        {
            // sox exits once its input is closed
            drop(audio_stream);
            wait_for("sox", &mut sox)?;
        }
        Ok(())
    }

    fn play_on_speakers(&mut self, audio: &SampleBuffer) -> Result<(), PlaybackError> {
        let (play, _) = sox_binaries();
        let mut player = Command::new(&play)
            .args(&input_args(audio.sample_rate()))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context(Spawn { program: "play" })?;

        let mut audio_stream = player.stdin.take().expect("Used stdin(Stdio::piped())");
        let written = audio_stream
            .write_all(&audio.to_le_bytes())
            .and_then(|_| audio_stream.flush());
        drop(audio_stream);

        // Always reap the player, so that the device is released even if streaming failed.
        let finished = wait_for("play", &mut player);
        written.context(Stream { program: "play" })?;
        finished
    }

    fn record(&mut self, path: &Path, audio: &SampleBuffer) -> Result<(), PlaybackError> {
        let recording = match self.recording.take() {
            Some(recording) => recording,
            None => start_recording(path, audio.sample_rate())?,
        };
        let recording = self.recording.get_or_insert(recording);

        if recording.sample_rate != audio.sample_rate() {
            return Err(PlaybackError::RateChanged {
                opened: recording.sample_rate,
                requested: audio.sample_rate(),
            });
        }

        let status = recording
            .audio_stream
            .write_all(&audio.to_le_bytes())
            .and_then(|_| recording.audio_stream.flush());
        if let Err(err) = status {
            error!("Failed to write audio to sox stream: {}", err);
            return Err(err).context(Stream { program: "sox" });
        }
        Ok(())
    }
}

impl Playback for SoxSink {
    fn play(&mut self, audio: &SampleBuffer) -> Result<(), PlaybackError> {
        debug!(
            "sending {} samples ({:.2} seconds) to sox",
            audio.len(),
            audio.seconds()
        );
        match &self.target {
            SoxTarget::Play => self.play_on_speakers(audio),
            SoxTarget::File(path) => {
                let path = path.clone();
                self.record(&path, audio)
            }
        }
    }
}

impl Drop for SoxSink {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!("{}", err);
        }
    }
}

/// Raw mono signed 16 bit little endian PCM on stdin.
fn input_args(sample_rate: u32) -> Vec<String> {
    vec![
        "-R".into(), // make the output reproducible
        "--channels".into(),
        "1".into(),
        "--rate".into(),
        sample_rate.to_string(),
        "--endian".into(),
        "little".into(),
        "--type".into(),
        "s16".into(),
        "/dev/stdin".into(),
    ]
}

/// Paths of the `play` and `sox` executables.
fn sox_binaries() -> (PathBuf, PathBuf) {
    // For properly recording the sox dependency on nix:
    if let Some(sox_bin) = option_env!("NIX_SOX_BIN") {
        log::debug!("using sox from nix store {}", sox_bin);
        let play = Path::new(sox_bin).join("play");
        let sox = Path::new(sox_bin).join("sox");
        (play, sox)
    } else {
        ("play".into(), "sox".into())
    }
}

fn start_recording(path: &Path, sample_rate: u32) -> Result<Recording, PlaybackError> {
    let (_, sox) = sox_binaries();
    let mut child = Command::new(&sox)
        .args(&input_args(sample_rate))
        .arg(path)
        .stdin(Stdio::piped())
        .spawn()
        .context(Spawn { program: "sox" })?;
    let audio_stream = child.stdin.take().expect("Used stdin(Stdio::piped())");
    info!("writing audio to {} at {} Hz", path.display(), sample_rate);
    Ok(Recording {
        sox: child,
        audio_stream,
        sample_rate,
    })
}

fn wait_for(program: &str, child: &mut Child) -> Result<(), PlaybackError> {
    let status = child.wait().context(Spawn { program })?;
    if status.success() {
        Ok(())
    } else {
        Err(PlaybackError::Exit {
            program: program.to_owned(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_input_format() {
        let args = input_args(8000);
        let rate = args.iter().position(|a| a == "--rate").unwrap();
        assert_eq!(args[rate + 1], "8000");
        let channels = args.iter().position(|a| a == "--channels").unwrap();
        assert_eq!(args[channels + 1], "1");
        assert_eq!(args.last().map(String::as_str), Some("/dev/stdin"));
    }

    #[test]
    fn unopened_file_finishes_cleanly() {
        let sink = SoxSink::file("never-written.wav");
        assert!(sink.finish().is_ok());
    }
}
