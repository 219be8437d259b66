// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `voix` - runs a Voix script, playing every flushed segment.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{error, info};
use structopt::StructOpt;

use voix::lang::{self, Interpreter};
use voix::output::sox::SoxSink;

#[derive(Debug, StructOpt)]
#[structopt(name = "voix", about = "Lambda Voice Synth")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Voix code file
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Output file (any sox-supported format). Audio is played directly if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Dump the command parsed from every line.
    #[structopt(long)]
    #[allow(clippy::option_option)]
    dump_commands: Option<Option<PathBuf>>,

    /// Fail if any line had to be skipped.
    #[structopt(long)]
    strict: bool,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let script = std::fs::read_to_string(&opt.script).map_err(|err| {
        error!("cannot read {}: {}", opt.script.display(), err);
        err
    })?;

    let dump_out = opt
        .dump_commands
        .map(|path| path.unwrap_or_else(|| "/dev/stdout".into()));
    if let Some(dump_out_path) = dump_out {
        dump_commands(&script, &dump_out_path)?;
    }

    info!("running {}", opt.script.display());
    let sink = match &opt.output {
        None => SoxSink::speakers(),
        Some(path) => SoxSink::file(path),
    };
    let mut interp = Interpreter::new(sink);
    let result = interp.run(&script);
    let (sink, report) = interp.into_parts();
    result.map_err(|diagnostic| io::Error::new(io::ErrorKind::Other, diagnostic))?;
    sink.finish()?;

    info!(
        "{} line(s), {} segment(s), {} flush(es), {} line(s) skipped",
        report.lines,
        report.segments,
        report.flushes,
        report.diagnostics.len()
    );
    if opt.strict && !report.diagnostics.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} line(s) had errors", report.diagnostics.len()),
        ));
    }
    Ok(())
}

fn dump_commands(script: &str, path: &Path) -> io::Result<()> {
    let mut f = std::fs::File::create(path)?;
    for (index, line) in script.lines().enumerate() {
        match lang::parse_line(line) {
            Ok(command) => writeln!(f, "{}: {:?}", index + 1, command)?,
            Err(err) => writeln!(f, "{}: error: {}", index + 1, err)?,
        }
    }
    Ok(())
}
