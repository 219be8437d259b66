// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is.

/// The notes that can be referred to by name, with their frequency in Hz.
///
/// This is the C major scale from C4 to C5, rounded to two decimals.
pub const NOTE_TABLE: [(&str, f64); 8] = [
    ("C4", 261.63),
    ("D4", 293.66),
    ("E4", 329.63),
    ("F4", 349.23),
    ("G4", 392.00),
    ("A4", 440.00),
    ("B4", 493.88),
    ("C5", 523.25),
];

/// Look up the frequency of a note in [`NOTE_TABLE`].
/// Names are case sensitive.
///
/// # Examples
///
/// ```
/// use voix::note::frequency;
///
/// assert_eq!(frequency("A4"), Some(440.0));
/// assert_eq!(frequency("a4"), None);
/// assert_eq!(frequency("C#4"), None);
/// ```
pub fn frequency(name: &str) -> Option<f64> {
    NOTE_TABLE
        .iter()
        .find(|(note, _)| *note == name)
        .map(|(_, freq)| *freq)
}

/// Iterate over all known note names in ascending pitch.
pub fn names() -> impl Iterator<Item = &'static str> {
    NOTE_TABLE.iter().map(|(name, _)| *name)
}
