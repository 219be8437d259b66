// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This is the namespace for all parts dealing with data in sampled waves.

/// Largest magnitude a synthesized sample may take, in both directions.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// A mono segment of signed 16 bit PCM audio at a fixed sample rate.
///
/// Buffers are immutable once produced, the only way to combine them is [`SampleBuffer::concat`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Concatenate buffers in the given order.
    ///
    /// All buffers must share `sample_rate`, which the playback queue guarantees.
    ///
    /// # Examples
    ///
    /// ```
    /// use voix::wave::SampleBuffer;
    ///
    /// let a = SampleBuffer::new(vec![1, 2], 8000);
    /// let b = SampleBuffer::new(vec![3], 8000);
    /// let joined = SampleBuffer::concat(&[a, b], 8000);
    /// assert_eq!(joined.samples(), &[1, 2, 3]);
    /// ```
    pub fn concat(buffers: &[SampleBuffer], sample_rate: u32) -> Self {
        debug_assert!(buffers.iter().all(|b| b.sample_rate == sample_rate));
        let total = buffers.iter().map(|b| b.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for buffer in buffers {
            samples.extend_from_slice(&buffer.samples);
        }
        Self {
            samples,
            sample_rate,
        }
    }

    /// Size of the buffer in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Size of the buffer in bytes (two bytes per sample, one channel).
    pub fn byte_len(&self) -> usize {
        self.len() * std::mem::size_of::<i16>()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Playing time of the buffer in seconds.
    pub fn seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Copy the samples to bytes in little endian order.
    ///
    /// Returns the number of samples that were actually copied.
    /// Might be less than the number of input samples if the output buffer was not large enough.
    pub fn copy_bytes_to(&self, bytes: &mut [u8]) -> usize {
        let mut processed = 0;
        for (sample, target) in self.samples.iter().zip(bytes.chunks_exact_mut(2)) {
            target.copy_from_slice(&sample.to_le_bytes());
            processed += 1;
        }
        processed
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.byte_len()];
        self.copy_bytes_to(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_little_endian() {
        let buffer = SampleBuffer::new(vec![1, -2, 0x1234], 8000);
        assert_eq!(buffer.byte_len(), 6);
        assert_eq!(buffer.to_le_bytes(), vec![0x01, 0x00, 0xfe, 0xff, 0x34, 0x12]);
    }

    #[test]
    fn short_target_copies_partially() {
        let buffer = SampleBuffer::new(vec![7, 8, 9], 8000);
        let mut bytes = [0u8; 5];
        assert_eq!(buffer.copy_bytes_to(&mut bytes), 2);
        assert_eq!(bytes, [7, 0, 8, 0, 0]);
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let joined = SampleBuffer::concat(&[], 44100);
        assert!(joined.is_empty());
        assert_eq!(joined.sample_rate(), 44100);
    }

    #[test]
    fn seconds_from_rate() {
        let buffer = SampleBuffer::new(vec![0; 4000], 8000);
        assert_eq!(buffer.seconds(), 0.5);
    }
}
