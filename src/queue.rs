// voix -- a line based audio description interpreter
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Segments waiting to be played.

use crate::wave::SampleBuffer;

/// An ordered list of segments that are played back to back on the next flush.
///
/// All queued segments share one sample rate.
#[derive(Debug, Default)]
pub struct PlaybackQueue {
    buffers: Vec<SampleBuffer>,
}

/// Returned when a segment does not match the rate of the segments already queued.
/// Carries the rejected segment back to the caller.
#[derive(Debug, PartialEq)]
pub struct RateMismatch {
    pub expected: u32,
    pub rejected: SampleBuffer,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rate shared by all queued segments, `None` while the queue is empty.
    pub fn sample_rate(&self) -> Option<u32> {
        self.buffers.first().map(|b| b.sample_rate())
    }

    /// Append a segment to the end of the queue.
    pub fn push(&mut self, buffer: SampleBuffer) -> Result<(), RateMismatch> {
        if let Some(expected) = self.sample_rate() {
            if buffer.sample_rate() != expected {
                return Err(RateMismatch {
                    expected,
                    rejected: buffer,
                });
            }
        }
        self.buffers.push(buffer);
        Ok(())
    }

    /// Number of queued segments.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Total number of queued samples.
    pub fn samples_total(&self) -> usize {
        self.buffers.iter().map(|b| b.len()).sum()
    }

    /// Take all queued segments, joined in insertion order, leaving the queue empty.
    /// Returns `None` if there was nothing queued.
    pub fn flush(&mut self) -> Option<SampleBuffer> {
        let sample_rate = self.sample_rate()?;
        let joined = SampleBuffer::concat(&self.buffers, sample_rate);
        self.buffers.clear();
        Some(joined)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flush_joins_in_order_and_clears() {
        let mut queue = PlaybackQueue::new();
        queue.push(SampleBuffer::new(vec![1, 2, 3], 8000)).unwrap();
        queue.push(SampleBuffer::new(vec![4], 8000)).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.samples_total(), 4);

        let joined = queue.flush().unwrap();
        assert_eq!(joined, SampleBuffer::new(vec![1, 2, 3, 4], 8000));
        assert!(queue.is_empty());
        assert_eq!(queue.sample_rate(), None);
        assert_eq!(queue.flush(), None);
    }

    #[test]
    fn rejects_other_rates() {
        let mut queue = PlaybackQueue::new();
        queue.push(SampleBuffer::new(vec![1], 8000)).unwrap();
        let err = queue.push(SampleBuffer::new(vec![2], 44100)).unwrap_err();
        assert_eq!(err.expected, 8000);
        assert_eq!(err.rejected.samples(), &[2]);
        assert_eq!(queue.len(), 1);

        // a flush resets the rate
        queue.flush();
        queue.push(SampleBuffer::new(vec![2], 44100)).unwrap();
        assert_eq!(queue.sample_rate(), Some(44100));
    }
}
