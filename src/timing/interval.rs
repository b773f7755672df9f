use log::debug;

use crate::errors::TimingError;
use crate::subtitle_processor::SubtitleEntry;

// @module: Speech interval merging and padding

/// A closed time range on the original media timeline, in milliseconds.
///
/// Invariant: `start_ms <= end_ms`. Lists produced by [`merge_intervals`] are
/// additionally sorted by start with no two intervals overlapping or touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechInterval {
    /// Interval start in milliseconds
    pub start_ms: u64,

    /// Interval end in milliseconds
    pub end_ms: u64,
}

impl SpeechInterval {
    /// Create a validated interval, rejecting inverted ranges
    pub fn new(start_ms: u64, end_ms: u64) -> Result<Self, TimingError> {
        if start_ms > end_ms {
            return Err(TimingError::MalformedInterval { start_ms, end_ms });
        }
        Ok(SpeechInterval { start_ms, end_ms })
    }

    /// Length of the interval in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Collapse a line-ordered sequence of intervals into a minimal sorted list of
/// non-overlapping, non-touching intervals covering the same union.
///
/// No sort is performed: subtitle lines are already time-ordered by
/// convention. Touching boundaries (`start == previous end`) merge, since the
/// intervals are closed.
pub fn merge_intervals(intervals: &[SpeechInterval]) -> Vec<SpeechInterval> {
    let mut merged: Vec<SpeechInterval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start_ms <= last.end_ms => {
                last.end_ms = last.end_ms.max(interval.end_ms);
            }
            _ => merged.push(*interval),
        }
    }

    merged
}

/// Widen each interval by `padding_ms` on both sides, flooring the start at
/// zero. Padding exists so the first and last phonemes of an utterance are not
/// clipped and the transcription model gets context around sentence
/// boundaries. Padded intervals may overlap again and need a second merge.
pub fn pad_intervals(intervals: &[SpeechInterval], padding_ms: u64) -> Vec<SpeechInterval> {
    intervals
        .iter()
        .map(|interval| SpeechInterval {
            start_ms: interval.start_ms.saturating_sub(padding_ms),
            end_ms: interval.end_ms + padding_ms,
        })
        .collect()
}

/// Read a reference track's line timestamps as validated intervals, in line
/// order. Rejects inverted lines rather than clamping them.
pub fn intervals_from_entries(entries: &[SubtitleEntry]) -> Result<Vec<SpeechInterval>, TimingError> {
    entries
        .iter()
        .map(|entry| SpeechInterval::new(entry.start_time_ms, entry.end_time_ms))
        .collect()
}

/// The full merge plan for a reference track: merge raw line intervals, apply
/// padding, merge again. An empty track yields an empty plan, which downstream
/// stages treat as a legitimate "no speech" result.
pub fn merged_speech_intervals(
    entries: &[SubtitleEntry],
    padding_ms: u64,
) -> Result<Vec<SpeechInterval>, TimingError> {
    let raw = intervals_from_entries(entries)?;
    let merged = merge_intervals(&raw);
    let padded = pad_intervals(&merged, padding_ms);
    let plan = merge_intervals(&padded);

    debug!(
        "Merged {} subtitle lines into {} speech intervals ({} after {}ms padding)",
        entries.len(),
        merged.len(),
        plan.len(),
        padding_ms
    );

    Ok(plan)
}
