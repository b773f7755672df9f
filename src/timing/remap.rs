use log::{debug, warn};

use crate::errors::TimingError;
use crate::subtitle_processor::SubtitleEntry;
use crate::timing::interval::SpeechInterval;

// @module: Trimmed-stream to original-timeline projection

/// A gap that existed on the original timeline but was excised before the
/// trimmed position in the concatenated stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedSpan {
    /// Trimmed-stream offset where the following interval's audio begins
    pub trimmed_pos_ms: u64,

    /// Length of the excised gap in milliseconds
    pub duration_ms: u64,
}

/// A silence buffer artificially inserted into the concatenated stream, with
/// no counterpart on the original timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedSpan {
    /// Trimmed-stream offset immediately after the buffer
    pub trimmed_pos_ms: u64,

    /// Length of the inserted buffer in milliseconds
    pub duration_ms: u64,
}

/// Bookkeeping needed to project timestamps computed against the trimmed,
/// concatenated stream back onto the original media timeline.
///
/// Built by walking the final merged+padded interval list in order; span
/// positions strictly increase because the source intervals are sorted and
/// disjoint.
#[derive(Debug, Clone)]
pub struct TimelineMap {
    removed: Vec<RemovedSpan>,
    inserted: Vec<InsertedSpan>,
    trimmed_len_ms: u64,
}

impl TimelineMap {
    /// Record the removed and inserted spans for an interval list.
    ///
    /// For each interval, the gap since the previous interval's end (or since
    /// zero) becomes a [`RemovedSpan`] positioned where the interval's copied
    /// audio begins in the trimmed stream. When `buffer_ms` is non-zero, a
    /// fixed silence buffer follows each interval's audio and is recorded as
    /// an [`InsertedSpan`] at its end-of-buffer offset.
    pub fn from_intervals(intervals: &[SpeechInterval], buffer_ms: u64) -> Self {
        let mut removed = Vec::with_capacity(intervals.len());
        let mut inserted = Vec::new();
        let mut cursor_ms = 0u64;
        let mut prev_end_ms = 0u64;

        for interval in intervals {
            removed.push(RemovedSpan {
                trimmed_pos_ms: cursor_ms,
                duration_ms: interval.start_ms - prev_end_ms,
            });
            cursor_ms += interval.duration_ms();

            if buffer_ms > 0 {
                cursor_ms += buffer_ms;
                inserted.push(InsertedSpan {
                    trimmed_pos_ms: cursor_ms,
                    duration_ms: buffer_ms,
                });
            }

            prev_end_ms = interval.end_ms;
        }

        TimelineMap {
            removed,
            inserted,
            trimmed_len_ms: cursor_ms,
        }
    }

    /// Total length of the trimmed, concatenated stream in milliseconds
    pub fn trimmed_len_ms(&self) -> u64 {
        self.trimmed_len_ms
    }

    /// Removed spans in encounter order
    pub fn removed_spans(&self) -> &[RemovedSpan] {
        &self.removed
    }

    /// Inserted spans in encounter order
    pub fn inserted_spans(&self) -> &[InsertedSpan] {
        &self.inserted
    }

    /// Project a generated track from trimmed-stream time back to the
    /// original timeline, in place.
    ///
    /// Two corrective passes run in a fixed order: first inserted buffers are
    /// undone (backward shifts), then removed gaps are reinserted (forward
    /// shifts). Spans are applied once each, in encounter order; since span
    /// positions stay in trimmed-stream coordinates while earlier shifts have
    /// already moved the lines, each pass compares lines against the span
    /// position adjusted by the cumulative shift applied so far.
    ///
    /// Shift keying, applied uniformly:
    /// - backward (undo buffer): `line.start >= position` moves both bounds;
    /// - forward (reinsert gap): `line.end >= position` moves both bounds, so
    ///   a line whose span touches the gap boundary is pushed whole.
    ///
    /// Lines referencing positions beyond the trimmed stream are rejected
    /// with [`TimingError::OutOfRangeTimestamp`]; no repair is attempted.
    pub fn restore(&self, entries: &mut [SubtitleEntry]) -> Result<(), TimingError> {
        for entry in entries.iter() {
            if entry.end_time_ms > self.trimmed_len_ms {
                return Err(TimingError::OutOfRangeTimestamp {
                    timestamp_ms: entry.end_time_ms,
                    trimmed_len_ms: self.trimmed_len_ms,
                });
            }
        }

        // Pass 1: collapse buffer-only time out of the trimmed timeline
        let mut collapsed_ms = 0u64;
        for span in &self.inserted {
            let threshold_ms = span.trimmed_pos_ms - collapsed_ms;
            for entry in entries.iter_mut() {
                if entry.start_time_ms >= threshold_ms {
                    entry.start_time_ms -= span.duration_ms;
                    entry.end_time_ms -= span.duration_ms;
                }
            }
            collapsed_ms += span.duration_ms;
        }

        // Pass 2: push lines forward past each reinserted gap. Lines are in
        // buffer-free coordinates after pass 1, so each span position drops
        // the buffer time that preceded it before the cumulative forward
        // shift is added.
        let mut restored_ms = 0u64;
        for span in &self.removed {
            if span.duration_ms == 0 {
                continue;
            }
            let collapsed_before_ms: u64 = self
                .inserted
                .iter()
                .filter(|buffer| buffer.trimmed_pos_ms <= span.trimmed_pos_ms)
                .map(|buffer| buffer.duration_ms)
                .sum();
            let threshold_ms = span.trimmed_pos_ms - collapsed_before_ms + restored_ms;
            for entry in entries.iter_mut() {
                if entry.end_time_ms >= threshold_ms {
                    entry.start_time_ms += span.duration_ms;
                    entry.end_time_ms += span.duration_ms;
                }
            }
            restored_ms += span.duration_ms;
        }

        if collapsed_ms > 0 || restored_ms > 0 {
            debug!(
                "Restored {} lines onto the original timeline ({}ms of buffers removed, {}ms of gaps reinserted)",
                entries.len(),
                collapsed_ms,
                restored_ms
            );
        }

        if entries.is_empty() {
            warn!("Generated track is empty, nothing to restore");
        }

        Ok(())
    }
}
