use log::debug;

use crate::subtitle_processor::SubtitleEntry;

// @module: Overlap resolution for the final generated track

/// Sort the track by start time and clip each line's end against its
/// successor's start so consecutive lines never overlap.
///
/// A single pass suffices: ends only ever shrink, so clipping cannot create a
/// new overlap further ahead. The last line has no successor and is never
/// clipped.
pub fn resolve_overlaps(entries: &mut [SubtitleEntry]) {
    entries.sort_by_key(|entry| entry.start_time_ms);

    let mut clipped = 0usize;
    for idx in 0..entries.len().saturating_sub(1) {
        let next_start_ms = entries[idx + 1].start_time_ms;
        if entries[idx].end_time_ms > next_start_ms {
            entries[idx].end_time_ms = next_start_ms;
            clipped += 1;
        }
    }

    if clipped > 0 {
        debug!("Clipped {} overlapping line endings", clipped);
    }
}
