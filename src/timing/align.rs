use log::debug;

use crate::subtitle_processor::SubtitleEntry;

// @module: Anchor alignment of generated lines onto reference start times

/// Tolerance sweep parameters for anchor alignment.
///
/// The sweep iterates an ascending tolerance from `min_offset_ms` up to (but
/// not including) `max_offset_ms` in `step_ms` increments. Confident
/// alignments lock in at low tolerance and act as fixed points for the
/// looser matches attempted later.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentParams {
    /// Smallest tolerance attempted, in milliseconds
    pub min_offset_ms: u64,

    /// Upper bound of the sweep (exclusive), in milliseconds
    pub max_offset_ms: u64,

    /// Tolerance increment per pass, in milliseconds
    pub step_ms: u64,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        AlignmentParams {
            min_offset_ms: 5,
            max_offset_ms: 4000,
            step_ms: 20,
        }
    }
}

/// Pull generated-line start times onto nearby reference start times.
///
/// For each tolerance level, generated lines are visited in track order; a
/// line whose start lies within the tolerance of some reference start is
/// shifted (start and end together) onto the single closest one, unless a
/// generated line already occupies that exact start. A line sitting exactly
/// on an anchor occupies it itself and is therefore never moved. Collisions
/// resolve first-come-first-served; no two lines are ever assigned the same
/// anchor.
pub fn align_to_reference(
    entries: &mut [SubtitleEntry],
    reference_starts_ms: &[u64],
    params: &AlignmentParams,
) {
    if entries.is_empty() || reference_starts_ms.is_empty() || params.step_ms == 0 {
        return;
    }

    let mut tolerance_ms = params.min_offset_ms;
    while tolerance_ms < params.max_offset_ms {
        align_within_tolerance(entries, reference_starts_ms, tolerance_ms);
        tolerance_ms += params.step_ms;
    }
}

/// One pass of the sweep at a fixed tolerance
fn align_within_tolerance(entries: &mut [SubtitleEntry], reference_starts_ms: &[u64], tolerance_ms: u64) {
    for idx in 0..entries.len() {
        let start_ms = entries[idx].start_time_ms;

        let anchor_ms = match nearest_anchor(reference_starts_ms, start_ms) {
            Some(anchor_ms) => anchor_ms,
            None => continue,
        };

        if anchor_ms.abs_diff(start_ms) >= tolerance_ms {
            continue;
        }

        // First writer wins: an occupied anchor stays a fixed point. The
        // check covers the line itself, which keeps exact matches in place.
        if entries.iter().any(|entry| entry.start_time_ms == anchor_ms) {
            continue;
        }

        let entry = &mut entries[idx];
        debug!(
            "Aligning \"{}\" from {}ms to anchor {}ms",
            entry.text, entry.start_time_ms, anchor_ms
        );

        if anchor_ms >= entry.start_time_ms {
            let delta_ms = anchor_ms - entry.start_time_ms;
            entry.end_time_ms += delta_ms;
        } else {
            let delta_ms = entry.start_time_ms - anchor_ms;
            entry.end_time_ms -= delta_ms;
        }
        entry.start_time_ms = anchor_ms;
    }
}

/// Closest reference start by absolute distance; ties pick the earliest
/// reference start.
fn nearest_anchor(reference_starts_ms: &[u64], start_ms: u64) -> Option<u64> {
    let mut best: Option<u64> = None;
    for &anchor_ms in reference_starts_ms {
        match best {
            Some(current) if anchor_ms.abs_diff(start_ms) >= current.abs_diff(start_ms) => {}
            _ => best = Some(anchor_ms),
        }
    }
    best
}
