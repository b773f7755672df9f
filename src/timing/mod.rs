/*!
 * Subtitle timing resynchronization engine.
 *
 * This module contains the algorithmic core of resubs: converting timestamps
 * that are valid in a trimmed, speech-only concatenated audio stream back
 * into timestamps valid on the original, untrimmed media, and reconciling
 * the result against a reference subtitle track. It is split into several
 * submodules, each a pure transform over an ordered list:
 *
 * - `interval`: merging reference line timestamps into padded speech intervals
 * - `remap`: projecting trimmed-stream timestamps back onto the original timeline
 * - `align`: snapping generated line starts onto reference anchors
 * - `overlap`: clipping line ends so consecutive lines never overlap
 *
 * The stages run strictly in that order, single-threaded, each owning its
 * working collection for the duration of its pass.
 */

// Re-export main types for easier usage
pub use self::align::{align_to_reference, AlignmentParams};
pub use self::interval::{
    intervals_from_entries, merge_intervals, merged_speech_intervals, pad_intervals, SpeechInterval,
};
pub use self::overlap::resolve_overlaps;
pub use self::remap::{InsertedSpan, RemovedSpan, TimelineMap};

// Submodules
pub mod align;
pub mod interval;
pub mod overlap;
pub mod remap;
