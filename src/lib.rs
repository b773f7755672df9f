/*!
 * # resubs - AI subtitle regeneration, resynchronized
 *
 * A Rust library for regenerating video subtitles with an external
 * speech-to-text model and resynchronizing the generated timing back onto
 * the original media timeline.
 *
 * ## Features
 *
 * - Merge reference subtitle timestamps into padded speech-only intervals
 * - Trim media audio down to those intervals before transcription
 * - Project trimmed-stream timestamps back onto the original timeline
 * - Snap generated line starts onto reference anchors
 * - Clip overlapping lines in the final track
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file handling and processing
 * - `timing`: The timing resynchronization engine:
 *   - `timing::interval`: Speech interval merging and padding
 *   - `timing::remap`: Trimmed-stream to original-timeline projection
 *   - `timing::align`: Anchor alignment against the reference track
 *   - `timing::overlap`: Overlap resolution
 * - `audio_extractor`: Speech-only audio extraction via ffmpeg
 * - `transcriber`: External whisper CLI invocation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Add other lints you want to allow but not auto-fix

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod timing;
pub mod audio_extractor;
pub mod transcriber;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use timing::{AlignmentParams, InsertedSpan, RemovedSpan, SpeechInterval, TimelineMap};
pub use errors::{AppError, AudioError, TimingError, TranscriptionError};
