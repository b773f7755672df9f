use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::audio_extractor::AudioExtractor;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleCollection;
use crate::timing::{align_to_reference, merged_speech_intervals, resolve_overlaps};
use crate::transcriber::Transcriber;

// @module: Application controller for subtitle resynchronization

/// Main application controller driving the resynchronization pipeline:
/// reference track → speech intervals → trimmed audio → transcription →
/// timeline restore → anchor alignment → overlap resolution → output.
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let controller = Self {
            config,
        };

        Ok(controller)
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Run the pipeline for one video and its reference subtitle file
    pub async fn run(
        &self,
        input_file: PathBuf,
        subtitle_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input files exist
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !subtitle_file.exists() {
            return Err(anyhow::anyhow!("Subtitle file does not exist: {:?}", subtitle_file));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if a resynchronized track already exists
        let tag = self.output_language_tag();
        let output_path = FileManager::generate_output_path(&input_file, &output_dir, &tag, "srt");
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Load the reference track; its line timestamps drive everything else
        let reference = SubtitleCollection::load_from_file(&subtitle_file, "reference")
            .context("Failed to load reference subtitle track")?;
        info!("Reference track: {} lines", reference.entries.len());

        // Merge reference line timestamps into padded speech intervals
        let intervals = merged_speech_intervals(&reference.entries, self.config.resync.padding_ms)?;
        if intervals.is_empty() {
            // A reference track without usable timestamps is a legitimate
            // "no speech" result, not an error
            warn!("Reference track contains no speech intervals, writing empty track");
            let empty = SubtitleCollection::new(input_file.clone(), tag);
            empty.write_to_srt(&output_path)?;
            return Ok(());
        }

        let media_duration_ms = AudioExtractor::probe_duration_ms(&input_file).await?;
        let speech_ms: u64 = intervals.iter().map(|interval| interval.duration_ms()).sum();
        info!(
            "Keeping {} speech intervals, {} of {} of audio",
            intervals.len(),
            Self::format_duration(Duration::from_millis(speech_ms)),
            Self::format_duration(Duration::from_millis(media_duration_ms))
        );

        // The working directory holds audio segments and whisper output,
        // cleaned up when the run ends
        let workdir = TempDir::new().context("Failed to create working directory")?;

        // Extract the speech-only audio stream
        let spinner = Self::stage_spinner("Trimming audio to speech segments...");
        let extractor = AudioExtractor::new(self.config.resync.silence_buffer_ms);
        let (audio_path, timeline_map) = extractor
            .extract(&input_file, &intervals, workdir.path())
            .await?;
        spinner.finish_with_message("Audio trimmed");

        // Transcribe the trimmed stream; the result is in trimmed-stream time
        let spinner = Self::stage_spinner("Transcribing speech...");
        let transcriber = Transcriber::new(self.config.whisper.clone());
        let mut generated = transcriber.transcribe(&audio_path, workdir.path()).await?;
        spinner.finish_with_message("Transcription finished");

        // Project the generated track back onto the original timeline
        timeline_map.restore(&mut generated.entries)?;

        if self.config.resync.save_unaligned {
            let unaligned_tag = format!("{}.unaligned", tag);
            let unaligned_path =
                FileManager::generate_output_path(&input_file, &output_dir, &unaligned_tag, "srt");
            generated.write_to_srt(&unaligned_path)?;
            debug!("Wrote unaligned track to {:?}", unaligned_path);
        }

        // Snap generated starts onto reference anchors, then clear overlaps
        if self.config.resync.alignment.enabled {
            align_to_reference(
                &mut generated.entries,
                &reference.start_times_ms(),
                &self.config.resync.alignment.params(),
            );
        }
        resolve_overlaps(&mut generated.entries);
        generated.renumber();

        generated.write_to_srt(&output_path)?;

        let elapsed = start_time.elapsed();
        info!(
            "Wrote {} resynchronized lines to {:?} in {}",
            generated.entries.len(),
            output_path,
            Self::format_duration(elapsed)
        );

        Ok(())
    }

    /// Process every video in a directory that has a sibling reference
    /// subtitle next to it
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Processing directory: {:?}", input_dir);

        let videos = FileManager::find_video_files(&input_dir)?;
        if videos.is_empty() {
            warn!("No video files found in directory: {:?}", input_dir);
            return Ok(());
        }

        let mut processed_count = 0;
        for video in videos {
            let Some(subtitle) = FileManager::find_matching_subtitle(&video) else {
                warn!("No reference subtitle found next to {:?}, skipping", video);
                continue;
            };

            let output_dir = video.parent().unwrap_or(Path::new(".")).to_path_buf();
            if let Err(e) = self
                .run(video.clone(), subtitle, output_dir, force_overwrite)
                .await
            {
                error!("Error processing {:?}: {}", video, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} files", processed_count);

        Ok(())
    }

    /// Language tag used in output filenames
    fn output_language_tag(&self) -> String {
        self.config
            .whisper
            .language
            .clone()
            .unwrap_or_else(|| "auto".to_string())
    }

    /// Spinner for a long-running external stage
    fn stage_spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Format a duration as a compact human-readable string
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
