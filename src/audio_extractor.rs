use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow, Context};
use log::{debug, error};
use serde_json::{Value, from_str};
use tokio::process::Command;

use crate::errors::AudioError;
use crate::timing::{SpeechInterval, TimelineMap};

// @module: Speech-only audio extraction via ffmpeg

/// Sample rate of the extracted mono stream, chosen for the transcription model
const SAMPLE_RATE_HZ: u32 = 16_000;

/// Timeout for a single ffmpeg invocation
const FFMPEG_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for ffprobe
const FFPROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Cuts the speech intervals out of a media file and concatenates them into
/// one trimmed audio stream, recording the [`TimelineMap`] alongside.
pub struct AudioExtractor {
    /// Silence appended after each interval's audio, 0 to disable
    buffer_ms: u64,
}

impl AudioExtractor {
    /// Create an extractor with the given silence buffer
    pub fn new(buffer_ms: u64) -> Self {
        AudioExtractor { buffer_ms }
    }

    /// Probe the media duration in milliseconds with ffprobe
    pub async fn probe_duration_ms<P: AsRef<Path>>(media_path: P) -> Result<u64> {
        let media_path = media_path.as_ref();

        if !media_path.exists() {
            return Err(anyhow!("Media file does not exist: {:?}", media_path));
        }

        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                media_path.to_str().unwrap_or(""),
            ])
            .output();

        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| Self::map_spawn_error("ffprobe", e))?
            },
            _ = tokio::time::sleep(FFPROBE_TIMEOUT) => {
                return Err(anyhow!("ffprobe command timed out after 60 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(AudioError::ProbeFailed(stderr.to_string()).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = from_str(&stdout)
            .context("Failed to parse ffprobe JSON output")?;

        let duration_secs: f64 = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse().ok())
            .ok_or_else(|| AudioError::ProbeFailed("no duration in ffprobe output".to_string()))?;

        Ok((duration_secs * 1000.0).round() as u64)
    }

    /// Copy each interval's audio span into a concatenated mono stream under
    /// `workdir`, appending the configured silence buffer after each span.
    /// Returns the trimmed audio path and the timeline map recorded while
    /// walking the intervals.
    pub async fn extract<P: AsRef<Path>>(
        &self,
        media_path: P,
        intervals: &[SpeechInterval],
        workdir: &Path,
    ) -> Result<(PathBuf, TimelineMap)> {
        let media_path = media_path.as_ref();

        if !media_path.exists() {
            return Err(anyhow!("Media file does not exist: {:?}", media_path));
        }
        if intervals.is_empty() {
            return Err(anyhow!("No speech intervals to extract"));
        }

        let map = TimelineMap::from_intervals(intervals, self.buffer_ms);

        // Cut one segment file per interval
        let mut segment_names = Vec::with_capacity(intervals.len());
        for (count, interval) in intervals.iter().enumerate() {
            if count % 10 == 0 {
                debug!("Extracting speech interval {}/{}", count + 1, intervals.len());
            }

            let segment_name = format!("seg_{:05}.wav", count);
            let segment_path = workdir.join(&segment_name);
            let start_arg = format_seconds(interval.start_ms);
            let end_arg = format_seconds(interval.end_ms);
            let rate_arg = SAMPLE_RATE_HZ.to_string();
            let args = [
                "-y",
                "-i", media_path.to_str().unwrap_or_default(),
                "-ss", &start_arg,
                "-to", &end_arg,
                "-vn",
                "-ac", "1",
                "-ar", &rate_arg,
                segment_path.to_str().unwrap_or_default(),
            ];
            Self::run_ffmpeg(&args, workdir).await?;
            segment_names.push(segment_name);
        }

        // One shared silence segment is enough, the buffer length is fixed
        let silence_name = "silence.wav".to_string();
        if self.buffer_ms > 0 {
            let silence_path = workdir.join(&silence_name);
            let source = format!("anullsrc=r={}:cl=mono", SAMPLE_RATE_HZ);
            let duration_arg = format_seconds(self.buffer_ms);
            let args = [
                "-y",
                "-f", "lavfi",
                "-i", &source,
                "-t", &duration_arg,
                silence_path.to_str().unwrap_or_default(),
            ];
            Self::run_ffmpeg(&args, workdir).await?;
        }

        // Concatenate with the concat demuxer
        let mut concat_list = String::new();
        for segment_name in &segment_names {
            concat_list.push_str(&format!("file '{}'\n", segment_name));
            if self.buffer_ms > 0 {
                concat_list.push_str(&format!("file '{}'\n", silence_name));
            }
        }
        let list_path = workdir.join("concat.txt");
        std::fs::write(&list_path, concat_list)
            .with_context(|| format!("Failed to write concat list: {}", list_path.display()))?;

        let trimmed_path = workdir.join("trimmed.wav");
        let args = [
            "-y",
            "-f", "concat",
            "-safe", "0",
            "-i", list_path.to_str().unwrap_or_default(),
            "-c", "copy",
            trimmed_path.to_str().unwrap_or_default(),
        ];
        Self::run_ffmpeg(&args, workdir).await?;

        debug!(
            "Extracted {} intervals into {:?} ({}ms trimmed stream)",
            intervals.len(),
            trimmed_path,
            map.trimmed_len_ms()
        );

        Ok((trimmed_path, map))
    }

    /// Run one ffmpeg command with a timeout, surfacing filtered stderr on failure
    async fn run_ffmpeg(args: &[&str], workdir: &Path) -> Result<()> {
        let ffmpeg_future = Command::new("ffmpeg")
            .args(args)
            .current_dir(workdir)
            .output();

        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| Self::map_spawn_error("ffmpeg", e))?
            },
            _ = tokio::time::sleep(FFMPEG_TIMEOUT) => {
                return Err(anyhow!("ffmpeg command timed out after 5 minutes"));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio extraction failed: {}", filtered);
            return Err(AudioError::ExtractionFailed(filtered).into());
        }

        Ok(())
    }

    /// Map a spawn failure to a missing-tool error when the binary is absent
    fn map_spawn_error(tool: &str, error: std::io::Error) -> anyhow::Error {
        if error.kind() == std::io::ErrorKind::NotFound {
            AudioError::MissingTool(tool.to_string()).into()
        } else {
            anyhow!("Failed to execute {} command: {}", tool, error)
        }
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Chapter",
            "    Chapter",
            "  Stream #",
            "      Metadata:",
            "        title",
            "        BPS",
            "        DURATION",
            "        NUMBER_OF",
            "        _STATISTICS",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

/// Milliseconds to an ffmpeg "S.mmm" seconds argument
fn format_seconds(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
