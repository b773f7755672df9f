use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{debug, warn};
use tokio::process::Command;

use crate::app_config::WhisperConfig;
use crate::errors::TranscriptionError;
use crate::subtitle_processor::SubtitleCollection;

// @module: External speech-to-text invocation

/// Runs the external `whisper` CLI over a trimmed audio stream and picks up
/// the SRT it produces. The invocation is an opaque black box: no retries,
/// no repair, just a configurable timeout.
pub struct Transcriber {
    config: WhisperConfig,
}

impl Transcriber {
    /// Create a transcriber from whisper settings
    pub fn new(config: WhisperConfig) -> Self {
        Transcriber { config }
    }

    /// Transcribe an audio file, writing whisper's output into `workdir` and
    /// parsing the resulting SRT as the generated track (in trimmed-stream
    /// time).
    pub async fn transcribe(&self, audio_path: &Path, workdir: &Path) -> Result<SubtitleCollection> {
        if !audio_path.exists() {
            return Err(anyhow!("Audio file does not exist: {:?}", audio_path));
        }

        let threshold_arg = self.config.no_speech_threshold.to_string();
        let beam_arg = self.config.beam_size.to_string();
        let best_of_arg = self.config.best_of.to_string();

        let mut args: Vec<&str> = vec![
            audio_path.to_str().unwrap_or_default(),
            "--model", &self.config.model,
            "--output_format", "srt",
            "--output_dir", workdir.to_str().unwrap_or_default(),
            "--no_speech_threshold", &threshold_arg,
            "--beam_size", &beam_arg,
            "--best_of", &best_of_arg,
            "--verbose", "False",
        ];

        if let Some(language) = &self.config.language {
            args.push("--language");
            args.push(language);
        }
        if !self.config.initial_prompt.is_empty() {
            args.push("--initial_prompt");
            args.push(&self.config.initial_prompt);
        }

        debug!("Running whisper ({} model) on {:?}", self.config.model, audio_path);

        let whisper_future = Command::new("whisper").args(&args).output();

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| Self::map_spawn_error(e))?
            },
            _ = tokio::time::sleep(timeout) => {
                return Err(anyhow!(
                    "whisper command timed out after {} seconds",
                    self.config.timeout_secs
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::CommandFailed(stderr.trim().to_string()).into());
        }

        // Whisper names its output after the audio file stem
        let stem = audio_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let srt_path = workdir.join(format!("{}.srt", stem));

        if !srt_path.exists() {
            return Err(TranscriptionError::EmptyOutput(format!(
                "expected {} was not produced",
                srt_path.display()
            ))
            .into());
        }

        let content = std::fs::read_to_string(&srt_path)?;
        if content.trim().is_empty() {
            warn!("Transcription produced an empty track");
            return Err(TranscriptionError::EmptyOutput(format!(
                "{} contains no subtitle entries",
                srt_path.display()
            ))
            .into());
        }

        let language = self.config.language.clone().unwrap_or_else(|| "auto".to_string());
        let collection = SubtitleCollection::load_from_file(&srt_path, &language)?;
        debug!("Transcription produced {} lines", collection.entries.len());

        Ok(collection)
    }

    /// Map a spawn failure to a missing-tool error when the binary is absent
    fn map_spawn_error(error: std::io::Error) -> anyhow::Error {
        if error.kind() == std::io::ErrorKind::NotFound {
            TranscriptionError::MissingTool("whisper".to_string()).into()
        } else {
            anyhow!("Failed to execute whisper command: {}", error)
        }
    }
}
