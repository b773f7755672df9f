use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::timing::AlignmentParams;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Resynchronization engine settings
    #[serde(default)]
    pub resync: ResyncConfig,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the timing resynchronization engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResyncConfig {
    /// Padding in milliseconds added around each merged speech interval so
    /// utterances are not clipped and sentence boundaries stay detectable
    #[serde(default = "default_padding_ms")]
    pub padding_ms: u64,

    /// Silence buffer in milliseconds appended after each extracted interval;
    /// 0 disables the buffer stage
    #[serde(default)]
    pub silence_buffer_ms: u64,

    /// Write the restored-but-unaligned track next to the final output
    #[serde(default)]
    pub save_unaligned: bool,

    /// Anchor alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            padding_ms: default_padding_ms(),
            silence_buffer_ms: 0,
            save_unaligned: false,
            alignment: AlignmentConfig::default(),
        }
    }
}

/// Anchor alignment configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignmentConfig {
    /// Whether the alignment pass runs at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Smallest tolerance attempted, in milliseconds
    #[serde(default = "default_min_offset_ms")]
    pub min_offset_ms: u64,

    /// Upper bound of the tolerance sweep (exclusive), in milliseconds
    #[serde(default = "default_max_offset_ms")]
    pub max_offset_ms: u64,

    /// Tolerance increment per pass, in milliseconds
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_offset_ms: default_min_offset_ms(),
            max_offset_ms: default_max_offset_ms(),
            step_ms: default_step_ms(),
        }
    }
}

impl AlignmentConfig {
    /// Sweep parameters for the timing engine
    pub fn params(&self) -> AlignmentParams {
        AlignmentParams {
            min_offset_ms: self.min_offset_ms,
            max_offset_ms: self.max_offset_ms,
            step_ms: self.step_ms,
        }
    }
}

/// Whisper CLI configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Model name (e.g., "tiny", "small", "large")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Language code passed to whisper (e.g., "ja"); None lets whisper detect
    #[serde(default)]
    pub language: Option<String>,

    /// Initial prompt to bias the decoder
    #[serde(default = "String::new")]
    pub initial_prompt: String,

    /// Segments with a no-speech probability above this are dropped
    #[serde(default = "default_no_speech_threshold")]
    pub no_speech_threshold: f32,

    /// Beam size for decoding
    #[serde(default = "default_beam_size")]
    pub beam_size: u32,

    /// Number of candidates when sampling
    #[serde(default = "default_best_of")]
    pub best_of: u32,

    /// Transcription timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: default_whisper_model(),
            language: None,
            initial_prompt: String::new(),
            no_speech_threshold: default_no_speech_threshold(),
            beam_size: default_beam_size(),
            best_of: default_best_of(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_padding_ms() -> u64 {
    200
}

fn default_min_offset_ms() -> u64 {
    5
}

fn default_max_offset_ms() -> u64 {
    4000
}

fn default_step_ms() -> u64 {
    20
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_no_speech_threshold() -> f32 {
    0.9
}

fn default_beam_size() -> u32 {
    5
}

fn default_best_of() -> u32 {
    5
}

fn default_whisper_timeout_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.whisper.model.trim().is_empty() {
            return Err(anyhow!("Whisper model name must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.whisper.no_speech_threshold) {
            return Err(anyhow!(
                "no_speech_threshold must lie in [0.0, 1.0], got {}",
                self.whisper.no_speech_threshold
            ));
        }

        let alignment = &self.resync.alignment;
        if alignment.enabled {
            if alignment.step_ms == 0 {
                return Err(anyhow!("Alignment step_ms must be greater than zero"));
            }
            if alignment.max_offset_ms < alignment.min_offset_ms {
                return Err(anyhow!(
                    "Alignment max_offset_ms ({}) must not be smaller than min_offset_ms ({})",
                    alignment.max_offset_ms,
                    alignment.min_offset_ms
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            resync: ResyncConfig::default(),
            whisper: WhisperConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
