// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod timing;
mod subtitle_processor;
mod audio_extractor;
mod transcriber;
mod file_utils;
mod app_controller;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate and resynchronize subtitles (default command)
    #[command(alias = "resync")]
    Resync(ResyncArgs),

    /// Generate shell completions for resubs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ResyncArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Reference subtitle file (defaults to a sibling .srt next to the video)
    #[arg(value_name = "SUBTITLE_PATH")]
    subtitle_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name (e.g., 'tiny', 'small', 'large')
    #[arg(short, long)]
    model: Option<String>,

    /// Transcription language code (e.g., 'ja')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Initial prompt to bias the transcription
    #[arg(long)]
    initial_prompt: Option<String>,

    /// Disable the anchor alignment pass
    #[arg(long)]
    no_align: bool,

    /// Also write the restored-but-unaligned track
    #[arg(long)]
    save_unaligned: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// resubs - AI subtitle regeneration, resynchronized
///
/// Trims a video's audio down to the speech segments named by a reference
/// subtitle track, transcribes only those segments with whisper, and projects
/// the generated timing back onto the original timeline.
#[derive(Parser, Debug)]
#[command(name = "resubs")]
#[command(author = "resubs contributors")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered subtitle regeneration with timing resynchronization")]
#[command(long_about = "resubs regenerates subtitles with whisper and resynchronizes the timing.

EXAMPLES:
    resubs movie.mkv movie.srt                  # Resync using default config
    resubs -f movie.mkv movie.srt               # Force overwrite existing files
    resubs -m large -L ja movie.mkv movie.srt   # Use a specific model and language
    resubs --no-align movie.mkv movie.srt       # Skip the anchor alignment pass
    resubs /shows/                              # Process a directory (sibling .srt files)
    resubs completions bash > resubs.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Reference subtitle file (defaults to a sibling .srt next to the video)
    #[arg(value_name = "SUBTITLE_PATH")]
    subtitle_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name (e.g., 'tiny', 'small', 'large')
    #[arg(short, long)]
    model: Option<String>,

    /// Transcription language code (e.g., 'ja')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Initial prompt to bias the transcription
    #[arg(long)]
    initial_prompt: Option<String>,

    /// Disable the anchor alignment pass
    #[arg(long)]
    no_align: bool,

    /// Also write the restored-but-unaligned track
    #[arg(long)]
    save_unaligned: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\u{274c} ",
            Level::Warn => "\u{1f6a7} ",
            Level::Info => " ",
            Level::Debug => "\u{1f50d} ",
            Level::Trace => "\u{1f4cb} ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let emoji = Self::get_emoji_for_level(record.level());
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "resubs", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Resync(args)) => run_resync(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let resync_args = ResyncArgs {
                input_path,
                subtitle_path: cli.subtitle_path,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                language: cli.language,
                initial_prompt: cli.initial_prompt,
                no_align: cli.no_align,
                save_unaligned: cli.save_unaligned,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_resync(resync_args).await
        }
    }
}

async fn run_resync(options: ResyncArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(model) = &options.model {
            config.whisper.model = model.clone();
        }

        if let Some(language) = &options.language {
            config.whisper.language = Some(language.clone());
        }

        if let Some(initial_prompt) = &options.initial_prompt {
            config.whisper.initial_prompt = initial_prompt.clone();
        }

        if options.no_align {
            config.resync.alignment.enabled = false;
        }

        if options.save_unaligned {
            config.resync.save_unaligned = true;
        }

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(model) = &options.model {
            config.whisper.model = model.clone();
        }
        if let Some(language) = &options.language {
            config.whisper.language = Some(language.clone());
        }
        if let Some(initial_prompt) = &options.initial_prompt {
            config.whisper.initial_prompt = initial_prompt.clone();
        }
        if options.no_align {
            config.resync.alignment.enabled = false;
        }
        if options.save_unaligned {
            config.resync.save_unaligned = true;
        }
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file(s)
    if options.input_path.is_file() {
        // Process a single file; the reference subtitle is either explicit
        // or a sibling of the video
        let subtitle_path = match options.subtitle_path {
            Some(path) => path,
            None => file_utils::FileManager::find_matching_subtitle(&options.input_path)
                .ok_or_else(|| {
                    anyhow!(
                        "No reference subtitle found next to {:?}; pass SUBTITLE_PATH explicitly",
                        options.input_path
                    )
                })?,
        };

        let output_dir = options
            .input_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        controller
            .run(options.input_path.clone(), subtitle_path, output_dir, options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        // Process a directory
        if options.subtitle_path.is_some() {
            warn!("SUBTITLE_PATH is ignored when processing a directory");
        }
        controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

// Map a config log level onto the log crate's filter
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
