// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::sources::SubtitleSource;
use app_controller::Controller;

mod acquisition;
mod app_config;
mod app_controller;
mod errors;
mod fetch;
mod file_utils;
mod language_utils;
mod request;
mod retry;
mod sources;
mod srt_codec;
mod subtitle_cache;

/// CLI Wrapper for SubtitleSource to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleSource {
    MySubs,
    TvSubtitles,
    OpenSubtitles,
}

impl From<CliSubtitleSource> for SubtitleSource {
    fn from(cli_source: CliSubtitleSource) -> Self {
        match cli_source {
            CliSubtitleSource::MySubs => SubtitleSource::MySubs,
            CliSubtitleSource::TvSubtitles => SubtitleSource::TvSubtitles,
            CliSubtitleSource::OpenSubtitles => SubtitleSource::OpenSubtitles,
        }
    }
}

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Acquire subtitles for a title (default command)
    #[command(alias = "get")]
    Fetch(FetchArgs),

    /// Parse local .srt files and optionally re-emit them normalized
    Parse(ParseArgs),

    /// Generate shell completions for subseek
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FetchArgs {
    /// Title to look up (e.g. "The Matrix")
    #[arg(value_name = "TITLE", required_unless_present = "url")]
    title: Option<String>,

    /// Release year, narrows the candidate URLs
    #[arg(short, long)]
    year: Option<u16>,

    /// Language code(s) to acquire (e.g. 'en', 'es', 'fr'); repeatable
    #[arg(short = 'l', long = "language")]
    languages: Vec<String>,

    /// Subtitle source to build candidate URLs against
    #[arg(short, long, value_enum)]
    source: Option<CliSubtitleSource>,

    /// IMDb identifier (e.g. 'tt0133093') for id-keyed candidates
    #[arg(long)]
    imdb_id: Option<String>,

    /// Fetch this exact URL instead of building candidates from a title
    #[arg(short, long)]
    url: Option<String>,

    /// Directory the acquired .srt files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Disable the in-memory subtitle cache for this run
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// .srt file or directory to parse
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Re-emit each parsed file as canonical SRT ({stem}.normalized.srt)
    #[arg(short, long)]
    normalize: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subseek - SubRip subtitle finder
///
/// Builds heuristic download URLs for a title per subtitle source, fetches
/// them (direct first, then through configured relays), and writes the first
/// payload that parses as SubRip.
#[derive(Parser, Debug)]
#[command(name = "subseek")]
#[command(version = "0.1.0")]
#[command(about = "SubRip subtitle acquisition tool")]
#[command(long_about = "subseek looks up subtitles for a title by probing a small set of
heuristic URLs per source, falling back through configured relay endpoints,
and keeps the first response that validates and parses as SubRip.

EXAMPLES:
    subseek \"The Matrix\"                        # Fetch using default config
    subseek -y 1999 -l en -l fr \"The Matrix\"    # Year hint, two languages
    subseek -s open-subtitles --imdb-id tt0133093 \"The Matrix\"
    subseek -u https://example.com/matrix.srt    # Fetch one exact URL
    subseek parse -n season1/                    # Normalize a directory of .srt
    subseek completions bash > subseek.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.

SUPPORTED SOURCES:
    my-subs        - my-subs.co direct SRT files (default)
    tv-subtitles   - tvsubtitles.net direct SRT files
    open-subtitles - opensubtitles.org direct SRT files")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Title to look up (e.g. "The Matrix")
    #[arg(value_name = "TITLE")]
    title: Option<String>,

    /// Release year, narrows the candidate URLs
    #[arg(short, long)]
    year: Option<u16>,

    /// Language code(s) to acquire (e.g. 'en', 'es', 'fr'); repeatable
    #[arg(short = 'l', long = "language")]
    languages: Vec<String>,

    /// Subtitle source to build candidate URLs against
    #[arg(short, long, value_enum)]
    source: Option<CliSubtitleSource>,

    /// IMDb identifier (e.g. 'tt0133093') for id-keyed candidates
    #[arg(long)]
    imdb_id: Option<String>,

    /// Fetch this exact URL instead of building candidates from a title
    #[arg(short, long)]
    url: Option<String>,

    /// Directory the acquired .srt files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Disable the in-memory subtitle cache for this run
    #[arg(long)]
    no_cache: bool,
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

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
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
            generate(shell, &mut cmd, "subseek", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Parse(args)) => run_parse(args).await,
        Some(Commands::Fetch(args)) => run_fetch(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            if cli.title.is_none() && cli.url.is_none() {
                return Err(anyhow!(
                    "TITLE or --url is required when no subcommand is specified"
                ));
            }

            let fetch_args = FetchArgs {
                title: cli.title,
                year: cli.year,
                languages: cli.languages,
                source: cli.source,
                imdb_id: cli.imdb_id,
                url: cli.url,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                no_cache: cli.no_cache,
            };
            run_fetch(fetch_args).await
        }
    }
}

async fn run_fetch(options: FetchArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if !options.languages.is_empty() {
        config.languages = options.languages.clone();
    }

    if let Some(source) = &options.source {
        config.source = source.clone().into();
    }

    if options.no_cache {
        config.acquisition.cache_enabled = false;
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    if let Some(url) = &options.url {
        return controller
            .run_fetch_url(url, options.output_dir, options.force_overwrite)
            .await;
    }

    let title = options
        .title
        .as_deref()
        .ok_or_else(|| anyhow!("TITLE is required unless --url is given"))?;

    controller
        .run_fetch(
            title,
            options.year,
            options.imdb_id.as_deref(),
            options.output_dir,
            options.force_overwrite,
        )
        .await
}

async fn run_parse(options: ParseArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;
    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    controller
        .run_parse(options.input_path, options.normalize, options.force_overwrite)
        .await
}

/// Load the config file, creating a default one when it is missing, and
/// settle the effective log level (CLI flag wins over the config)
fn load_config(config_path: &str, cmd_log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = cmd_log_level {
        let config_level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level_filter(&config_level));
    }

    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(level) = cmd_log_level {
        config.log_level = level.clone().into();
    } else {
        // Log level comes from the config when the CLI did not set one
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}
