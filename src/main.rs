// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use assgrammarcheck::app_config::{self, Config};
use assgrammarcheck::app_controller::{Controller, Mode};
use assgrammarcheck::errors::AppError;

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
    /// Generate shell completions for assgrammarcheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// assgrammarcheck - grammar checker for .ass subtitles
///
/// Checks the dialogue lines of Advanced SubStation Alpha subtitles with
/// LanguageTool and reports the mistakes that are not artifacts of how
/// the subtitles are split into lines.
#[derive(Parser, Debug)]
#[command(name = "assgrammarcheck")]
#[command(version)]
#[command(about = "Grammar checker for .ass subtitles")]
#[command(long_about = "assgrammarcheck checks the dialogue of .ass subtitle files with LanguageTool.

EXAMPLES:
    assgrammarcheck -i episode01.ass                  # Report mistakes in one file
    assgrammarcheck -i ./subs                         # Check every .ass file in a folder
    assgrammarcheck -i ./subs -u                      # List unknown words (e.g. names)
    assgrammarcheck -i ep.ass -w Tanjiro Nezuko -s    # Ignore words, skip spelling
    assgrammarcheck -i ep.ass -r WHITESPACE_RULE      # Ignore a LanguageTool rule
    assgrammarcheck -i ep.ass --server-jar lt/languagetool-server.jar
    assgrammarcheck completions bash > assgrammarcheck.bash

NOTE:
    Report mode sorts the events of each file by start time and saves the file,
    so that reported line numbers match what your subtitle editor shows.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder or file input
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Alternative mode: retrieve list of unknown/misspelled words
    #[arg(short, long)]
    unknown_words: bool,

    /// LanguageTool language (e.g. en-US, en-GB, de-DE)
    #[arg(short, long)]
    language: Option<String>,

    /// Don't flag informal language as grammar mistakes
    #[arg(short = 'I', long)]
    ignore_informal: bool,

    /// Ignore spelling mistakes (e.g. in case you already spell-checked with Aegisub)
    #[arg(short = 's', long)]
    ignore_spelling: bool,

    /// List of words to exclude from any spell checks
    #[arg(short = 'w', long, num_args = 1..)]
    ignore_words: Vec<String>,

    /// File with one word per line to exclude from spell checks
    #[arg(long, value_name = "FILE")]
    ignore_words_file: Option<PathBuf>,

    /// List of rules to ignore (https://community.languagetool.org/rule/list?lang=en)
    #[arg(short = 'r', long, num_args = 1..)]
    ignore_rules: Vec<String>,

    /// List of rule issue types to ignore, e.g. typographical or style (https://languagetool.org/development/api/org/languagetool/rules/ITSIssueType.html)
    #[arg(short = 'c', long, num_args = 1..)]
    ignore_categories: Vec<String>,

    /// LanguageTool server URL
    #[arg(long, env = "LANGUAGETOOL_URL")]
    endpoint: Option<String>,

    /// Start a local LanguageTool server from this jar
    #[arg(long, value_name = "FILE")]
    server_jar: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
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
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "assgrammarcheck", &mut std::io::stdout());
        return Ok(());
    }

    run_check(cli).await
}

async fn run_check(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    let input = options.input.clone().ok_or_else(|| {
        anyhow!("--input is required when no subcommand is specified")
    })?;

    // A missing input is reported before anything else is set up
    if !input.exists() {
        return Err(AppError::Usage(format!(
            "Given input is not an existing file or folder: {:?}",
            input
        ))
        .into());
    }

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let mode = if options.unknown_words { Mode::UnknownWords } else { Mode::Report };
    debug!("Running in {:?} mode with language {}", mode, config.language);

    let controller = Controller::with_config(config)?
        .with_progress(!options.no_progress);

    let summary = controller.run(&input, mode).await?;
    info!(
        "Done! {} file(s) checked, {} mistake(s) reported",
        summary.files_processed, summary.mistakes
    );

    Ok(())
}

// @loads: Config file (if present) with CLI overrides applied
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else if options.config_path != "conf.json" {
        return Err(anyhow!("Config file not found: {}", options.config_path));
    } else {
        debug!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        config.engine.endpoint = endpoint.clone();
    }
    if let Some(server_jar) = &options.server_jar {
        config.engine.server_jar = Some(server_jar.clone());
    }
    if let Some(words_file) = &options.ignore_words_file {
        config.ignore.words_file = Some(words_file.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.ignore.informal |= options.ignore_informal;
    config.ignore.spelling |= options.ignore_spelling;
    config.ignore.words.extend(options.ignore_words.iter().cloned());
    config.ignore.rules.extend(options.ignore_rules.iter().cloned());
    config.ignore.categories.extend(options.ignore_categories.iter().cloned());

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
