// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use llbp::app_config::{self, CompletionProvider, Config};
use llbp::app_controller::Controller;
use llbp::{providers, server};

/// CLI Wrapper for CompletionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliCompletionProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliCompletionProvider> for CompletionProvider {
    fn from(cli_provider: CliCompletionProvider) -> Self {
        match cli_provider {
            CliCompletionProvider::OpenAI => CompletionProvider::OpenAI,
            CliCompletionProvider::Anthropic => CompletionProvider::Anthropic,
            CliCompletionProvider::Ollama => CompletionProvider::Ollama,
            CliCompletionProvider::LMStudio => CompletionProvider::LMStudio,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service (default command)
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate briefings for a report file or every report in a directory
    Generate {
        /// Report file (.docx, .txt) or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Directory to write briefings to (defaults to next to each report)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Convert already-generated briefing text into a .docx without calling the model
    Render {
        /// Text file holding the model output
        #[arg(value_name = "TEXT_FILE")]
        text_file: PathBuf,

        /// Output .docx path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for llbp
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// LLBP - Lessons Learned and Best Practices briefing generator
///
/// Turns incident and investigation reports into LLBP briefings using AI
/// providers (OpenAI, Anthropic, Ollama, LM Studio).
#[derive(Parser, Debug)]
#[command(name = "llbp")]
#[command(version)]
#[command(about = "AI-generated Lessons Learned and Best Practices briefings")]
#[command(long_about = "LLBP turns incident reports into Word briefings using AI providers.

EXAMPLES:
    llbp                                      # Serve on the configured port
    llbp serve --port 8080                    # Serve on another port
    llbp generate report.docx                 # Write report.llbp.docx next to the report
    llbp generate -f /reports/                # Process a directory, overwriting old briefings
    llbp -p ollama -m llama3 generate r.txt   # Use a specific provider and model
    llbp render briefing.md -o out.docx       # Convert model output without calling the model
    llbp completions bash > llbp.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Variables from a .env file are loaded at start-up.

ENVIRONMENT:
    PORT                 Port for the HTTP service
    OPENAI_API_KEY       OpenAI API key (when none is set in the config)
    ANTHROPIC_API_KEY    Anthropic API key (when none is set in the config)
    LLBP_ALLOWED_ORIGIN  Origin allowed to call the service (CORS)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Completion provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliCompletionProvider>,

    /// Model name to use for completion
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
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
    // Initialize the logger once with trace; the effective level is set
    // through log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "llbp", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to load .env file: {}", e);
        }
    }

    let config = load_config(&cli)?;

    match cli.command {
        None => run_serve(config, None).await,
        Some(Commands::Serve { port }) => run_serve(config, port).await,
        Some(Commands::Generate { input_path, output_dir, force_overwrite }) => {
            run_generate(config, input_path, output_dir, force_overwrite).await
        }
        Some(Commands::Render { text_file, output }) => {
            let controller = Controller::with_config(&config, providers::from_config(&config.completion)?);
            controller.render(&text_file, output.as_deref())?;
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

// @loads: Config file, .env and command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", cli.config_path);
    }

    config.apply_env_overrides();

    if let Some(provider) = &cli.provider {
        config.completion.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.completion.set_active_model(model);
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

async fn run_serve(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    config.validate().context("Configuration validation failed")?;

    let provider = providers::from_config(&config.completion)?;
    info!(
        "Using {} with model {}",
        config.completion.provider.display_name(),
        config.completion.get_model()
    );

    server::serve(&config, provider).await
}

async fn run_generate(config: Config, input_path: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
    config.validate().context("Configuration validation failed")?;

    let provider = providers::from_config(&config.completion)?;
    let controller = Controller::with_config(&config, provider);
    controller.check_connection().await?;

    if input_path.is_file() {
        controller.run(&input_path, output_dir.as_deref(), force_overwrite).await?;
    } else if input_path.is_dir() {
        let summary = controller.run_folder(&input_path, output_dir.as_deref(), force_overwrite).await?;
        if summary.errors > 0 {
            return Err(anyhow!("{} report(s) failed", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
