// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use sublingo::app_config::{Config, LogLevel, TranslationProvider};
use sublingo::app_controller::AppController;
use sublingo::database::{DatabaseConnection, Repository};
use sublingo::file_utils::SubtitlePathScheme;
use sublingo::job_queue::{JobQueue, QueueOptions};
use sublingo::pipeline::{HttpFetcher, ProviderApiFactory, TranslationPipeline};
use sublingo::providers::gestdown::GestdownClient;
use sublingo::providers::opensubtitles::OpenSubtitlesClient;
use sublingo::providers::tmdb::TmdbClient;
use sublingo::providers::wyzie::{LanguageCodeWidth, WyzieClient};
use sublingo::source_resolver::SourceResolver;
use sublingo::translation::DiagnosticsWriter;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    GoogleFree,
    OpenAi,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::GoogleFree => TranslationProvider::GoogleFree,
            CliTranslationProvider::OpenAi => TranslationProvider::OpenAi,
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

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and translate subtitles for a media item (default command)
    #[command(alias = "resolve")]
    Resolve(ResolveArgs),

    /// Generate shell completions for sublingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Media reference: tt1234567 for movies, tt1234567:1:5 for episodes
    #[arg(value_name = "MEDIA_REF")]
    media_ref: String,

    /// Target language code (e.g. 'es', 'fre')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for the OpenAI-compatible provider
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the OpenAI-compatible provider
    #[arg(long, env = "SUBLINGO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Sublingo - subtitle sourcing and translation
///
/// Resolves a subtitle track for a media item from several third-party
/// sources, translating it into the target language when no native track
/// exists.
#[derive(Parser, Debug)]
#[command(name = "sublingo")]
#[command(version = "0.1.0")]
#[command(about = "Subtitle sourcing and translation tool")]
#[command(long_about = "Sublingo resolves subtitles for movies and series episodes across
several subtitle sources, translating them when the requested language
is not available natively.

EXAMPLES:
    sublingo tt0111161                       # Resolve subtitles for a movie
    sublingo tt0903747:1:5                   # Resolve for series s1e5
    sublingo -t es tt0111161                 # Target Spanish
    sublingo -p open-ai -m gpt-4o tt0111161  # Use an LLM provider
    sublingo completions bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Media reference: tt1234567 for movies, tt1234567:1:5 for episodes
    #[arg(value_name = "MEDIA_REF")]
    media_ref: Option<String>,

    /// Target language code (e.g. 'es', 'fre')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for the OpenAI-compatible provider
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the OpenAI-compatible provider
    #[arg(long, env = "SUBLINGO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
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
    // Initialize the logger once with info level by default.
    // The level is updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sublingo", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Resolve(args)) => run_resolve(args).await,
        None => {
            // Default behavior, top-level args double as the resolve command
            let media_ref = cli.media_ref.ok_or_else(|| {
                anyhow::anyhow!("MEDIA_REF is required when no subcommand is specified")
            })?;

            run_resolve(ResolveArgs {
                media_ref,
                target_language: cli.target_language,
                provider: cli.provider,
                model: cli.model,
                api_key: cli.api_key,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
            .await
        }
    }
}

async fn run_resolve(options: ResolveArgs) -> Result<()> {
    // Apply a command-line log level before anything else logs
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::from_file_or_default(&options.config_path)
        .context("Failed to load configuration")?;

    // Override config with CLI options if provided
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let repository = match &config.database_path {
        Some(path) => Repository::new(DatabaseConnection::new(path)?),
        None => Repository::new_default()?,
    };

    let timeout = Duration::from_secs(config.sources.request_timeout_secs);
    let resolver = SourceResolver::new(
        Arc::new(OpenSubtitlesClient::new(
            config.sources.opensubtitles_endpoint.clone(),
            timeout,
        )),
        Arc::new(WyzieClient::new(
            config.sources.wyzie_endpoint.clone(),
            timeout,
            LanguageCodeWidth::default(),
        )),
        Arc::new(GestdownClient::new(
            config.sources.gestdown_endpoint.clone(),
            timeout,
        )),
        Arc::new(TmdbClient::new(
            "https://api.themoviedb.org/3",
            config.sources.tmdb_api_key.clone(),
            timeout,
        )),
    );

    let pipeline = TranslationPipeline::new(
        Arc::new(HttpFetcher::new(timeout)),
        Arc::new(ProviderApiFactory {
            google_free_endpoint: config.translation.google_free_endpoint.clone(),
        }),
        repository.clone(),
        SubtitlePathScheme::new(&config.subtitles_root),
        Arc::new(DiagnosticsWriter::new(&config.debug_dir)),
    );

    let queue = Arc::new(JobQueue::start(Arc::new(pipeline), QueueOptions::default()));
    let controller = AppController::new(config, resolver, repository, queue.clone());

    let answer = controller.handle_subtitle_request(&options.media_ref).await?;
    println!("{} ({})", answer.url, answer.language);

    // Wait for any queued translation before exiting
    drop(controller);
    if let Ok(queue) = Arc::try_unwrap(queue) {
        info!("Waiting for queued translation work to finish");
        queue.shutdown().await;
    }

    Ok(())
}
