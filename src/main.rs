mod commands;
mod console;
mod desk;

use chime_channels::whisper::WhisperTranscriber;
use chime_core::{
    config::{self, shellexpand, Config},
    notice::Notice,
    traits::{AudioSink, Notifier, Transcriber},
};
use chime_parser::UtteranceParser;
use chime_scheduler::EVENT_CHANNEL_CAPACITY;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "chime",
    version,
    about = "Chime: set alarms by typing or speaking plain English"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive alarm desk.
    Start,
    /// Show how an utterance would be scheduled, as JSON.
    Parse {
        /// The utterance to parse.
        #[arg(trailing_var_arg = true)]
        utterance: Vec<String>,
    },
    /// Print the effective configuration.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg)?;

    match cli.command {
        Commands::Start => {
            let transcriber: Option<Arc<dyn Transcriber>> = if cfg.transcription.enabled {
                if cfg.transcription.resolved_api_key().is_none() {
                    anyhow::bail!(
                        "transcription is enabled but no api_key is set. \
                         Set it in config.toml or OPENAI_API_KEY env var."
                    );
                }
                Some(Arc::new(WhisperTranscriber::from_config(&cfg.transcription)?))
            } else {
                None
            };

            let audio: Arc<dyn AudioSink> = if cfg.audio.enabled {
                Arc::new(console::BellAudio::new(cfg.audio.bell_interval_secs))
            } else {
                Arc::new(console::SilentAudio)
            };
            let notifier: Arc<dyn Notifier> =
                Arc::new(console::ConsoleNotifier::new(&cfg.chime.name));

            let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
            let desk = desk::AlarmDesk::new(&cfg, event_tx, audio, notifier.clone(), transcriber);

            notifier.notify(&Notice::Info(format!(
                "{} is ready. Type /help for commands.",
                cfg.chime.name
            )));
            let lines = chime_channels::console::start();
            desk.run(lines, event_rx).await;
        }
        Commands::Parse { utterance } => {
            let utterance = utterance.join(" ");
            if utterance.trim().is_empty() {
                anyhow::bail!("no utterance provided. Usage: chime parse <utterance>");
            }
            let extraction = UtteranceParser::new(&cfg.parser).extract(&utterance);
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Commands::Status => print_status(&cli.config, &cfg),
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over `chime.log_level`.
///
/// The returned guard flushes the log file and must live until exit.
fn init_logging(cfg: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.chime.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr = fmt::layer().with_writer(std::io::stderr);
    if !cfg.chime.log_to_file {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    }

    let log_dir = format!("{}/logs", shellexpand(&cfg.chime.data_dir));
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::daily(&log_dir, "chime.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(Some(guard))
}

fn print_status(config_path: &str, cfg: &Config) {
    println!("{} Status\n", cfg.chime.name);
    println!("Config: {config_path}");
    println!("Data dir: {}", shellexpand(&cfg.chime.data_dir));
    println!(
        "Time selection: {}",
        cfg.parser.entity_selection.display_name()
    );
    println!("Default task: {}", cfg.parser.default_task);
    println!("Snooze: {} minutes", cfg.scheduler.snooze_minutes);
    println!(
        "Audio: {}",
        if cfg.audio.enabled {
            format!("bell every {}s", cfg.audio.bell_interval_secs)
        } else {
            "silent".to_string()
        }
    );
    let transcription = match (
        cfg.transcription.enabled,
        cfg.transcription.resolved_api_key(),
    ) {
        (false, _) => "disabled".to_string(),
        (true, Some(_)) => format!("{} ({})", cfg.transcription.model, cfg.transcription.base_url),
        (true, None) => "enabled, missing API key".to_string(),
    };
    println!("Transcription: {transcription}");
    println!("History file: {}", shellexpand(&cfg.history.export_path));
}
