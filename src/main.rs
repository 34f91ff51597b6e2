mod api;
mod config;
mod dictionary;
mod error;
mod history;
mod language;
mod provider;
mod rate_limit;
mod repl;
mod resolver;
mod session;
mod settings;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::api::{build_router, AppState};
use crate::config::AppConfig;
use crate::dictionary::OfflineDictionary;
use crate::language::LanguageTag;
use crate::provider::build_provider;
use crate::provider::proxy::HttpProvider;
use crate::repl::{ConsoleSpeech, ReplState};
use crate::resolver::TranslationResolver;
use crate::session::TranslationSession;
use crate::settings::{Settings, SettingsUpdate};

#[derive(Debug, Parser)]
#[command(
    name = "echoverse",
    version,
    about = "Phrase translation with an offline dictionary fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the translation proxy server (configured through environment variables).
    Serve,
    /// Translate one phrase and exit.
    Translate {
        #[command(flatten)]
        client: ClientArgs,
        /// Text to translate.
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Start an interactive session reading phrases from stdin.
    Session {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(Debug, Args)]
struct ClientArgs {
    /// Target language code, for example `es`.
    #[arg(long = "to", default_value = "es")]
    to: String,
    /// Base URL of the translation proxy.
    #[arg(long, env = "ECHOVERSE_SERVER", default_value = "http://localhost:5000")]
    server: String,
    /// Treat the network as unreachable.
    #[arg(long)]
    offline: bool,
    /// Skip the dictionary when the network is reachable.
    #[arg(long)]
    prefer_online: bool,
    /// Speak every accepted translation.
    #[arg(long)]
    auto_speak: bool,
    /// Speech rate in range [0.5, 2.0].
    #[arg(long, default_value_t = 1.0)]
    rate: f32,
    /// Provider request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echoverse=info,axum=info".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await?,
        Command::Translate { client, text } => {
            let mut session = build_session(&client)?;
            let record = session
                .translate(&text.join(" "), &client.to, !client.offline)
                .await?;
            println!("{}", record.output_text);
        }
        Command::Session { client } => {
            let language = LanguageTag::parse(&client.to)?;
            let mut session = build_session(&client)?;
            println!("{}", repl::HELP);
            let state = ReplState {
                language,
                network_reachable: !client.offline,
            };
            repl::run(
                &mut session,
                state,
                BufReader::new(tokio::io::stdin()),
                &mut std::io::stdout(),
            )
            .await?;
        }
    }
    Ok(())
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = AppConfig::from_env()?;
    let provider = build_provider(&cfg)?;
    let state = Arc::new(AppState::new(cfg.clone(), provider));

    let app = build_router(state);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        host = %cfg.host,
        port = cfg.port,
        model = %cfg.gemini_model,
        provider_configured = cfg.provider_configured(),
        rate_limit_per_minute = cfg.rate_limit_per_minute,
        "starting echoverse translation proxy"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

fn build_session(args: &ClientArgs) -> Result<TranslationSession, Box<dyn std::error::Error>> {
    let provider = HttpProvider::new(&args.server, Duration::from_secs(args.timeout_secs))?;
    let resolver = TranslationResolver::new(
        Arc::new(OfflineDictionary::builtin()),
        Arc::new(provider),
    );
    let dictionary = resolver.dictionary();
    if dictionary.is_empty() {
        warn!("offline dictionary is empty; offline translation will always fail");
    }
    info!(
        phrases = dictionary.len(),
        languages = ?dictionary.languages(),
        server = %args.server,
        "offline dictionary loaded"
    );

    let mut settings = Settings::default();
    settings.update(SettingsUpdate {
        offline_mode_preferred: Some(!args.prefer_online),
        auto_speak: Some(args.auto_speak),
        speech_rate: Some(args.rate),
    })?;

    Ok(TranslationSession::new(resolver, settings).with_speech(Box::new(ConsoleSpeech)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
