//! query-launch - run queries from the terminal with DROP confirmation.

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use cli::{Cli, Command, ConfirmSetting, RunArgs, SuggestArgs};
use query_launch::autocomplete::{catalog_channel, AutocompleteAggregator};
use query_launch::config::Config;
use query_launch::editor::{BufferEditor, EditorHost};
use query_launch::engine::{HttpEngineClient, MockEngineClient, QueryEngine};
use query_launch::error::LaunchError;
use query_launch::logging::{self, LogTarget};
use query_launch::notify::LogNotifier;
use query_launch::persistence::{self, FileStore, PersistencePort};
use query_launch::query::{ExecutionController, LaunchOutcome};
use query_launch::report::{RecordingResultSink, Reporter, Settled};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    logging::init(if cli.log_file {
        LogTarget::default_file()
    } else {
        LogTarget::Stderr
    });

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<LaunchError>() {
                Some(launch) => error!("{}: {}", launch.category(), launch),
                None => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.engine.apply_env_overrides();

    let state_path = resolve_state_path(&cli, &config)?;
    let store = Arc::new(FileStore::open(&state_path)?);

    match cli.command {
        Command::Run(args) => run_query(args, &config, store).await,
        Command::Suggest(args) => suggest(args, &config, store).await,
        Command::DropConfirm { mode } => {
            persistence::set_confirmation_disabled(store.as_ref(), mode == ConfirmSetting::Off)?;
            println!(
                "DROP confirmation {}",
                match mode {
                    ConfirmSetting::On => "enabled",
                    ConfirmSetting::Off => "disabled",
                }
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// State path precedence: CLI flag, config file, platform default.
fn resolve_state_path(cli: &Cli, config: &Config) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.state.clone().or_else(|| config.state_path.clone()) {
        return Ok(path);
    }
    Ok(FileStore::default_path()?)
}

fn build_engine(args: &RunArgs, config: &Config) -> anyhow::Result<Arc<dyn QueryEngine>> {
    if args.mock_engine {
        info!("Using mock engine");
        return Ok(Arc::new(MockEngineClient::new()));
    }

    let mut engine = config.engine.clone();
    if let Some(url) = &args.engine_url {
        engine.url = url.clone();
    }
    engine.validate()?;
    info!("Engine: {}", engine.display_string());
    Ok(Arc::new(HttpEngineClient::from_config(&engine)?))
}

async fn run_query(
    args: RunArgs,
    config: &Config,
    store: Arc<FileStore>,
) -> anyhow::Result<ExitCode> {
    let editor = Arc::new(BufferEditor::new(""));
    let results = Arc::new(RecordingResultSink::new());
    let reporter = Reporter::new(Arc::new(LogNotifier), results.clone())
        .with_transient_timeout(config.notifications.transient_timeout());
    let controller = ExecutionController::new(
        editor.clone(),
        store.clone(),
        build_engine(&args, config)?,
        reporter,
    );

    let text = match (&args.query, &args.file) {
        (Some(query), _) => Some(query.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read query file {}", path.display()))?,
        ),
        (None, None) => None,
    };
    match text {
        Some(text) => {
            editor.set_value(&text);
            controller.on_change(&text)?;
        }
        None => {
            controller.on_load()?;
        }
    }

    if let Some(range) = args.selection.clone() {
        editor.select(range);
    }

    let mut outcome = controller.launch().await;

    if let LaunchOutcome::AwaitingConfirmation { query } = outcome.clone() {
        eprintln!("You really want to execute a DROP command?\n\n  {query}\n");
        match &args.confirm {
            Some(phrase) => {
                controller.set_typed_phrase(phrase);
                outcome = controller.confirm().await;
                if outcome == LaunchOutcome::PhraseMismatch {
                    controller.cancel();
                }
            }
            None => {
                controller.cancel();
                warn!("Not confirmed; pass --confirm DROP to run it");
            }
        }
    }

    let code = match outcome {
        LaunchOutcome::Completed(Settled::Data { statistics }) => {
            eprintln!("{statistics}");
            if let Some(payload) = results.received().last().filter(|p| !p.is_empty()) {
                println!("{}", serde_json::to_string_pretty(&payload.to_json())?);
            }
            ExitCode::SUCCESS
        }
        LaunchOutcome::Completed(Settled::Empty) => ExitCode::SUCCESS,
        LaunchOutcome::Completed(Settled::Failed { message }) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        LaunchOutcome::AwaitingConfirmation { .. } | LaunchOutcome::PhraseMismatch => {
            ExitCode::from(2)
        }
        LaunchOutcome::Busy | LaunchOutcome::NoPendingConfirmation => ExitCode::FAILURE,
    };
    Ok(code)
}

async fn suggest(
    args: SuggestArgs,
    config: &Config,
    store: Arc<FileStore>,
) -> anyhow::Result<ExitCode> {
    let editor = Arc::new(BufferEditor::new(""));

    // No schema browser runs alongside the CLI, so nothing will publish.
    let (publisher, receiver) = catalog_channel();
    drop(publisher);
    let set = AutocompleteAggregator::new(editor.clone(), store.clone())
        .with_settle_timeout(config.autocomplete.settle_timeout())
        .run(receiver)
        .await;
    info!("{} suggestions available", set.len());

    let prefix = args.prefix.unwrap_or_default().to_lowercase();
    for entry in editor.completions(0, &prefix) {
        if entry.name.to_lowercase().starts_with(&prefix) {
            println!("{}", entry.name);
        }
    }

    if store.get(persistence::AUTOCOMPLETE_COLLECTION_KEY)?.is_none() {
        warn!("No autocomplete catalog stored at {}", store.path().display());
    }
    Ok(ExitCode::SUCCESS)
}
