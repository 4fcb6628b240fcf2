//! Syntra — dual-perspective analysis from the command line
//!
//! Usage:
//!   syntra "the relief valve keeps lifting | moral: nobody gets hurt"
//!   cat inputs.txt | syntra --json --stage-log ~/.syntra/stages.jsonl
//!
//! Each input runs one dialogue round: affective and analytical reads, a
//! cross-informed second pass, then one synthesized decision.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use syntra::render::{self, RenderOptions};
use syntra_engine::{
    ChannelStageLog, DialogueCoordinator, EngineConfig, FanoutStageLog, MemoryStageLog, StageSink,
};
use syntra_llm::{build_prose_prompt, AnthropicProvider, ProseDrafter, ProviderDrafter, DEFAULT_MODEL};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "syntra",
    version,
    about = "Affective and analytical reads of a text, reconciled into one decision"
)]
struct Cli {
    /// Text to analyze. Reads stdin line by line when omitted.
    text: Option<String>,

    /// Path to config file (TOML).
    #[arg(long, default_value = "~/.syntra/syntra.toml")]
    config: String,

    /// Dump default config as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Also write diagnostics to this file.
    #[arg(long)]
    log_file: Option<String>,

    /// Append every stage record to this JSONL file.
    #[arg(long)]
    stage_log: Option<String>,

    /// Print every stage record after each round.
    #[arg(long)]
    trace: bool,

    #[arg(long)]
    no_affective: bool,

    #[arg(long)]
    no_analytical: bool,

    #[arg(long)]
    no_synthesis: bool,

    /// One JSON object per round instead of text.
    #[arg(long)]
    json: bool,

    /// Ask the LLM for a prose version of each decision.
    #[arg(long)]
    draft: bool,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Model used for --draft.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", EngineConfig::default().to_toml());
        return Ok(());
    }

    let log_guard = init_tracing(cli.log_file.as_deref())?;

    let mut config = EngineConfig::load(&expand_tilde(&cli.config));
    apply_overrides(&mut config, &cli);
    let opts = RenderOptions::from(&config.output);
    let trace = config.output.trace;

    let mut fanout = FanoutStageLog::new();
    let memory = trace.then(|| Arc::new(MemoryStageLog::new()));
    if let Some(memory) = &memory {
        fanout = fanout.with(memory.clone());
    }
    let mut writer = None;
    if let Some(path) = config.logging.stage_log.clone() {
        match ChannelStageLog::spawn(&path).await {
            Ok((sink, handle)) => {
                fanout = fanout.with(Arc::new(sink));
                writer = Some(handle);
            }
            Err(e) => warn!("Stage log disabled: {}", e),
        }
    }
    let sink: Arc<dyn StageSink> = Arc::new(fanout);

    let drafter = if cli.draft { build_drafter(&cli) } else { None };
    let coordinator = DialogueCoordinator::new(config).with_sink(sink);
    let session = Session { coordinator, drafter, memory, opts, json: cli.json };

    let mut failures = 0usize;
    match cli.text.as_deref() {
        Some(text) => {
            if !session.run(text).await {
                failures += 1;
            }
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                if !session.run(&line).await {
                    failures += 1;
                }
            }
        }
    }

    // Dropping the coordinator closes the stage log channel.
    drop(session);
    if let Some(handle) = writer {
        if let Err(e) = handle.await {
            warn!("Stage log writer ended abnormally: {}", e);
        }
    }

    if failures > 0 {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

struct Session {
    coordinator: DialogueCoordinator,
    drafter: Option<ProviderDrafter>,
    memory: Option<Arc<MemoryStageLog>>,
    opts: RenderOptions,
    json: bool,
}

impl Session {
    /// Run and print one round. Returns false when the input was rejected.
    async fn run(&self, text: &str) -> bool {
        let outcome = match self.coordinator.run_round(text) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Round rejected: {}", e);
                eprintln!("{}", render::render_error(&e));
                return false;
            }
        };

        let draft = match &self.drafter {
            Some(drafter) => {
                let prompt = build_prose_prompt(&outcome.result, text);
                Some(match drafter.draft_prose(&prompt).await {
                    Ok(prose) => prose,
                    Err(e) => {
                        warn!("Draft failed, using decision text: {}", e);
                        outcome.result.decision_text.clone()
                    }
                })
            }
            None => None,
        };

        if self.json {
            println!("{}", render::render_json(&outcome, draft.as_deref()));
        } else {
            print!("{}", render::render_outcome(&outcome, draft.as_deref(), &self.opts));
        }

        if let Some(memory) = &self.memory {
            let records = memory.take();
            if self.json {
                for record in &records {
                    if let Ok(line) = serde_json::to_string(record) {
                        println!("{}", line);
                    }
                }
            } else {
                print!("{}", render::render_trace(&records));
            }
        }
        if !self.json {
            println!();
        }
        true
    }
}

fn apply_overrides(config: &mut EngineConfig, cli: &Cli) {
    if cli.no_affective {
        config.output.show_affective = false;
    }
    if cli.no_analytical {
        config.output.show_analytical = false;
    }
    if cli.no_synthesis {
        config.output.show_synthesis = false;
    }
    if cli.trace {
        config.output.trace = true;
    }
    let stage_log = match &cli.stage_log {
        Some(path) => Some(expand_tilde(path)),
        None => config
            .logging
            .stage_log
            .as_ref()
            .map(|p| expand_tilde(&p.to_string_lossy())),
    };
    config.logging.stage_log = stage_log;
}

fn build_drafter(cli: &Cli) -> Option<ProviderDrafter> {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
    match api_key {
        Some(key) => {
            info!("Drafting with {}", cli.model);
            let provider = Arc::new(AnthropicProvider::new(key));
            Some(ProviderDrafter::new(provider).with_model(cli.model.clone()))
        }
        None => {
            warn!("--draft needs ANTHROPIC_API_KEY or --api-key; showing decision text only");
            None
        }
    }
}

fn init_tracing(
    log_file: Option<&str>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let path = expand_tilde(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syntra=info,syntra_engine=info,syntra_llm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
