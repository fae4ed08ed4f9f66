//! CLI entrypoint for workbench
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use workbench_application::{
    AgentProgressNotifier, ConversationLogger, NoAgentProgress, NoConversationLogger,
    RunAgentInput, RunAgentUseCase,
};
use workbench_domain::FailureKind;
use workbench_infrastructure::{
    ConfigLoader, FileConfig, GeminiLlmGateway, JsonSchemaToolConverter, JsonlConversationLogger,
    LocalToolExecutor, SandboxRoot, ScriptConfig,
};
use workbench_presentation::{AgentProgressReporter, Cli, ConsoleFormatter, SimpleAgentProgress};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // RUST_LOG wins over -v when set
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for source in ConfigLoader::config_sources(cli.config.as_deref()) {
            let mark = if source.found { "FOUND" } else { "     " };
            println!("  [{}] {:<8} {}", mark, format!("{}:", source.label), source.location);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(task) = cli.task.clone() else {
        bail!("A task is required");
    };

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    info!("Starting workbench");

    // === Dependency Injection ===
    let root_path = match &config.sandbox.root {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let root = SandboxRoot::new(&root_path)?;
    info!(sandbox = %root, "Sandbox ready");

    let tool_executor = Arc::new(
        LocalToolExecutor::new(root)
            .with_max_read_chars(config.sandbox.max_read_chars)
            .with_script_config(script_config(&config)),
    );
    let gateway = Arc::new(GeminiLlmGateway::from_config(&config.providers.gemini)?);

    let cancellation = CancellationToken::new();
    let interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let progress: Arc<dyn AgentProgressNotifier> = if cli.quiet {
        Arc::new(NoAgentProgress)
    } else if std::io::stdout().is_terminal() {
        if cli.verbose > 0 {
            Arc::new(AgentProgressReporter::verbose())
        } else {
            Arc::new(AgentProgressReporter::new())
        }
    } else {
        Arc::new(SimpleAgentProgress::new(cli.verbose > 0))
    };

    let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log
    {
        Some(path) => match JsonlConversationLogger::new(path) {
            Ok(logger) => {
                info!(path = %logger.path().display(), "Writing conversation transcript");
                Arc::new(logger)
            }
            Err(e) => {
                warn!("Could not create conversation log {}: {}", path.display(), e);
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    let use_case = RunAgentUseCase::new(gateway, tool_executor, Arc::new(JsonSchemaToolConverter))
        .with_progress(progress)
        .with_conversation_logger(conversation_logger)
        .with_cancellation(cancellation);

    let input = RunAgentInput::new(task, config.agent.model.clone())
        .with_system_prompt(config.agent.system_prompt())
        .with_params(config.agent.execution_params());

    match use_case.execute(input).await {
        Ok(output) => {
            print!("{}", ConsoleFormatter::render(&output, cli.output));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            Ok(ExitCode::from(exit_code(e.failure_kind())))
        }
    }
}

/// Command-line flags take precedence over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(sandbox) = &cli.sandbox {
        config.sandbox.root = Some(sandbox.clone());
    }
    if let Some(model) = &cli.model {
        config.agent.model = model.parse().unwrap_or_else(|never| match never {});
    }
    if let Some(max_turns) = cli.max_turns {
        config.agent.max_turns = max_turns;
    }
    if cli.parallel_tools {
        config.agent.parallel_tools = true;
    }
    if let Some(path) = &cli.conversation_log {
        config.logging.conversation_log = Some(path.clone());
    }
}

/// Scripts never see the decision engine's API key.
fn script_config(config: &FileConfig) -> ScriptConfig {
    config
        .sandbox
        .script
        .to_script_config()
        .with_hidden_env([config.providers.gemini.api_key_env.clone()])
}

fn exit_code(kind: FailureKind) -> u8 {
    match kind {
        FailureKind::UpstreamFailure | FailureKind::Internal => 1,
        FailureKind::BudgetExhausted => 2,
        FailureKind::Cancelled => 130,
    }
}
