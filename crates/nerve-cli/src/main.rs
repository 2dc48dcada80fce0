mod format;
mod repl;
mod server;
mod workspace;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use nerve_core::format_variations;
use nerve_store::SettingsStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rmcp::{ServiceExt, transport::stdio};

use crate::format::{item_lines, related_lines, session_header, summary_lines};
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(name = "nerve", about = "Taxonomic prompt classification over JSON dictionaries")]
struct Cli {
    /// Data directory holding dictionaries, settings and sessions
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a prompt and print a rendered summary
    Analyze {
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render phase-swept variations of a prompt
    Variations {
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Number of variations (defaults to the steps setting)
        #[arg(long)]
        steps: Option<usize>,
    },

    /// Classify a prompt into a new exploration session
    New {
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Session id (random if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the first unexplored items of a session
    Top {
        session: String,

        #[arg(short, default_value_t = 5)]
        n: usize,
    },

    /// Mark a variable explored and list related items
    Expand { session: String, variable: String },

    /// Mark one session item explored
    Explore { session: String, index: usize },

    /// Link two taxa from a prompt or a session
    Conjecture {
        prompt: Vec<String>,

        #[arg(long)]
        session: Option<String>,
    },

    /// Show a stored session
    Load { session: String },

    /// List stored sessions, newest first
    List,

    /// Show render settings
    Settings,

    /// Change a setting
    Set { key: String, value: String },

    /// Flip a boolean setting
    Toggle { key: String },

    /// Interactive session explorer on stdin/stdout
    Repl,

    /// Start MCP server on stdio transport
    Serve,
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir
        .clone()
        .or_else(|| std::env::var("NERVE_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(nerve_store::default_base_dir)
}

fn open_workspace(cli: &Cli) -> Result<Workspace> {
    Workspace::open(&data_dir(cli)).context("failed to open data directory")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve(&cli).await,
        Commands::Repl => cmd_repl(&cli),
        Commands::Analyze { prompt, json } => cmd_analyze(&cli, &prompt.join(" "), *json),
        Commands::Variations { prompt, steps } => cmd_variations(&cli, &prompt.join(" "), *steps),
        Commands::New { prompt, id } => cmd_new(&cli, &prompt.join(" "), id.as_deref()),
        Commands::Top { session, n } => cmd_top(&cli, session, *n),
        Commands::Expand { session, variable } => cmd_expand(&cli, session, variable),
        Commands::Explore { session, index } => cmd_explore(&cli, session, *index),
        Commands::Conjecture { prompt, session } => {
            cmd_conjecture(&cli, &prompt.join(" "), session.as_deref())
        }
        Commands::Load { session } => cmd_load(&cli, session),
        Commands::List => cmd_list(&cli),
        Commands::Settings => cmd_settings(&cli),
        Commands::Set { key, value } => cmd_set(&cli, key, value),
        Commands::Toggle { key } => cmd_toggle(&cli, key),
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let workspace = open_workspace(cli)?;
    tracing::info!(
        "starting MCP server over {} ({} dictionaries)",
        workspace.base().display(),
        workspace.dictionaries().len()
    );

    let service = server::NerveServer::new(workspace)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;

    tokio::select! {
        res = service.waiting() => {
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}

fn cmd_repl(cli: &Cli) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let mut repl = repl::Repl::new(&workspace, SmallRng::from_os_rng());
    let stdin = std::io::stdin();
    repl.run(stdin.lock(), std::io::stdout().lock())
        .context("REPL I/O failed")
}

fn cmd_analyze(cli: &Cli, prompt: &str, json: bool) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let analysis = workspace.analyze(prompt)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let mut rng = SmallRng::from_os_rng();
    println!("{}", workspace.summarize(&analysis, &mut rng)?);
    if cli.verbose {
        eprintln!(
            "--- fragments={}, taxa={}, dictionaries={} ---",
            analysis.fragments.len(),
            analysis.taxon_count(),
            workspace.dictionaries().len()
        );
    }
    Ok(())
}

fn cmd_variations(cli: &Cli, prompt: &str, steps: Option<usize>) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let analysis = workspace.analyze(prompt)?;
    let mut rng = SmallRng::from_os_rng();
    let variations = workspace.variations(&analysis, steps, &mut rng)?;
    println!("{}", format_variations(&analysis, &variations));
    Ok(())
}

fn cmd_new(cli: &Cli, prompt: &str, id: Option<&str>) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let session = workspace.new_session(prompt, id)?;
    println!("{}", session_header(&session));
    println!("{}", item_lines(&workspace.top(&session.id, 5)?));
    Ok(())
}

fn cmd_top(cli: &Cli, session: &str, n: usize) -> Result<()> {
    let workspace = open_workspace(cli)?;
    println!("{}", item_lines(&workspace.top(session, n)?));
    Ok(())
}

fn cmd_expand(cli: &Cli, session: &str, variable: &str) -> Result<()> {
    let workspace = open_workspace(cli)?;
    println!("{}", related_lines(&workspace.expand(session, variable)?));
    Ok(())
}

fn cmd_explore(cli: &Cli, session: &str, index: usize) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let item = workspace.explore(session, index)?;
    println!("explored [{index}] {}", item.taxon.variable);
    Ok(())
}

fn cmd_conjecture(cli: &Cli, prompt: &str, session: Option<&str>) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let text = match session {
        Some(id) => workspace.conjecture_for_session(id)?,
        None if !prompt.trim().is_empty() => workspace.conjecture_for_prompt(prompt)?,
        None => bail!("give a prompt or --session"),
    };
    println!("{text}");
    Ok(())
}

fn cmd_load(cli: &Cli, session: &str) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let loaded = workspace.load_session(session)?;
    println!("{}", session_header(&loaded));
    println!("{}", item_lines(&workspace.top(session, 5)?));
    Ok(())
}

fn cmd_list(cli: &Cli) -> Result<()> {
    let workspace = open_workspace(cli)?;
    println!("{}", summary_lines(&workspace.list_sessions()?));
    Ok(())
}

// Settings commands work without any dictionaries present.

fn cmd_settings(cli: &Cli) -> Result<()> {
    let settings = SettingsStore::new(&data_dir(cli))
        .load()
        .context("failed to load settings")?;
    println!("{}", settings.describe());
    Ok(())
}

fn cmd_set(cli: &Cli, key: &str, value: &str) -> Result<()> {
    SettingsStore::new(&data_dir(cli))
        .set(key, value)
        .with_context(|| format!("failed to set {key}"))?;
    println!("{key} updated");
    Ok(())
}

fn cmd_toggle(cli: &Cli, key: &str) -> Result<()> {
    let value = SettingsStore::new(&data_dir(cli))
        .toggle(key)
        .with_context(|| format!("failed to toggle {key}"))?;
    println!("{key} = {value}");
    Ok(())
}
