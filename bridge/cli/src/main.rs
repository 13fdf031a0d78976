//! muxbridge - command-line end of the editor/multiplexer bridge
//!
//! Emits OSC 51 frames on stdout for hosts that are not linked against the
//! core library: shell key bindings, scripts, and editors that evaluate their
//! statusline themselves and pipe it in as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Forward a navigation request to the multiplexer
//! muxbridge navigate left
//!
//! # Mirror one statusline document
//! echo '{"text":"NORMAL","spans":[{"start":0,"fg":16711680}]}' | muxbridge statusline
//!
//! # Mirror a stream of documents, one per line
//! my-editor --statusline-json | muxbridge mirror --debounce-ms 50
//!
//! # Drop the mirrored statusline
//! muxbridge clear
//!
//! # Verbose logging (stderr)
//! RUST_LOG=debug muxbridge mirror
//! ```

mod host;
mod mirror;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use muxbridge_core::{
    ansi, load_config_from_path, BridgeConfig, ConfigOverrides, Direction, NavigateOutcome,
    Navigator, OscWriter, ProtocolFrame, RenderedLine, StatuslineMode,
};
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};

use host::ShellGraph;

/// muxbridge - editor/multiplexer bridge over OSC 51
#[derive(Parser, Debug)]
#[command(name = "muxbridge")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "MUXBRIDGE_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Debounce window for statusline updates, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    debounce_ms: Option<u64>,

    /// Never mirror the statusline, whatever the configuration says
    #[arg(long, global = true)]
    no_statusline: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "MUXBRIDGE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forward a navigation request to the multiplexer
    Navigate {
        /// One of left, down, up, right
        direction: Direction,
    },

    /// Render and send one statusline document
    Statusline {
        /// Read the document from a file instead of stdin
        #[arg(short = 'f', long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Remove the mirrored statusline
    Clear,

    /// Mirror newline-delimited statusline documents from stdin
    Mirror,

    /// Print the effective configuration
    Config,
}

/// Initialize logging with the specified level
///
/// Logs go to stderr; stdout carries the escape sequences.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("muxbridge={level},muxbridge_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Load configuration and apply command-line overrides
fn resolve_config(args: &Args) -> Result<BridgeConfig> {
    let path = args
        .config
        .clone()
        .or_else(muxbridge_core::default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ms) = args.debounce_ms {
        overrides = overrides.with_debounce_ms(ms);
    }
    if args.no_statusline {
        overrides = overrides.with_statusline_mode(StatuslineMode::Never);
    }
    overrides
        .apply(&mut config)
        .context("Invalid command-line option")?;

    Ok(config)
}

async fn read_document(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read statusline document: {path:?}")),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read statusline document from stdin")?;
            Ok(buf)
        }
    }
}

fn navigate(config: &BridgeConfig, direction: Direction) -> Result<()> {
    let navigator = Navigator::new(config.navigation.clone(), OscWriter::stdout());
    match navigator.navigate(&mut ShellGraph, direction) {
        NavigateOutcome::ForwardFailed => bail!("Could not write navigate frame"),
        outcome => {
            debug!(%direction, ?outcome, "Navigation handled");
            Ok(())
        }
    }
}

async fn statusline(config: &BridgeConfig, file: Option<&PathBuf>) -> Result<()> {
    if config.statusline.mode == StatuslineMode::Never {
        info!("Statusline mirroring disabled, nothing sent");
        return Ok(());
    }

    let document = read_document(file).await?;
    let line = RenderedLine::from_json(&document).context("Invalid statusline document")?;
    OscWriter::stdout()
        .send(&ProtocolFrame::statusline(ansi::render(&line)))
        .context("Could not write statusline frame")?;
    Ok(())
}

fn clear() -> Result<()> {
    OscWriter::stdout()
        .send(&ProtocolFrame::statusline_clear())
        .context("Could not write clear frame")?;
    Ok(())
}

async fn mirror(config: BridgeConfig) -> Result<()> {
    if !config.statusline.should_enable() {
        info!(
            mode = %config.statusline.mode,
            detect_env = %config.statusline.detect_env,
            "Statusline mirroring not enabled for this environment"
        );
        return Ok(());
    }

    let input = BufReader::new(tokio::io::stdin());
    mirror::run(input, OscWriter::stdout(), config.statusline).await?;
    Ok(())
}

fn print_config(config: &BridgeConfig) {
    println!("source: {}", config.source());
    if let Some(path) = &config.config_file_path {
        println!("file: {}", path.display());
    }

    println!("[navigation]");
    println!("enabled = {}", config.navigation.enabled);
    for (direction, key) in config.navigation.bindings() {
        println!("{direction} = {key:?}");
    }

    let statusline = &config.statusline;
    println!("[statusline]");
    println!("mode = \"{}\"", statusline.mode);
    println!("detect_env = {:?}", statusline.detect_env);
    if let Some(template) = &statusline.template {
        println!("template = {template:?}");
    }
    println!("suppress_native = {}", statusline.suppress_native);
    println!("debounce_ms = {}", statusline.debounce.as_millis());
    println!("active = {}", statusline.should_enable());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);
    debug!(version = env!("CARGO_PKG_VERSION"), "muxbridge starting");

    let config = resolve_config(&args)?;
    debug!(source = %config.source(), "Configuration resolved");

    match args.command {
        Command::Navigate { direction } => navigate(&config, direction),
        Command::Statusline { ref file } => statusline(&config, file.as_ref()).await,
        Command::Clear => clear(),
        Command::Mirror => mirror(config).await,
        Command::Config => {
            print_config(&config);
            Ok(())
        }
    }
}
