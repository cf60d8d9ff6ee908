//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use docllm_core::{ConvertOptions, ConvertReport, ProgressReporter, convert};
use docllm_discovery::Targets;
use docllm_shared::{CONFIG_FILE_NAME, LlmConfig, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// svelte-doc-llm: convert Svelte documentation to an LLM-friendly format.
#[derive(Parser)]
#[command(
    name = "svelte-doc-llm",
    version,
    about = "Convert Svelte markdown documentation into an LLM-friendly corpus.",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file.
    #[arg(long, env = "SVELTE_DOC_LLM_CONFIG", default_value = CONFIG_FILE_NAME, global = true)]
    pub config: PathBuf,

    /// Conversion flags when no subcommand is given.
    #[command(flatten)]
    pub convert: ConvertArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Flags narrowing or adjusting a conversion run.
#[derive(Args, Debug, Default)]
pub(crate) struct ConvertArgs {
    /// Convert only these directories (relative to src_dir).
    #[arg(short, long, num_args = 1..)]
    pub directories: Vec<String>,

    /// Convert only these files (relative to src_dir, extension optional).
    #[arg(short, long, num_args = 1..)]
    pub files: Vec<String>,

    /// Do not clean the output directory before converting.
    #[arg(long)]
    pub skip_clean: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert the documentation tree (default).
    Convert(ConvertArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags and the config's `debug` switch.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let debug = config_debug(&cli.config);
    let filter = match (cli.verbose, debug) {
        (0, false) => "svelte_doc_llm=info,docllm=info",
        (0 | 1, _) => "svelte_doc_llm=debug,docllm=debug",
        _ => "svelte_doc_llm=trace,docllm=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

/// `debug` from the config file; an unreadable file counts as off and is
/// reported properly once the command loads it.
fn config_debug(path: &Path) -> bool {
    load_config(path).map(|c| c.debug).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => cmd_convert(&cli.config, cli.convert).await,
        Some(Command::Convert(args)) => cmd_convert(&cli.config, args).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(&cli.config),
            ConfigAction::Show => cmd_config_show(&cli.config),
        },
    }
}

async fn cmd_convert(config_path: &Path, args: ConvertArgs) -> Result<()> {
    let config: LlmConfig = load_config(config_path)
        .wrap_err_with(|| format!("failed to load {}", config_path.display()))?;
    let cwd = std::env::current_dir().wrap_err("cannot determine working directory")?;

    let opts = ConvertOptions {
        targets: Targets {
            directories: args.directories,
            files: args.files,
        },
        skip_clean: args.skip_clean,
    };

    info!(config = %config_path.display(), "loaded configuration");

    let reporter = CliProgress::new();
    let report = convert(&config, &cwd, &opts, &reporter).await?;

    print_summary(&report);

    if report.processed.is_empty() && !report.failed.is_empty() {
        return Err(eyre!("all {} document(s) failed to convert", report.failed.len()));
    }
    Ok(())
}

fn print_summary(report: &ConvertReport) {
    println!();
    if report.processed.is_empty() {
        println!("  No files processed. Skipped llms.txt and context-full.txt.");
    } else {
        println!("  Processed {} file(s){}", report.processed.len(), if report.selective { " in selective mode" } else { "" });
        println!("  Output:   {}", report.out_dir.display());
    }

    if let Some(artifacts) = &report.artifacts {
        println!("  Manifest: {}", artifacts.manifest_path.display());
        println!("  Bundle:   {}", artifacts.bundle_path.display());
        if report.selective {
            println!("  Note: llms.txt and context-full.txt contain only the processed files");
        }
        if !artifacts.bundle_skipped.is_empty() {
            println!("  Warning: {} file(s) missing from the bundle:", artifacts.bundle_skipped.len());
            for path in &artifacts.bundle_skipped {
                println!("    - {path}");
            }
        }
    }

    if !report.failed.is_empty() {
        println!("  Failed:   {}", report.failed.len());
        for failed in &report.failed {
            println!("    - {}: {}", failed.path.display(), failed.error);
        }
    }

    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_done(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting [{current}/{total}] {path}"));
    }

    fn done(&self, _report: &ConvertReport) {
        self.spinner.finish_and_clear();
    }
}

// An aborted run never reaches `done`; clear the spinner on the way out.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init(path: &Path) -> Result<()> {
    let written = init_config(path)?;
    println!("Config initialized at: {}", written.display());
    println!("Edit the placeholder base_url, repo and pkg_name before converting.");
    Ok(())
}

fn cmd_config_show(path: &Path) -> Result<()> {
    let config: LlmConfig = load_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
