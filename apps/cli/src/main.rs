//! svelte-doc-llm: turn a Svelte documentation tree into an LLM-ready corpus.
//!
//! Writes one cleaned Markdown page per source document, an `llms.txt`
//! manifest and a `context-full.txt` bundle.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
