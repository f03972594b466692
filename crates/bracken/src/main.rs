mod check;

use std::process::ExitCode;

use anyhow::{Context, bail};
use bracken_ast::{BracketCache, DebugTree};
use bracken_errors::{Renderer, Severity};
use bracken_parse::{BracketTable, parse};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Bracket pair trees for text files")]
struct Options {
    #[command(subcommand)]
    command: Command,

    /// Bracket pair to use instead of `()`, `[]` and `{}`; may be repeated.
    #[arg(long, global = true, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    pair: Vec<String>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the bracket pair tree of a file.
    Tree { path: Utf8PathBuf },
    /// Reports unexpected closing brackets and unclosed opening brackets.
    Check { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    let options = Options::parse();
    init_logging(options.verbose);

    let table = bracket_table(&options.pair)?;
    match &options.command {
        Command::Tree { path } => {
            let text = read(path)?;
            let tree = parse(&text, &table, &mut BracketCache::new());
            print!("{}", DebugTree(&tree));
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path } => {
            let text = read(path)?;
            let tree = parse(&text, &table, &mut BracketCache::new());
            let diagnostics = check::check(&text, &tree);

            let renderer = Renderer::styled();
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }

            let errors = diagnostics.iter().filter(|d| d.severity() == Severity::Error).count();
            tracing::debug!(%path, errors, warnings = diagnostics.len() - errors, "checked file");

            Ok(if errors == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn bracket_table(pairs: &[String]) -> anyhow::Result<BracketTable> {
    if pairs.is_empty() {
        return Ok(BracketTable::default());
    }
    if pairs.iter().any(String::is_empty) {
        bail!("bracket texts must not be empty");
    }

    Ok(BracketTable::new(pairs.chunks_exact(2).map(|pair| (pair[0].as_str(), pair[1].as_str()))))
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}
