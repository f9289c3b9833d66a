use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use json_doc_path::{JsonFile, Kind, WriteOptions};
use tracing::info;

/// Read and edit JSON files by path, e.g. `x.books[1].author`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Write documents without indentation.
    #[arg(long, global = true)]
    compact: bool,

    /// End written documents with a newline.
    #[arg(long, global = true)]
    newline: bool,

    /// Log file operations to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the value at a path. Strings are printed without quotes.
    Get { file: PathBuf, path: String },
    /// Change the value of an existing key to a string.
    Set {
        file: PathBuf,
        path: String,
        value: String,
    },
    /// Append a JSON fragment to the array at a path.
    Add {
        file: PathBuf,
        path: String,
        json: String,
    },
    /// Print the whole document, compact with `--compact`.
    Show { file: PathBuf },
}

impl Cli {
    fn write_options(&self) -> WriteOptions {
        let options = if self.compact {
            WriteOptions::compact()
        } else {
            WriteOptions::default()
        };
        options.with_trailing_newline(self.newline)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.write_options();
    match &cli.command {
        Command::Get { file, path } => {
            let file = open(file, options)?;
            let node = file.get_node(path)?;
            match node.kind() {
                Kind::String => println!("{}", node.as_str()?),
                _ => println!("{node}"),
            }
        }
        Command::Set { file, path, value } => {
            let mut file = open(file, options)?;
            file.set_string(path, value)?;
            info!(path = %path, "value set");
        }
        Command::Add { file, path, json } => {
            let mut file = open(file, options)?;
            file.add_json(path, json.as_bytes())?;
            info!(path = %path, "JSON data added");
        }
        Command::Show { file } => {
            let file = open(file, options)?;
            println!("{}", String::from_utf8_lossy(&file.encode()?));
        }
    }
    Ok(())
}

fn open(file: &Path, options: WriteOptions) -> Result<JsonFile> {
    JsonFile::open_with(file, options)
        .with_context(|| format!("failed to open {}", file.display()))
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
