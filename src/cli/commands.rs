use crate::generator::{generate, Destination, GeneratorOptions};
use crate::package::{unescape_html, write_to_dir};
use crate::runtime_config::RuntimeConfig;
use crate::schema::load_schema;
use crate::server::{GenerateService, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line interface of the entity code generator
#[derive(Parser, Debug)]
#[command(name = "entitygen", version)]
#[command(about = "Generate a CRUD web service from a schema document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the generated sources below an output root
    Generate {
        /// Schema document (YAML when the extension is .yaml or .yml, JSON otherwise)
        #[arg(short, long)]
        conf: PathBuf,

        /// Output root; `data/` below it is replaced on every run
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject column types that have no mapping
        #[arg(long, default_value_t = false)]
        strict_types: bool,
    },
    /// Print the generated sources to stdout
    Render {
        #[arg(short, long)]
        conf: PathBuf,

        /// Print a single artifact
        #[arg(long, value_enum)]
        only: Option<OnlyPart>,

        #[arg(long, default_value_t = false)]
        strict_types: bool,
    },
    /// Serve archives over HTTP
    Serve {
        /// Listen address (default: `ENTITYGEN_ADDR` or 0.0.0.0:9111)
        #[arg(short, long)]
        addr: Option<String>,

        #[arg(long, default_value_t = false)]
        strict_types: bool,
    },
}

/// Artifact selector for `render --only`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnlyPart {
    Main,
    Data,
}

impl From<OnlyPart> for Destination {
    fn from(part: OnlyPart) -> Self {
        match part {
            OnlyPart::Main => Destination::Main,
            OnlyPart::Data => Destination::Data,
        }
    }
}

pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RuntimeConfig::from_env();
    match cli.command {
        Commands::Generate {
            conf,
            output,
            strict_types,
        } => {
            let schema = load_schema(&conf)?;
            let sources = generate(&schema, GeneratorOptions { strict_types })?;
            let root = output.unwrap_or(config.output_root);
            let written = write_to_dir(&root, &sources)
                .with_context(|| format!("failed to write sources to {}", root.display()))?;
            for path in &written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Render {
            conf,
            only,
            strict_types,
        } => {
            let schema = load_schema(&conf)?;
            let sources = generate(&schema, GeneratorOptions { strict_types })?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match only {
                Some(part) => {
                    let artifact = sources.get(part.into());
                    out.write_all(unescape_html(&artifact.body).as_bytes())?;
                }
                None => {
                    for artifact in sources.artifacts() {
                        writeln!(out, "// {}", artifact.relative_path())?;
                        out.write_all(unescape_html(&artifact.body).as_bytes())?;
                        writeln!(out)?;
                    }
                }
            }
            out.flush()?;
            Ok(())
        }
        Commands::Serve { addr, strict_types } => {
            config.apply();
            let addr = addr.unwrap_or(config.addr);
            let service = GenerateService::new(GeneratorOptions { strict_types });
            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(addr = %handle.addr(), stack_size = config.stack_size, "service listening");
            wait_for_shutdown(handle)
        }
    }
}

#[cfg(unix)]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT])?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "shutting down");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> anyhow::Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server terminated abnormally: {e:?}"))
}
