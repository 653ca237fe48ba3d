//! ofdevctl: encode flow descriptions and render controller flow documents.

use clap::{Parser, Subcommand};
use ofdev::flowfile::{load_flows, read_wire_document};
use ofdev::{wire, FlowError, FlowResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// OpenFlow flow codec tool
#[derive(Parser, Debug)]
#[command(name = "ofdevctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the controller wire document of every flow in a description file
    Encode {
        /// YAML or JSON flow description file
        path: PathBuf,

        /// Print one compact JSON document per line
        #[arg(long)]
        compact: bool,
    },
    /// Print one display line per flow of a controller wire document
    Render {
        /// JSON wire document, or - for stdin
        #[arg(default_value = "-")]
        path: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(status = %e.to_status(), "ofdevctl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> FlowResult<()> {
    match command {
        Command::Encode { path, compact } => {
            for flow in load_flows(&path)? {
                debug!("Encoding {}", flow);
                let doc = wire::encode(&flow)?;
                let text = if compact {
                    serde_json::to_string(&doc)?
                } else {
                    serde_json::to_string_pretty(&doc)?
                };
                println!("{}", text);
            }
        }
        Command::Render { path } => {
            let doc = read_wire_document(&path)?;
            let lines = wire::render_all(&doc);
            if lines.is_empty() {
                return Err(FlowError::data_not_found(format!("flows in {}", path)));
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
