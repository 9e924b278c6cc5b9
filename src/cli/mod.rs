//! Command-line entry: argument parsing and the boot sequence.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::api::Api;
use crate::catalog::{CatalogError, Registry};
use crate::http_server::{HttpServer, HttpServerConfig};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "nimbusdb",
    about = "A file-backed document database served over HTTP and WebSocket"
)]
pub struct Cli {
    /// Directory holding all databases
    #[arg(long, default_value = "./databases")]
    pub data_dir: PathBuf,

    /// Address the HTTP and WebSocket server binds
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen: String,
}

impl Cli {
    /// Parses the process arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Failures that abort the boot sequence.
#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("server failed: {0}")]
    Server(#[from] std::io::Error),
}

/// Loads every database under the data root, then serves until the
/// process is stopped.
pub async fn run(cli: Cli) -> Result<(), BootError> {
    let registry = Registry::open(&cli.data_dir)?;
    let api = Api::shared(registry);

    let config = HttpServerConfig {
        bind_addr: cli.listen,
    };
    HttpServer::new(api, config).start().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_configuration() {
        let cli = Cli::parse_from(["nimbusdb"]);
        assert_eq!(cli.data_dir, PathBuf::from("./databases"));
        assert_eq!(cli.listen, "0.0.0.0:8080");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["nimbusdb", "--data-dir", "/tmp/x", "--listen", "127.0.0.1:9"]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(cli.listen, "127.0.0.1:9");
    }
}
