//! nimbusdb entry point: parse args, boot the registry, serve.

use std::process;

use nimbusdb::cli::{self, Cli};
use nimbusdb::observability::{Logger, Severity};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(err) = cli::run(cli).await {
        Logger::log_stderr(Severity::Fatal, "boot_failed", &[("error", &err.to_string())]);
        process::exit(1);
    }
}
