use std::io;

use anyhow::Context;
use clap::{Parser, Subcommand};

use artifactory_resource::repository::ArtifactoryClient;
use artifactory_resource::resource::{CheckRequest, OutRequest, read_request, write_response};
use artifactory_resource::{check, logging, out};

#[derive(Parser)]
#[command(name = "artifactory-resource")]
#[command(version, about = "Concourse resource for versioned artifacts in Artifactory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report available versions; the request is read from stdin
    Check,
    /// Upload files from the build directory; the request is read from stdin
    Out {
        /// Build working directory provided by Concourse
        source_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Check => {
            let request: CheckRequest = read_request(io::stdin().lock())
                .context("Error when parsing source from concourse")?;
            let _log = tracing::subscriber::set_default(logging::subscriber(
                request.source.log_level,
            ));

            let client = ArtifactoryClient::new(&request.source)?;
            let versions = runtime
                .block_on(check::check(&client, &request))
                .context("Error when retrieving versions")?;
            write_response(io::stdout().lock(), &versions)?;
        }
        Command::Out { source_dir } => {
            let request: OutRequest = read_request(io::stdin().lock())
                .context("Error when parsing source from concourse")?;
            let _log = tracing::subscriber::set_default(logging::subscriber(
                request.source.log_level,
            ));

            let client = ArtifactoryClient::new(&request.source)?;
            let response = runtime
                .block_on(out::out(&client, &source_dir, &request))
                .context("Error when uploading")?;
            write_response(io::stdout().lock(), &response)?;
        }
    }

    Ok(())
}
