//! linkvault CLI

use clap::Parser;
use linkvault::{App, Cli, logging, render_error, render_success, settings};
use linkvault_core::Error;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render_error(&err, cli.json));
            Ok(exit_code(&err))
        }
    }
}

async fn run(cli: &Cli) -> Result<String, Error> {
    let config = settings::load(cli)?;
    if let Err(e) = logging::init(&config.log_level, cli.log_format) {
        eprintln!("warning: {}", e);
    }
    log::info!("linkvault v{}", env!("CARGO_PKG_VERSION"));

    let app = App::new(config)?;
    log::debug!("Vault root: {}", app.root().display());

    let cancel = CancellationToken::new();
    if let Some(secs) = cli.timeout {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            log::warn!("Deadline of {}s reached, cancelling", secs);
            deadline.cancel();
        });
    }

    let output = app.run(&cli.command, &cancel).await?;
    render_success(&output, cli.json)
}

fn exit_code(err: &Error) -> ExitCode {
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}
