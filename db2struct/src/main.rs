use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Password;
use std::process::ExitCode;

use db2struct::cli::Cli;
use db2struct::utils::logging::init_logging;
use db2struct::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = cli.load_config()?;

    if let Err(e) = config.validate() {
        if let Error::ConfigError(message) = &e {
            println!("{}", message);
            return Ok(ExitCode::SUCCESS);
        }
        return Err(e.into());
    }

    init_logging(&config.logging)?;

    if cli.prompt_password() {
        let password = Password::new()
            .with_prompt("Enter password")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read password")?;
        config.database.password = Some(password);
    }

    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        "Connecting to mysql server"
    );
    let client = db2struct::init(config).await?;

    let mut stdout = std::io::stdout().lock();
    let result = client.run(&mut stdout).await;
    client.close().await;
    let report = result?;

    if !report.is_success() {
        let tables: Vec<&str> = report.failed.iter().map(|f| f.table.as_str()).collect();
        eprintln!("Failed to generate tables: {}", tables.join(", "));
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
