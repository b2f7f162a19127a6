use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use splitledger_cli::{Cli, Config};
use splitledger_core::DomainError;

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::from_env();
    splitledger_observability::init_with(config.log_format);
    config.log_rejected();

    let result = read_input(cli.command.input().map(|p| p.as_path()))
        .and_then(|input| splitledger_cli::run(&cli.command, &input, &config));

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<DomainError>() {
            Some(domain) => {
                eprintln!("{}", domain.reason());
                ExitCode::from(2)
            }
            None => {
                tracing::error!(error = %format!("{err:#}"), "command failed");
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
