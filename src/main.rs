#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{bail, Context, Result};
use authflow::{models::Credential, AuthFlowFactory, AuthFlowSettings, Outcome};
use std::process::ExitCode;

const USAGE: &str = "usage: authflow <national-id|username> <identifier> <password>";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("authflow: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Run one login attempt and print its outcome.
///
/// Returns whether the attempt succeeded.
async fn run() -> Result<bool> {
    let (credential, identifier, password) = parse_args(std::env::args().skip(1))?;

    // Load configuration from Settings.toml and environment variables
    let settings = AuthFlowSettings::load().context("failed to load settings")?;
    settings
        .init_logging()
        .context("failed to initialize logging")?;

    let flow = AuthFlowFactory::create(&settings).context("failed to configure login flow")?;
    let outcome = flow.login(credential, &identifier, &password).await.recv().await;

    match outcome {
        Some(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(matches!(outcome, Outcome::Success { .. }))
        }
        None => {
            println!("{{\"outcome\": null}}");
            Ok(false)
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Credential, String, String)> {
    let credential = match args.next().as_deref() {
        Some("national-id") => Credential::NationalId,
        Some("username") => Credential::Username,
        _ => bail!(USAGE),
    };
    let (Some(identifier), Some(password), None) = (args.next(), args.next(), args.next()) else {
        bail!(USAGE);
    };
    Ok((credential, identifier, password))
}
