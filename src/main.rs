use game_group_contract::checker::check_payload;
use game_group_contract::config::Config;
use game_group_contract::error::Result;
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,game_group_contract=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let source = std::env::args().nth(1);
    let raw = read_source(source.as_deref())?;
    tracing::info!(
        source = source.as_deref().unwrap_or("-"),
        bytes = raw.len(),
        "Checking game group update payload"
    );

    let outcome = check_payload(&raw, &config.validation_policy())?;
    println!("{}", outcome.output);
    tracing::info!(status = ?outcome.status, "Check finished");

    Ok(ExitCode::from(outcome.status.exit_code()))
}

fn read_source(source: Option<&str>) -> Result<String> {
    match source {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}
