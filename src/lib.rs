pub(crate) mod api;
pub(crate) mod cli;
pub(crate) mod core;
pub(crate) mod dom;
pub(crate) mod live;
pub(crate) mod pages;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use clap::Parser;

use crate::core::{config::Settings, state::AppState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    tracing::debug!(
        environment = settings.runtime().environment.as_str(),
        base_url = %settings.base_url(),
        "giiku client starting"
    );

    let state = AppState::from_settings(settings, cli.ephemeral)?;
    cli::execute(cli, state).await
}
