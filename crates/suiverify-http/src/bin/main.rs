use anyhow::Context;
use clap::Parser;
use log::info;
use std::sync::Arc;
use suiverify_http::config::{parse_toml, ServerConfig};
use suiverify_http::server;
use suiverify_http::state::AppState;
use suiverify_sui::{config::parse_toml as parse_sui_toml, SuiContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get config from CLI
    let server_config: ServerConfig = Parser::parse();
    info!("{}", server_config);

    let config_str = server_config.read_config()?;
    let http_config = server_config.apply(parse_toml(&config_str)?);
    let sui_config = parse_sui_toml(&config_str)?;
    info!("{}", http_config);
    info!("{}", sui_config);

    // Fail before binding if any required setting is missing
    let settings = sui_config
        .validate()
        .context("Invalid [sui] configuration")?;
    let context = SuiContext::from_settings(settings)?;
    if !context.settings().identities.is_single() {
        info!("Using separate signing keys per role.");
    }

    let app_state = Arc::new(AppState::from_context(http_config.clone(), &context));
    let server = server::server(&http_config, app_state);
    tracing::info!("listening on {}", server.local_addr());
    server.await?;

    Ok(())
}
