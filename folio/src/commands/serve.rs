use anyhow::Context;
use folio_config::Config;
use folio_email_contracts::EmailService;
use tracing::info;

use crate::{
    email,
    environment::{ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to mail transport");
    let email = email::connect(&config.email)?;
    email
        .ping()
        .await
        .context("Failed to connect to mail transport")?;

    let config_provider = ConfigProvider::new(&config);
    let provider = Provider::new(config_provider, email);
    let server = provider.rest_server()?;

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
