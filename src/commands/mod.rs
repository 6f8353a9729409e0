pub mod seed;
pub mod verify;

use anyhow::{Context as _, Result};
use factoryos::Client;

use crate::config::SeedConfig;
use crate::ui;

/// Build an HTTP client for the configured API.
pub fn client(config: &SeedConfig) -> Client {
    Client::with_timeout(config.base_url.as_str(), config.timeout)
}

/// Run the two fatal preconditions: health check and login.
///
/// Any error here must abort the run before a single record is written.
pub fn connect(client: &mut Client, config: &SeedConfig) -> Result<()> {
    ui::header("0. HEALTH CHECK");
    let health = match client.health_check() {
        Ok(health) => health,
        Err(e) => {
            ui::error(&format!("Cannot reach API on {}: {e}", config.base_url));
            ui::dim(e.category().advice());
            return Err(e).with_context(|| format!("API on {} is not available", config.base_url));
        }
    };
    ui::success(&format!(
        "API is healthy – {}",
        health.service.as_deref().unwrap_or("unknown")
    ));

    let username = &config.credentials.username;
    ui::header(&format!("1. LOGIN AS {}", username.to_uppercase()));
    match client.login(&config.credentials) {
        Ok(token) => {
            ui::success(&format!("Logged in as {username} (token: {} chars)", token.len()));
            Ok(())
        }
        Err(e) => {
            ui::error(&format!("Login failed: {e}"));
            ui::dim(e.category().advice());
            Err(e).with_context(|| format!("Could not log in as {username}"))
        }
    }
}
