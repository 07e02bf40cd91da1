//! `avatarline gateway`: start the HTTP server.

use avatarline_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Avatarline Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Browser origin: {}", config.gateway.allowed_origin);

    avatarline_gateway::start(config).await?;

    Ok(())
}
