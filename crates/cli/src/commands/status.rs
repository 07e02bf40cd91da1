//! `avatarline status`: show the effective configuration.

use avatarline_config::AppConfig;

fn key_state(present: bool) -> &'static str {
    if present { "configured" } else { "missing" }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Avatarline Status");
    println!("=================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Agent:         {} at {}", config.front.agent_name, config.front.company_name);
    println!("  Supervisor:    {} via {}", config.supervisor.model, config.supervisor.api_url);
    println!("  Max rounds:    {}", config.supervisor.max_rounds);
    println!("  Supervisor key: {}", key_state(config.has_supervisor_key()));
    println!("  Avatar vendor: {}", config.avatar.base_url);
    println!("  Avatar key:    {}", key_state(config.has_avatar_key()));
    println!(
        "  Knowledge:     {}",
        config.knowledge.fixtures_path.as_deref().unwrap_or("built-in fixtures")
    );
    println!("  Gateway:       {}:{}", config.gateway.host, config.gateway.port);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, run `avatarline onboard` first");
    }

    Ok(())
}
