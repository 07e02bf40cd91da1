//! `avatarline doctor`: diagnose configuration problems.

use avatarline_config::AppConfig;
use avatarline_tools::StaticKnowledgeBase;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Avatarline Doctor");
    println!("=================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, defaults in use (run `avatarline onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found.");
            return Ok(());
        }
    };

    if config.has_supervisor_key() {
        println!("  ✅ Supervisor API key configured");
    } else {
        println!("  ⚠️  No supervisor API key: set OPENAI_API_KEY or supervisor.api_key");
        issues += 1;
    }

    if config.has_avatar_key() {
        println!("  ✅ HeyGen API key configured");
    } else {
        println!("  ⚠️  No HeyGen API key: set HEYGEN_API_KEY or avatar.api_key");
        issues += 1;
    }

    match StaticKnowledgeBase::load(config.knowledge.fixtures_path.as_deref()) {
        Ok(kb) => println!("  ✅ Knowledge base loaded ({} solutions)", kb.solution_count()),
        Err(e) => {
            println!("  ❌ Knowledge fixtures invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
