//! `avatarline chat`: talk to the front agent from a terminal.
//!
//! Each utterance is printed in speaking order; supervisor tool calls show up
//! as breadcrumbs on stderr.

use std::io::Write;
use std::sync::Arc;

use avatarline_agent::{
    DelegationLoop, FrontAgent, SupervisorHandoff, TurnRecord, UtteranceKind, citations,
};
use avatarline_config::AppConfig;
use avatarline_core::event::EventBus;
use avatarline_providers::ResponsesClient;
use avatarline_tools::{StaticKnowledgeBase, ToolExecutor};
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: [&str; 5] = ["exit", "quit", "/exit", "/quit", ":q"];

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_supervisor_key() {
        eprintln!();
        eprintln!("  ERROR: No supervisor API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!("    AVATARLINE_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let client = Arc::new(ResponsesClient::from_config(&config.supervisor)?);
    let knowledge = Arc::new(StaticKnowledgeBase::load(
        config.knowledge.fixtures_path.as_deref(),
    )?);
    let delegation = DelegationLoop::from_config(
        &config,
        client,
        ToolExecutor::new(knowledge),
        Arc::new(EventBus::default()),
    );
    let mut agent = FrontAgent::new(
        SupervisorHandoff::new(Arc::new(delegation)),
        &config.front,
    );

    if let Some(msg) = message {
        let record = take_turn(&mut agent, &msg).await;
        print_turn(&record);
        return Ok(());
    }

    println!();
    println!("  Avatarline Chat: {} from {}", config.front.agent_name, config.front.company_name);
    println!("  Supervisor: {}", config.supervisor.model);
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&line) {
            break;
        }

        let record = take_turn(&mut agent, line).await;
        print_turn(&record);
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

async fn take_turn(agent: &mut FrontAgent, utterance: &str) -> TurnRecord {
    let observer = |title: &str, data: Option<&serde_json::Value>| match data {
        Some(data) => eprintln!("  · {title} {data}"),
        None => eprintln!("  · {title}"),
    };
    agent.respond_observed(utterance, None, Some(&observer)).await
}

fn print_turn(record: &TurnRecord) {
    println!();
    for utterance in &record.utterances {
        let prefix = match utterance.kind {
            UtteranceKind::Filler => "  Agent (filler) >",
            _ => "  Agent >",
        };
        for line in utterance.text.lines() {
            println!("{prefix} {line}");
        }
        if utterance.kind == UtteranceKind::Relay {
            for cite in citations::extract(&utterance.text) {
                println!("    source: {} ({})", cite.name, cite.id);
            }
        }
    }
    println!();
}
