//! Perspective Chain Demo
//!
//! Runs one query through the full pipeline: role selection, chained specialists that each
//! read every earlier analysis, and a final synthesis. Afterwards it prints the run, the role
//! usage counters and the history report.
//!
//! With an OpenAI key the real model is used:
//! export OPEN_AI_SECRET=your_openai_key
//!
//! Without one, a scripted offline client stands in so the demo always runs.
//!
//! Optional settings:
//! export CHORUS_CONTEXT="Mid-size city, 300k residents"
//! export CHORUS_ROLE_STRATEGY=model_assisted
//! export CHORUS_MAX_CONTEXT_CHARS=24000
//!
//! Then run: cargo run --example perspective_chain -- "your question"

use async_trait::async_trait;
use chorusllm::client_wrapper::ClientWrapper;
use chorusllm::clients::openai::{Model, OpenAIClient};
use chorusllm::clients::scripted::ScriptedClient;
use chorusllm::config::ChorusConfig;
use chorusllm::event::{EventHandler, OrchestrationEvent};
use chorusllm::orchestrator::{Orchestrator, RunOptions};
use std::sync::Arc;

struct ProgressPrinter;

#[async_trait]
impl EventHandler for ProgressPrinter {
    async fn on_orchestration_event(&self, event: &OrchestrationEvent) {
        match event {
            OrchestrationEvent::RolesSelected { policy, roles, .. } => {
                println!("[{}] roles: {}", policy, roles.join(" -> "));
            }
            OrchestrationEvent::SpecialistStarted {
                index,
                role,
                prompt_size,
                ..
            } => {
                println!("  #{} {} (prompt {} chars)...", index + 1, role, prompt_size);
            }
            OrchestrationEvent::SynthesisStarted { prompt_size, .. } => {
                println!("  synthesis (prompt {} chars)...", prompt_size);
            }
            OrchestrationEvent::RunFailed { phase, error, .. } => {
                println!("  failed during {}: {}", phase, error);
            }
            _ => {}
        }
    }
}

fn offline_client() -> ScriptedClient {
    ScriptedClient::new("scripted-offline")
        .reply_when(
            "design the team",
            "Roles: an economic analyst for costs, a social analyst for community effects, \
             and a technical lead for feasibility.",
        )
        .with_fallback(|prompt| {
            format!(
                "(offline reply to a {}-character prompt)",
                prompt.chars().count()
            )
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    chorusllm::init_logger();
    println!("=== chorusllm Perspective Chain ===\n");

    let query = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let query = if query.trim().is_empty() {
        "Should our city convert downtown parking lots into housing?".to_string()
    } else {
        query
    };

    let client: Arc<dyn ClientWrapper> = match std::env::var("OPEN_AI_SECRET") {
        Ok(key) => Arc::new(OpenAIClient::new_with_model_enum(&key, Model::GPT41Mini)),
        Err(_) => {
            println!("OPEN_AI_SECRET not set, using the scripted offline client.\n");
            Arc::new(offline_client())
        }
    };

    let config = ChorusConfig::from_env();
    let orchestrator =
        Orchestrator::from_config(client, &config).with_event_handler(Arc::new(ProgressPrinter));
    println!("Model: {}\nQuery: {}\n", orchestrator.model_name(), query);

    let run = orchestrator.run_query(&query, &RunOptions::default()).await?;

    for analysis in &run.analyses {
        println!("\n## {}\n{}", analysis.role, analysis.text);
    }
    println!("\n## {}\n{}", run.synthesis.role, run.synthesis.text);

    println!("\n=== Role usage ===");
    for role in orchestrator.roles().await {
        println!("{:<24} {}", role.name, role.usage_count);
    }

    let report = orchestrator.report().await;
    println!(
        "\nRuns: {}  specialist calls: {}  characters: {}  tokens: {}",
        report.total_runs,
        report.total_specialist_calls,
        report.total_characters,
        report.total_tokens_used
    );

    Ok(())
}
