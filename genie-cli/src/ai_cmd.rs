use anyhow::{Context, Result};
use clap::Subcommand;
use genie_client::{ApiClient, CreationFlow};
use genie_core::snippet;

use crate::config::Config;
use crate::tasks_cmd::print_task;

#[derive(Subcommand, Debug)]
pub enum AiCommand {
    /// Generate a numbered description for a task title (nothing is saved)
    Describe {
        #[arg(long)]
        title: String,
    },

    /// Turn a natural-language sentence into a task and create it
    Parse {
        /// e.g. "Call Sarah tomorrow at 3pm about the project - urgent"
        text: Vec<String>,

        /// Show the normalized task without creating it
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Show your recent AI requests
    Logs {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

pub async fn run(client: &ApiClient, cfg: &Config, cmd: AiCommand) -> Result<()> {
    let flow = CreationFlow::new(client, cfg.assembler());
    match cmd {
        AiCommand::Describe { title } => {
            let description = flow
                .generate_description(&title)
                .await
                .context("description generation failed")?;
            if description.is_empty() {
                println!("(the AI returned nothing usable)");
            } else {
                println!("{description}");
            }
        }
        AiCommand::Parse { text, dry_run } => {
            let text = text.join(" ");
            if dry_run {
                let task = flow
                    .preview_from_text(&text)
                    .await
                    .context("could not parse task")?;
                println!("Parsed (not saved):");
                print_task(&task);
            } else {
                let task = flow
                    .create_from_text(&text)
                    .await
                    .context("could not create task")?;
                println!("Created:");
                print_task(&task);
            }
        }
        AiCommand::Logs { limit } => {
            let logs = client.ai_logs().await.context("could not load AI logs")?;
            if logs.is_empty() {
                println!("No AI requests yet.");
            }
            // Newest last on the server; show the tail.
            let skip = logs.len().saturating_sub(limit);
            for entry in logs.iter().skip(skip) {
                println!(
                    "[{}] {}",
                    entry.created_at.as_deref().unwrap_or("-"),
                    snippet(&entry.prompt, 80)
                );
                println!("  -> {}", snippet(&entry.ai_response, 160).replace('\n', " "));
            }
        }
    }
    Ok(())
}
