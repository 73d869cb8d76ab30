use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use genie_client::{ApiClient, CreationFlow};
use genie_core::{
    Category, DashboardStats, Priority, Task, TaskDraft, TaskStatus, normalize_due_date,
};
use std::io::{self, Write};

use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List your tasks
    List {
        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Create a task
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Work, Personal, Health, Education or Others (inferred when omitted)
        #[arg(long)]
        category: Option<Category>,

        /// Low, Medium or High (inferred when omitted)
        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        status: Option<TaskStatus>,

        /// Due date, YYYY-MM-DD
        #[arg(long, value_parser = parse_due)]
        due: Option<NaiveDate>,

        /// Ask the AI to write the description from the title
        #[arg(long, default_value_t = false, conflicts_with = "description")]
        generate: bool,
    },

    /// Change fields of an existing task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long, default_value_t = false)]
        clear_due: bool,
    },

    /// Flip a task between Completed and Pending
    Toggle { id: String },

    /// Delete a task
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

/// Reject malformed dates at the prompt, the way a date picker would.
fn parse_due(s: &str) -> Result<NaiveDate, String> {
    normalize_due_date(s).ok_or_else(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

pub async fn run(client: &ApiClient, cfg: &Config, cmd: TasksCommand) -> Result<()> {
    match cmd {
        TasksCommand::List { status, category } => list(client, cfg, status, category).await,
        TasksCommand::Add {
            title,
            description,
            category,
            priority,
            status,
            due,
            generate,
        } => {
            let draft = TaskDraft {
                title,
                description,
                category: category.map(|c| c.to_string()),
                priority: priority.map(|p| p.to_string()),
                status: status.map(|s| s.to_string()),
                due_date: due.map(|d| d.to_string()),
            };
            add(client, cfg, draft, generate).await
        }
        TasksCommand::Edit {
            id,
            title,
            description,
            category,
            priority,
            status,
            due,
            clear_due,
        } => {
            let mut task = find_task(client, &id).await?;
            if let Some(t) = title {
                task.title = t;
            }
            if let Some(d) = description {
                task.description = d;
            }
            if let Some(c) = category {
                task.category = c;
            }
            if let Some(p) = priority {
                task.priority = p;
            }
            if let Some(s) = status {
                task.status = s;
            }
            if due.is_some() || clear_due {
                task.due_date = due;
            }
            let updated = client.update_task(&id, &task).await.context("update failed")?;
            println!("Updated:");
            print_task(&updated);
            reload(client, cfg).await
        }
        TasksCommand::Toggle { id } => {
            let mut task = find_task(client, &id).await?;
            task.status = task.status.toggled();
            let updated = client.update_task(&id, &task).await.context("update failed")?;
            println!("{} is now {}", updated.title, updated.status);
            reload(client, cfg).await
        }
        TasksCommand::Delete { id, yes } => {
            let task = find_task(client, &id).await?;
            if !yes && !confirm(&format!("Delete \"{}\"?", task.title))? {
                println!("Cancelled.");
                return Ok(());
            }
            client.delete_task(&id).await.context("delete failed")?;
            println!("Deleted \"{}\".", task.title);
            reload(client, cfg).await
        }
    }
}

async fn add(client: &ApiClient, cfg: &Config, mut draft: TaskDraft, generate: bool) -> Result<()> {
    let flow = CreationFlow::new(client, cfg.assembler());
    if generate {
        if draft.title.trim().is_empty() {
            bail!("--generate needs a --title");
        }
        println!("Generating description…");
        draft.description = flow
            .generate_description(&draft.title)
            .await
            .context("description generation failed")?;
    }
    let created = flow.submit(draft).await.context("could not create task")?;
    println!("Created:");
    print_task(&created);
    reload(client, cfg).await
}

async fn list(
    client: &ApiClient,
    cfg: &Config,
    status: Option<TaskStatus>,
    category: Option<Category>,
) -> Result<()> {
    let tasks = client.list_tasks().await.context("could not load tasks")?;
    let today = genie_core::time::today_in(&cfg.display.timezone)?;
    let shown: Vec<&Task> = tasks
        .iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();

    if shown.is_empty() {
        if tasks.is_empty() {
            println!("No tasks yet. Add one: genie tasks add --title \"...\"");
        } else {
            println!("No tasks match the filter ({} total).", tasks.len());
        }
        return Ok(());
    }
    for t in shown {
        print_row(t, today);
    }
    Ok(())
}

/// Re-read the list after a successful write so what we print is the server's view.
async fn reload(client: &ApiClient, cfg: &Config) -> Result<()> {
    println!();
    list(client, cfg, None, None).await
}

async fn find_task(client: &ApiClient, id: &str) -> Result<Task> {
    let tasks = client.list_tasks().await.context("could not load tasks")?;
    tasks
        .into_iter()
        .find(|t| t.id.as_deref() == Some(id))
        .with_context(|| format!("no task with id {id}"))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(matches!(s.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn print_row(t: &Task, today: NaiveDate) {
    let mark = if t.is_completed() { "x" } else { " " };
    let due = match t.due_date {
        Some(d) if t.is_overdue(today) => format!(" due {d} (overdue)"),
        Some(d) => format!(" due {d}"),
        None => String::new(),
    };
    println!(
        "[{mark}] {} | {} | {} | {} | {}{due}",
        t.id.as_deref().unwrap_or("-"),
        t.title,
        t.category,
        t.priority,
        t.status,
    );
}

pub fn print_task(t: &Task) {
    if let Some(id) = &t.id {
        println!("  id:       {id}");
    }
    println!("  title:    {}", t.title);
    println!("  category: {}", t.category);
    println!("  priority: {}", t.priority);
    println!("  status:   {}", t.status);
    match t.due_date {
        Some(d) => println!("  due:      {d}"),
        None => println!("  due:      -"),
    }
    if !t.description.is_empty() {
        println!("  description:");
        for line in t.description.lines() {
            println!("    {line}");
        }
    }
}

pub async fn dashboard(client: &ApiClient, cfg: &Config) -> Result<()> {
    let tasks = client.list_tasks().await.context("could not load tasks")?;
    let today = genie_core::time::today_in(&cfg.display.timezone)?;
    let stats = DashboardStats::from_tasks(&tasks, today);

    println!("# TaskGenie dashboard ({today})\n");
    println!("Total:       {}", stats.total);
    println!("Completed:   {}", stats.completed);
    println!("Pending:     {}", stats.pending);
    println!("In progress: {}", stats.in_progress);
    println!("Overdue:     {}", stats.overdue);
    println!("Done:        {:.0}%", stats.completion_rate());

    println!("\n## By priority");
    for (p, n) in &stats.by_priority {
        println!("- {p}: {n}");
    }
    println!("\n## By category");
    for (c, n) in stats.by_category.iter().filter(|(_, n)| *n > 0) {
        println!("- {c}: {n}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(subcommand)]
        cmd: TasksCommand,
    }

    #[test]
    fn test_add_parses_enums_and_due() {
        let h = Harness::try_parse_from([
            "t", "add", "--title", "Gym", "--category", "health", "--priority", "HIGH", "--due",
            "2025-03-01",
        ])
        .unwrap();
        match h.cmd {
            TasksCommand::Add {
                category,
                priority,
                due,
                ..
            } => {
                assert_eq!(category, Some(Category::Health));
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(due, NaiveDate::from_ymd_opt(2025, 3, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_due_rejected_before_any_request() {
        let r = Harness::try_parse_from(["t", "add", "--title", "x", "--due", "2025-02-30"]);
        assert!(r.is_err());
    }

    #[test]
    fn test_status_with_space() {
        let h = Harness::try_parse_from(["t", "edit", "abc", "--status", "In Progress"]).unwrap();
        assert!(matches!(
            h.cmd,
            TasksCommand::Edit {
                status: Some(TaskStatus::InProgress),
                ..
            }
        ));
    }

    #[test]
    fn test_generate_conflicts_with_description() {
        let r = Harness::try_parse_from([
            "t", "add", "--title", "x", "--description", "y", "--generate",
        ]);
        assert!(r.is_err());
    }
}
