//! pq CLI - inspect task dependency snapshots.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use prereq::{Snapshot, StoreError, Workspace, is_task_unlocked, task_prerequisites};
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prereq")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("prereq.log");
    let target = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(target)))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_snapshot_path(cli: &Cli) -> PathBuf {
    cli.file.clone().unwrap_or_else(|| PathBuf::from("tasks.json"))
}

/// Pick the owner scope: the explicit flag, or the snapshot's only owner.
fn resolve_owner(snapshot: &Snapshot, flag: Option<&str>) -> Result<String> {
    if let Some(owner) = flag {
        return Ok(owner.to_string());
    }

    let owners = snapshot.owners();
    match owners.as_slice() {
        [] => eyre::bail!("snapshot contains no tasks or edges"),
        [only] => Ok(only.clone()),
        many => eyre::bail!(
            "snapshot spans {} owners; pick one with --owner ({})",
            many.len(),
            many.join(", ")
        ),
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = get_snapshot_path(&cli);
    let snapshot = Snapshot::load(&path)?;

    match cli.command {
        Command::Order => {
            let owner = resolve_owner(&snapshot, cli.owner.as_deref())?;
            let ws = Workspace::from_parts(snapshot.tasks, snapshot.edges);

            let views = match ws.list_tasks(&owner) {
                Ok(views) => views,
                Err(StoreError::GraphCorrupted) => {
                    eprintln!("{} Snapshot's dependency graph contains a cycle", "✗".red());
                    std::process::exit(1);
                }
                Err(e) => return Err(e).context("Failed to order tasks"),
            };

            if views.is_empty() {
                println!("{}", "No tasks".dimmed());
            } else {
                for view in views {
                    let marker = if view.task.completed {
                        "✓".green()
                    } else if view.locked {
                        "⊘".red()
                    } else {
                        "→".blue()
                    };
                    let lock_note = if view.locked {
                        " (locked)".dimmed().to_string()
                    } else {
                        String::new()
                    };
                    println!("{} {} {}{}", marker, view.task.id.cyan(), view.task.name, lock_note);
                }
            }
        }

        Command::Check {
            provider_id,
            dependent_id,
        } => {
            let owner = resolve_owner(&snapshot, cli.owner.as_deref())?;
            let mut ws = Workspace::from_parts(snapshot.tasks, snapshot.edges);

            // The insertion runs against an in-memory copy; the snapshot
            // file is never written.
            match ws.add_dependency(&owner, &provider_id, &dependent_id) {
                Ok(_) => {
                    println!(
                        "{} {} -> {} is safe to add",
                        "✓".green(),
                        provider_id.cyan(),
                        dependent_id.cyan()
                    );
                }
                Err(e) => {
                    eprintln!("{} {}", "✗".red(), e);
                    std::process::exit(1);
                }
            }
        }

        Command::Show { id } => {
            let owner = resolve_owner(&snapshot, cli.owner.as_deref())?;
            let tasks = snapshot.tasks_for(&owner);
            let edges = snapshot.edges_for(&owner);

            let Some(task) = tasks.iter().find(|t| t.id == id) else {
                eprintln!("{} Task not found: {}", "✗".red(), id);
                std::process::exit(1);
            };

            println!("{}: {}", "ID".bold(), task.id.cyan());
            println!("{}: {}", "Name".bold(), task.name);
            println!(
                "{}: {}",
                "Completed".bold(),
                if task.completed { "yes".green() } else { "no".yellow() }
            );
            println!("{}: {}", "Created".bold(), task.created_at);
            println!("{}: {}", "Updated".bold(), task.updated_at);

            let prerequisites = task_prerequisites(&id, &edges);
            if prerequisites.is_empty() {
                println!("{}: none", "Prerequisites".bold());
            } else {
                println!("{}:", "Prerequisites".bold());
                for provider_id in &prerequisites {
                    match tasks.iter().find(|t| t.id == *provider_id) {
                        Some(p) if p.completed => {
                            println!("  {} {} {}", "✓".green(), p.id.cyan(), p.name)
                        }
                        Some(p) => println!("  {} {} {}", "○".yellow(), p.id.cyan(), p.name),
                        None => {
                            println!("  {} {} {}", "?".red(), provider_id.cyan(), "(missing)".dimmed())
                        }
                    }
                }
            }

            let unlocked = is_task_unlocked(&id, &tasks, &edges);
            println!(
                "{}: {}",
                "Unlocked".bold(),
                if unlocked { "yes".green() } else { "no".red() }
            );
        }

        Command::Owners => {
            let owners = snapshot.owners();
            if owners.is_empty() {
                println!("{}", "No owners".dimmed());
            } else {
                for owner in owners {
                    let tasks = snapshot.tasks_for(&owner).len();
                    let edges = snapshot.edges_for(&owner).len();
                    println!("{} {} task(s), {} edge(s)", owner.cyan(), tasks, edges);
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
