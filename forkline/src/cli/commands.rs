//! CLI command execution.
//!
//! Commands are thin wrappers around [`forkline::Engine`]: each one resolves
//! its directory, runs a single query, and prints a table or JSON.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use forkline::config::{default_projects_dir, Config};
use forkline::log::{read_session_record, LogLine};
use forkline::models::{LatestSessionSummary, SessionTree, SessionTreeListing};
use forkline::scan::list_log_files;
use forkline::Engine;

use super::args::{Cli, Commands};

/// Width of text previews in tables.
const PREVIEW_CHARS: usize = 60;

const SYSTEM_REMINDER_PATTERN: &str = r"(?s)<system-reminder>.*?</system-reminder>";

static SYSTEM_REMINDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SYSTEM_REMINDER_PATTERN).expect("system-reminder pattern is valid"));

/// Drop injected `<system-reminder>` blocks and collapse whitespace.
fn strip_noise(text: &str) -> String {
    let cleaned = SYSTEM_REMINDER.replace_all(text, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One-line preview, cut on a character boundary.
fn preview(text: Option<&str>, max_chars: usize) -> String {
    let Some(text) = text else {
        return "-".to_string();
    };
    let cleaned = strip_noise(text);
    if cleaned.chars().count() > max_chars {
        let cut: String = cleaned.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        cleaned
    }
}

fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

// === Command Execution ===

pub async fn execute(cli: Cli) -> Result<()> {
    let projects_dir = match cli.projects_dir {
        Some(dir) => dir,
        None => default_projects_dir().context("Could not locate the projects directory")?,
    };
    let config = Config::new(projects_dir).with_max_concurrent_reads(cli.max_concurrent_reads);
    let engine = Engine::new(config);

    match cli.command {
        Commands::Trees { target, json } => show_trees(&engine, target.as_deref(), json).await,
        Commands::Latest { target, json } => show_latest(&engine, target.as_deref(), json).await,
        Commands::Descendant { project, session } => {
            println!("{}", engine.latest_descendant(&project, &session).await);
            Ok(())
        }
        Commands::Messages {
            project,
            session,
            json,
        } => show_messages(&engine, &project, &session, json).await,
        Commands::Projects => list_projects(engine.config()).await,
        Commands::Inspect { file } => inspect_file(&file).await,
    }
}

async fn show_trees(engine: &Engine, target: Option<&str>, json: bool) -> Result<()> {
    let dir = engine.config().resolve_target(target)?;
    let listing = engine.list_session_trees(&dir).await;

    if json {
        return print_json(&listing);
    }
    print_listing(&dir, &listing);
    Ok(())
}

fn print_listing(dir: &Path, listing: &SessionTreeListing) {
    if listing.trees.is_empty() {
        println!("No sessions found in {}.", dir.display());
        return;
    }

    println!(
        "{} trees, {} files in {}",
        listing.total_trees,
        listing.total_files,
        dir.display()
    );

    for tree in &listing.trees {
        println!();
        println!(
            "Tree {} ({} forks, depth {}, {} endpoints)",
            tree.root_session_id,
            tree.total_fork_count,
            tree.max_depth,
            tree.branch_endpoints.len()
        );
        println!(
            "  first:  {}",
            preview(tree.first_message_text.as_deref(), PREVIEW_CHARS)
        );
        println!(
            "  latest: {}",
            preview(tree.latest_user_message_text.as_deref(), PREVIEW_CHARS)
        );
        print_structure(&tree.structure);
    }
}

/// Indented outline of a tree, children in stored order.
fn print_structure(root: &SessionTree) {
    let mut stack = vec![(root, 1usize)];
    while let Some((node, depth)) = stack.pop() {
        let marker = if node.children.len() > 1 { "*" } else { "-" };
        println!(
            "{:indent$}{marker} {:<10} {:>5} msgs  {}",
            "",
            short_id(&node.session_id),
            node.message_count,
            preview(node.last_message_text.as_deref(), PREVIEW_CHARS),
            indent = depth * 2
        );
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
}

async fn show_latest(engine: &Engine, target: Option<&str>, json: bool) -> Result<()> {
    let dir = engine.config().resolve_target(target)?;
    let latest = engine.list_latest_sessions(&dir).await;

    if json {
        return print_json(&latest);
    }
    print_latest(&dir, &latest);
    Ok(())
}

fn print_latest(dir: &Path, latest: &[LatestSessionSummary]) {
    if latest.is_empty() {
        println!("No sessions found in {}.", dir.display());
        return;
    }

    println!(
        "{:<10} {:<10} {:<10} {:>6}  {}",
        "SESSION", "ROOT", "FORK OF", "MSGS", "LAST MESSAGE"
    );
    println!("{}", "-".repeat(100));

    for entry in latest {
        println!(
            "{:<10} {:<10} {:<10} {:>6}  {}",
            short_id(&entry.session_id),
            short_id(&entry.root_session_id),
            entry.fork_from_session_id.as_deref().map_or("-", short_id),
            entry.message_count,
            preview(entry.last_message_text.as_deref(), PREVIEW_CHARS),
        );
    }
}

async fn show_messages(engine: &Engine, project: &str, session: &str, json: bool) -> Result<()> {
    let records = engine.messages_for_session(project, session).await;

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No messages found for session {session}.");
        return Ok(());
    }

    for line in records.into_iter().filter_map(LogLine::from_value) {
        if line.texts.is_empty() {
            continue;
        }
        let role_display = line.role.as_str().to_uppercase();
        match line.timestamp.as_deref() {
            Some(ts) => println!("[{role_display}] {ts}"),
            None => println!("[{role_display}]"),
        }
        for text in &line.texts {
            println!("{}", strip_noise(text));
        }
        println!();
    }

    Ok(())
}

async fn list_projects(config: &Config) -> Result<()> {
    let root = &config.projects_dir;
    let mut entries = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("Failed to read {}", root.display()))?;

    let mut projects = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            let path = entry.path();
            let count = list_log_files(&path).await.map_or(0, |files| files.len());
            projects.push((entry.file_name().to_string_lossy().into_owned(), count));
        }
    }
    projects.sort();

    if projects.is_empty() {
        println!("No projects found in {}.", root.display());
        return Ok(());
    }

    println!("{:<8} PROJECT", "LOGS");
    println!("{}", "-".repeat(60));
    for (name, count) in projects {
        println!("{count:<8} {name}");
    }
    Ok(())
}

async fn inspect_file(path: &Path) -> Result<()> {
    let record = read_session_record(path).await?;

    println!("File:          {}", path.display());
    println!("Session:       {}", record.resolved_session_id());
    println!("Messages:      {}", record.len());
    println!("Message ids:   {}", record.all_ids.len());
    println!(
        "Resumed from:  {}",
        record.first_user_message_parent_id.as_deref().unwrap_or("-")
    );
    println!("First:         {}", preview(record.first_text(), PREVIEW_CHARS));
    println!("Last:          {}", preview(record.last_text(), PREVIEW_CHARS));
    println!(
        "Last user:     {}",
        preview(record.last_user_text(), PREVIEW_CHARS)
    );
    Ok(())
}
