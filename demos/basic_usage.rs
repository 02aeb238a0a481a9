// Example: Basic usage of the dayline-core library
use std::fs;

use chrono::Local;
use dayline_core::models::{TaskNode, TaskStatus};
use dayline_core::outline::{OutlineCommand, Outcome};
use dayline_core::slash::{self, CatalogStack, Navigation};
use dayline_core::storage::*;
use dayline_core::tasks::{self, TaskCommand};
use dayline_core::Session;

fn main() -> anyhow::Result<()> {
    let db_path = "basic_usage_dayline.db";
    fs::remove_file(db_path).ok(); // Clean up previous run

    println!("--- Basic Usage of dayline-core ---");

    // Open a session over a fresh database
    let today = Local::now().date_naive();
    let store = SqliteSnapshotStore::open(db_path)?;
    let mut session = Session::open(store, today)?;
    println!("   ✓ Session opened for {}", today);

    // ========== Write an outline ==========
    println!("\n1. Writing today's outline...");
    let first = session
        .entry(today)
        .map(|e| e.first_block().id.clone())
        .ok_or_else(|| anyhow::anyhow!("today's entry is missing"))?;

    session.dispatch_outline(
        today,
        &OutlineCommand::SetContent {
            block_id: first.clone(),
            content: "Standup".to_string(),
        },
    )?;

    let child = match session.dispatch_outline(today, &OutlineCommand::InsertAfter { block_id: first })? {
        Some(Outcome::Edited(edit)) => edit.focus.map(|f| f.block_id),
        _ => None,
    };
    if let Some(child) = child {
        session.dispatch_outline(today, &OutlineCommand::Indent { block_id: child.clone() })?;
        session.dispatch_outline(
            today,
            &OutlineCommand::SetContent {
                block_id: child,
                content: "Ship the release notes".to_string(),
            },
        )?;
    }

    if let Some(entry) = session.entry(today) {
        for block in entry.blocks() {
            println!("   {}- {}", "  ".repeat(block.level), block.content);
        }
    }

    // ========== Slash commands ==========
    println!("\n2. Searching the slash catalog...");
    let catalog = slash::search(&slash::default_catalog(), "time");
    let stack = CatalogStack::new(catalog);
    for command in stack.current() {
        println!("   ✓ {} ({} sub-commands)", command.name, command.sub_commands.len());
        if let Navigation::Descend(inner) = slash::navigate(&stack, command) {
            for sub in inner.current() {
                println!("       - {}", sub.name);
            }
        }
    }

    // ========== Tasks ==========
    println!("\n3. Building a task tree...");
    let release = TaskNode::new("Release 1.2");
    let release_id = release.id.clone();
    session.dispatch_task(&TaskCommand::Add { task: release, parent_id: None })?;
    for title in ["Write changelog", "Tag build", "Announce"] {
        session.dispatch_task(&TaskCommand::Add {
            task: TaskNode::new(title),
            parent_id: Some(release_id.clone()),
        })?;
    }

    let first_child = tasks::find_task(session.forest(), &release_id)
        .and_then(|t| t.children.first())
        .map(|t| t.id.clone());
    if let Some(task_id) = first_child {
        session.dispatch_task(&TaskCommand::SetStatus {
            task_id,
            status: TaskStatus::Completed,
            cascade: false,
        })?;
    }

    if let Some(release) = tasks::find_task(session.forest(), &release_id) {
        println!("   ✓ {} is {}% done", release.title, tasks::progress(release));
    }

    println!("\n--- Done. Database written to {} ---", db_path);
    Ok(())
}
