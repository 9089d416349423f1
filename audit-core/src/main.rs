//! src/main.rs
//! ============================================================================
//! `audit` CLI: one checklist action per invocation

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use audit_core::{
    AuditSession, Logger,
    config::Config,
    controller::{Action, NodeRef, Outcome},
    exchange::export::ALL_FILES_SECTION,
    model::{FileRecord, RecordId},
    storage::{ChecklistStorage, DirStore},
};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path).await,
        None => Config::load().await,
    }
    .context("Failed to load configuration")?;
    if cli.log_stderr {
        config.logging.stderr = true;
    }
    let _log_guard = Logger::init(&config.logging).context("Failed to initialize logging")?;

    let data_dir: PathBuf = match cli.data_dir {
        Some(dir) => dir,
        None => config
            .storage
            .resolved_data_dir()
            .context("Failed to resolve data directory")?,
    };
    let storage = ChecklistStorage::new(
        DirStore::open(&data_dir)
            .await
            .context("Failed to open checklist storage")?,
        config.seed_defaults,
    );

    let records = storage
        .load_records(Utc::now())
        .await
        .context("Failed to load checklist")?;
    let view = storage.load_view().await.context("Failed to load view state")?;
    let mut session = AuditSession::new(records, view, &config.debounce);

    let result = run(&mut session, cli.command).await;
    if let Err(e) = &result {
        warn!("command failed: {e:#}");
    }

    if session.flush() {
        storage
            .save_records(session.records())
            .await
            .context("Failed to save checklist")?;
    }
    storage
        .save_view(&session.view_state())
        .await
        .context("Failed to save view state")?;

    info!("audit exited");
    result
}

async fn run(session: &mut AuditSession, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            status,
            priority,
            search,
            folder,
            all_files,
        } => {
            if all_files {
                session.dispatch(Action::SelectFolder(None))?;
            } else if let Some(folder) = folder {
                session.dispatch(Action::SelectFolder(Some(folder)))?;
            }
            if let Some(status) = status {
                session.dispatch(Action::SetStatusFilter(status))?;
            }
            if let Some(priority) = priority {
                session.dispatch(Action::SetPriorityFilter(priority))?;
            }
            if let Some(search) = search {
                session.dispatch(Action::SetSearch(search))?;
            }
            print_list(session);
        }
        Commands::Tree => print_tree(session),
        Commands::Folders => session.unique_folders().iter().for_each(|f| println!("{f}")),
        Commands::Stats => {
            let stats = session.stats();
            println!(
                "{}/{} checked ({}%)",
                stats.checked, stats.total, stats.percentage
            );
        }

        Commands::Add { path } => report(session.dispatch(Action::AddFile(path))?),
        Commands::AddIn { folder, name } => {
            report(session.dispatch(Action::AddFileInFolder { folder, name })?);
        }
        Commands::Mkdir { name } => report(session.dispatch(Action::CreateFolder(name))?),
        Commands::Check { id } => report(session.dispatch(Action::SetChecked {
            id: resolve(session, &id),
            checked: true,
        })?),
        Commands::Uncheck { id } => report(session.dispatch(Action::SetChecked {
            id: resolve(session, &id),
            checked: false,
        })?),
        Commands::Toggle { id } => {
            report(session.dispatch(Action::ToggleChecked(resolve(session, &id)))?);
        }
        Commands::Note { id, text } => report(session.dispatch(Action::SetNotes {
            id: resolve(session, &id),
            notes: text,
        })?),
        Commands::Priority { id, level } => report(session.dispatch(Action::SetPriority {
            id: resolve(session, &id),
            priority: level,
        })?),
        Commands::Changed { id, value } => report(session.dispatch(Action::SetHasChanges {
            id: resolve(session, &id),
            has_changes: value,
        })?),
        Commands::Rm { id } => report(session.dispatch(Action::Delete(resolve(session, &id)))?),
        Commands::Clear => report(session.dispatch(Action::ClearAll)?),
        Commands::Rename { id, path } => report(session.dispatch(Action::RenameRecord {
            id: resolve(session, &id),
            path,
        })?),
        Commands::RenameFolder { old, new } => {
            report(session.dispatch(Action::RenameFolder { old, new })?);
        }
        Commands::Mv {
            source,
            target,
            folder,
        } => {
            let source = if folder {
                NodeRef::folder(source)
            } else {
                NodeRef::file(&resolve(session, &source))
            };
            report(session.dispatch(Action::Move {
                source,
                target: NodeRef::folder(target),
            })?);
        }

        Commands::Select { folder, all } => {
            let folder = if all { None } else { folder };
            session.dispatch(Action::SelectFolder(folder))?;
            print_list(session);
        }
        Commands::Expand { folder } => {
            session.dispatch(Action::ExpandFolder(folder))?;
            print_tree(session);
        }
        Commands::CollapseAll => {
            session.dispatch(Action::CollapseAll)?;
            print_tree(session);
        }
        Commands::Refresh => {
            session.dispatch(Action::Refresh)?;
            print_tree(session);
        }
        Commands::Reveal { id } => {
            report(session.dispatch(Action::RevealFile(resolve(session, &id)))?);
            print_tree(session);
        }

        Commands::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            report(session.dispatch(Action::Import(text))?);
        }
        Commands::Export { out } => {
            let (file_name, doc) = session.export(Utc::now());
            let out = out.unwrap_or_else(|| PathBuf::from(file_name));
            tokio::fs::write(&out, doc.to_json_pretty()?)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("exported {} file(s) to {}", doc.total_files, out.display());
        }
    }
    Ok(())
}

/// Accept either a record id or an exact path.
fn resolve(session: &AuditSession, raw: &str) -> RecordId {
    let id = RecordId::from(raw);
    if session.store().get(&id).is_some() {
        return id;
    }
    session
        .store()
        .find_by_path(raw)
        .map_or(id, |record| record.id.clone())
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Unchanged => println!("no change"),
        Outcome::Updated | Outcome::Pending | Outcome::Highlighted(_) => println!("ok"),
        Outcome::Added(id) => println!("added {id}"),
        Outcome::Removed(record) => println!("removed {}", record.path),
        Outcome::Checked(checked) => println!("{}", if checked { "checked" } else { "unchecked" }),
        Outcome::Moved(count) => println!("moved {count} record(s)"),
        Outcome::Replaced(count) => println!("imported {count} record(s)"),
        Outcome::Cleared(count) => println!("cleared {count} record(s)"),
    }
}

const fn mark(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn print_record(record: &FileRecord) {
    let changed = if record.has_changes { " *changed" } else { "" };
    println!(
        "{} {:<40} {:<6} {}{changed}",
        mark(record.checked),
        record.path,
        record.priority.as_str(),
        record.id
    );
    if !record.notes.is_empty() {
        println!("      {}", record.notes);
    }
}

fn print_list(session: &AuditSession) {
    let view = session.visible();
    let filter = session.filter();
    let section = session
        .navigation()
        .selected_folder
        .as_deref()
        .unwrap_or(ALL_FILES_SECTION);

    println!(
        "{section} | all {} | pending {} | completed {} | changed {} | status={} priority={} search={:?}",
        view.counts.all,
        view.counts.pending,
        view.counts.completed,
        view.counts.changed,
        filter.status_filter,
        filter.priority_filter,
        filter.search_text,
    );
    view.visible.into_iter().for_each(print_record);
}

fn print_tree(session: &AuditSession) {
    let tree = session.tree();
    let completion = session.completion();
    let navigation = session.navigation();

    for row in tree.visible_rows(&navigation.expanded_folders) {
        let indent = "  ".repeat(row.depth);
        let node = row.node;
        match node.record {
            Some(record) => {
                let active = if navigation.active_file_id.as_ref() == Some(&record.id) {
                    " <"
                } else {
                    ""
                };
                println!("{indent}{} {}{active}", mark(record.checked), node.name);
            }
            None => {
                let arrow = if row.expanded { "v" } else { ">" };
                let done = if completion.is_complete(&node.id) { " done" } else { "" };
                let selected = if navigation.selected_folder.as_deref() == Some(node.id.as_str()) {
                    " *"
                } else {
                    ""
                };
                println!(
                    "{indent}{arrow} {}/ ({}){done}{selected}",
                    node.name,
                    node.file_count()
                );
            }
        }
    }
}
