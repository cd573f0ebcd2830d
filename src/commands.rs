//! CLI entry points for document commands.
//!
//! Each `run_*` function opens the file store from config, calls the
//! [`DocumentService`], and prints the result to stdout, either as
//! aligned text or as JSON with `--json`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use docstore_core::Document;

use crate::config::Config;
use crate::file_store::FileStore;
use crate::service::{DocumentPatch, DocumentService, NewDocument};

fn open_store(config: &Config) -> Result<FileStore> {
    FileStore::open(&config.storage.path).with_context(|| {
        format!(
            "Failed to open document store at {}",
            config.storage.path.display()
        )
    })
}

fn open_service(config: &Config) -> Result<DocumentService> {
    Ok(DocumentService::new(Arc::new(open_store(config)?)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_document(doc: &Document) {
    println!("--- Document ---");
    println!("id:           {}", doc.id);
    println!("title:        {}", doc.title);
    println!("created_at:   {}", doc.created_at.to_rfc3339());
    println!("updated_at:   {}", doc.updated_at.to_rfc3339());
    println!();
    println!("--- Content ---");
    println!("{}", doc.content);
}

pub fn run_create(config: &Config, title: String, content: String, json: bool) -> Result<()> {
    let doc = open_service(config)?.create(NewDocument { title, content })?;
    if json {
        print_json(&doc)
    } else {
        println!("created {}", doc.id);
        Ok(())
    }
}

pub fn run_get(config: &Config, id: &str, json: bool) -> Result<()> {
    let doc = open_service(config)?.get(id)?;
    if json {
        print_json(&doc)
    } else {
        print_document(&doc);
        Ok(())
    }
}

pub fn run_list(config: &Config, json: bool) -> Result<()> {
    let summaries = open_service(config)?.list()?;
    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No documents.");
        return Ok(());
    }
    println!("{:<34} {:<26} TITLE", "ID", "UPDATED");
    for s in &summaries {
        println!(
            "{:<34} {:<26} {}",
            s.id,
            s.updated_at.format("%Y-%m-%dT%H:%M:%SZ"),
            s.title
        );
    }
    println!();
    println!("{} document(s)", summaries.len());
    Ok(())
}

pub fn run_update(
    config: &Config,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    json: bool,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        anyhow::bail!("nothing to update: pass --title and/or --content");
    }
    let doc = open_service(config)?.update(id, DocumentPatch { title, content })?;
    if json {
        print_json(&doc)
    } else {
        println!("updated {} at {}", doc.id, doc.updated_at.to_rfc3339());
        Ok(())
    }
}

/// Re-derive `index.json` from the record files.
pub fn run_reindex(config: &Config) -> Result<()> {
    let count = open_store(config)?.rebuild_index()?;
    tracing::info!(records = count, "index rebuilt");
    println!("indexed {} document(s)", count);
    Ok(())
}
