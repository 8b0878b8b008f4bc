// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Storage Modul for the run tracker
//!
//! Persists the run log as a flat text file with one `<date>,<distance>` line per run.

use chrono::NaiveDate;
use common::{entry::RunEntry, serde::iso_date};
use module_core::{
    EmptyRequestPtr, Event, EventKind, LoadEntriesResponsePtr, ModuleCtx, Response,
    SaveEntriesRequestPtr, SaveEntriesResponsePtr,
};
use std::{
    fs::DirBuilder,
    io::{self},
    path::{Path, PathBuf},
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Parses the content of a data file.
///
/// Every line must hold exactly two comma separated fields, an ISO-8601 date
/// and a positive distance in kilometers. Lines that do not are skipped
/// without affecting the others; blank lines are ignored. Quotes have no
/// meaning, so a stray `"` only spoils its own line.
pub fn parse_entries(content: &str) -> Vec<RunEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping unreadable line {}. Error: {}", line + 1, e);
                continue;
            }
        };
        if record.len() != 2 {
            debug!(
                "Skipping line {} with {} fields instead of 2",
                line + 1,
                record.len()
            );
            continue;
        }
        let date = NaiveDate::parse_from_str(&record[0], iso_date::FORMAT);
        let kilometers = record[1].parse::<f64>();
        match (date, kilometers) {
            (Ok(date), Ok(kilometers)) if kilometers.is_finite() && kilometers > 0.0 => {
                entries.push(RunEntry::new(date, kilometers))
            }
            _ => debug!("Skipping malformed line {}: {:?}", line + 1, record),
        }
    }
    entries
}

/// Serializes entries into the data file format, one line per entry.
///
/// Distances are written with the shortest representation that parses back to
/// the same value.
pub fn serialize_entries(entries: &[RunEntry]) -> io::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(vec![]);
    for entry in entries {
        writer.write_record([
            entry.date.format(iso_date::FORMAT).to_string(),
            entry.kilometers.to_string(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// A file based implementation of the run log storage.
///
/// The whole file is rewritten on every save; appending is not supported.
///
/// ## Important
///
/// `FlatFileStorage` **does not implement any internal synchronization or locking mechanisms**.
/// Therefore, **only one instance should be used per data file at any time**.
pub struct FlatFileStorage {
    file_path: PathBuf,
    module_ctx: ModuleCtx,
}

impl FlatFileStorage {
    pub fn new(file_path: &Path, ctx: ModuleCtx) -> Self {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = DirBuilder::new().recursive(true).create(parent)
        {
            error!(
                "Failed to create data folder {}. Error: {}",
                parent.to_string_lossy(),
                e
            );
        }
        info!("Using data file: {}", file_path.to_string_lossy());
        FlatFileStorage {
            file_path: file_path.to_path_buf(),
            module_ctx: ctx,
        }
    }

    /// Reads all entries from the data file.
    ///
    /// A missing file is an empty log, not an error.
    async fn load(&self) -> io::Result<Vec<RunEntry>> {
        match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => Ok(parse_entries(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "No data file {} yet, starting with an empty log",
                    self.file_path.to_string_lossy()
                );
                Ok(vec![])
            }
            Err(e) => Err(e),
        }
    }

    /// Replaces the content of the data file with `entries`.
    ///
    /// The file is created or truncated, written and flushed to disk via `sync_all`.
    async fn save(&self, entries: &[RunEntry]) -> io::Result<()> {
        let content = serialize_entries(entries)?;
        let mut file = tokio::fs::File::create(&self.file_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn handle_load_request(&self, req: &EmptyRequestPtr) {
        let data = match self.load().await {
            Ok(entries) => {
                debug!(
                    "Loaded {} entries from {}",
                    entries.len(),
                    self.file_path.to_string_lossy()
                );
                Ok(entries)
            }
            Err(e) => {
                error!(
                    "Failed to load entries from {}. Error: {}",
                    self.file_path.to_string_lossy(),
                    e
                );
                Err(e.kind())
            }
        };
        let resp = LoadEntriesResponsePtr::new(Response {
            id: req.id,
            receiver_addr: req.sender_addr,
            data,
        });
        let _ = self.module_ctx.sender.send(Event {
            kind: EventKind::LoadEntriesResponseEvent(resp),
        });
    }

    async fn handle_save_request(&self, req: &SaveEntriesRequestPtr) {
        let data = match self.save(&req.data).await {
            Ok(()) => {
                debug!(
                    "Stored {} entries in {}",
                    req.data.len(),
                    self.file_path.to_string_lossy()
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to store entries in {}. Error: {}",
                    self.file_path.to_string_lossy(),
                    e
                );
                Err(e.kind())
            }
        };
        let resp = SaveEntriesResponsePtr::new(Response {
            id: req.id,
            receiver_addr: req.sender_addr,
            data,
        });
        let _ = self.module_ctx.sender.send(Event {
            kind: EventKind::SaveEntriesResponseEvent(resp),
        });
    }
}

#[async_trait::async_trait]
impl module_core::Module for FlatFileStorage {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.module_ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::LoadEntriesRequestEvent(request) => {
                                    self.handle_load_request(&request).await;
                                },
                                EventKind::SaveEntriesRequestEvent(request) => {
                                    self.handle_save_request(&request).await;
                                },
                                _ => ()
                            }
                        }
                        Err(e) => error!("Failed to receive event in module FlatFileStorage. Error: {}", e),
                    }
                }
            }
        }
        Ok(())
    }
}
