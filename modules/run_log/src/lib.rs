// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Run log Modul for the run tracker
//!
//! Owns the in-memory list of runs, validates new entries and keeps the data
//! file in sync after every change.

use async_trait::async_trait;
use common::{
    day_clock::{DayClock, LocalDayClock},
    entry::RunEntry,
    summary::Summary,
};
use module_core::{
    AddEntryRequestPtr, AddEntryResponsePtr, ClearEntriesResponsePtr, EmptyRequestPtr,
    EntriesResponsePtr, Event, EventKind, EventKindType, Module, ModuleCtx, Mutation, Progress,
    RemoveLastEntryResponsePtr, Request, Response, SaveEntriesRequestPtr, SummaryResponsePtr,
    payload_ref,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Address the run log uses for its own requests to the storage.
pub const RUN_LOG_ADDR: u64 = 40;

/// The run log module.
///
/// It is the only owner of the entries: the front end changes them through
/// request events, the storage only ever sees complete snapshots.
///
/// # Type Parameters
/// - `C`: The clock used for "today" in the statistics. Defaults to [`LocalDayClock`].
pub struct RunLog<C: DayClock = LocalDayClock> {
    ctx: ModuleCtx,
    entries: Vec<RunEntry>,
    goal_km: f64,
    clock: C,
    next_request_id: u64,
}

impl RunLog<LocalDayClock> {
    pub fn new(goal_km: f64, ctx: ModuleCtx) -> Self {
        RunLog::new_with_clock(goal_km, LocalDayClock::new(), ctx)
    }
}

impl<C: DayClock> RunLog<C> {
    pub fn new_with_clock(goal_km: f64, clock: C, ctx: ModuleCtx) -> Self {
        RunLog {
            ctx,
            entries: vec![],
            goal_km,
            clock,
            next_request_id: 0,
        }
    }

    fn request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn total_km(&self) -> f64 {
        self.entries.iter().map(|e| e.kilometers).sum()
    }

    /// Replaces the entries with the content of the storage.
    ///
    /// A failing storage leaves the log empty; the application keeps working
    /// in memory. Events that arrive while waiting are kept in `pending`.
    /// Returns `false` if a [`EventKind::QuitEvent`] arrived first.
    async fn load(&mut self, pending: &mut Vec<Event>) -> bool {
        let id = self.request_id();
        let sender = self.ctx.sender.clone();
        let loading = module_core::request(
            &sender,
            EventKind::LoadEntriesRequestEvent(Request::empty_request(id, RUN_LOG_ADDR)),
            id,
            RUN_LOG_ADDR,
            &EventKindType::LoadEntriesResponseEvent,
        );
        tokio::pin!(loading);
        let response = loop {
            tokio::select! {
                biased;
                result = &mut loading => break result,
                event = self.ctx.receiver.recv() => match event {
                    Ok(Event { kind: EventKind::QuitEvent }) => {
                        info!("Stopped while loading entries");
                        return false;
                    }
                    Ok(event) => pending.push(event),
                    Err(e) => error!("Failed to receive event in module RunLog. Error:{e}"),
                },
            }
        };
        match response {
            Ok(event) => match payload_ref!(event.kind, EventKind::LoadEntriesResponseEvent) {
                Some(response) => match &response.data {
                    Ok(entries) => {
                        info!("Loaded {} entries", entries.len());
                        self.entries = entries.clone();
                    }
                    Err(kind) => warn!("Failed to load entries. Error: {}", kind),
                },
                None => error!("Load response without payload"),
            },
            Err(e) => warn!("No response from storage while loading entries: {}", e),
        }
        true
    }

    /// Writes the current entries to the storage.
    ///
    /// Returns `false` if the write failed. A failed write is only a warning,
    /// the in-memory state stays valid.
    async fn persist(&mut self) -> bool {
        let id = self.request_id();
        let request = SaveEntriesRequestPtr::new(Request {
            id,
            sender_addr: RUN_LOG_ADDR,
            data: self.entries.clone(),
        });
        let response = self
            .ctx
            .request(
                EventKind::SaveEntriesRequestEvent(request),
                id,
                RUN_LOG_ADDR,
                &EventKindType::SaveEntriesResponseEvent,
            )
            .await;
        match response {
            Ok(event) => match payload_ref!(event.kind, EventKind::SaveEntriesResponseEvent) {
                Some(response) => match response.data {
                    Ok(()) => true,
                    Err(kind) => {
                        warn!("Entries are not persisted. Error: {}", kind);
                        false
                    }
                },
                None => false,
            },
            Err(e) => {
                warn!("No response from storage while saving entries: {:?}", e);
                false
            }
        }
    }

    fn publish_progress(&self) {
        let progress = Progress {
            current_km: self.total_km(),
            total_km: self.goal_km,
        };
        debug!("Publishing progress {:?}", progress);
        let _ = self
            .ctx
            .publish_event(EventKind::ProgressChangedEvent(Arc::new(progress)));
    }

    async fn on_add_entry(&mut self, request: AddEntryRequestPtr) {
        let data = match request.data.validate() {
            Ok(entry) => {
                info!("Adding {} km on {}", entry.kilometers, entry.date);
                self.entries.push(entry.clone());
                let persisted = self.persist().await;
                self.publish_progress();
                Ok(Mutation {
                    value: entry,
                    persisted,
                })
            }
            Err(e) => {
                info!("Rejected entry {:?}: {}", request.data.distance, e);
                Err(e)
            }
        };
        let _ = self
            .ctx
            .publish_event(EventKind::AddEntryResponseEvent(AddEntryResponsePtr::new(
                Response {
                    id: request.id,
                    receiver_addr: request.sender_addr,
                    data,
                },
            )));
    }

    async fn on_remove_last_entry(&mut self, request: EmptyRequestPtr) {
        let removed = self.entries.pop();
        let persisted = match &removed {
            Some(entry) => {
                info!("Removed {} km on {}", entry.kilometers, entry.date);
                let persisted = self.persist().await;
                self.publish_progress();
                persisted
            }
            None => true,
        };
        let _ = self.ctx.publish_event(EventKind::RemoveLastEntryResponseEvent(
            RemoveLastEntryResponsePtr::new(Response {
                id: request.id,
                receiver_addr: request.sender_addr,
                data: Mutation {
                    value: removed,
                    persisted,
                },
            }),
        ));
    }

    async fn on_clear_entries(&mut self, request: EmptyRequestPtr) {
        let removed = self.entries.len();
        let persisted = if removed > 0 {
            self.entries.clear();
            info!("Cleared {} entries", removed);
            let persisted = self.persist().await;
            self.publish_progress();
            persisted
        } else {
            true
        };
        let _ = self.ctx.publish_event(EventKind::ClearEntriesResponseEvent(
            ClearEntriesResponsePtr::new(Response {
                id: request.id,
                receiver_addr: request.sender_addr,
                data: Mutation {
                    value: removed,
                    persisted,
                },
            }),
        ));
    }

    fn on_entries(&self, request: EmptyRequestPtr) {
        let _ = self
            .ctx
            .publish_event(EventKind::EntriesResponseEvent(EntriesResponsePtr::new(
                Response {
                    id: request.id,
                    receiver_addr: request.sender_addr,
                    data: self.entries.clone(),
                },
            )));
    }

    fn on_summary(&self, request: EmptyRequestPtr) {
        let summary = Summary::compute(&self.entries, self.goal_km, self.clock.today());
        let _ = self
            .ctx
            .publish_event(EventKind::SummaryResponseEvent(SummaryResponsePtr::new(
                Response {
                    id: request.id,
                    receiver_addr: request.sender_addr,
                    data: summary,
                },
            )));
    }

    /// Dispatches one event; returns `false` for [`EventKind::QuitEvent`].
    async fn handle_event(&mut self, event: Event) -> bool {
        match event.kind {
            EventKind::QuitEvent => return false,
            EventKind::AddEntryRequestEvent(request) => self.on_add_entry(request).await,
            EventKind::RemoveLastEntryRequestEvent(request) => {
                self.on_remove_last_entry(request).await
            }
            EventKind::ClearEntriesRequestEvent(request) => self.on_clear_entries(request).await,
            EventKind::EntriesRequestEvent(request) => self.on_entries(request),
            EventKind::SummaryRequestEvent(request) => self.on_summary(request),
            _ => (),
        }
        true
    }
}

#[async_trait]
impl<C: DayClock + Send> Module for RunLog<C> {
    async fn run(&mut self) -> std::result::Result<(), ()> {
        let mut pending = Vec::new();
        if !self.load(&mut pending).await {
            return Ok(());
        }
        self.publish_progress();
        for event in pending {
            if !self.handle_event(event).await {
                return Ok(());
            }
        }
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => run = self.handle_event(event).await,
                        Err(e) => {
                            error!("Failed to receive event in module RunLog. Error:{e}");
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
