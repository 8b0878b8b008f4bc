// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::cli::Command;
use chrono::NaiveDate;
use common::{
    day_clock::{DayClock, LocalDayClock},
    distance::EntryError,
    entry::{NewEntry, RunEntry},
    history::format_history,
    summary::Summary,
};
use module_core::{
    Event, EventKind, EventKindType, ModuleCtx, Request, RequestError, Viewport, payload_ref,
};
use std::{io::Write, path::Path, sync::Arc};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Address of the command line front end on the event bus.
pub const FRONTEND_ADDR: u64 = 1;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("Unexpected response {0:?}")]
    UnexpectedResponse(EventKindType),
    #[error(
        "Invalid size {width}x{height}, expected at least {}x{}",
        Viewport::MIN.width,
        Viewport::MIN.height
    )]
    InvalidViewport { width: f64, height: f64 },
    #[error("The change could not be written to the data file")]
    NotPersisted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs one command line command against the modules on the bus.
///
/// `R` is where confirmations are read from, `W` where the results are
/// written to.
pub struct Frontend<R, W, C: DayClock = LocalDayClock> {
    ctx: ModuleCtx,
    input: R,
    out: W,
    clock: C,
    next_request_id: u64,
}

impl<R, W> Frontend<R, W, LocalDayClock>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(ctx: ModuleCtx, input: R, out: W) -> Self {
        Frontend::new_with_clock(ctx, input, out, LocalDayClock::new())
    }
}

impl<R, W, C> Frontend<R, W, C>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    C: DayClock,
{
    pub fn new_with_clock(ctx: ModuleCtx, input: R, out: W, clock: C) -> Self {
        Frontend {
            ctx,
            input,
            out,
            clock,
            next_request_id: 0,
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Executes `command` and stops all modules afterwards.
    pub async fn run(&mut self, command: &Command) -> Result<(), FrontendError> {
        let result = self.execute(command).await;
        self.quit();
        result
    }

    pub fn quit(&self) {
        debug!("Stopping modules");
        let _ = self.ctx.publish_event(EventKind::QuitEvent);
    }

    pub async fn execute(&mut self, command: &Command) -> Result<(), FrontendError> {
        match command {
            Command::Add { distance, date } => self.add(distance, *date).await,
            Command::RemoveLast => self.remove_last().await,
            Command::Clear { yes } => self.clear(*yes).await,
            Command::List => self.list().await,
            Command::Stats { json } => self.stats(*json).await,
            Command::Render {
                output,
                width,
                height,
            } => {
                self.render(
                    output.as_deref(),
                    Viewport {
                        width: *width,
                        height: *height,
                    },
                )
                .await
            }
        }
    }

    async fn request(
        &mut self,
        kind: impl FnOnce(u64) -> EventKind,
        response_type: EventKindType,
    ) -> Result<Event, FrontendError> {
        self.next_request_id += 1;
        let id = self.next_request_id;
        Ok(self
            .ctx
            .request(kind(id), id, FRONTEND_ADDR, &response_type)
            .await?)
    }

    fn empty(id: u64) -> Arc<Request<()>> {
        Request::empty_request(id, FRONTEND_ADDR)
    }

    fn check_persisted(persisted: bool) -> Result<(), FrontendError> {
        if persisted {
            Ok(())
        } else {
            warn!("Change is not persisted");
            Err(FrontendError::NotPersisted)
        }
    }

    async fn add(&mut self, distance: &str, date: Option<NaiveDate>) -> Result<(), FrontendError> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let new_entry = NewEntry::new(date, distance);
        let event = self
            .request(
                |id| {
                    EventKind::AddEntryRequestEvent(Arc::new(Request {
                        id,
                        sender_addr: FRONTEND_ADDR,
                        data: new_entry,
                    }))
                },
                EventKindType::AddEntryResponseEvent,
            )
            .await?;
        let response = payload_ref!(event.kind, EventKind::AddEntryResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?;
        let mutation = response.data.clone()?;
        writeln!(
            self.out,
            "Added {:.2} km on {}",
            mutation.value.kilometers, mutation.value.date
        )?;
        Self::check_persisted(mutation.persisted)
    }

    async fn remove_last(&mut self) -> Result<(), FrontendError> {
        let event = self
            .request(
                |id| EventKind::RemoveLastEntryRequestEvent(Self::empty(id)),
                EventKindType::RemoveLastEntryResponseEvent,
            )
            .await?;
        let response = payload_ref!(event.kind, EventKind::RemoveLastEntryResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?;
        match &response.data.value {
            Some(entry) => writeln!(
                self.out,
                "Removed {:.2} km on {}",
                entry.kilometers, entry.date
            )?,
            None => writeln!(self.out, "No entries to remove")?,
        }
        Self::check_persisted(response.data.persisted)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, FrontendError> {
        write!(self.out, "{question} [y/N] ")?;
        self.out.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer).await?;
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    async fn clear(&mut self, yes: bool) -> Result<(), FrontendError> {
        if !yes && !self.confirm("Remove all entries?").await? {
            writeln!(self.out, "Nothing removed")?;
            return Ok(());
        }
        let event = self
            .request(
                |id| EventKind::ClearEntriesRequestEvent(Self::empty(id)),
                EventKindType::ClearEntriesResponseEvent,
            )
            .await?;
        let response = payload_ref!(event.kind, EventKind::ClearEntriesResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?;
        writeln!(self.out, "Removed {} entries", response.data.value)?;
        Self::check_persisted(response.data.persisted)
    }

    async fn entries(&mut self) -> Result<Vec<RunEntry>, FrontendError> {
        let event = self
            .request(
                |id| EventKind::EntriesRequestEvent(Self::empty(id)),
                EventKindType::EntriesResponseEvent,
            )
            .await?;
        let response = payload_ref!(event.kind, EventKind::EntriesResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?;
        Ok(response.data.clone())
    }

    async fn list(&mut self) -> Result<(), FrontendError> {
        let entries = self.entries().await?;
        write!(self.out, "{}", format_history(&entries))?;
        Ok(())
    }

    async fn stats(&mut self, json: bool) -> Result<(), FrontendError> {
        let event = self
            .request(
                |id| EventKind::SummaryRequestEvent(Self::empty(id)),
                EventKindType::SummaryResponseEvent,
            )
            .await?;
        let summary = &payload_ref!(event.kind, EventKind::SummaryResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?
            .data;
        if json {
            writeln!(self.out, "{}", Summary::to_json(summary)?)?;
        } else {
            for line in summary.lines() {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }

    async fn render(&mut self, output: Option<&Path>, viewport: Viewport) -> Result<(), FrontendError> {
        if !viewport.width.is_finite() || !viewport.height.is_finite() || !viewport.fits_min() {
            return Err(FrontendError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        // The run log answers only after it published the loaded progress,
        // so the track view has seen it before the render request.
        self.entries().await?;
        let event = self
            .request(
                |id| {
                    EventKind::RenderTrackRequestEvent(Arc::new(Request {
                        id,
                        sender_addr: FRONTEND_ADDR,
                        data: viewport,
                    }))
                },
                EventKindType::RenderTrackResponseEvent,
            )
            .await?;
        let svg = &payload_ref!(event.kind, EventKind::RenderTrackResponseEvent)
            .ok_or(FrontendError::UnexpectedResponse(event.event_type()))?
            .data;
        match output {
            Some(path) => {
                tokio::fs::write(path, svg).await?;
                info!("Wrote track to {}", path.display());
                writeln!(self.out, "Wrote {}", path.display())?;
            }
            None => write!(self.out, "{svg}")?,
        }
        Ok(())
    }
}
