// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Core of the run tracker modules
//!
//! Provides the [`EventBus`], the [`Event`]s exchanged over it and the
//! [`Module`] trait every component of the application implements.

use common::{
    distance::EntryError,
    entry::{NewEntry, RunEntry},
    summary::Summary,
};
use std::{
    io::ErrorKind,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use strum_macros::EnumDiscriminants;
use thiserror::Error;
use tokio::{sync::broadcast, time::timeout};
use tracing::{debug, warn};

/// Time a requester waits for the matching response.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

/// A request addressed to whichever module handles its [`EventKind`].
///
/// `id` and `sender_addr` are chosen by the requester and echoed in the
/// [`Response`], so the requester can pick its answer out of the bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Request<T> {
    pub id: u64,
    pub sender_addr: u64,
    pub data: T,
}

impl Request<()> {
    pub fn empty_request(id: u64, sender_addr: u64) -> EmptyRequestPtr {
        Arc::new(Request {
            id,
            sender_addr,
            data: (),
        })
    }
}

/// The answer to a [`Request`], addressed back to its sender.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    pub id: u64,
    pub receiver_addr: u64,
    pub data: T,
}

impl<T> Response<T> {
    pub fn new(id: u64, receiver_addr: u64, data: T) -> Arc<Self> {
        Arc::new(Response {
            id,
            receiver_addr,
            data,
        })
    }
}

/// Distance run so far and the goal distance; the state of the track view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub current_km: f64,
    pub total_km: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Progress {
            current_km: 0.0,
            total_km: 1000.0,
        }
    }
}

/// Pixel size the track is rendered into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 500.0,
            height: 450.0,
        }
    }
}

impl Viewport {
    /// Smallest size the track is drawn at.
    pub const MIN: Viewport = Viewport {
        width: 400.0,
        height: 350.0,
    };

    /// Returns `true` if both sides are at least the ones of [`Viewport::MIN`].
    pub fn fits_min(&self) -> bool {
        self.width >= Viewport::MIN.width && self.height >= Viewport::MIN.height
    }

    /// Grows each side to at least the one of [`Viewport::MIN`].
    pub fn at_least_min(self) -> Viewport {
        Viewport {
            width: self.width.max(Viewport::MIN.width),
            height: self.height.max(Viewport::MIN.height),
        }
    }
}

/// Result of a change of the run log.
///
/// `persisted` is `false` when the change is applied in memory but could not
/// be written to the data file.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation<T> {
    pub value: T,
    pub persisted: bool,
}

pub type EmptyRequestPtr = Arc<Request<()>>;
pub type LoadEntriesResponsePtr = Arc<Response<Result<Vec<RunEntry>, ErrorKind>>>;
pub type SaveEntriesRequestPtr = Arc<Request<Vec<RunEntry>>>;
pub type SaveEntriesResponsePtr = Arc<Response<Result<(), ErrorKind>>>;
pub type AddEntryRequestPtr = Arc<Request<NewEntry>>;
pub type AddEntryResponsePtr = Arc<Response<Result<Mutation<RunEntry>, EntryError>>>;
pub type RemoveLastEntryResponsePtr = Arc<Response<Mutation<Option<RunEntry>>>>;
pub type ClearEntriesResponsePtr = Arc<Response<Mutation<usize>>>;
pub type EntriesResponsePtr = Arc<Response<Vec<RunEntry>>>;
pub type SummaryResponsePtr = Arc<Response<Summary>>;
pub type ProgressPtr = Arc<Progress>;
pub type RenderTrackRequestPtr = Arc<Request<Viewport>>;
pub type RenderTrackResponsePtr = Arc<Response<String>>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
///
/// The data-less twin [`EventKindType`] names an event without its payload
/// and is used to wait for a certain kind of event.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// Asks the storage for all persisted entries.
    LoadEntriesRequestEvent(EmptyRequestPtr),
    LoadEntriesResponseEvent(LoadEntriesResponsePtr),

    /// Asks the storage to replace the persisted entries with the payload.
    SaveEntriesRequestEvent(SaveEntriesRequestPtr),
    SaveEntriesResponseEvent(SaveEntriesResponsePtr),

    /// Asks the run log to validate and append an entry.
    AddEntryRequestEvent(AddEntryRequestPtr),
    AddEntryResponseEvent(AddEntryResponsePtr),

    /// Asks the run log to drop its most recent entry.
    RemoveLastEntryRequestEvent(EmptyRequestPtr),
    RemoveLastEntryResponseEvent(RemoveLastEntryResponsePtr),

    /// Asks the run log to drop all entries.
    ClearEntriesRequestEvent(EmptyRequestPtr),
    ClearEntriesResponseEvent(ClearEntriesResponsePtr),

    /// Asks the run log for its entries in insertion order.
    EntriesRequestEvent(EmptyRequestPtr),
    EntriesResponseEvent(EntriesResponsePtr),

    /// Asks the run log for the statistics of today.
    SummaryRequestEvent(EmptyRequestPtr),
    SummaryResponseEvent(SummaryResponsePtr),

    /// The distance run so far or the goal changed.
    ProgressChangedEvent(ProgressPtr),

    /// Asks the track view for an SVG document of the given size.
    RenderTrackRequestEvent(RenderTrackRequestPtr),
    RenderTrackResponseEvent(RenderTrackResponsePtr),
}

impl EventKind {
    /// Returns `(id, receiver_addr)` for response events, `None` otherwise.
    pub fn response_address(&self) -> Option<(u64, u64)> {
        match self {
            EventKind::LoadEntriesResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::SaveEntriesResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::AddEntryResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::RemoveLastEntryResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::ClearEntriesResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::EntriesResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::SummaryResponseEvent(r) => Some((r.id, r.receiver_addr)),
            EventKind::RenderTrackResponseEvent(r) => Some((r.id, r.receiver_addr)),
            _ => None,
        }
    }
}

/// Borrows the payload of an [`EventKind`] variant.
///
/// Evaluates to `Some(&payload)` when `$kind` is the given variant and `None`
/// otherwise.
///
/// ```rust
/// use module_core::{EventKind, Progress, payload_ref};
/// use std::sync::Arc;
///
/// let kind = EventKind::ProgressChangedEvent(Arc::new(Progress::default()));
/// let progress = payload_ref!(kind, EventKind::ProgressChangedEvent).unwrap();
/// assert_eq!(progress.total_km, 1000.0);
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

static NEXT_BUS_ID: AtomicUsize = AtomicUsize::new(0);

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: broadcast::Sender<Event>,
    id: usize,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        EventBus {
            sender,
            id: NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Subscribes to the event bus and returns a [`broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    ///
    /// The context subscribes immediately, so events published after this
    /// call are buffered for the module even before it starts running.
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

/// Provides a default instance of [`EventBus`].
impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until a [`EventKind::QuitEvent`] arrives.
    async fn run(&mut self) -> Result<(), ()>;
}

/// Reasons a request did not get its response.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// The event could not be published because nobody listens on the bus.
    #[error("Request not delivered, no module listens on the bus")]
    NotDelivered,
    /// No matching response arrived within [`RESPONSE_TIMEOUT`].
    #[error("No response within {} ms", RESPONSE_TIMEOUT.as_millis())]
    TimedOut,
    /// The bus was closed while waiting.
    #[error("Event bus closed while waiting for a response")]
    Closed,
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: broadcast::Receiver<Event>,

    bus_id: usize,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
            bus_id: event_bus.id,
        }
    }

    /// Identifies the bus this context is attached to.
    pub fn bus_id(&self) -> usize {
        self.bus_id
    }

    /// Creates an additional receiver that sees every event published from now on.
    pub fn receiver(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an event of the given kind.
    pub fn publish_event(&self, kind: EventKind) -> Result<(), RequestError> {
        self.sender
            .send(Event { kind })
            .map(|_| ())
            .map_err(|_| RequestError::NotDelivered)
    }

    /// Waits on the context's own receiver for the response `(id, addr)` of type `event_type`.
    ///
    /// Events that do not match are consumed and dropped, so only use this from
    /// a context that has nothing else to listen for, e.g. a front end.
    pub async fn wait_for_event(
        &mut self,
        id: u64,
        addr: u64,
        event_type: &EventKindType,
    ) -> Result<Event, RequestError> {
        wait_for_response(&mut self.receiver, id, addr, event_type, RESPONSE_TIMEOUT).await
    }

    /// Publishes a request and waits for its response.
    ///
    /// A separate receiver is subscribed before publishing, so the module's own
    /// receiver keeps every event that arrives meanwhile.
    pub async fn request(
        &self,
        kind: EventKind,
        id: u64,
        addr: u64,
        response_type: &EventKindType,
    ) -> Result<Event, RequestError> {
        request(&self.sender, kind, id, addr, response_type).await
    }
}

/// Publishes a request through `sender` and waits for its response.
///
/// Borrows only the sender, so a module can keep reading its own receiver
/// while the request is pending.
pub async fn request(
    sender: &broadcast::Sender<Event>,
    kind: EventKind,
    id: u64,
    addr: u64,
    response_type: &EventKindType,
) -> Result<Event, RequestError> {
    let mut receiver = sender.subscribe();
    sender
        .send(Event { kind })
        .map_err(|_| RequestError::NotDelivered)?;
    wait_for_response(&mut receiver, id, addr, response_type, RESPONSE_TIMEOUT).await
}

/// Receives events until the response `(id, addr)` of type `event_type` arrives.
pub async fn wait_for_response(
    receiver: &mut broadcast::Receiver<Event>,
    id: u64,
    addr: u64,
    event_type: &EventKindType,
    duration: Duration,
) -> Result<Event, RequestError> {
    let wait = async {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if event.event_type() == *event_type
                        && event.kind.response_address() == Some((id, addr))
                    {
                        debug!("Received {:?} for request id {}, addr {}", event_type, id, addr);
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Receiver lagged behind, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return Err(RequestError::Closed),
            }
        }
    };
    timeout(duration, wait)
        .await
        .unwrap_or(Err(RequestError::TimedOut))
}

pub mod test_helper;
