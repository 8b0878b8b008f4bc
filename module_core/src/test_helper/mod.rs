// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Event, EventBus, EventKind, EventKindType, ModuleCtx};
use std::{
    collections::HashMap,
    io::ErrorKind,
    sync::{LazyLock, RwLock},
};
use tokio::time::timeout;
use tracing::{debug, error};

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// Publishes a [`QuitEvent`](EventKind::QuitEvent) through the given [`EventBus`]
/// and waits up to 100 ms for the module's task to complete.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within the timeout.
/// - The task panicked or returned `Err(())`.
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits for the first event of type `exp_event` on `rx`.
///
/// The total waiting time is divided into ten polling steps so the function
/// stays responsive to lagging receivers.
///
/// # Panics
///
/// Panics if no matching event is received within `duration`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let steps = 10;
    let step_duration = duration / steps;
    for _ in 0..steps {
        while let Ok(Ok(event)) = timeout(step_duration, rx.recv()).await {
            if EventKindType::from(&event.kind) == exp_event {
                return event;
            }
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

static RESPONSE_HANDLERS_CACHE: LazyLock<
    RwLock<HashMap<(usize, EventKindType), ResponseHandler>>,
> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registers an automatic responder for a request event type.
///
/// Whenever an event whose type matches `request_type` is seen on `ctx`,
/// `response_event` is published on the same bus. Used to stand in for a
/// module the module under test talks to.
///
/// Returns `Err` with `ErrorKind::AlreadyExists` if a handler for
/// `request_type` is already registered on this bus.
pub fn register_response_event(
    request_type: EventKindType,
    response_event: Event,
    ctx: ModuleCtx,
) -> Result<(), std::io::Error> {
    let bus_id = ctx.bus_id();
    let mut cache = RESPONSE_HANDLERS_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner());
    if cache.contains_key(&(bus_id, request_type)) {
        error!(
            "Response handler for request type {:?} already registered",
            (bus_id, request_type)
        );
        return Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("Response handler for request type {request_type:?} already exists"),
        ));
    }
    cache.insert(
        (bus_id, request_type),
        ResponseHandler::new(ctx, request_type, response_event),
    );
    debug!("Registered response handler for request type {:?}", request_type);
    Ok(())
}

/// Removes a responder registered with [`register_response_event`] and aborts its task.
pub fn unregister_response_event(bus_id: usize, request_type: &EventKindType) {
    let mut cache = RESPONSE_HANDLERS_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner());
    if cache.remove(&(bus_id, *request_type)).is_some() {
        debug!("Unregistered response handler for request type {:?}", request_type);
    }
}

/// Owns the background task of a registered responder; aborts it on drop.
#[derive(Debug)]
struct ResponseHandler {
    handle: tokio::task::JoinHandle<()>,
}

impl ResponseHandler {
    fn new(mut ctx: ModuleCtx, request_type: EventKindType, response: Event) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                match ctx.receiver.recv().await {
                    Ok(event) => {
                        if EventKindType::from(&event.kind) == request_type {
                            debug!("Sending response for request type {:?}", request_type);
                            let _ = ctx.sender.send(response.clone());
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    Err(e) => debug!("ResponseHandler lagged. Error: {}", e),
                }
            }
        });
        ResponseHandler { handle }
    }
}

impl Drop for ResponseHandler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
