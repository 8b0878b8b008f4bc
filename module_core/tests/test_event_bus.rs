// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use module_core::{test_helper::register_response_event, *};
use std::sync::Arc;

#[tokio::test]
#[test_log::test]
pub async fn events_delivered() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let event = Event {
        kind: EventKind::QuitEvent,
    };
    event_bus.publish(&event);
    let received_event =
        tokio::time::timeout(std::time::Duration::from_millis(100), receiver.recv())
            .await
            .expect("Failed to receive event in required time")
            .unwrap();
    assert_eq!(received_event.event_type(), event.event_type());
}

#[tokio::test]
#[test_log::test]
pub async fn context_buffers_events_before_running() {
    let event_bus = EventBus::new();
    let mut ctx = event_bus.context();
    event_bus.publish(&Event {
        kind: EventKind::ProgressChangedEvent(Arc::new(Progress {
            current_km: 12.0,
            total_km: 100.0,
        })),
    });
    let event = ctx.receiver.recv().await.unwrap();
    let progress = payload_ref!(event.kind, EventKind::ProgressChangedEvent).unwrap();
    assert_eq!(progress.current_km, 12.0);
}

#[tokio::test]
#[test_log::test]
pub async fn test_wait_for_event() {
    let event_bus = EventBus::new();
    let mut ctx = event_bus.context();
    if register_response_event(
        EventKindType::EntriesRequestEvent,
        Event {
            kind: EventKind::EntriesResponseEvent(Response::new(0, 0xFA, vec![])),
        },
        event_bus.context(),
    )
    .is_err()
    {
        panic!("Failed to register response event");
    }
    if ctx
        .publish_event(EventKind::EntriesRequestEvent(Request::empty_request(
            0, 0xFA,
        )))
        .is_err()
    {
        panic!("Failed to publish request event");
    }
    let event = ctx
        .wait_for_event(0, 0xFA, &EventKindType::EntriesResponseEvent)
        .await
        .unwrap();
    let response = payload_ref!(event.kind, EventKind::EntriesResponseEvent).unwrap();
    assert_eq!(response.id, 0);
    assert_eq!(response.receiver_addr, 0xFA);
    assert!(response.data.is_empty());
}

#[tokio::test]
#[test_log::test]
pub async fn request_ignores_responses_for_other_receivers() {
    let event_bus = EventBus::new();
    let ctx = event_bus.context();
    let responder = event_bus.context();
    tokio::spawn(async move {
        let mut responder = responder;
        while let Ok(event) = responder.receiver.recv().await {
            if let Some(request) = payload_ref!(event.kind, EventKind::ClearEntriesRequestEvent) {
                let _ = responder.publish_event(EventKind::ClearEntriesResponseEvent(
                    Response::new(
                        request.id,
                        request.sender_addr + 1,
                        Mutation {
                            value: 1,
                            persisted: true,
                        },
                    ),
                ));
                let _ = responder.publish_event(EventKind::ClearEntriesResponseEvent(
                    Response::new(
                        request.id,
                        request.sender_addr,
                        Mutation {
                            value: 2,
                            persisted: true,
                        },
                    ),
                ));
            }
        }
    });

    let event = ctx
        .request(
            EventKind::ClearEntriesRequestEvent(Request::empty_request(7, 3)),
            7,
            3,
            &EventKindType::ClearEntriesResponseEvent,
        )
        .await
        .unwrap();
    let response = payload_ref!(event.kind, EventKind::ClearEntriesResponseEvent).unwrap();
    assert_eq!(response.data.value, 2);
}

#[tokio::test]
#[test_log::test]
pub async fn wait_for_response_times_out_without_responder() {
    let event_bus = EventBus::new();
    let ctx = event_bus.context();
    let mut receiver = ctx.receiver();
    ctx.publish_event(EventKind::SummaryRequestEvent(Request::empty_request(1, 1)))
        .unwrap();
    let result = wait_for_response(
        &mut receiver,
        1,
        1,
        &EventKindType::SummaryResponseEvent,
        std::time::Duration::from_millis(50),
    )
    .await;
    assert_eq!(result, Err(RequestError::TimedOut));
}
