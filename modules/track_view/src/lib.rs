// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Track view Modul for the run tracker
//!
//! Keeps the latest progress and renders it as a stadium shaped running track
//! on request.

pub mod scene;
pub mod theme;

use async_trait::async_trait;
use common::day_clock::{DayClock, LocalDayClock};
use module_core::{
    EventKind, Module, ModuleCtx, Progress, RenderTrackRequestPtr, RenderTrackResponsePtr,
    Response,
};
use tracing::{debug, error};

pub use scene::TrackScene;
pub use theme::{Color, ColorParseError, Theme, ThemeError};

/// Renders the progress of the current year into an SVG document.
///
/// The required pace marker is placed for `day_of_year`.
pub fn render_svg(
    viewport: module_core::Viewport,
    progress: &Progress,
    day_of_year: u32,
    theme: &Theme,
) -> String {
    TrackScene::compute(viewport, progress, day_of_year, theme.thickness).to_svg(theme)
}

/// The track view module.
///
/// It follows [`EventKind::ProgressChangedEvent`]s and answers
/// [`EventKind::RenderTrackRequestEvent`]s with the rendered SVG.
pub struct TrackView<C: DayClock = LocalDayClock> {
    ctx: ModuleCtx,
    theme: Theme,
    clock: C,
    progress: Progress,
}

impl TrackView<LocalDayClock> {
    pub fn new(theme: Theme, ctx: ModuleCtx) -> Self {
        TrackView::new_with_clock(theme, LocalDayClock::new(), ctx)
    }
}

impl<C: DayClock> TrackView<C> {
    pub fn new_with_clock(theme: Theme, clock: C, ctx: ModuleCtx) -> Self {
        TrackView {
            ctx,
            theme,
            clock,
            progress: Progress::default(),
        }
    }

    fn on_render_request(&self, request: RenderTrackRequestPtr) {
        let day_of_year = self.clock.day_of_year();
        debug!(
            "Rendering {:?} on day {} into {}x{}",
            self.progress, day_of_year, request.data.width, request.data.height
        );
        let svg = render_svg(request.data, &self.progress, day_of_year, &self.theme);
        let _ = self
            .ctx
            .publish_event(EventKind::RenderTrackResponseEvent(
                RenderTrackResponsePtr::new(Response {
                    id: request.id,
                    receiver_addr: request.sender_addr,
                    data: svg,
                }),
            ));
    }
}

#[async_trait]
impl<C: DayClock + Send> Module for TrackView<C> {
    async fn run(&mut self) -> std::result::Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::ProgressChangedEvent(progress) => {
                                    self.progress = *progress;
                                }
                                EventKind::RenderTrackRequestEvent(request) => {
                                    self.on_render_request(request);
                                }
                                _ => (),
                            }
                        },
                        Err(e) => {
                            error!("Failed to receive event in module TrackView. Error:{e}");
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
