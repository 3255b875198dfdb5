use regio_types::{AppEvent, DragMode, PointerEvent};

use super::PollLoop;

impl PollLoop {
    pub(super) async fn on_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                let mode = self.geometry.on_drag_start(x, y);
                if mode != DragMode::None {
                    tracing::trace!("Drag started: {:?}", mode);
                }
            }
            PointerEvent::Move { x, y } => {
                if self.geometry.on_drag_move(x, y) {
                    let rect = self.geometry.current_rect();
                    let _ = self
                        .app_to_ui_tx
                        .send(AppEvent::SelectionChanged(rect))
                        .await;
                }
            }
            PointerEvent::Up => {
                if let Some(start) = self.geometry.on_drag_end()
                    && start != self.geometry.current_rect()
                {
                    self.selection_changed().await;
                }
            }
        }
    }

    pub(super) async fn on_view_resized(&mut self, width: f32, height: f32) {
        let before = self.geometry.current_rect();
        self.geometry.set_view_size(width, height);
        tracing::debug!("View resized to {}x{}", width, height);
        if before != self.geometry.current_rect() {
            self.selection_changed().await;
        }
    }

    pub(super) async fn on_view_moved(&mut self, x: f32, y: f32) {
        if (self.placement.origin_x, self.placement.origin_y) == (x, y) {
            return;
        }
        self.placement.origin_x = x;
        self.placement.origin_y = y;
        tracing::debug!("View moved to ({}, {})", x, y);
        self.selection_changed().await;
    }

    /// The region being watched is different now; the next tick reads it fresh
    async fn selection_changed(&mut self) {
        if self.settings.poll.reset_on_selection_change {
            self.state.reset_last();
        }
        let rect = self.geometry.current_rect();
        let _ = self
            .app_to_ui_tx
            .send(AppEvent::SelectionChanged(rect))
            .await;
    }
}
