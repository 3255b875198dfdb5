use regio_types::{AppEvent, TickOutcome, Trigger};

use super::{PollLoop, RunState};
use crate::pipeline::recognize_run;

impl PollLoop {
    pub(super) async fn on_tick(&mut self) {
        if self.state.is_running() {
            self.request_run(Trigger::Auto).await;
        }
    }

    /// Starts a run now, or queues one behind the run in flight.
    ///
    /// Queued requests collapse into one; a manual request wins over auto.
    pub(super) async fn request_run(&mut self, trigger: Trigger) {
        if self.in_flight.is_some() || self.capturer_lent {
            self.pending = match (self.pending, trigger) {
                (Some(Trigger::Manual), _) | (_, Trigger::Manual) => Some(Trigger::Manual),
                _ => Some(Trigger::Auto),
            };
            tracing::trace!("Run busy, queued {:?}", trigger);
            return;
        }

        let Some(capturer) = self.capturer.take() else {
            tracing::warn!("No capturer available");
            self.send_status(self.settings.ui.capture_failed.clone()).await;
            self.stats.record(TickOutcome::CaptureFailed);
            let _ = self
                .app_to_ui_tx
                .send(AppEvent::TickCompleted(TickOutcome::CaptureFailed))
                .await;
            return;
        };

        let id = self.next_run;
        self.next_run += 1;
        let token = self.cancel.child_token();

        // Selection is read fresh for every run
        let rect = self.placement.to_screen(&self.geometry.current_rect());
        tracing::debug!("Run {} ({:?}) on {:?}", id, trigger, rect);

        self.capturer_lent = true;
        self.in_flight = Some(RunState {
            id,
            trigger,
            token: token.clone(),
        });
        tokio::spawn(recognize_run(self.ctx.clone(), id, capturer, rect, token));
    }

    /// Ends the in-flight run and starts whatever queued up behind it
    pub(super) async fn finish_run(&mut self, outcome: TickOutcome) {
        self.in_flight = None;
        self.stats.record(outcome);
        let _ = self
            .app_to_ui_tx
            .send(AppEvent::TickCompleted(outcome))
            .await;
        self.start_pending().await;
    }

    pub(super) async fn start_pending(&mut self) {
        if self.in_flight.is_some() || self.capturer_lent {
            return;
        }
        match self.pending.take() {
            Some(Trigger::Manual) => self.request_run(Trigger::Manual).await,
            Some(Trigger::Auto) if self.state.is_running() => {
                self.request_run(Trigger::Auto).await
            }
            _ => {}
        }
    }
}
