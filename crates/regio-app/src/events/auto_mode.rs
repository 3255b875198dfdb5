use regio_types::{AppEvent, Trigger};

use super::PollLoop;

impl PollLoop {
    /// Idle -> Running. The ticker is created by the loop on its next turn and
    /// fires immediately.
    pub(super) async fn start(&mut self) {
        if !self.state.start() {
            return;
        }
        tracing::info!("Auto translate on, every {:?}", self.interval());
        let _ = self.app_to_ui_tx.send(AppEvent::AutoModeChanged(true)).await;
        self.send_status("Auto".to_string()).await;
    }

    /// Running -> Idle. The shown result stays; an in-flight run is discarded
    /// when it reports back and the capture source is released.
    pub(super) async fn stop(&mut self) {
        if !self.state.stop() {
            return;
        }
        if let Some(run) = &self.in_flight {
            run.token.cancel();
        }
        self.pending = self.pending.filter(|t| *t == Trigger::Manual);

        // A lent capturer is closed when its run hands it back
        if let Some(capturer) = self.capturer.as_mut() {
            capturer.close();
        }

        tracing::info!("Auto translate off");
        let _ = self
            .app_to_ui_tx
            .send(AppEvent::AutoModeChanged(false))
            .await;
        self.send_status("Stopped".to_string()).await;
    }
}
