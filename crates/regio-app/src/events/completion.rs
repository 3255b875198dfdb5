use regio_capture::FrameCapturer;
use regio_core::{Observation, PipelineError};
use regio_types::{AppEvent, TickOutcome};

use super::{PollLoop, RunState};
use crate::pipeline::{WorkerEvent, translate_run};

impl PollLoop {
    pub(super) async fn handle_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::CapturerReturned(capturer) => self.on_capturer_returned(capturer).await,
            WorkerEvent::CapturerLost => {
                tracing::error!("Capture source lost, further runs will fail");
                self.capturer_lent = false;
            }
            WorkerEvent::Recognized { run, result } => self.on_recognized(run, result).await,
            WorkerEvent::Translated { run, text } => self.on_translated(run, text).await,
        }
    }

    async fn on_capturer_returned(&mut self, mut capturer: FrameCapturer) {
        self.capturer_lent = false;
        // The source stays open only while auto mode or a queued run needs it
        if !self.state.is_running() && self.pending.is_none() {
            capturer.close();
        }
        self.capturer = Some(capturer);
        self.start_pending().await;
    }

    async fn on_recognized(&mut self, run: u64, result: Result<String, PipelineError>) {
        let Some((trigger, token)) = self
            .current_run(run)
            .map(|r| (r.trigger, r.token.clone()))
        else {
            tracing::debug!("Ignoring recognition from stale run {}", run);
            return;
        };
        if token.is_cancelled() {
            self.finish_run(TickOutcome::Discarded).await;
            return;
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Run {}: {}", run, e);
                self.send_status(self.settings.ui.capture_failed.clone()).await;
                self.finish_run(TickOutcome::CaptureFailed).await;
                return;
            }
        };

        match self.state.observe(&text, trigger) {
            Observation::Empty => {
                tracing::debug!("Run {}: {}", run, PipelineError::RecognitionEmpty);
                self.send_status(self.settings.ui.no_text.clone()).await;
                self.finish_run(TickOutcome::NoText).await;
            }
            Observation::Unchanged => {
                tracing::trace!("Run {}: text unchanged, skipping translation", run);
                self.finish_run(TickOutcome::Unchanged).await;
            }
            Observation::Changed(text) => {
                tracing::debug!("Run {}: recognized {} chars", run, text.chars().count());
                tokio::spawn(translate_run(self.ctx.clone(), run, text, token));
            }
        }
    }

    async fn on_translated(&mut self, run: u64, text: String) {
        let Some(token) = self.current_run(run).map(|r| r.token.clone()) else {
            tracing::debug!("Ignoring translation from stale run {}", run);
            return;
        };
        if token.is_cancelled() {
            // Nothing was shown for this text, the next read must translate it
            self.state.reset_last();
            self.finish_run(TickOutcome::Discarded).await;
            return;
        }

        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Run {}: {}", run, PipelineError::TranslationFailure);
            let placeholder = self.settings.ui.no_result.clone();
            let _ = self.app_to_ui_tx.send(AppEvent::ShowResult(placeholder)).await;
            self.finish_run(TickOutcome::TranslationFailed).await;
            return;
        }

        let _ = self
            .app_to_ui_tx
            .send(AppEvent::ShowResult(text.to_string()))
            .await;
        self.finish_run(TickOutcome::Translated).await;
    }

    fn current_run(&self, run: u64) -> Option<&RunState> {
        self.in_flight.as_ref().filter(|r| r.id == run)
    }
}
