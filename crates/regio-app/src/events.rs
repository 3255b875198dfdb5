use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use regio_capture::{FrameCapturer, RecognitionClient};
use regio_config::Config;
use regio_config::poll::PollConfig;
use regio_config::selection::SelectionConfig;
use regio_config::ui::UiConfig;
use regio_core::{GeometryEngine, PollState};
use regio_translator::TranslationClient;
use regio_types::{AppEvent, Trigger, UiEvent, ViewPlacement};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::pipeline::{PipelineContext, WorkerEvent};
use crate::status::PollStats;

pub mod auto_mode;
pub mod completion;
pub mod pointer;
pub mod trigger_ocr;

/// Settings the poll loop reads once at startup
#[derive(Clone, Debug, Default)]
pub struct PollSettings {
    pub poll: PollConfig,
    pub selection: SelectionConfig,
    pub ui: UiConfig,
    /// Starting view origin and the view-to-capture scale
    pub placement: ViewPlacement,
}

impl PollSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll: config.poll.clone(),
            selection: config.selection.clone(),
            ui: config.ui.clone(),
            placement: ViewPlacement {
                scale: config.capture.view_scale(),
                ..ViewPlacement::default()
            },
        }
    }
}

/// The pipeline run currently holding the capturer or waiting on a worker
struct RunState {
    id: u64,
    trigger: Trigger,
    token: CancellationToken,
}

/// Owner of the selection, the poll state and the capturer.
///
/// Everything here is touched only from the loop task; workers report back
/// through [`WorkerEvent`]s. At most one run is in flight, ticks that arrive
/// meanwhile collapse into a single pending run.
pub struct PollLoop {
    ctx: PipelineContext,
    settings: PollSettings,
    geometry: GeometryEngine,
    placement: ViewPlacement,
    state: PollState,
    capturer: Option<FrameCapturer>,
    capturer_lent: bool,
    in_flight: Option<RunState>,
    pending: Option<Trigger>,
    next_run: u64,
    stats: PollStats,
    cancel: CancellationToken,
    app_to_ui_tx: AsyncSender<AppEvent>,
    worker_rx: AsyncReceiver<WorkerEvent>,
}

enum LoopEvent {
    Ui(AppEvent),
    Worker(WorkerEvent),
    Tick,
    Shutdown,
}

impl PollLoop {
    pub fn new(
        settings: PollSettings,
        capturer: FrameCapturer,
        recognition: RecognitionClient,
        translation: TranslationClient,
        app_to_ui_tx: AsyncSender<AppEvent>,
    ) -> Self {
        let (worker_tx, worker_rx) = kanal::unbounded_async();
        Self {
            ctx: PipelineContext::new(recognition, translation, worker_tx),
            geometry: GeometryEngine::from_config(&settings.selection),
            placement: settings.placement,
            settings,
            state: PollState::new(),
            capturer: Some(capturer),
            capturer_lent: false,
            in_flight: None,
            pending: None,
            next_run: 1,
            stats: PollStats::default(),
            cancel: CancellationToken::new(),
            app_to_ui_tx,
            worker_rx,
        }
    }

    /// App's main loop
    pub async fn run(
        mut self,
        ui_to_app_rx: AsyncReceiver<AppEvent>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        let _ = self.app_to_ui_tx.send(AppEvent::BackendReady).await;
        self.send_status("Ready".to_string()).await;

        let worker_rx = self.worker_rx.clone();
        let mut ticker: Option<Interval> = None;

        tracing::info!("Poll loop started, interval {:?}", self.interval());
        loop {
            match (self.state.is_running(), ticker.is_some()) {
                (true, false) => ticker = Some(new_ticker(self.interval())),
                (false, true) => ticker = None,
                _ => {}
            }

            let event = tokio::select! {
                _ = shutdown.cancelled() => LoopEvent::Shutdown,
                event = ui_to_app_rx.recv() => match event {
                    Ok(event) => LoopEvent::Ui(event),
                    Err(_) => LoopEvent::Shutdown,
                },
                Ok(event) = worker_rx.recv() => LoopEvent::Worker(event),
                _ = next_tick(&mut ticker) => LoopEvent::Tick,
            };

            match event {
                LoopEvent::Ui(AppEvent::UiEvent(UiEvent::Close)) => {
                    tracing::info!("Close requested");
                    break;
                }
                LoopEvent::Ui(event) => self.handle_events(event).await,
                LoopEvent::Worker(event) => self.handle_worker_event(event).await,
                LoopEvent::Tick => self.on_tick().await,
                LoopEvent::Shutdown => break,
            }
        }

        self.teardown().await;
        Ok(())
    }

    async fn handle_events(&mut self, event: AppEvent) {
        match event {
            AppEvent::UiEvent(UiEvent::Pointer(pointer)) => self.on_pointer(pointer).await,
            AppEvent::UiEvent(UiEvent::ViewResized { width, height }) => {
                self.on_view_resized(width, height).await
            }
            AppEvent::UiEvent(UiEvent::ViewMoved { x, y }) => self.on_view_moved(x, y).await,
            AppEvent::UiEvent(UiEvent::TranslateOnce) => {
                tracing::debug!("Translate once requested");
                self.request_run(Trigger::Manual).await;
            }
            AppEvent::UiEvent(UiEvent::ToggleAuto) => {
                if self.state.is_running() {
                    self.stop().await;
                } else {
                    self.start().await;
                }
            }
            AppEvent::UiEvent(UiEvent::Close) => {}
            // App -> UI events, nothing to do here
            AppEvent::ShowResult(_)
            | AppEvent::StatusUpdate { .. }
            | AppEvent::AutoModeChanged(_)
            | AppEvent::SelectionChanged(_)
            | AppEvent::TickCompleted(_)
            | AppEvent::BackendReady => {}
        }
    }

    /// Stops auto mode, drops any in-flight result and releases the capture source
    async fn teardown(&mut self) {
        self.stop().await;
        self.cancel.cancel();
        if let Some(mut capturer) = self.capturer.take() {
            capturer.close();
        }
        tracing::info!("Poll loop finished: {:?}", self.stats);
    }

    fn interval(&self) -> Duration {
        self.settings.poll.interval()
    }

    async fn send_status(&mut self, status: String) {
        let running = self.state.is_running();
        let _ = self
            .app_to_ui_tx
            .send(AppEvent::StatusUpdate { status, running })
            .await;
    }
}

fn new_ticker(period: Duration) -> Interval {
    // First tick fires immediately
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
