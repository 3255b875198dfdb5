//! Poll loop runs against scripted recognition and translation engines

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{Rgba, RgbaImage};
use kanal::{AsyncReceiver, AsyncSender};
use regio_capture::{FrameCapturer, RecognitionClient, Recognizer, SourceStats, SyntheticSource};
use regio_config::Config;
use regio_config::ui::UiConfig;
use regio_core::ProcessedImage;
use regio_translator::{
    ProviderMetadata, TranslateError, Translation, TranslationClient, Translator,
};
use regio_types::{AppEvent, PointerEvent, SelectionRect, TickOutcome, UiEvent};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::{PollLoop, PollSettings};

const SCREEN: (u32, u32) = (640, 480);

/// Replays texts in order, then repeats the last one
struct Scripted {
    texts: Mutex<VecDeque<&'static str>>,
    last: Mutex<String>,
    sizes: Mutex<Vec<(u32, u32)>>,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Scripted {
    fn new(texts: &[&'static str]) -> Arc<Self> {
        Self::with_delay(texts, Duration::from_millis(5))
    }

    fn with_delay(texts: &[&'static str], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            texts: Mutex::new(texts.iter().copied().collect()),
            last: Mutex::new(String::new()),
            sizes: Mutex::new(Vec::new()),
            delay,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        })
    }

    fn sizes(&self) -> Vec<(u32, u32)> {
        self.sizes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Recognizer for Scripted {
    async fn recognize(&self, image: &ProcessedImage) -> anyhow::Result<String> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.sizes
            .lock()
            .unwrap()
            .push((image.width(), image.height()));

        tokio::time::sleep(self.delay).await;

        let text = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.texts.lock().unwrap().pop_front() {
                *last = next.to_string();
            }
            last.clone()
        };
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(text)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Blocks inside recognition until released
#[derive(Default)]
struct Gated {
    entered: Notify,
    release: Notify,
}

#[async_trait::async_trait]
impl Recognizer for Gated {
    async fn recognize(&self, _image: &ProcessedImage) -> anyhow::Result<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("HELLO".to_string())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
    blank: bool,
}

impl Counting {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Translator for Counting {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = if self.blank {
            String::new()
        } else {
            format!("<{text}>")
        };
        Ok(Translation {
            text,
            detected_source: None,
            provider: "counting".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "counting".to_string(),
            requires_api_key: false,
        }
    }
}

/// Holds the first translation until released, later ones go straight through
#[derive(Default)]
struct GatedTranslator {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Translator for GatedTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<Translation, TranslateError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(Translation {
            text: format!("<{text}>"),
            detected_source: None,
            provider: "gated".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "gated".to_string(),
            requires_api_key: false,
        }
    }
}

fn screen() -> SyntheticSource {
    SyntheticSource::new(RgbaImage::from_fn(SCREEN.0, SCREEN.1, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
    }))
}

fn settings() -> PollSettings {
    let mut settings = PollSettings::default();
    settings.selection.initial_rect_dp = SelectionRect::new(100.0, 100.0, 400.0, 200.0);
    settings.poll.interval_ms = 10;
    settings
}

struct Harness {
    ui_tx: AsyncSender<AppEvent>,
    app_rx: AsyncReceiver<AppEvent>,
    handle: JoinHandle<anyhow::Result<()>>,
    stats: Arc<SourceStats>,
    results: Vec<String>,
    statuses: Vec<String>,
}

impl Harness {
    fn spawn(
        recognizer: Arc<dyn Recognizer>,
        translator: Arc<dyn Translator>,
        source: SyntheticSource,
        settings: PollSettings,
    ) -> Self {
        let stats = source.stats();
        let capturer = FrameCapturer::new(Box::new(source), SCREEN.0, SCREEN.1);
        let (app_tx, app_rx) = kanal::unbounded_async();
        let (ui_tx, ui_rx) = kanal::unbounded_async();

        let poll_loop = PollLoop::new(
            settings,
            capturer,
            RecognitionClient::new(recognizer),
            TranslationClient::new(translator, "en".to_string(), "ko".to_string()),
            app_tx,
        );
        let handle = tokio::spawn(poll_loop.run(ui_rx, CancellationToken::new()));

        Self {
            ui_tx,
            app_rx,
            handle,
            stats,
            results: Vec::new(),
            statuses: Vec::new(),
        }
    }

    async fn send(&self, event: UiEvent) {
        self.ui_tx.send(AppEvent::UiEvent(event)).await.unwrap();
    }

    /// Reads events until one matches, recording results and statuses on the way
    async fn wait_for(&mut self, wanted: impl Fn(&AppEvent) -> bool) -> AppEvent {
        loop {
            let event = timeout(Duration::from_secs(5), self.app_rx.recv())
                .await
                .expect("timed out waiting for the poll loop")
                .unwrap();
            match &event {
                AppEvent::ShowResult(text) => self.results.push(text.clone()),
                AppEvent::StatusUpdate { status, .. } => self.statuses.push(status.clone()),
                _ => {}
            }
            if wanted(&event) {
                return event;
            }
        }
    }

    async fn next_outcome(&mut self) -> TickOutcome {
        match self
            .wait_for(|e| matches!(e, AppEvent::TickCompleted(_)))
            .await
        {
            AppEvent::TickCompleted(outcome) => outcome,
            _ => unreachable!(),
        }
    }

    async fn once(&mut self) -> TickOutcome {
        self.send(UiEvent::TranslateOnce).await;
        self.next_outcome().await
    }

    async fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.send(UiEvent::Pointer(PointerEvent::Down { x: from.0, y: from.1 }))
            .await;
        self.send(UiEvent::Pointer(PointerEvent::Move { x: to.0, y: to.1 }))
            .await;
        self.send(UiEvent::Pointer(PointerEvent::Up)).await;
    }

    async fn close(self) -> Arc<SourceStats> {
        self.send(UiEvent::Close).await;
        timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("poll loop did not close")
            .unwrap()
            .unwrap();
        self.stats
    }
}

#[tokio::test]
async fn repeated_text_is_translated_once() {
    let recognizer = Scripted::new(&["HELLO", "HELLO", "WORLD"]);
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(recognizer, translator.clone(), screen(), settings());

    assert_eq!(h.once().await, TickOutcome::Translated);
    assert_eq!(h.once().await, TickOutcome::Unchanged);
    assert_eq!(h.once().await, TickOutcome::Translated);

    assert_eq!(translator.calls(), 2);
    assert_eq!(h.results, vec!["<HELLO>", "<WORLD>"]);
    h.close().await;
}

#[tokio::test]
async fn empty_text_reports_status_and_keeps_last() {
    let recognizer = Scripted::new(&["HELLO", "  \n", "HELLO"]);
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(recognizer, translator.clone(), screen(), settings());

    assert_eq!(h.once().await, TickOutcome::Translated);
    assert_eq!(h.once().await, TickOutcome::NoText);
    assert_eq!(h.once().await, TickOutcome::Unchanged);

    assert!(h.statuses.contains(&UiConfig::default().no_text));
    assert_eq!(translator.calls(), 1);
    h.close().await;
}

#[tokio::test]
async fn capture_failure_keeps_loop_alive() {
    let recognizer = Scripted::new(&["HELLO"]);
    let mut h = Harness::spawn(
        recognizer.clone(),
        Arc::new(Counting::default()),
        screen().unavailable(),
        settings(),
    );

    assert_eq!(h.once().await, TickOutcome::CaptureFailed);
    assert_eq!(h.once().await, TickOutcome::CaptureFailed);

    assert!(h.statuses.contains(&UiConfig::default().capture_failed));
    assert!(recognizer.sizes().is_empty());
    h.close().await;
}

#[tokio::test]
async fn recognizer_sees_cropped_upscaled_region() {
    let recognizer = Scripted::new(&["HELLO"]);
    let mut h = Harness::spawn(
        recognizer.clone(),
        Arc::new(Counting::default()),
        screen().with_row_padding(24),
        settings(),
    );

    assert_eq!(h.once().await, TickOutcome::Translated);
    // 300x100 selection, upscaled by 1.6
    assert_eq!(recognizer.sizes(), vec![(480, 160)]);
    h.close().await;
}

#[tokio::test]
async fn blank_translation_shows_placeholder() {
    let translator = Arc::new(Counting {
        blank: true,
        ..Default::default()
    });
    let mut h = Harness::spawn(Scripted::new(&["HELLO"]), translator, screen(), settings());

    assert_eq!(h.once().await, TickOutcome::TranslationFailed);
    assert_eq!(h.results, vec![UiConfig::default().no_result]);
    h.close().await;
}

#[tokio::test]
async fn stop_discards_in_flight_result() {
    let gated = Arc::new(Gated::default());
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(gated.clone(), translator.clone(), screen(), settings());

    h.send(UiEvent::ToggleAuto).await;
    timeout(Duration::from_secs(5), gated.entered.notified())
        .await
        .expect("recognition never started");

    h.send(UiEvent::ToggleAuto).await;
    h.wait_for(|e| matches!(e, AppEvent::AutoModeChanged(false)))
        .await;
    gated.release.notify_one();

    assert_eq!(h.next_outcome().await, TickOutcome::Discarded);
    assert!(h.results.is_empty());
    assert_eq!(translator.calls(), 0);
    assert_eq!(h.stats.stops(), 1);

    let stats = h.close().await;
    assert_eq!(stats.starts(), 1);
    assert_eq!(stats.stops(), 1);
}

#[tokio::test]
async fn stop_discards_in_flight_translation() {
    let translator = Arc::new(GatedTranslator::default());
    let mut h = Harness::spawn(Scripted::new(&["HELLO"]), translator.clone(), screen(), settings());

    h.send(UiEvent::ToggleAuto).await;
    timeout(Duration::from_secs(5), translator.entered.notified())
        .await
        .expect("translation never started");

    h.send(UiEvent::ToggleAuto).await;
    h.wait_for(|e| matches!(e, AppEvent::AutoModeChanged(false)))
        .await;
    translator.release.notify_one();

    assert_eq!(h.next_outcome().await, TickOutcome::Discarded);
    assert!(h.results.is_empty());

    // The dropped text was never shown, so reading it again translates it
    assert_eq!(h.once().await, TickOutcome::Translated);
    assert_eq!(h.results, vec!["<HELLO>"]);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
    h.close().await;
}

#[tokio::test]
async fn auto_mode_translates_changes_without_overlap() {
    let recognizer = Scripted::new(&["HELLO", "HELLO", "WORLD"]);
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(recognizer.clone(), translator.clone(), screen(), settings());

    h.send(UiEvent::ToggleAuto).await;
    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(h.next_outcome().await);
    }
    h.send(UiEvent::ToggleAuto).await;

    assert_eq!(
        outcomes[..3],
        [
            TickOutcome::Translated,
            TickOutcome::Unchanged,
            TickOutcome::Translated
        ]
    );
    assert!(outcomes[3..].iter().all(|o| *o == TickOutcome::Unchanged));
    assert_eq!(translator.calls(), 2);
    assert_eq!(recognizer.max_active.load(Ordering::SeqCst), 1);
    h.close().await;
}

#[tokio::test]
async fn manual_text_survives_auto_start() {
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(Scripted::new(&["HELLO"]), translator.clone(), screen(), settings());

    assert_eq!(h.once().await, TickOutcome::Translated);
    h.send(UiEvent::ToggleAuto).await;
    assert_eq!(h.next_outcome().await, TickOutcome::Unchanged);

    assert_eq!(translator.calls(), 1);
    h.close().await;
}

#[tokio::test]
async fn overlapping_requests_coalesce() {
    let recognizer = Scripted::with_delay(&["HELLO", "WORLD", "AGAIN"], Duration::from_millis(50));
    let mut h = Harness::spawn(
        recognizer.clone(),
        Arc::new(Counting::default()),
        screen(),
        settings(),
    );

    for _ in 0..3 {
        h.send(UiEvent::TranslateOnce).await;
    }
    assert_eq!(h.next_outcome().await, TickOutcome::Translated);
    assert_eq!(h.next_outcome().await, TickOutcome::Translated);
    assert!(
        timeout(Duration::from_millis(300), h.next_outcome())
            .await
            .is_err()
    );
    assert_eq!(recognizer.sizes().len(), 2);
    assert_eq!(recognizer.max_active.load(Ordering::SeqCst), 1);
    h.close().await;
}

#[tokio::test]
async fn moving_the_selection_resets_change_detection() {
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(Scripted::new(&["HELLO"]), translator.clone(), screen(), settings());

    assert_eq!(h.once().await, TickOutcome::Translated);
    h.drag((250.0, 150.0), (260.0, 160.0)).await;
    h.wait_for(|e| matches!(e, AppEvent::SelectionChanged(r) if r.left == 110.0))
        .await;
    assert_eq!(h.once().await, TickOutcome::Translated);

    assert_eq!(translator.calls(), 2);
    h.close().await;
}

#[tokio::test]
async fn selection_reset_can_be_disabled() {
    let mut settings = settings();
    settings.poll.reset_on_selection_change = false;
    let translator = Arc::new(Counting::default());
    let mut h = Harness::spawn(Scripted::new(&["HELLO"]), translator.clone(), screen(), settings);

    assert_eq!(h.once().await, TickOutcome::Translated);
    h.drag((250.0, 150.0), (260.0, 160.0)).await;
    assert_eq!(h.once().await, TickOutcome::Unchanged);

    assert_eq!(translator.calls(), 1);
    h.close().await;
}

#[tokio::test]
async fn recognizer_sees_view_scaled_region() {
    let mut settings = settings();
    settings.selection.initial_rect_dp = SelectionRect::new(50.0, 50.0, 200.0, 110.0);
    settings.placement.scale = 2.0;
    let recognizer = Scripted::new(&["HELLO"]);
    let mut h = Harness::spawn(
        recognizer.clone(),
        Arc::new(Counting::default()),
        screen(),
        settings,
    );

    assert_eq!(h.once().await, TickOutcome::Translated);
    // 150x60 view pixels are 300x120 capture pixels, then upscaled by 1.6
    assert_eq!(recognizer.sizes(), vec![(480, 192)]);
    h.close().await;
}

#[test]
fn poll_settings_take_view_scale_from_capture_config() {
    let mut config = Config::default();
    assert_eq!(PollSettings::from_config(&config).placement.scale, 1.0);

    config.capture.view_scale = 1.5;
    let placement = PollSettings::from_config(&config).placement;
    assert_eq!(placement.scale, 1.5);
    assert_eq!((placement.origin_x, placement.origin_y), (0.0, 0.0));
}

#[tokio::test]
async fn manual_run_while_idle_releases_source() {
    let mut h = Harness::spawn(
        Scripted::new(&["HELLO", "WORLD"]),
        Arc::new(Counting::default()),
        screen(),
        settings(),
    );

    assert_eq!(h.once().await, TickOutcome::Translated);
    assert_eq!((h.stats.starts(), h.stats.stops()), (1, 1));
    assert_eq!(h.once().await, TickOutcome::Translated);
    assert_eq!((h.stats.starts(), h.stats.stops()), (2, 2));

    let stats = h.close().await;
    assert_eq!(stats.stops(), 2);
}

#[tokio::test]
async fn auto_mode_holds_source_until_stopped() {
    let mut settings = settings();
    settings.poll.interval_ms = 60_000;
    let mut h = Harness::spawn(
        Scripted::new(&["HELLO"]),
        Arc::new(Counting::default()),
        screen(),
        settings,
    );

    h.send(UiEvent::ToggleAuto).await;
    assert_eq!(h.next_outcome().await, TickOutcome::Translated);
    assert_eq!((h.stats.starts(), h.stats.stops()), (1, 0));

    h.send(UiEvent::ToggleAuto).await;
    h.wait_for(|e| matches!(e, AppEvent::AutoModeChanged(false)))
        .await;
    assert_eq!(h.stats.stops(), 1);

    let stats = h.close().await;
    assert_eq!((stats.starts(), stats.stops()), (1, 1));
}

#[tokio::test]
async fn close_releases_capture_source() {
    let mut settings = settings();
    settings.poll.interval_ms = 60_000;
    let mut h = Harness::spawn(
        Scripted::new(&["HELLO"]),
        Arc::new(Counting::default()),
        screen(),
        settings,
    );

    h.send(UiEvent::ToggleAuto).await;
    assert_eq!(h.next_outcome().await, TickOutcome::Translated);
    assert_eq!(h.stats.stops(), 0);

    let stats = h.close().await;
    assert_eq!(stats.starts(), 1);
    assert_eq!(stats.stops(), 1);
}
