use std::path::PathBuf;

use clap::Parser;
use regio_capture::RecognitionClient;
use regio_config::Config;
use regio_config::capture::CaptureSourceKind;
use regio_config::poll::PollMode;
use regio_types::{AppEvent, UiEvent};
use tokio::signal;

mod controller;
mod events;
#[cfg(feature = "desktop")]
mod io;
mod logging;
mod pipeline;
mod profile;
mod setup;
mod status;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::events::{PollLoop, PollSettings};
use self::profile::ProfileStore;

#[derive(Parser, Debug)]
#[command(name = "regio", version, about = "Translate a selected screen region as it changes")]
struct Cli {
    /// Profile to load from the profiles folder
    #[arg(long, default_value = "main")]
    profile: String,

    /// Use the fast poll interval
    #[arg(long)]
    fast: bool,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Serve this image file as the display instead of the screen
    #[arg(long)]
    image: Option<PathBuf>,

    /// Recognize only, never call the translator
    #[arg(long)]
    no_translate: bool,

    /// Start with auto translate on
    #[arg(long)]
    auto: bool,

    /// Capture pixels per overlay view pixel
    #[arg(long)]
    view_scale: Option<f32>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if self.fast {
            config.poll.mode = PollMode::Fast;
        }
        if let Some(ms) = self.interval_ms {
            config.poll.interval_ms = ms;
            config.poll.fast_interval_ms = ms;
        }
        if let Some(path) = &self.image {
            config.capture.source = CaptureSourceKind::Image;
            config.capture.image_path = Some(path.clone());
        }
        if let Some(scale) = self.view_scale {
            config.capture.view_scale = scale;
        }
        if self.no_translate {
            config.translator.enabled = false;
        }
    }
}

fn load_profile(name: &str) -> anyhow::Result<Config> {
    let store = ProfileStore::user_default()
        .ok_or_else(|| anyhow::anyhow!("No config directory on this system"))?;
    store.init()?;
    store.load(name)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let loaded = load_profile(&cli.profile);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    config.apply_env();
    cli.apply(&mut config);

    logging::init(&config.logging);
    if let Err(e) = &loaded {
        tracing::warn!("Using default config: {:#}", e);
    }

    let capturer = setup::build_capturer(&config.capture)?;
    let recognition = RecognitionClient::new(setup::build_recognizer(&config.ocr)?);
    let translation = setup::build_translator(&config.translator);

    // Warm-up failures only get logged, translation is retried per tick
    tokio::spawn({
        let translation = translation.clone();
        async move { translation.ensure_ready().await }
    });

    let settings = PollSettings::from_config(&config);
    let controller = AppController::new(config.ui.max_text_lines as usize);

    let poll_loop = PollLoop::new(
        settings,
        capturer,
        recognition,
        translation,
        controller.app_to_ui_sender(),
    );
    let mut tasks = controller.spawn_tasks(poll_loop);

    if cli.auto {
        let _ = controller
            .ui_to_app_sender()
            .send(AppEvent::UiEvent(UiEvent::ToggleAuto))
            .await;
    }

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Shutdown requested"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        },
        Some(result) = tasks.join_next() => match result {
            Ok(Ok(())) => tracing::info!("Task exited"),
            Ok(Err(e)) => tracing::error!("Task failed: {:#}", e),
            Err(e) => tracing::error!("Task panicked: {}", e),
        },
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::error!("Task failed during shutdown: {:#}", e);
        }
    }

    Ok(())
}
