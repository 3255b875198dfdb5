use kanal::{AsyncReceiver, AsyncSender};
use regio_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::PollLoop;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // results and status
            ui_to_app: kanal::bounded_async(64),  // pointer and button input
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    // Result lines shown per translation, 0 for no limit
    max_text_lines: usize,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(max_text_lines: usize) -> Self {
        Self {
            channels: ChannelSet::new(),
            max_text_lines,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn app_to_ui_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.app_to_ui.0.clone()
    }

    pub fn ui_to_app_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.ui_to_app.0.clone()
    }

    pub fn spawn_tasks(&self, poll_loop: PollLoop) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(poll_loop.run(
            self.channels.ui_to_app.1.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.max_text_lines,
            self.cancel_token.child_token(),
        ));

        // Hotkeys
        #[cfg(feature = "desktop")]
        tasks.spawn(crate::io::watcher_io(
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
