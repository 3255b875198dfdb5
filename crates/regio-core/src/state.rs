use regio_types::Trigger;

/// What the poll loop should do with freshly recognized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Empty,
    /// Same as the previous tick, skip translation
    Unchanged,
    Changed(String),
}

/// Auto-mode flag plus the change-detection memory.
///
/// Owned by the poll loop task and only changed through these transitions.
#[derive(Debug, Default)]
pub struct PollState {
    running: bool,
    last_recognized: String,
    last_trigger: Option<Trigger>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_recognized(&self) -> &str {
        &self.last_recognized
    }

    /// Idle -> Running. Returns false when already running.
    ///
    /// Text remembered from a manual trigger survives so the result on screen
    /// is not translated again; anything older is forgotten.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.last_trigger != Some(Trigger::Manual) {
            self.last_recognized.clear();
        }
        self.running = true;
        true
    }

    /// Running -> Idle. Returns false when already idle.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Compares trimmed recognized text with the previous tick and records it
    /// when it changed. Empty text leaves the memory untouched.
    pub fn observe(&mut self, text: &str, trigger: Trigger) -> Observation {
        let text = text.trim();
        if text.is_empty() {
            return Observation::Empty;
        }
        self.last_trigger = Some(trigger);
        if text == self.last_recognized {
            return Observation::Unchanged;
        }
        self.last_recognized = text.to_string();
        Observation::Changed(self.last_recognized.clone())
    }

    /// Forget the last recognized text, e.g. after the selection moved
    pub fn reset_last(&mut self) {
        self.last_recognized.clear();
        self.last_trigger = None;
    }
}
