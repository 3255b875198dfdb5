use regio_types::TickOutcome;

/// Counters over the pipeline runs of one session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollStats {
    pub runs: u64,
    pub translated: u64,
    pub unchanged: u64,
    pub no_text: u64,
    pub capture_failures: u64,
    pub translation_failures: u64,
    pub discarded: u64,
}

impl PollStats {
    pub fn record(&mut self, outcome: TickOutcome) {
        self.runs += 1;
        let counter = match outcome {
            TickOutcome::Translated => &mut self.translated,
            TickOutcome::Unchanged => &mut self.unchanged,
            TickOutcome::NoText => &mut self.no_text,
            TickOutcome::CaptureFailed => &mut self.capture_failures,
            TickOutcome::TranslationFailed => &mut self.translation_failures,
            TickOutcome::Discarded => &mut self.discarded,
        };
        *counter += 1;
    }
}
