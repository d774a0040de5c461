use tokio::time::Instant;
use std::time::Duration;

/// Wall-clock duration of the current call, started when an offer goes out.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionClock {
    started: Option<Instant>,
}

impl SessionClock {
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn reset(&mut self) {
        self.started = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }
}

/// `HH:MM:SS`, hours are not capped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
