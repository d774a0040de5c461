/// Largest text frame the hosted pub/sub service accepted for one publish.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Frames longer than this are dropped instead of fanned out.
    pub max_message_bytes: usize,
}

impl RelayConfig {
    pub fn with_max_message_bytes(mut self, max: usize) -> Self {
        self.max_message_bytes = max;
        self
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}
