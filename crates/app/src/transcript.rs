//! Bounded, shareable diagnostic transcript.

use std::sync::{Arc, Mutex, PoisonError};

/// Bytes kept before the oldest lines are dropped.
const MAX_BYTES: usize = 64 * 1024;

/// Append-only log of the steps taken during one command.
///
/// Cloning shares the same buffer, so the gateway can read whatever was
/// recorded even after the run itself was cancelled.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    buffer: Arc<Mutex<String>>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn record(&self, line: impl AsRef<str>) {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.push_str(line.as_ref());
        buffer.push('\n');
        if buffer.len() > MAX_BYTES {
            let mut cut = buffer.len() - MAX_BYTES;
            while !buffer.is_char_boundary(cut) {
                cut += 1;
            }
            buffer.replace_range(..cut, "");
        }
    }

    /// Everything recorded so far, or `None` when nothing was.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        (!buffer.is_empty()).then(|| buffer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_empty_initially() {
        assert_eq!(Transcript::new().snapshot(), None);
    }

    #[test]
    fn should_share_lines_between_clones() {
        let transcript = Transcript::new();
        let clone = transcript.clone();
        clone.record("opening session");
        transcript.record("logging in");
        assert_eq!(
            transcript.snapshot().as_deref(),
            Some("opening session\nlogging in\n")
        );
    }

    #[test]
    fn should_drop_oldest_bytes_when_full() {
        let transcript = Transcript::new();
        transcript.record("first");
        for _ in 0..MAX_BYTES / 10 {
            transcript.record("ééééé");
        }
        transcript.record("last");
        let snapshot = transcript.snapshot().unwrap();
        assert!(snapshot.len() <= MAX_BYTES);
        assert!(!snapshot.starts_with("first"));
        assert!(snapshot.ends_with("last\n"));
    }
}
