const PARTIAL_PREFIX: &str = "PARTIAL:";
const EVENT_PREFIX: &str = "EVENT:";

/// An event reported by the worker on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Live, low-confidence transcript. Preview only.
    Partial(String),
    /// The physical hold combo was released.
    Release,
    /// Completed transcript for one utterance.
    Final(String),
}

impl WorkerEvent {
    /// Parse one framed line.
    ///
    /// Returns `None` for empty lines and for `EVENT:` names this side does
    /// not understand. Any line without a reserved prefix is a `Final`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(partial) = line.strip_prefix(PARTIAL_PREFIX) {
            return Some(WorkerEvent::Partial(partial.trim().to_string()));
        }

        if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
            return name
                .trim()
                .eq_ignore_ascii_case("RELEASE")
                .then_some(WorkerEvent::Release);
        }

        Some(WorkerEvent::Final(line.to_string()))
    }
}
