/// Session-side handle on the recording indicator.
///
/// Both calls must be idempotent; the session may hide an already hidden
/// indicator when `Release` and `Final` race.
pub trait IndicatorPort: Send {
    /// Make the indicator visible.
    fn show(&mut self);
    /// Hide the indicator.
    fn hide(&mut self);
}

/// Receives each final transcript exactly once for injection.
pub trait TranscriptOutput: Send {
    /// Hand `text` to the injector. Must not block the session loop.
    fn deliver(&mut self, text: String);
}
