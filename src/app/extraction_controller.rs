use std::thread;
use std::time::{Duration, Instant};

use fltk::app::Sender;

use super::document::{Document, DocumentId};
use super::extractor;
use super::messages::Message;
use super::settings::AppSettings;

/// Decides when a name-extraction request may go out and dispatches it on a
/// background thread.
///
/// The thread never touches shared state; its only output is a
/// `Message::NamesExtracted` send, which wakes the event loop and gets the
/// result merged on the UI side. Nothing cancels an in-flight request, so
/// dispatches may overlap once the throttle window boundary passes.
pub struct ExtractionController {
    pub enabled: bool,
    server_url: String,
    min_interval: Duration,
    timeout_secs: u64,
}

impl ExtractionController {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            enabled: settings.extraction_enabled,
            server_url: settings.extraction_server_url.clone(),
            min_interval: Duration::from_secs(settings.extraction_interval_secs),
            timeout_secs: settings.extraction_timeout_secs,
        }
    }

    pub fn configure(&mut self, settings: &AppSettings) {
        self.enabled = settings.extraction_enabled;
        self.server_url = settings.extraction_server_url.clone();
        self.min_interval = Duration::from_secs(settings.extraction_interval_secs);
        self.timeout_secs = settings.extraction_timeout_secs;
    }

    /// Throttled dispatch against a snapshot of the document text.
    ///
    /// The timestamp only advances when a dispatch actually happens: change
    /// events inside the window are skipped without stretching it, so a
    /// continuous stream of edits still extracts once per window.
    pub fn maybe_dispatch(&self, doc: &mut Document, text: String, sender: &Sender<Message>) {
        if !self.enabled || text.trim().is_empty() {
            return;
        }
        let now = Instant::now();
        if !extraction_due(doc.last_dispatch, now, self.min_interval) {
            return;
        }
        doc.last_dispatch = Some(now);
        self.dispatch(doc.id, text, sender);
    }

    fn dispatch(&self, id: DocumentId, text: String, sender: &Sender<Message>) {
        let server_url = self.server_url.clone();
        let timeout_secs = self.timeout_secs;
        let s = *sender;
        thread::spawn(move || {
            let pairs = extractor::extract_names(&server_url, &text, timeout_secs);
            s.send(Message::NamesExtracted(id, pairs));
        });
    }
}

/// True when enough time has passed since the last dispatch.
pub fn extraction_due(
    last_dispatch: Option<Instant>,
    now: Instant,
    min_interval: Duration,
) -> bool {
    match last_dispatch {
        None => true,
        Some(t) => now.duration_since(t) >= min_interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_dispatch_is_always_due() {
        assert!(extraction_due(None, Instant::now(), Duration::from_secs(10)));
    }

    #[test]
    fn test_within_window_is_skipped() {
        let now = Instant::now();
        let last = now - Duration::from_secs(3);
        assert!(!extraction_due(Some(last), now, Duration::from_secs(10)));
    }

    #[test]
    fn test_elapsed_window_is_due() {
        let now = Instant::now();
        assert!(extraction_due(
            Some(now - Duration::from_secs(10)),
            now,
            Duration::from_secs(10)
        ));
        assert!(extraction_due(
            Some(now - Duration::from_secs(11)),
            now,
            Duration::from_secs(10)
        ));
    }

    #[test]
    fn test_one_dispatch_per_window() {
        // Change events every second for 30 seconds against a 10 second
        // window: dispatches at t=0, t=10 and t=20 only, measured from the
        // first event of each window.
        let interval = Duration::from_secs(10);
        let t0 = Instant::now();
        let mut last_dispatch: Option<Instant> = None;
        let mut dispatched_at = Vec::new();
        for i in 0..30u64 {
            let now = t0 + Duration::from_secs(i);
            if extraction_due(last_dispatch, now, interval) {
                last_dispatch = Some(now);
                dispatched_at.push(i);
            }
        }
        assert_eq!(dispatched_at, vec![0, 10, 20]);
    }
}
