//! EventDispatcher — registered handlers, contained panics.

use std::sync::Arc;

use super::handler::CheckerEventHandler;
use super::CheckerEvent;

/// Dispatches engine events to every registered handler in registration
/// order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CheckerEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler.
    pub fn register(&mut self, handler: Arc<dyn CheckerEventHandler>) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatch one event to all handlers. A panicking handler is logged
    /// and skipped; remaining handlers still run.
    pub fn dispatch(&self, event: &CheckerEvent) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.on_event(event)
            }));
            if result.is_err() {
                tracing::error!(?event, "event handler panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::check::AlertCounts;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl CheckerEventHandler for Counter {
        fn on_event(&self, _event: &CheckerEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dispatch_reaches_all_handlers() {
        let mut dispatcher = EventDispatcher::new();
        let a = Arc::new(Counter(AtomicUsize::new(0)));
        let b = Arc::new(Counter(AtomicUsize::new(0)));
        dispatcher.register(a.clone());
        dispatcher.register(b.clone());

        dispatcher.dispatch(&CheckerEvent::ScanCompleted {
            counts: AlertCounts::default(),
            incremental: false,
        });
        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }

    struct Panicker;

    impl CheckerEventHandler for Panicker {
        fn on_event(&self, _event: &CheckerEvent) {
            panic!("boom");
        }
    }

    #[test]
    fn test_panicking_handler_does_not_stop_dispatch() {
        let mut dispatcher = EventDispatcher::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        dispatcher.register(Arc::new(Panicker));
        dispatcher.register(counter.clone());

        dispatcher.dispatch(&CheckerEvent::PanelOpened);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
