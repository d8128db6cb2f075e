//! Capture of emitted tracing events for log assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// One captured event, reduced to its recorded fields.
///
/// The implicit message text lives under the `"message"` key.
#[derive(Debug, Default)]
pub struct CapturedEvent {
    pub fields: HashMap<String, String>,
}

#[derive(Default)]
struct EventFieldVisitor {
    fields: HashMap<String, String>,
}

impl EventFieldVisitor {
    fn into_event(self) -> CapturedEvent {
        CapturedEvent {
            fields: self.fields,
        }
    }
}

impl Visit for EventFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// Layer that records every event into a shared vector.
#[derive(Clone)]
pub struct EventCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for EventCaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventFieldVisitor::default();
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(visitor.into_event());
        }
    }
}

/// Builds a DEBUG-level subscriber capturing into the returned vector.
///
/// Install it with `tracing::subscriber::with_default` around the code under
/// test, then assert on the collected events.
pub fn capture_subscriber() -> (
    Arc<Mutex<Vec<CapturedEvent>>>,
    impl Subscriber + Send + Sync,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with(EventCaptureLayer {
            events: Arc::clone(&events),
        });
    (events, subscriber)
}
