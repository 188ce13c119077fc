//! Progress notifications published while a render runs

use tokio::sync::mpsc::UnboundedSender;

/// Step reached by a render call. Delivery to a UI thread is the receiver's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Served from the cache, no backend contacted
    CacheHit,
    AttemptStarted {
        index: usize,
        backend: String,
    },
    AttemptFailed {
        index: usize,
        backend: String,
        error: String,
    },
    Succeeded {
        index: usize,
        backend: String,
        bytes: usize,
    },
    /// Every backend failed
    Exhausted { attempts: usize },
}

impl RenderEvent {
    /// Short status line, e.g. for a progress dialog
    pub fn message(&self) -> String {
        match self {
            RenderEvent::CacheHit => "Using cached diagram...".to_string(),
            RenderEvent::AttemptStarted { index, backend } => {
                format!("Trying rendering service {} ({})...", index + 1, backend)
            }
            RenderEvent::AttemptFailed { index, backend, error } => {
                format!("Renderer {} ({}) failed: {}", index + 1, backend, error)
            }
            RenderEvent::Succeeded { backend, bytes, .. } => {
                format!("Rendered by {} ({} bytes)", backend, bytes)
            }
            RenderEvent::Exhausted { attempts } => {
                format!("All {} rendering services failed", attempts)
            }
        }
    }
}

/// Optional event sink; a dropped receiver is not an error
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink(Option<UnboundedSender<RenderEvent>>);

impl EventSink {
    pub(crate) fn new(sender: UnboundedSender<RenderEvent>) -> Self {
        Self(Some(sender))
    }

    pub(crate) fn emit(&self, event: RenderEvent) {
        if let Some(sender) = &self.0 {
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_one_based() {
        let event = RenderEvent::AttemptStarted {
            index: 2,
            backend: "kroki".to_string(),
        };
        assert_eq!(event.message(), "Trying rendering service 3 (kroki)...");
        assert_eq!(RenderEvent::CacheHit.message(), "Using cached diagram...");
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        EventSink::new(tx).emit(RenderEvent::CacheHit);
        EventSink::default().emit(RenderEvent::CacheHit);
    }
}
