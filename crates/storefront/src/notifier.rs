//! Transient status messages.
//!
//! A single message slot: every new message replaces the previous one and
//! restarts the auto-hide countdown. The pending hide task is owned by the
//! [`Notifier`], not by the element it hides.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::dom::{Element, RenderTarget};

/// Kind of a message, used as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
}

impl MessageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows messages in the `#message` element and hides them after a delay.
///
/// Cheap to clone; clones share the same slot and timer. `show` spawns the
/// hide task, so it must be called inside a Tokio runtime.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    target: Arc<Element>,
    hide_after: Duration,
    pending_hide: Mutex<PendingHide>,
    hides: AtomicUsize,
}

/// The hide task of the newest message. `generation` counts messages shown.
#[derive(Default)]
struct PendingHide {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl NotifierInner {
    fn pending_hide(&self) -> MutexGuard<'_, PendingHide> {
        self.pending_hide
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Hide the message, unless a newer one was shown since `generation`.
    fn hide_if_current(&self, generation: u64) {
        let pending = self.pending_hide();
        if pending.generation != generation {
            return;
        }
        self.target.add_class("hidden");
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("target", &self.inner.target.id())
            .field("hide_after", &self.inner.hide_after)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Create a notifier writing into `target`.
    #[must_use]
    pub fn new(target: Arc<Element>, hide_after: Duration) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                target,
                hide_after,
                pending_hide: Mutex::new(PendingHide::default()),
                hides: AtomicUsize::new(0),
            }),
        }
    }

    /// Display `text`, replacing any visible message, and schedule the hide.
    ///
    /// The previous hide is cancelled before the new message is revealed, so
    /// a countdown that expires concurrently cannot hide the new message.
    pub fn show(&self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        debug!(kind = %kind, message = %text, "Showing message");

        let mut pending = self.inner.pending_hide();
        if let Some(previous) = pending.task.take() {
            previous.abort();
        }
        pending.generation += 1;
        let generation = pending.generation;

        let target = &self.inner.target;
        target.set_classes(["message", kind.as_str()]);
        target.set_text(&text);
        target.remove_class("hidden");

        let inner = Arc::clone(&self.inner);
        pending.task = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.hide_after).await;
            inner.hide_if_current(generation);
        }));
    }

    /// Text of the current message (visible or not).
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.target.text_content()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.inner.target.is_hidden()
    }

    /// Kind of the current message, read back from the element's classes.
    #[must_use]
    pub fn kind(&self) -> Option<MessageKind> {
        [MessageKind::Info, MessageKind::Success, MessageKind::Error]
            .into_iter()
            .find(|kind| self.inner.target.has_class(kind.as_str()))
    }

    /// How many times the auto-hide has fired.
    #[must_use]
    pub fn hide_count(&self) -> usize {
        self.inner.hides.load(Ordering::SeqCst)
    }
}
