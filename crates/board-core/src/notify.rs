//! Notification queue.
//!
//! Failed mutations surface a non-blocking message; the UI drains the queue
//! and shows toasts.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

pub const GENERIC_FAILURE: &str = "Algo deu errado. Tente novamente.";
pub const COLUMN_MOVE_FAILURE: &str = "Falha ao mover a coluna";
pub const CARD_REORDER_FAILURE: &str = "Falha ao reordenar tarefa";
pub const DEMO_MODE_NOTICE: &str = "Modo demonstração: as alterações não são salvas.";

/// Oldest notifications are dropped past this many
const MAX_PENDING: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct NotifierInner {
    queue: VecDeque<Notification>,
    listeners: Vec<Listener>,
}

#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierInner>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        let listeners = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.queue.len() == MAX_PENDING {
                inner.queue.pop_front();
            }
            inner.queue.push_back(notification.clone());
            inner.listeners.clone()
        };
        for listener in listeners {
            listener(&notification);
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, message));
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .push(Arc::new(listener));
    }

    /// Take every pending notification
    pub fn drain(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .queue
            .drain(..)
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .queue
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let notifier = Notifier::new();
        notifier.error(COLUMN_MOVE_FAILURE);
        notifier.info(DEMO_MODE_NOTICE);
        let drained = notifier.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Error);
        assert_eq!(drained[1].level, NotificationLevel::Info);
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn test_queue_is_bounded() {
        let notifier = Notifier::new();
        for i in 0..(MAX_PENDING + 5) {
            notifier.error(format!("n{}", i));
        }
        let drained = notifier.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "n5");
    }
}
