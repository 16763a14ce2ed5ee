use std::sync::Mutex;

use async_trait::async_trait;

use super::{LootNotification, Notifier, NotifierResponse, NotifyError};

/// Test/dev notifier: records payloads instead of calling out, and can be
/// told to fail so degraded paths are exercisable.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<LootNotification>>,
    failure: Mutex<Option<NotifyError>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `notify` call fail with `error`.
    pub fn fail_with(&self, error: NotifyError) {
        *self.failure.lock().expect("failure lock") = Some(error);
    }

    /// Go back to succeeding.
    pub fn clear_failure(&self) {
        *self.failure.lock().expect("failure lock") = None;
    }

    pub fn sent(&self) -> Vec<LootNotification> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, note: &LootNotification) -> Result<NotifierResponse, NotifyError> {
        if let Some(error) = self.failure.lock().expect("failure lock").clone() {
            return Err(error);
        }
        self.sent.lock().expect("sent lock").push(note.clone());
        Ok(NotifierResponse {
            status: 204,
            body: String::new(),
        })
    }
}
