//! Mock implementation of [`relay_core::Bot`] for integration tests.
//!
//! Records every `send_message(identity, text)` and serves `fetch_binary` from an
//! in-memory file table, so tests assert on replies without hitting Telegram.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use relay_core::{Bot, Identity, RelayError, Result};

#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<(Identity, String)>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_sends: AtomicBool,
}

impl MockBot {
    pub fn add_file(&self, file_ref: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(file_ref.to_string(), bytes.to_vec());
    }

    /// Makes every subsequent `send_message` fail with a transport error.
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(Identity, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, identity: Identity) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == identity)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, identity: Identity, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((identity, text.to_string()));
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(RelayError::Transport("telegram: mock send failure".to_string()));
        }
        Ok(())
    }

    async fn fetch_binary(&self, file_ref: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(file_ref)
            .cloned()
            .ok_or_else(|| RelayError::Transport(format!("telegram: no file {}", file_ref)))
    }
}
