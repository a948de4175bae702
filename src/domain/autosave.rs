//! Debounced read-merge-write engine behind the inline content editors.
//!
//! One [`ContentEditor`] owns a set of named fields inside a single
//! `(client_slug, content_type)` blob. Edits are buffered and flushed after a
//! quiet period (or immediately on [`ContentEditor::save_now`]). A flush
//! re-reads the stored blob, overlays the pending fields and writes the whole
//! object back, so fields owned by other editors are kept.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::{
    sync::{mpsc, watch},
    time::{sleep_until, Instant},
};
use tracing::{debug, warn};

use crate::{
    entities::content::{merge_objects, ContentType, ContentWriteRequest},
    errors::AppError,
    use_cases::content::ContentHandler,
};

pub const SAVE_FAILED: &str = "Failed to save changes. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Pending,
    Saving,
    Saved,
    Error(String),
}

#[derive(Debug, Default)]
struct EditorState {
    /// Owned fields as last read from or written to storage.
    fetched: Map<String, Value>,
    pending: Map<String, Value>,
}

enum Command {
    Arm,
    Disarm,
    Flush,
}

pub struct ContentEditor {
    fields: BTreeSet<String>,
    state: Arc<Mutex<EditorState>>,
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
}

impl ContentEditor {
    /// Loads the current values of `fields` and starts the debounce task.
    pub async fn open(
        content: Arc<ContentHandler>,
        client_slug: impl Into<String>,
        content_type: ContentType,
        fields: &[&str],
        debounce: Duration,
    ) -> Result<Self, AppError> {
        let client_slug = client_slug.into();
        let fields: BTreeSet<String> = fields.iter().map(|f| f.to_string()).collect();

        let stored = content.find_content(&client_slug, content_type).await?;
        let fetched = owned_fields(stored.as_ref().map(|r| &r.content_data), &fields);
        let state = Arc::new(Mutex::new(EditorState { fetched, pending: Map::new() }));

        let (commands, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);

        let worker = Worker {
            content,
            client_slug,
            content_type,
            fields: fields.clone(),
            state: state.clone(),
            status: status_tx,
            debounce,
        };
        tokio::spawn(worker.run(rx));

        Ok(ContentEditor { fields, state, commands, status })
    }

    /// Buffers a change and restarts the debounce timer.
    pub fn edit(&self, field: &str, value: Value) -> Result<(), AppError> {
        if !self.fields.contains(field) {
            return Err(AppError::InvalidInput(format!("Field '{}' is not owned by this editor", field)));
        }
        self.state.lock().pending.insert(field.to_string(), value);
        self.send(Command::Arm);
        Ok(())
    }

    /// Flushes pending edits without waiting for the debounce.
    pub fn save_now(&self) {
        self.send(Command::Flush);
    }

    /// Drops pending edits; values revert to the last fetched ones.
    pub fn cancel(&self) {
        self.state.lock().pending.clear();
        self.send(Command::Disarm);
    }

    /// Current field values: fetched values overlaid with pending edits.
    pub fn values(&self) -> Map<String, Value> {
        let state = self.state.lock();
        let mut values = state.fetched.clone();
        values.extend(state.pending.clone());
        values
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Receiver for status transitions.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("autosave worker is gone");
        }
    }
}

fn owned_fields(blob: Option<&Value>, fields: &BTreeSet<String>) -> Map<String, Value> {
    blob.and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter(|(key, _)| fields.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

struct Worker {
    content: Arc<ContentHandler>,
    client_slug: String,
    content_type: ContentType,
    fields: BTreeSet<String>,
    state: Arc<Mutex<EditorState>>,
    status: watch::Sender<SaveStatus>,
    debounce: Duration,
}

impl Worker {
    async fn run(self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let mut deadline: Option<Instant> = None;

        loop {
            let command = match deadline {
                Some(at) => tokio::select! {
                    command = commands.recv() => command,
                    _ = sleep_until(at) => Some(Command::Flush),
                },
                None => commands.recv().await,
            };

            match command {
                Some(Command::Arm) => {
                    deadline = Some(Instant::now() + self.debounce);
                    self.status.send_replace(SaveStatus::Pending);
                }
                Some(Command::Disarm) => {
                    deadline = None;
                    self.status.send_replace(SaveStatus::Idle);
                }
                Some(Command::Flush) => {
                    deadline = None;
                    self.flush().await;
                }
                None => {
                    // Editor dropped: flush what is left.
                    if deadline.is_some() {
                        self.flush().await;
                    }
                    break;
                }
            }
        }
        debug!(slug = %self.client_slug, content_type = %self.content_type, "autosave worker stopped");
    }

    async fn flush(&self) {
        let pending = self.state.lock().pending.clone();
        if pending.is_empty() {
            return;
        }
        self.status.send_replace(SaveStatus::Saving);

        match self.write(&pending).await {
            Ok(stored) => {
                let mut state = self.state.lock();
                state.fetched = owned_fields(Some(&stored), &self.fields);
                // Keep edits made while the write was in flight.
                state.pending.retain(|key, value| pending.get(key) != Some(value));
                drop(state);
                self.status.send_replace(SaveStatus::Saved);
            }
            Err(e) => {
                warn!(slug = %self.client_slug, content_type = %self.content_type, error = %e, "autosave failed");
                self.status.send_replace(SaveStatus::Error(SAVE_FAILED.into()));
            }
        }
    }

    async fn write(&self, pending: &Map<String, Value>) -> Result<Value, AppError> {
        let current = self
            .content
            .find_content(&self.client_slug, self.content_type)
            .await?
            .map(|r| r.content_data)
            .unwrap_or(Value::Null);
        let merged = merge_objects(&current, &Value::Object(pending.clone()));

        let record = self
            .content
            .replace_content(ContentWriteRequest {
                client_slug: self.client_slug.clone(),
                content_type: self.content_type,
                content_data: merged,
            })
            .await?;
        Ok(record.content_data)
    }
}
