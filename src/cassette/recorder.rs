//! Port-bound recorder that collects calls into a YAML cassette.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::format::{Cassette, Interaction};

#[derive(Debug)]
struct Tape {
    path: PathBuf,
    cassette: Cassette,
}

/// Handle recording the calls made on one port.
///
/// Clones append to the same cassette: the session keeps one handle and the
/// recording adapter holds another. [`finish`](Self::finish) writes the file
/// and only succeeds once it is called on the last handle.
#[derive(Debug, Clone)]
pub struct CassetteRecorder {
    port: Arc<str>,
    tape: Arc<Mutex<Tape>>,
}

impl CassetteRecorder {
    /// Starts an empty cassette for `port`, to be written to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        port: &str,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        let cassette = Cassette {
            name: name.into(),
            recorded_at: Utc::now(),
            commit: commit.into(),
            interactions: Vec::new(),
        };
        Self {
            port: Arc::from(port),
            tape: Arc::new(Mutex::new(Tape { path: path.into(), cassette })),
        }
    }

    /// Records a call whose return value is stored as-is.
    pub fn record<I: Serialize, O: Serialize>(&self, method: &str, input: &I, output: &O) {
        self.push(method, to_value(input), to_value(output));
    }

    /// Records a fallible call as `{"ok": value}` or `{"err": message}`,
    /// the envelope `replaying::replay_result` unwraps.
    pub fn record_result<I, T, E>(&self, method: &str, input: &I, result: &Result<T, E>)
    where
        I: Serialize,
        T: Serialize,
        E: Display,
    {
        let output = match result {
            Ok(value) => json!({ "ok": to_value(value) }),
            Err(e) => json!({ "err": e.to_string() }),
        };
        self.push(method, to_value(input), output);
    }

    fn push(&self, method: &str, input: Value, output: Value) {
        let mut tape = self.tape.lock().expect("recorder lock poisoned");
        let interactions = &mut tape.cassette.interactions;
        interactions.push(Interaction {
            seq: interactions.len() as u64,
            port: self.port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Writes the cassette, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if another handle to this recorder is still alive or
    /// the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let port = self.port;
        let Tape { path, cassette } = Arc::try_unwrap(self.tape)
            .map_err(|_| format!("Recording adapter for {port} still has references"))?
            .into_inner()
            .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;

        let yaml = serde_yaml::to_string(&cassette)
            .map_err(|e| format!("Failed to serialize {port} cassette: {e}"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
        std::fs::write(&path, yaml).map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
        tracing::debug!(port = %port, path = %path.display(), count = cassette.interactions.len(), "cassette written");
        Ok(path)
    }
}

fn to_value<V: Serialize>(value: &V) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "value not representable in cassette, recording null");
        Value::Null
    })
}
