#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use natusfera::NatusferaError;
use natusfera::fetch::{ProgressEvent, ProgressSink};
use natusfera::query::ApiRequest;
use natusfera::transport::{ApiResponse, Transport};
use serde_json::{Value, json};

/// In-memory API keyed on the rendered request (`path?k=v&...`).
/// Unscripted requests fail like a transport error would.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, ApiResponse>,
    files: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, request: &str, body: Value) -> Self {
        self.responses
            .insert(request.to_string(), ApiResponse::ok(body));
        self
    }

    pub fn not_found(mut self, request: &str) -> Self {
        self.responses
            .insert(request.to_string(), ApiResponse::not_found());
        self
    }

    pub fn file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get_json(&self, request: &ApiRequest) -> Result<ApiResponse, NatusferaError> {
        let key = request.to_string();
        self.requests.lock().unwrap().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or(NatusferaError::Status {
                status: 500,
                message: format!("unscripted request {key}"),
            })
    }

    fn get_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, NatusferaError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.files.get(url).cloned())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// `count` minimal observations with ids starting at `first`.
pub fn observations(first: u64, count: u64) -> Value {
    Value::Array(
        (first..first + count)
            .map(|id| json!({ "id": id, "taxon_id": 3 }))
            .collect(),
    )
}
