//! Page walking over collection endpoints.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::NatusferaError;
use crate::query::{ApiRequest, MAX_PAGE, MAX_RESULTS, PER_PAGE};
use crate::transport::Transport;

/// Non-fatal things a caller may want to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    PageFetched { page: u32, total: usize },
    Truncated { limit: usize },
    NotFound { resource: String },
    NoPlaceMatches { name: String },
    RecordSkipped { reason: String },
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

/// Forwards events to `tracing`.
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PageFetched { page, total } => {
                debug!(page, total, "page fetched")
            }
            ProgressEvent::Truncated { limit } => {
                warn!("only the first {limit} results are available")
            }
            ProgressEvent::NotFound { resource } => warn!(%resource, "not found"),
            ProgressEvent::NoPlaceMatches { name } => warn!(%name, "no place matches"),
            ProgressEvent::RecordSkipped { reason } => warn!(%reason, "record skipped"),
        }
    }
}

pub struct Paginator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    sink: &'a dyn ProgressSink,
}

impl<'a, T: Transport + ?Sized> Paginator<'a, T> {
    pub fn new(transport: &'a T, sink: &'a dyn ProgressSink) -> Self {
        Self { transport, sink }
    }

    /// Walks every page of `request` until a short page, the page ceiling or
    /// `num_max` records, normalizing each page as it arrives.
    pub fn fetch_all<R>(
        &self,
        request: &ApiRequest,
        num_max: Option<usize>,
        normalize: impl Fn(&Value) -> Option<R>,
    ) -> Result<Vec<R>, NatusferaError> {
        let mut records = Vec::new();
        let mut page = 1u32;
        loop {
            let paged = request.page(page);
            debug!(request = %paged, "requesting page");
            let response = self.transport.get_json(&paged)?;
            if response.is_not_found() {
                // Past page 1 the records gathered so far are partial.
                let resource = if page == 1 {
                    request.path.clone()
                } else {
                    warn!(page, kept = records.len(), "page vanished mid-walk");
                    paged.to_string()
                };
                self.sink.event(ProgressEvent::NotFound { resource });
                break;
            }

            match &response.body {
                Value::Array(items) => {
                    self.normalize_into(items, &mut records, &normalize);
                    self.sink.event(ProgressEvent::PageFetched {
                        page,
                        total: records.len(),
                    });
                    if items.len() < PER_PAGE {
                        break;
                    }
                    if num_max.is_some_and(|max| records.len() >= max) {
                        break;
                    }
                    if page >= MAX_PAGE {
                        self.sink.event(ProgressEvent::Truncated { limit: MAX_RESULTS });
                        break;
                    }
                    page += 1;
                }
                Value::Object(_) if page == 1 => {
                    self.normalize_into(
                        std::slice::from_ref(&response.body),
                        &mut records,
                        &normalize,
                    );
                    break;
                }
                _ if page == 1 => {
                    self.sink.event(ProgressEvent::RecordSkipped {
                        reason: "response is neither a page nor a record".to_string(),
                    });
                    break;
                }
                _ => {
                    // The server answers past its ceiling with an error object.
                    self.sink.event(ProgressEvent::Truncated { limit: MAX_RESULTS });
                    break;
                }
            }
        }

        if let Some(max) = num_max {
            records.truncate(max);
        }
        debug!(request = %request, count = records.len(), "fetch complete");
        Ok(records)
    }

    /// Single-resource lookup: one object, never paginated.
    pub fn fetch_one<R>(
        &self,
        request: &ApiRequest,
        normalize: impl Fn(&Value) -> Option<R>,
    ) -> Result<Vec<R>, NatusferaError> {
        debug!(request = %request, "requesting resource");
        let response = self.transport.get_json(request)?;
        if response.is_not_found() {
            self.sink.event(ProgressEvent::NotFound {
                resource: request.path.clone(),
            });
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        match &response.body {
            Value::Array(items) => self.normalize_into(items, &mut records, &normalize),
            body => self.normalize_into(std::slice::from_ref(body), &mut records, &normalize),
        }
        Ok(records)
    }

    fn normalize_into<R>(
        &self,
        items: &[Value],
        records: &mut Vec<R>,
        normalize: &impl Fn(&Value) -> Option<R>,
    ) {
        for item in items {
            match normalize(item) {
                Some(record) => records.push(record),
                None => self.sink.event(ProgressEvent::RecordSkipped {
                    reason: "record without a usable id".to_string(),
                }),
            }
        }
    }
}
