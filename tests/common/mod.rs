//! Shared fixtures for resolver integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use profile_lookup::batch::LookupRequest;
use profile_lookup::{ProfileTransport, ResolvedProfile, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;

type Script =
    dyn Fn(&LookupRequest, usize) -> Result<Vec<ResolvedProfile>, TransportError> + Send + Sync;

/// Transport driven by a closure. Records every call.
///
/// The closure gets the request and the zero-based call number.
pub struct ScriptedTransport {
    script: Box<Script>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&LookupRequest, usize) -> Result<Vec<ResolvedProfile>, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers from a fixed directory of known players; never fails.
    pub fn directory(known: &[&str]) -> Self {
        let dir = directory(known);
        Self::new(move |req, _| Ok(lookup(&dir, req)))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileTransport for ScriptedTransport {
    async fn search(
        &self,
        request: &LookupRequest,
    ) -> Result<Vec<ResolvedProfile>, TransportError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.names().to_vec());
            calls.len() - 1
        };
        (self.script)(request, n)
    }
}

/// Canonical-case profiles keyed by lowercased name.
pub fn directory(known: &[&str]) -> HashMap<String, ResolvedProfile> {
    known
        .iter()
        .map(|name| {
            (
                name.to_lowercase(),
                ResolvedProfile::new(format!("uuid-{}", name.to_lowercase()), *name),
            )
        })
        .collect()
}

pub fn lookup(
    dir: &HashMap<String, ResolvedProfile>,
    request: &LookupRequest,
) -> Vec<ResolvedProfile> {
    request
        .names()
        .iter()
        .filter_map(|n| dir.get(n).cloned())
        .collect()
}

pub fn server_error(call: usize) -> TransportError {
    TransportError::Status {
        status: 503,
        body: format!("unavailable (call {call})"),
    }
}
