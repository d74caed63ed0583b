// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session registry
//!
//! Create/destroy lifecycle for sessions keyed by browsing context. Every
//! session has fully independent state.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::progress::ProgressSink;
use super::session::{Session, SessionKey, Whitelist};
use crate::config::ScanConfig;
use crate::crawl::Fetcher;
use crate::error::{Error, Result};
use crate::fingerprint::FingerprintRecord;
use crate::http::PageCapture;
use crate::results::ResultSnapshot;

struct Entry {
    session: Arc<Session>,
    seed: PageCapture,
    task: Mutex<Option<JoinHandle<Result<ResultSnapshot>>>>,
}

/// Owns every live session
pub struct SessionRegistry {
    sessions: DashMap<SessionKey, Arc<Entry>>,
    config: ScanConfig,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ProgressSink>,
    whitelist: Arc<dyn Whitelist>,
}

impl SessionRegistry {
    /// Create a registry; `config` is also the default whitelist
    pub fn new(config: ScanConfig, fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ProgressSink>) -> Self {
        let whitelist: Arc<dyn Whitelist> = Arc::new(config.clone());
        Self {
            sessions: DashMap::new(),
            config,
            fetcher,
            sink,
            whitelist,
        }
    }

    /// Use a different whitelist for new sessions
    pub fn with_whitelist(mut self, whitelist: Arc<dyn Whitelist>) -> Self {
        self.whitelist = whitelist;
        self
    }

    /// Start a scan for `key`, replacing any session already running there
    pub fn start(&self, key: impl Into<SessionKey>, seed: PageCapture) -> Arc<Session> {
        let key = key.into();
        if self.destroy(&key) {
            debug!(session = %key, "replacing existing session");
        }

        let session = Arc::new(
            Session::new(key.clone(), self.config.clone()).with_whitelist(self.whitelist.clone()),
        );
        let task = tokio::spawn(session.clone().run(
            seed.clone(),
            self.fetcher.clone(),
            self.sink.clone(),
        ));
        self.sessions.insert(
            key.clone(),
            Arc::new(Entry {
                session: session.clone(),
                seed,
                task: Mutex::new(Some(task)),
            }),
        );
        info!(session = %key, sessions = self.sessions.len(), "session started");
        session
    }

    /// Discard the results of `key` and scan its page again
    pub fn rescan(&self, key: &SessionKey) -> Result<Arc<Session>> {
        let seed = self
            .entry(key)
            .map(|entry| entry.seed.clone())
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))?;
        Ok(self.start(key.clone(), seed))
    }

    /// Tear a session down; its in-flight work is abandoned
    pub fn destroy(&self, key: &SessionKey) -> bool {
        let Some((_, entry)) = self.sessions.remove(key) else {
            return false;
        };
        entry.session.cancel();
        // The task observes the cancellation and exits on its own
        drop(entry.task.lock().take());
        info!(session = %key, "session destroyed");
        true
    }

    /// The live session for `key`
    pub fn session(&self, key: &SessionKey) -> Option<Arc<Session>> {
        self.entry(key).map(|entry| entry.session.clone())
    }

    /// Point-in-time results of `key`
    pub fn results(&self, key: &SessionKey) -> Option<ResultSnapshot> {
        self.entry(key).map(|entry| entry.session.results())
    }

    /// Wait for the scan of `key` to finish
    pub async fn wait(&self, key: &SessionKey) -> Result<ResultSnapshot> {
        let entry = self
            .entry(key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))?;
        let task = entry.task.lock().take();
        match task {
            Some(task) => task
                .await
                .map_err(|err| Error::other(format!("scan task failed: {}", err)))?,
            None => Ok(entry.session.results()),
        }
    }

    /// Feed main-frame response headers and cookies observed after the scan started
    pub async fn observe_response(
        &self,
        key: &SessionKey,
        headers: &[(String, String)],
        cookies: &[String],
    ) -> Result<Vec<FingerprintRecord>> {
        let session = self
            .session(key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))?;
        let records = session.observe_signals(headers, cookies);
        for record in &records {
            if let Err(err) = self.sink.fingerprint(key, record).await {
                warn!(session = %key, error = %err, "fingerprint sink failed");
            }
        }
        Ok(records)
    }

    /// Keys of the live sessions
    pub fn keys(&self) -> Vec<SessionKey> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn entry(&self, key: &SessionKey) -> Option<Arc<Entry>> {
        self.sessions.get(key).map(|entry| entry.value().clone())
    }
}
