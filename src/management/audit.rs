use std::{io::Error, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    management,
    types::{MatchResult, SyncResult},
};

#[derive(Debug)]
pub enum AuditError {
    IoError(Error),
    CriticalError(String),
    SerdeError(serde_json::Error),
}

impl From<Error> for AuditError {
    fn from(err: Error) -> Self {
        AuditError::IoError(err)
    }
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditError::IoError(e) => write!(f, "io error: {}", e),
            AuditError::CriticalError(e) => write!(f, "{}", e),
            AuditError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// One recorded reconciliation run: the aggregate result plus every
/// per-track match decision, so a questionable match can be traced back
/// without re-running the resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub recorded_at: DateTime<Utc>,
    pub result: SyncResult,
    #[serde(default)]
    pub decisions: Vec<MatchResult>,
}

/// Append-only log of reconciliation runs. Lets `info` report what the
/// last runs did without re-querying either catalog.
pub struct AuditLogManager {
    base: PathBuf,
    records: Vec<AuditRecord>,
}

impl AuditLogManager {
    pub fn new() -> Self {
        Self::at(management::data_dir())
    }

    pub fn at(base: PathBuf) -> Self {
        Self {
            base,
            records: Vec::new(),
        }
    }

    pub async fn load_from_cache(&self) -> Result<Self, AuditError> {
        let path = self.get_path();
        let records = match async_fs::read_to_string(&path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| AuditError::SerdeError(e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(AuditError::IoError(e)),
        };
        Ok(Self {
            base: self.base.clone(),
            records,
        })
    }

    pub async fn save_to_cache(&self) -> Result<(), AuditError> {
        let path = self.get_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::IoError(e))?;
        }

        let json =
            serde_json::to_string_pretty(&self.records).map_err(|e| AuditError::SerdeError(e))?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| AuditError::IoError(e))
    }

    pub fn record(&mut self, result: SyncResult, decisions: Vec<MatchResult>) {
        self.records.push(AuditRecord {
            recorded_at: Utc::now(),
            result,
            decisions,
        });
    }

    /// The most recent `n` records, newest first.
    pub fn recent(&self, n: usize) -> Vec<&AuditRecord> {
        self.records.iter().rev().take(n).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn get_path(&self) -> PathBuf {
        self.base.join("audit/runs.json")
    }
}
