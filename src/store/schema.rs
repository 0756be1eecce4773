use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::quiz::QuizSession;

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk envelope for one learner session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionFile {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub session: QuizSession,
}

impl SessionFile {
    pub fn new(session: QuizSession) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            session,
        }
    }

    /// Check if loaded data has a stale schema version and must be discarded.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
