// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uma linha da trilha de auditoria de uma entidade.
/// A lista é append-only: nunca editamos nem removemos entradas individuais;
/// a trilha inteira só desaparece junto com a entidade dona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub detail: String,
}

impl AuditEntry {
    pub fn now(action: &str, actor: &str, detail: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            actor: actor.to_string(),
            timestamp: Utc::now(),
            detail: detail.into(),
        }
    }
}
