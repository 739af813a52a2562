// src/models/entity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::filter::ListFilter;

/// Status simples compartilhado por peças e filiais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }
}

/// Contrato que toda entidade do espelho local cumpre.
///
/// `matches` é o mesmo conjunto de predicados que a API viva aplica na
/// listagem; é isso que garante a paridade de filtragem/paginação entre o
/// modo normal e o degradado.
pub trait CacheEntity: Clone + Send + 'static {
    fn id(&self) -> i64;
    fn assign_id(&mut self, id: i64);
    fn name(&self) -> &str;
    fn touch(&mut self, at: DateTime<Utc>);
    fn matches(&self, filter: &ListFilter) -> bool;
}

/// Predicado de busca textual compartilhado: substring, sem diferenciar
/// maiúsculas.
pub(crate) fn search_matches(needle: &str, haystacks: &[&str]) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&needle))
}

/// Intervalo de datas inclusivo sobre `created_at`.
pub(crate) fn date_in_range(
    created_at: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    if let Some(start) = start {
        if created_at < start {
            return false;
        }
    }
    if let Some(end) = end {
        if created_at > end {
            return false;
        }
    }
    true
}
