// src/models/filter.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filtros de listagem aceitos por todos os recursos.
/// Mapeia 1:1 para a query-string do backend (`search`, `category`, `status`,
/// `priority`, `compliance`, `tags` separadas por vírgula, `startDate`,
/// `endDate`, `page`, `limit`). O espelho local aplica exatamente o mesmo
/// conjunto de predicados, para que a paginação em modo degradado seja
/// idêntica à do servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub compliance: Option<String>,
    pub tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Página 1-indexada.
    pub page: u32,
    pub limit: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            status: None,
            priority: None,
            compliance: None,
            tags: Vec::new(),
            start_date: None,
            end_date: None,
            page: 1,
            limit: 10,
        }
    }
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_compliance(mut self, compliance: impl Into<String>) -> Self {
        self.compliance = Some(compliance.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Limite normalizado para a aritmética de paginação (nunca zero).
    pub fn effective_limit(&self) -> u32 {
        self.limit.max(1)
    }

    /// Converte para os pares da query-string que o backend espera.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(priority) = &self.priority {
            query.push(("priority", priority.clone()));
        }
        if let Some(compliance) = &self.compliance {
            query.push(("compliance", compliance.clone()));
        }
        if !self.tags.is_empty() {
            query.push(("tags", self.tags.join(",")));
        }
        if let Some(start) = &self.start_date {
            query.push(("startDate", start.to_rfc3339()));
        }
        if let Some(end) = &self.end_date {
            query.push(("endDate", end.to_rfc3339()));
        }
        query.push(("page", self.page.to_string()));
        query.push(("limit", self.effective_limit().to_string()));
        query
    }
}

/// Uma página de resultados, no formato que o servidor devolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Monta uma página a partir do conjunto já filtrado, com a mesma
    /// fórmula do servidor: `totalPages = max(1, ceil(total / limit))`.
    pub fn paginate(filtered: Vec<T>, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total = filtered.len() as u64;
        let total_pages = (total.div_ceil(limit as u64) as u32).max(1);
        let start = ((page.max(1) - 1) as usize) * limit as usize;
        let items: Vec<T> = filtered
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Self {
            items,
            total,
            page: page.max(1),
            limit,
            total_pages,
        }
    }
}

/// De onde veio um resultado de leitura: da API viva ou do espelho local.
/// Expor essa origem é o que permite à UI sinalizar o modo degradado em vez
/// de apresentar dados possivelmente velhos como se fossem reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataOrigin {
    Remote,
    FallbackCache,
}

/// Resultado de leitura com a origem anexada.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Remote,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::FallbackCache,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == DataOrigin::FallbackCache
    }
}
