// src/models/policy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entity::{date_in_range, search_matches, CacheEntity};
use crate::models::filter::ListFilter;

// --- 1. Enums de domínio ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    Draft,
    Active,
    Inactive,
    Archived,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Draft => "draft",
            PolicyStatus::Active => "active",
            PolicyStatus::Inactive => "inactive",
            PolicyStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl PolicyPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyPriority::Low => "low",
            PolicyPriority::Medium => "medium",
            PolicyPriority::High => "high",
            PolicyPriority::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceState {
    Compliant,
    NonCompliant,
    PendingReview,
}

impl ComplianceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceState::Compliant => "compliant",
            ComplianceState::NonCompliant => "non_compliant",
            ComplianceState::PendingReview => "pending_review",
        }
    }
}

// --- 2. A entidade ---

/// Uma política operacional da oficina (descontos, garantia, retrabalho...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: PolicyStatus,
    pub priority: PolicyPriority,
    pub compliance: ComplianceState,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntity for Policy {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        if let Some(search) = &filter.search {
            if !search_matches(search, &[&self.name, &self.description]) {
                return false;
            }
        }
        if let Some(category) = &filter.category {
            if !self.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(status) = &filter.status {
            if self.status.as_str() != status.to_lowercase() {
                return false;
            }
        }
        if let Some(priority) = &filter.priority {
            if self.priority.as_str() != priority.to_lowercase() {
                return false;
            }
        }
        if let Some(compliance) = &filter.compliance {
            if self.compliance.as_str() != compliance.to_lowercase() {
                return false;
            }
        }
        // Subconjunto: a política precisa carregar todas as tags pedidas.
        if !filter.tags.is_empty() {
            let has_all = filter
                .tags
                .iter()
                .all(|t| self.tags.iter().any(|own| own.eq_ignore_ascii_case(t)));
            if !has_all {
                return false;
            }
        }
        date_in_range(self.created_at, filter.start_date, filter.end_date)
    }
}

// --- 3. Payloads de entrada ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyInput {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    pub priority: PolicyPriority,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyInput {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<PolicyPriority>,
    pub compliance: Option<ComplianceState>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePolicyInput {
    /// Merge raso: só os campos presentes sobrescrevem.
    pub fn apply_to(&self, policy: &mut Policy) {
        if let Some(name) = &self.name {
            policy.name = name.clone();
        }
        if let Some(description) = &self.description {
            policy.description = description.clone();
        }
        if let Some(category) = &self.category {
            policy.category = category.clone();
        }
        if let Some(priority) = self.priority {
            policy.priority = priority;
        }
        if let Some(compliance) = self.compliance {
            policy.compliance = compliance;
        }
        if let Some(tags) = &self.tags {
            policy.tags = tags.clone();
        }
    }
}

// --- 4. Relatório de conformidade ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub policy_id: i64,
    pub state: ComplianceState,
    pub checked_at: DateTime<Utc>,
    pub notes: Vec<String>,
}
