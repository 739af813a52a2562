// src/models/branch.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entity::{date_in_range, search_matches, CacheEntity, EntityStatus};
use crate::models::filter::ListFilter;

/// Uma filial (unidade física) da rede de oficinas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntity for Branch {
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
            if !search_matches(search, &[&self.name, &self.address]) {
                return false;
            }
        }
        if let Some(status) = &filter.status {
            if self.status.as_str() != status.to_lowercase() {
                return false;
            }
        }
        date_in_range(self.created_at, filter.start_date, filter.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchInput {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchInput {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: Option<EntityStatus>,
}

impl UpdateBranchInput {
    pub fn apply_to(&self, branch: &mut Branch) {
        if let Some(name) = &self.name {
            branch.name = name.clone();
        }
        if let Some(address) = &self.address {
            branch.address = address.clone();
        }
        if let Some(phone) = &self.phone {
            branch.phone = phone.clone();
        }
        if let Some(status) = self.status {
            branch.status = status;
        }
    }
}
