// src/models/part.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entity::{date_in_range, search_matches, CacheEntity, EntityStatus};
use crate::models::filter::ListFilter;

/// Uma peça do catálogo da oficina.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_price: Decimal,
    pub stock_quantity: Decimal,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntity for Part {
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

    // Peças não carregam prioridade, conformidade nem tags; esses filtros
    // não existem na API de peças e são ignorados aqui também.
    fn matches(&self, filter: &ListFilter) -> bool {
        if let Some(search) = &filter.search {
            if !search_matches(search, &[&self.name, &self.sku]) {
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
        date_in_range(self.created_at, filter.start_date, filter.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartInput {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock_quantity: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartInput {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock_quantity: Option<Decimal>,
    pub status: Option<EntityStatus>,
}

impl UpdatePartInput {
    pub fn apply_to(&self, part: &mut Part) {
        if let Some(name) = &self.name {
            part.name = name.clone();
        }
        if let Some(sku) = &self.sku {
            part.sku = sku.clone();
        }
        if let Some(category) = &self.category {
            part.category = category.clone();
        }
        if let Some(unit_price) = self.unit_price {
            part.unit_price = unit_price;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            part.stock_quantity = stock_quantity;
        }
        if let Some(status) = self.status {
            part.status = status;
        }
    }
}
