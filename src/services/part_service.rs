// src/services/part_service.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::api::PartRemote;
use crate::common::csv::write_csv;
use crate::common::error::ServiceError;
use crate::fallback::FallbackStore;
use crate::models::entity::{CacheEntity, EntityStatus};
use crate::models::export::{ExportFormat, ExportPayload};
use crate::models::filter::{Fetched, ListFilter, Page};
use crate::models::part::{CreatePartInput, Part, UpdatePartInput};

/// Mesmo padrão resiliente do `PolicyService`, instanciado mais enxuto para
/// o catálogo de peças.
#[derive(Clone)]
pub struct PartService {
    remote: Arc<dyn PartRemote>,
    store: Arc<FallbackStore<Part>>,
    degraded: Arc<AtomicBool>,
}

impl PartService {
    pub fn new(remote: Arc<dyn PartRemote>, store: Arc<FallbackStore<Part>>) -> Self {
        Self {
            remote,
            store,
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn mark(&self, degraded: bool) {
        self.degraded.store(degraded, Ordering::Relaxed);
    }

    pub async fn list(&self, filter: &ListFilter) -> Fetched<Page<Part>> {
        match self.remote.list(filter).await {
            Ok(page) => {
                self.mark(false);
                Fetched::remote(page)
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; listando peças do espelho local");
                self.mark(true);
                Fetched::fallback(self.store.list(filter))
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<Fetched<Part>, ServiceError> {
        match self.remote.get(id).await {
            Ok(part) => {
                self.mark(false);
                Ok(Fetched::remote(part))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; buscando peça no espelho local");
                self.mark(true);
                Ok(Fetched::fallback(self.store.get(id)?))
            }
        }
    }

    pub async fn create(&self, input: CreatePartInput) -> Result<Fetched<Part>, ServiceError> {
        input.validate()?;
        match self.remote.create(&input).await {
            Ok(part) => {
                self.mark(false);
                Ok(Fetched::remote(part))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; criando peça no espelho local");
                self.mark(true);
                let now = Utc::now();
                let part = Part {
                    id: 0,
                    name: input.name,
                    sku: input.sku,
                    category: input.category,
                    unit_price: input.unit_price,
                    stock_quantity: input.stock_quantity,
                    status: EntityStatus::Active,
                    created_at: now,
                    updated_at: now,
                };
                let created = self.store.create(part, "Peça criada em modo degradado")?;
                Ok(Fetched::fallback(created))
            }
        }
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdatePartInput,
    ) -> Result<Fetched<Part>, ServiceError> {
        input.validate()?;
        match self.remote.update(id, &input).await {
            Ok(part) => {
                self.mark(false);
                Ok(Fetched::remote(part))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; atualizando peça no espelho local");
                self.mark(true);
                let updated = self
                    .store
                    .mutate(id, "updated", "Campos atualizados", |p| input.apply_to(p))?;
                Ok(Fetched::fallback(updated))
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        match self.remote.delete(id).await {
            Ok(()) => {
                self.mark(false);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; removendo peça do espelho local");
                self.mark(true);
                self.store.delete(id)
            }
        }
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<(), ServiceError> {
        match self.remote.bulk_delete(ids).await {
            Ok(()) => {
                self.mark(false);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; remoção de peças em lote no espelho");
                self.mark(true);
                self.store.bulk_delete(ids);
                Ok(())
            }
        }
    }

    pub async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Fetched<ExportPayload>, ServiceError> {
        match self.remote.export(filter, format).await {
            Ok(bytes) => {
                self.mark(false);
                Ok(Fetched::remote(ExportPayload::new("parts", format, bytes)))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; exportando CSV de peças do espelho");
                self.mark(true);
                let filtered: Vec<Part> = self
                    .store
                    .all()
                    .into_iter()
                    .filter(|p| p.matches(filter))
                    .collect();
                let bytes = write_csv(&filtered)?;
                Ok(Fetched::fallback(ExportPayload::new("parts", format, bytes)))
            }
        }
    }
}
