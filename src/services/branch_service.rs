// src/services/branch_service.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::api::BranchRemote;
use crate::common::csv::write_csv;
use crate::common::error::ServiceError;
use crate::fallback::FallbackStore;
use crate::models::branch::{Branch, CreateBranchInput, UpdateBranchInput};
use crate::models::entity::{CacheEntity, EntityStatus};
use crate::models::export::{ExportFormat, ExportPayload};
use crate::models::filter::{Fetched, ListFilter, Page};

#[derive(Clone)]
pub struct BranchService {
    remote: Arc<dyn BranchRemote>,
    store: Arc<FallbackStore<Branch>>,
    degraded: Arc<AtomicBool>,
}

impl BranchService {
    pub fn new(remote: Arc<dyn BranchRemote>, store: Arc<FallbackStore<Branch>>) -> Self {
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

    pub async fn list(&self, filter: &ListFilter) -> Fetched<Page<Branch>> {
        match self.remote.list(filter).await {
            Ok(page) => {
                self.mark(false);
                Fetched::remote(page)
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; listando filiais do espelho local");
                self.mark(true);
                Fetched::fallback(self.store.list(filter))
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<Fetched<Branch>, ServiceError> {
        match self.remote.get(id).await {
            Ok(branch) => {
                self.mark(false);
                Ok(Fetched::remote(branch))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; buscando filial no espelho local");
                self.mark(true);
                Ok(Fetched::fallback(self.store.get(id)?))
            }
        }
    }

    pub async fn create(&self, input: CreateBranchInput) -> Result<Fetched<Branch>, ServiceError> {
        input.validate()?;
        match self.remote.create(&input).await {
            Ok(branch) => {
                self.mark(false);
                Ok(Fetched::remote(branch))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; criando filial no espelho local");
                self.mark(true);
                let now = Utc::now();
                let branch = Branch {
                    id: 0,
                    name: input.name,
                    address: input.address,
                    phone: input.phone,
                    status: EntityStatus::Active,
                    created_at: now,
                    updated_at: now,
                };
                let created = self
                    .store
                    .create(branch, "Filial criada em modo degradado")?;
                Ok(Fetched::fallback(created))
            }
        }
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdateBranchInput,
    ) -> Result<Fetched<Branch>, ServiceError> {
        input.validate()?;
        match self.remote.update(id, &input).await {
            Ok(branch) => {
                self.mark(false);
                Ok(Fetched::remote(branch))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; atualizando filial no espelho local");
                self.mark(true);
                let updated = self
                    .store
                    .mutate(id, "updated", "Campos atualizados", |b| input.apply_to(b))?;
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
                tracing::warn!(%err, id, "API indisponível; removendo filial do espelho local");
                self.mark(true);
                self.store.delete(id)
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
                Ok(Fetched::remote(ExportPayload::new("branches", format, bytes)))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; exportando CSV de filiais do espelho");
                self.mark(true);
                let filtered: Vec<Branch> = self
                    .store
                    .all()
                    .into_iter()
                    .filter(|b| b.matches(filter))
                    .collect();
                let bytes = write_csv(&filtered)?;
                Ok(Fetched::fallback(ExportPayload::new(
                    "branches", format, bytes,
                )))
            }
        }
    }
}
