// src/services/policy_service.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::api::PolicyRemote;
use crate::common::csv::write_csv;
use crate::common::error::ServiceError;
use crate::fallback::FallbackStore;
use crate::models::audit::AuditEntry;
use crate::models::entity::CacheEntity;
use crate::models::export::{ExportFormat, ExportPayload};
use crate::models::filter::{Fetched, ListFilter, Page};
use crate::models::policy::{
    ComplianceReport, ComplianceState, CreatePolicyInput, Policy, PolicyStatus, UpdatePolicyInput,
};

/// Serviço resiliente de políticas: tenta a API viva primeiro e, em qualquer
/// falha remota desvia, de forma visível e não num catch escondido, para o
/// espelho local injetado. Quem chama nunca precisa saber se está online;
/// as leituras voltam como `Fetched<T>` carregando a origem.
#[derive(Clone)]
pub struct PolicyService {
    remote: Arc<dyn PolicyRemote>,
    store: Arc<FallbackStore<Policy>>,
    degraded: Arc<AtomicBool>,
}

impl PolicyService {
    pub fn new(remote: Arc<dyn PolicyRemote>, store: Arc<FallbackStore<Policy>>) -> Self {
        Self {
            remote,
            store,
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Verdadeiro quando a operação mais recente usou o espelho local.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn mark(&self, degraded: bool) {
        self.degraded.store(degraded, Ordering::Relaxed);
    }

    // --- Leituras ---

    pub async fn list(&self, filter: &ListFilter) -> Fetched<Page<Policy>> {
        match self.remote.list(filter).await {
            Ok(page) => {
                self.mark(false);
                Fetched::remote(page)
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; listando políticas do espelho local");
                self.mark(true);
                Fetched::fallback(self.store.list(filter))
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<Fetched<Policy>, ServiceError> {
        match self.remote.get(id).await {
            Ok(policy) => {
                self.mark(false);
                Ok(Fetched::remote(policy))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; buscando política no espelho local");
                self.mark(true);
                Ok(Fetched::fallback(self.store.get(id)?))
            }
        }
    }

    pub async fn audit_log(&self, id: i64) -> Result<Fetched<Vec<AuditEntry>>, ServiceError> {
        match self.remote.audit_log(id).await {
            Ok(log) => {
                self.mark(false);
                Ok(Fetched::remote(log))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; lendo auditoria do espelho local");
                self.mark(true);
                Ok(Fetched::fallback(self.store.audit_log(id)?))
            }
        }
    }

    /// Relatório de conformidade. Em modo degradado o relatório é derivado
    /// da própria entidade espelhada, já que não há verificação nova a fazer.
    pub async fn compliance(&self, id: i64) -> Result<Fetched<ComplianceReport>, ServiceError> {
        match self.remote.compliance(id).await {
            Ok(report) => {
                self.mark(false);
                Ok(Fetched::remote(report))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; derivando conformidade do espelho");
                self.mark(true);
                let policy = self.store.get(id)?;
                let mut notes = vec![format!("Status atual: {}", policy.status.as_str())];
                if policy.compliance == ComplianceState::PendingReview {
                    notes.push("Revisão pendente desde a última sincronização.".to_string());
                }
                Ok(Fetched::fallback(ComplianceReport {
                    policy_id: policy.id,
                    state: policy.compliance,
                    checked_at: Utc::now(),
                    notes,
                }))
            }
        }
    }

    pub async fn categories(&self) -> Fetched<Vec<String>> {
        match self.remote.categories().await {
            Ok(categories) => {
                self.mark(false);
                Fetched::remote(categories)
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; derivando categorias do espelho local");
                self.mark(true);
                let mut categories: Vec<String> = self
                    .store
                    .all()
                    .into_iter()
                    .map(|p| p.category)
                    .collect();
                categories.sort();
                categories.dedup();
                Fetched::fallback(categories)
            }
        }
    }

    pub async fn tags(&self) -> Fetched<Vec<String>> {
        match self.remote.tags().await {
            Ok(tags) => {
                self.mark(false);
                Fetched::remote(tags)
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; derivando tags do espelho local");
                self.mark(true);
                let mut tags: Vec<String> = self
                    .store
                    .all()
                    .into_iter()
                    .flat_map(|p| p.tags)
                    .collect();
                tags.sort();
                tags.dedup();
                Fetched::fallback(tags)
            }
        }
    }

    // --- Mutações ---

    pub async fn create(&self, input: CreatePolicyInput) -> Result<Fetched<Policy>, ServiceError> {
        input.validate()?;
        match self.remote.create(&input).await {
            Ok(policy) => {
                self.mark(false);
                Ok(Fetched::remote(policy))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; criando política no espelho local");
                self.mark(true);
                let now = Utc::now();
                let policy = Policy {
                    id: 0, // o espelho atribui max+1
                    name: input.name,
                    description: input.description,
                    category: input.category,
                    status: PolicyStatus::Draft,
                    priority: input.priority,
                    compliance: ComplianceState::PendingReview,
                    tags: input.tags,
                    created_at: now,
                    updated_at: now,
                };
                let created = self
                    .store
                    .create(policy, "Política criada em modo degradado")?;
                Ok(Fetched::fallback(created))
            }
        }
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdatePolicyInput,
    ) -> Result<Fetched<Policy>, ServiceError> {
        input.validate()?;
        match self.remote.update(id, &input).await {
            Ok(policy) => {
                self.mark(false);
                Ok(Fetched::remote(policy))
            }
            Err(err) => {
                tracing::warn!(%err, id, "API indisponível; atualizando política no espelho");
                self.mark(true);
                let updated = self.store.mutate(id, "updated", "Campos atualizados", |p| {
                    input.apply_to(p)
                })?;
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
                tracing::warn!(%err, id, "API indisponível; removendo política do espelho local");
                self.mark(true);
                self.store.delete(id)
            }
        }
    }

    // --- Transições de estado ---

    pub async fn activate(&self, id: i64) -> Result<Fetched<Policy>, ServiceError> {
        self.transition(id, "activate", PolicyStatus::Active).await
    }

    pub async fn deactivate(&self, id: i64) -> Result<Fetched<Policy>, ServiceError> {
        self.transition(id, "deactivate", PolicyStatus::Inactive)
            .await
    }

    pub async fn archive(&self, id: i64) -> Result<Fetched<Policy>, ServiceError> {
        self.transition(id, "archive", PolicyStatus::Archived).await
    }

    async fn transition(
        &self,
        id: i64,
        action: &str,
        target: PolicyStatus,
    ) -> Result<Fetched<Policy>, ServiceError> {
        match self.remote.transition(id, action).await {
            Ok(policy) => {
                self.mark(false);
                Ok(Fetched::remote(policy))
            }
            Err(err) => {
                tracing::warn!(%err, id, action, "API indisponível; transição aplicada no espelho");
                self.mark(true);
                let updated = self
                    .store
                    .mutate(id, action, format!("Status alterado para {}", target.as_str()), |p| {
                        p.status = target
                    })?;
                Ok(Fetched::fallback(updated))
            }
        }
    }

    // --- Operações em lote ---

    pub async fn bulk_update(
        &self,
        ids: &[i64],
        input: UpdatePolicyInput,
    ) -> Result<Fetched<Vec<Policy>>, ServiceError> {
        input.validate()?;
        match self.remote.bulk_update(ids, &input).await {
            Ok(policies) => {
                self.mark(false);
                Ok(Fetched::remote(policies))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; atualização em lote no espelho local");
                self.mark(true);
                let updated = self
                    .store
                    .bulk_mutate(ids, "updated", "Atualização em lote", |p| input.apply_to(p));
                Ok(Fetched::fallback(updated))
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
                tracing::warn!(%err, "API indisponível; remoção em lote no espelho local");
                self.mark(true);
                self.store.bulk_delete(ids);
                Ok(())
            }
        }
    }

    pub async fn bulk_activate(&self, ids: &[i64]) -> Result<Fetched<Vec<Policy>>, ServiceError> {
        self.bulk_transition(ids, "activate", PolicyStatus::Active)
            .await
    }

    pub async fn bulk_deactivate(&self, ids: &[i64]) -> Result<Fetched<Vec<Policy>>, ServiceError> {
        self.bulk_transition(ids, "deactivate", PolicyStatus::Inactive)
            .await
    }

    async fn bulk_transition(
        &self,
        ids: &[i64],
        action: &str,
        target: PolicyStatus,
    ) -> Result<Fetched<Vec<Policy>>, ServiceError> {
        match self.remote.bulk_transition(ids, action).await {
            Ok(policies) => {
                self.mark(false);
                Ok(Fetched::remote(policies))
            }
            Err(err) => {
                tracing::warn!(%err, action, "API indisponível; transição em lote no espelho");
                self.mark(true);
                let detail = format!("Status alterado para {} (lote)", target.as_str());
                let updated = self
                    .store
                    .bulk_mutate(ids, action, &detail, |p| p.status = target);
                Ok(Fetched::fallback(updated))
            }
        }
    }

    // --- Exportação ---

    /// Exportação. Em modo degradado o conteúdo é construído localmente como CSV, mesmo
    /// para Excel/PDF (só o mime acompanha o formato pedido). A origem
    /// `FallbackCache` do `Fetched` sinaliza o conteúdo substituto.
    pub async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Fetched<ExportPayload>, ServiceError> {
        match self.remote.export(filter, format).await {
            Ok(bytes) => {
                self.mark(false);
                Ok(Fetched::remote(ExportPayload::new("policies", format, bytes)))
            }
            Err(err) => {
                tracing::warn!(%err, "API indisponível; exportando CSV do espelho local");
                self.mark(true);
                let filtered: Vec<Policy> = self
                    .store
                    .all()
                    .into_iter()
                    .filter(|p| p.matches(filter))
                    .collect();
                let bytes = write_csv(&filtered)?;
                Ok(Fetched::fallback(ExportPayload::new(
                    "policies", format, bytes,
                )))
            }
        }
    }
}
