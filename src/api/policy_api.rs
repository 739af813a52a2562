// src/api/policy_api.rs

use async_trait::async_trait;
use serde_json::json;

use crate::api::http::HttpApi;
use crate::common::error::RemoteError;
use crate::models::audit::AuditEntry;
use crate::models::export::ExportFormat;
use crate::models::filter::{ListFilter, Page};
use crate::models::policy::{ComplianceReport, CreatePolicyInput, Policy, UpdatePolicyInput};

/// Cliente remoto de políticas. A trait existe para os serviços receberem
/// `Arc<dyn PolicyRemote>` e os testes injetarem um fake.
#[async_trait]
pub trait PolicyRemote: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Policy>, RemoteError>;
    async fn get(&self, id: i64) -> Result<Policy, RemoteError>;
    async fn create(&self, input: &CreatePolicyInput) -> Result<Policy, RemoteError>;
    async fn update(&self, id: i64, input: &UpdatePolicyInput) -> Result<Policy, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
    /// `PATCH /policies/{id}/{action}`: activate, deactivate, archive.
    async fn transition(&self, id: i64, action: &str) -> Result<Policy, RemoteError>;
    async fn bulk_update(
        &self,
        ids: &[i64],
        input: &UpdatePolicyInput,
    ) -> Result<Vec<Policy>, RemoteError>;
    async fn bulk_delete(&self, ids: &[i64]) -> Result<(), RemoteError>;
    /// `POST /policies/bulk-{action}`: activate ou deactivate em lote.
    async fn bulk_transition(&self, ids: &[i64], action: &str) -> Result<Vec<Policy>, RemoteError>;
    async fn audit_log(&self, id: i64) -> Result<Vec<AuditEntry>, RemoteError>;
    async fn compliance(&self, id: i64) -> Result<ComplianceReport, RemoteError>;
    async fn categories(&self) -> Result<Vec<String>, RemoteError>;
    async fn tags(&self) -> Result<Vec<String>, RemoteError>;
    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Clone)]
pub struct PolicyApi {
    api: HttpApi,
}

impl PolicyApi {
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PolicyRemote for PolicyApi {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Policy>, RemoteError> {
        self.api.get_json("policies", &filter.to_query()).await
    }

    async fn get(&self, id: i64) -> Result<Policy, RemoteError> {
        self.api.get_json(&format!("policies/{id}"), &[]).await
    }

    async fn create(&self, input: &CreatePolicyInput) -> Result<Policy, RemoteError> {
        self.api.post_json("policies", input).await
    }

    async fn update(&self, id: i64, input: &UpdatePolicyInput) -> Result<Policy, RemoteError> {
        self.api.put_json(&format!("policies/{id}"), input).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.api.delete(&format!("policies/{id}")).await
    }

    async fn transition(&self, id: i64, action: &str) -> Result<Policy, RemoteError> {
        self.api.patch_json(&format!("policies/{id}/{action}")).await
    }

    async fn bulk_update(
        &self,
        ids: &[i64],
        input: &UpdatePolicyInput,
    ) -> Result<Vec<Policy>, RemoteError> {
        self.api
            .post_json("policies/bulk-update", &json!({ "ids": ids, "changes": input }))
            .await
    }

    async fn bulk_delete(&self, ids: &[i64]) -> Result<(), RemoteError> {
        let _: serde_json::Value = self
            .api
            .post_json("policies/bulk-delete", &json!({ "ids": ids }))
            .await?;
        Ok(())
    }

    async fn bulk_transition(&self, ids: &[i64], action: &str) -> Result<Vec<Policy>, RemoteError> {
        self.api
            .post_json(&format!("policies/bulk-{action}"), &json!({ "ids": ids }))
            .await
    }

    async fn audit_log(&self, id: i64) -> Result<Vec<AuditEntry>, RemoteError> {
        self.api
            .get_json(&format!("policies/{id}/audit-log"), &[])
            .await
    }

    async fn compliance(&self, id: i64) -> Result<ComplianceReport, RemoteError> {
        self.api
            .get_json(&format!("policies/{id}/compliance"), &[])
            .await
    }

    async fn categories(&self) -> Result<Vec<String>, RemoteError> {
        self.api.get_json("policies/categories", &[]).await
    }

    async fn tags(&self) -> Result<Vec<String>, RemoteError> {
        self.api.get_json("policies/tags", &[]).await
    }

    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        let mut query = filter.to_query();
        query.push(("format", format.as_str().to_string()));
        self.api.get_bytes("policies/export", &query).await
    }
}
