// src/api/branch_api.rs

use async_trait::async_trait;

use crate::api::http::HttpApi;
use crate::common::error::RemoteError;
use crate::models::branch::{Branch, CreateBranchInput, UpdateBranchInput};
use crate::models::export::ExportFormat;
use crate::models::filter::{ListFilter, Page};

#[async_trait]
pub trait BranchRemote: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Branch>, RemoteError>;
    async fn get(&self, id: i64) -> Result<Branch, RemoteError>;
    async fn create(&self, input: &CreateBranchInput) -> Result<Branch, RemoteError>;
    async fn update(&self, id: i64, input: &UpdateBranchInput) -> Result<Branch, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Clone)]
pub struct BranchApi {
    api: HttpApi,
}

impl BranchApi {
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BranchRemote for BranchApi {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Branch>, RemoteError> {
        self.api.get_json("branches", &filter.to_query()).await
    }

    async fn get(&self, id: i64) -> Result<Branch, RemoteError> {
        self.api.get_json(&format!("branches/{id}"), &[]).await
    }

    async fn create(&self, input: &CreateBranchInput) -> Result<Branch, RemoteError> {
        self.api.post_json("branches", input).await
    }

    async fn update(&self, id: i64, input: &UpdateBranchInput) -> Result<Branch, RemoteError> {
        self.api.put_json(&format!("branches/{id}"), input).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.api.delete(&format!("branches/{id}")).await
    }

    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        let mut query = filter.to_query();
        query.push(("format", format.as_str().to_string()));
        self.api.get_bytes("branches/export", &query).await
    }
}
