// src/api/part_api.rs

use async_trait::async_trait;
use serde_json::json;

use crate::api::http::HttpApi;
use crate::common::error::RemoteError;
use crate::models::export::ExportFormat;
use crate::models::filter::{ListFilter, Page};
use crate::models::part::{CreatePartInput, Part, UpdatePartInput};

#[async_trait]
pub trait PartRemote: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Part>, RemoteError>;
    async fn get(&self, id: i64) -> Result<Part, RemoteError>;
    async fn create(&self, input: &CreatePartInput) -> Result<Part, RemoteError>;
    async fn update(&self, id: i64, input: &UpdatePartInput) -> Result<Part, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
    async fn bulk_delete(&self, ids: &[i64]) -> Result<(), RemoteError>;
    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Clone)]
pub struct PartApi {
    api: HttpApi,
}

impl PartApi {
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PartRemote for PartApi {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Part>, RemoteError> {
        self.api.get_json("parts", &filter.to_query()).await
    }

    async fn get(&self, id: i64) -> Result<Part, RemoteError> {
        self.api.get_json(&format!("parts/{id}"), &[]).await
    }

    async fn create(&self, input: &CreatePartInput) -> Result<Part, RemoteError> {
        self.api.post_json("parts", input).await
    }

    async fn update(&self, id: i64, input: &UpdatePartInput) -> Result<Part, RemoteError> {
        self.api.put_json(&format!("parts/{id}"), input).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.api.delete(&format!("parts/{id}")).await
    }

    async fn bulk_delete(&self, ids: &[i64]) -> Result<(), RemoteError> {
        let _: serde_json::Value = self
            .api
            .post_json("parts/bulk-delete", &json!({ "ids": ids }))
            .await?;
        Ok(())
    }

    async fn export(
        &self,
        filter: &ListFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        let mut query = filter.to_query();
        query.push(("format", format.as_str().to_string()));
        self.api.get_bytes("parts/export", &query).await
    }
}
