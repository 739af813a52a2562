// src/api/http.rs

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::error::RemoteError;

/// Núcleo HTTP compartilhado pelos clientes de recurso.
///
/// Toda chamada devolve `Result<_, RemoteError>`: a decisão de cair para o
/// espelho local NÃO é tomada aqui: ela é um desvio visível no serviço que
/// chama, nunca um handler de exceção implícito.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Converte respostas não-2xx em `RemoteError::Status`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            code: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let text = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let response = self
            .authorize(self.client.get(self.url(path)).query(query))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, RemoteError> {
        let response = self
            .authorize(self.client.get(self.url(path)).query(query))
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .authorize(self.client.post(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .authorize(self.client.put(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn patch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let response = self
            .authorize(self.client.patch(self.url(path)))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), RemoteError> {
        let response = self
            .authorize(self.client.delete(self.url(path)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Sonda de conectividade usada pelo indicador da UI.
    pub async fn health(&self) -> Result<(), RemoteError> {
        let response = self
            .authorize(self.client.get(self.url("health")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
