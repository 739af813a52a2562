// src/api/payment_api.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::http::HttpApi;
use crate::common::error::RemoteError;
use crate::models::payment::{CreatePaymentInput, PaymentRecord, PaymentSummary};

/// Cliente remoto de pagamentos. Dinheiro nunca tem espelho local: quem
/// consome esta trait lida com `RemoteError` de verdade.
#[async_trait]
pub trait PaymentRemote: Send + Sync {
    async fn summary(&self, repair_order_id: Uuid) -> Result<PaymentSummary, RemoteError>;
    async fn create_payment(
        &self,
        repair_order_id: Uuid,
        input: &CreatePaymentInput,
    ) -> Result<PaymentRecord, RemoteError>;
}

#[derive(Clone)]
pub struct PaymentApi {
    api: HttpApi,
}

impl PaymentApi {
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentRemote for PaymentApi {
    async fn summary(&self, repair_order_id: Uuid) -> Result<PaymentSummary, RemoteError> {
        self.api
            .get_json(
                &format!("repair-orders/{repair_order_id}/payments/summary"),
                &[],
            )
            .await
    }

    async fn create_payment(
        &self,
        repair_order_id: Uuid,
        input: &CreatePaymentInput,
    ) -> Result<PaymentRecord, RemoteError> {
        self.api
            .post_json(&format!("repair-orders/{repair_order_id}/payments"), input)
            .await
    }
}
