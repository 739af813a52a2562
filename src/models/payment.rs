// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- 1. Status e métodos ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaidStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Cash,
    PayOs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

// --- 2. Registros e resumo ---

/// Um pagamento já realizado. Imutável depois de criado; dentro de um resumo
/// a lista de registros só cresce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
    pub description: Option<String>,
}

/// Visão agregada dos pagamentos de uma ordem de serviço.
/// Recalculada a cada busca; nunca mutada parcialmente no cliente.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub repair_order_id: Uuid,
    pub total_cost: Decimal,
    pub discount: Decimal,
    pub amount_to_pay: Decimal,
    pub paid_status: PaidStatus,
    pub customer_name: String,
    pub vehicle_description: String,
    pub records: Vec<PaymentRecord>,
}

// --- 3. Eventos do canal de tempo real ---

/// Mensagem empurrada pelo servidor. Transitória: o cliente nunca a persiste,
/// só a usa para disparar uma atualização local.
///
/// `Created` e `StatusUpdated` são dicas: o consumidor refaz a busca do
/// resumo em vez de confiar no payload. `Completed` carrega o resumo
/// completo e autoritativo, que pode ser aplicado direto (aplicação
/// idempotente: aplicar duas vezes é igual a aplicar uma).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PaymentEvent {
    #[serde(rename_all = "camelCase")]
    Created {
        payment_id: Uuid,
        repair_order_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    StatusUpdated {
        payment_id: Uuid,
        new_status: PaymentStatus,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        repair_order_id: Uuid,
        summary: PaymentSummary,
    },
}

impl PaymentEvent {
    /// A ordem de serviço a que o evento se refere, quando o payload a traz.
    pub fn repair_order_id(&self) -> Option<Uuid> {
        match self {
            PaymentEvent::Created {
                repair_order_id, ..
            }
            | PaymentEvent::Completed {
                repair_order_id, ..
            } => Some(*repair_order_id),
            PaymentEvent::StatusUpdated { .. } => None,
        }
    }
}

// --- 4. Payloads de entrada ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[validate(length(max = 500, message = "A descrição é longa demais."))]
    pub description: Option<String>,
}
