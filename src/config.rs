// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use uuid::Uuid;

use crate::api::{BranchApi, HttpApi, PartApi, PaymentApi, PolicyApi};
use crate::common::error::ServiceError;
use crate::fallback::{fixtures, FallbackStore};
use crate::realtime::PaymentNotifier;
use crate::services::{BranchService, PartService, PaymentBoard, PaymentService, PolicyService};

#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub realtime_url: String,
    pub api_token: Option<String>,
    /// Quem assina as entradas de auditoria do espelho local; offline não
    /// existe usuário autenticado.
    pub operator: String,
    /// Uma chamada remota que estoura esse prazo conta como falha e dispara
    /// o desvio para o espelho local.
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            realtime_url: "ws://localhost:3000/hub/payments".to_string(),
            api_token: None,
            operator: "local".to_string(),
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            base_url: env::var("OFICINA_API_URL").unwrap_or(defaults.base_url),
            realtime_url: env::var("OFICINA_WS_URL").unwrap_or(defaults.realtime_url),
            api_token: env::var("OFICINA_API_TOKEN").ok(),
            operator: env::var("OFICINA_OPERATOR").unwrap_or(defaults.operator),
            timeout: defaults.timeout,
            poll_interval: defaults.poll_interval,
        }
    }
}

/// A fachada da biblioteca: monta o gráfico de dependências inteiro:
/// núcleo HTTP, clientes de recurso, espelhos locais, serviços e o
/// notificador de pagamentos.
#[derive(Clone)]
pub struct OficinaClient {
    pub config: ClientConfig,
    pub policies: PolicyService,
    pub parts: PartService,
    pub branches: BranchService,
    pub payments: PaymentService,
    pub notifier: PaymentNotifier,
    http: HttpApi,
}

impl OficinaClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = HttpApi::new(
            config.base_url.clone(),
            config.api_token.clone(),
            config.timeout,
        )?;

        // --- Monta o gráfico de dependências ---
        let policy_store = Arc::new(FallbackStore::new(fixtures::policies, config.operator.as_str()));
        let part_store = Arc::new(FallbackStore::new(fixtures::parts, config.operator.as_str()));
        let branch_store = Arc::new(FallbackStore::new(fixtures::branches, config.operator.as_str()));

        let policies = PolicyService::new(Arc::new(PolicyApi::new(http.clone())), policy_store);
        let parts = PartService::new(Arc::new(PartApi::new(http.clone())), part_store);
        let branches = BranchService::new(Arc::new(BranchApi::new(http.clone())), branch_store);
        let payments = PaymentService::new(Arc::new(PaymentApi::new(http.clone())));
        let notifier = PaymentNotifier::new(config.realtime_url.clone());

        Ok(Self {
            config,
            policies,
            parts,
            branches,
            payments,
            notifier,
            http,
        })
    }

    /// Sonda `GET /health`; a UI usa isto para o indicador explícito de
    /// modo degradado (dado real × espelho local).
    pub async fn backend_online(&self) -> bool {
        self.http.health().await.is_ok()
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Abre a visão viva de pagamentos de uma ordem de serviço e, se o canal
    /// estiver fora do ar, liga o polling de reserva.
    pub async fn payment_board(&self, repair_order_id: Uuid) -> Result<PaymentBoard, ServiceError> {
        let board = PaymentBoard::open(
            self.payments.clone(),
            self.notifier.clone(),
            repair_order_id,
        )
        .await?;
        if !board.is_connected() {
            board.spawn_polling(self.config.poll_interval);
        }
        Ok(board)
    }
}
