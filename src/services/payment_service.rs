// src/services/payment_service.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;
use validator::Validate;

use crate::api::PaymentRemote;
use crate::common::error::ServiceError;
use crate::models::payment::{
    CreatePaymentInput, PaidStatus, PaymentEvent, PaymentRecord, PaymentSummary,
};
use crate::realtime::{PaymentNotifier, Subscription};

/// Serviço de pagamentos. Diferente dos demais, NÃO tem espelho local:
/// dinheiro nunca entra em modo degradado, então `RemoteError` propaga.
#[derive(Clone)]
pub struct PaymentService {
    remote: Arc<dyn PaymentRemote>,
}

impl PaymentService {
    pub fn new(remote: Arc<dyn PaymentRemote>) -> Self {
        Self { remote }
    }

    pub async fn summary(&self, repair_order_id: Uuid) -> Result<PaymentSummary, ServiceError> {
        Ok(self.remote.summary(repair_order_id).await?)
    }

    pub async fn create_payment(
        &self,
        repair_order_id: Uuid,
        input: CreatePaymentInput,
    ) -> Result<PaymentRecord, ServiceError> {
        input.validate()?;
        Ok(self.remote.create_payment(repair_order_id, &input).await?)
    }
}

struct BoardState {
    alive: AtomicBool,
    summary: Mutex<Option<PaymentSummary>>,
}

impl BoardState {
    /// Aplicação idempotente: substitui o resumo inteiro. Aplicar o mesmo
    /// resumo duas vezes deixa o estado igual a aplicá-lo uma vez, e uma
    /// rebusca posterior que produza o mesmo resultado é inócua.
    fn apply(&self, summary: PaymentSummary) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        *self
            .summary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(summary);
    }

    fn current(&self) -> Option<PaymentSummary> {
        self.summary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// A visão "viva" dos pagamentos de uma ordem de serviço.
///
/// Na abertura busca o resumo e, SÓ se ainda houver pagamento pendente,
/// conecta o canal de eventos (conectar para uma ordem quitada é trabalho
/// jogado fora, não um erro). `Created`/`StatusUpdated` disparam uma rebusca
/// completa: o payload é dica, não dado autoritativo. `Completed` traz o
/// resumo completo e é aplicado direto.
///
/// Rebuscas que terminam depois de `close()` são absorvidas pela guarda
/// `alive`: não há cancelamento garantido de chamadas em voo.
pub struct PaymentBoard {
    service: PaymentService,
    notifier: PaymentNotifier,
    repair_order_id: Uuid,
    state: Arc<BoardState>,
    subs: Mutex<Vec<Subscription>>,
}

impl PaymentBoard {
    pub async fn open(
        service: PaymentService,
        notifier: PaymentNotifier,
        repair_order_id: Uuid,
    ) -> Result<Self, ServiceError> {
        let summary = service.summary(repair_order_id).await?;
        let unpaid = summary.paid_status == PaidStatus::Unpaid;
        let state = Arc::new(BoardState {
            alive: AtomicBool::new(true),
            summary: Mutex::new(Some(summary)),
        });
        let board = Self {
            service,
            notifier,
            repair_order_id,
            state,
            subs: Mutex::new(Vec::new()),
        };
        if unpaid {
            board.attach().await;
        }
        Ok(board)
    }

    /// Conecta o canal e registra os handlers. Falha de conexão não é
    /// fatal: o board segue com refresh manual / polling.
    async fn attach(&self) {
        match self.notifier.connect().await {
            Ok(()) => {
                if let Err(err) = self.notifier.join_group(self.repair_order_id) {
                    tracing::warn!(%err, "não foi possível entrar no grupo da ordem");
                }
            }
            Err(err) => {
                tracing::warn!(%err, "canal de eventos indisponível; seguindo com refresh manual");
            }
        }

        let refetch = {
            let service = self.service.clone();
            let state = self.state.clone();
            let repair_order_id = self.repair_order_id;
            move |_event: &PaymentEvent| {
                // o handler precisa ser rápido; a rebusca vai para uma task
                let service = service.clone();
                let state = state.clone();
                tokio::spawn(async move {
                    if !state.alive.load(Ordering::SeqCst) {
                        return;
                    }
                    match service.summary(repair_order_id).await {
                        Ok(summary) => state.apply(summary),
                        Err(err) => {
                            tracing::warn!(%err, "falha ao rebuscar o resumo de pagamentos")
                        }
                    }
                });
            }
        };

        let apply = {
            let state = self.state.clone();
            let repair_order_id = self.repair_order_id;
            move |event: &PaymentEvent| {
                if let PaymentEvent::Completed {
                    repair_order_id: order,
                    summary,
                } = event
                {
                    if *order == repair_order_id {
                        state.apply(summary.clone());
                    }
                }
            }
        };

        let mut subs = self
            .subs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subs.push(self.notifier.on_payment_created(refetch.clone()));
        subs.push(self.notifier.on_payment_status_updated(refetch));
        subs.push(self.notifier.on_payment_completed(apply));
    }

    pub fn summary(&self) -> Option<PaymentSummary> {
        self.state.current()
    }

    /// Indicador de conexão para a UI (a bolinha colorida).
    pub fn is_connected(&self) -> bool {
        self.notifier.is_connected()
    }

    /// O caminho de atualização manual; funciona conectado ou não.
    pub async fn refresh(&self) -> Result<(), ServiceError> {
        let summary = self.service.summary(self.repair_order_id).await?;
        self.state.apply(summary);
        Ok(())
    }

    /// Rebusca periódica enquanto o canal estiver fora do ar. A task morre
    /// sozinha quando o board fecha.
    pub fn spawn_polling(&self, interval: Duration) {
        let service = self.service.clone();
        let notifier = self.notifier.clone();
        let state = self.state.clone();
        let repair_order_id = self.repair_order_id;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !state.alive.load(Ordering::SeqCst) {
                    break;
                }
                if notifier.is_connected() {
                    continue;
                }
                match service.summary(repair_order_id).await {
                    Ok(summary) => state.apply(summary),
                    Err(err) => tracing::debug!(%err, "polling sem resposta do backend"),
                }
            }
        });
    }

    /// Encerra o board: sai do grupo (best-effort), cancela as inscrições e
    /// derruba a guarda `alive`. Eventos atrasados viram no-ops.
    pub fn close(&self) {
        self.state.alive.store(false, Ordering::SeqCst);
        self.notifier.leave_group(self.repair_order_id);
        let mut subs = self
            .subs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for sub in subs.drain(..) {
            self.notifier.unsubscribe(sub);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::RemoteError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::AtomicUsize;

    struct FakePaymentRemote {
        summary: Mutex<PaymentSummary>,
        calls: AtomicUsize,
    }

    impl FakePaymentRemote {
        fn new(summary: PaymentSummary) -> Arc<Self> {
            Arc::new(Self {
                summary: Mutex::new(summary),
                calls: AtomicUsize::new(0),
            })
        }

        fn set_summary(&self, summary: PaymentSummary) {
            *self.summary.lock().unwrap() = summary;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentRemote for FakePaymentRemote {
        async fn summary(&self, _repair_order_id: Uuid) -> Result<PaymentSummary, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.summary.lock().unwrap().clone())
        }

        async fn create_payment(
            &self,
            _repair_order_id: Uuid,
            _input: &CreatePaymentInput,
        ) -> Result<PaymentRecord, RemoteError> {
            Err(RemoteError::Status {
                code: 501,
                body: String::new(),
            })
        }
    }

    fn summary_for(order: Uuid, status: PaidStatus, amount: i64) -> PaymentSummary {
        PaymentSummary {
            repair_order_id: order,
            total_cost: Decimal::from(amount),
            discount: Decimal::ZERO,
            amount_to_pay: Decimal::from(amount),
            paid_status: status,
            customer_name: "Carlos Lima".into(),
            vehicle_description: "VW Gol 2019".into(),
            records: Vec::new(),
        }
    }

    #[tokio::test]
    async fn aplicar_o_mesmo_completed_duas_vezes_e_idempotente() {
        let order = Uuid::new_v4();
        let done = summary_for(order, PaidStatus::Paid, 500);
        let state = BoardState {
            alive: AtomicBool::new(true),
            summary: Mutex::new(None),
        };
        state.apply(done.clone());
        let once = state.current();
        state.apply(done.clone());
        assert_eq!(once, state.current());
    }

    #[tokio::test]
    async fn ordem_quitada_nao_conecta_o_canal() {
        let order = Uuid::new_v4();
        let remote = FakePaymentRemote::new(summary_for(order, PaidStatus::Paid, 300));
        let service = PaymentService::new(remote.clone());
        // endereço inválido de propósito: se o gate falhar, connect() erraria
        let notifier = PaymentNotifier::new("ws://127.0.0.1:1/hub");
        let board = PaymentBoard::open(service, notifier.clone(), order)
            .await
            .unwrap();
        assert!(!board.is_connected());
        assert_eq!(remote.calls(), 1);
        board.close();
    }

    #[tokio::test]
    async fn refresh_manual_atualiza_o_resumo() {
        let order = Uuid::new_v4();
        let remote = FakePaymentRemote::new(summary_for(order, PaidStatus::Unpaid, 700));
        let service = PaymentService::new(remote.clone());
        let notifier = PaymentNotifier::new("ws://127.0.0.1:1/hub");
        let board = PaymentBoard::open(service, notifier, order).await.unwrap();

        remote.set_summary(summary_for(order, PaidStatus::Paid, 700));
        board.refresh().await.unwrap();
        assert_eq!(board.summary().unwrap().paid_status, PaidStatus::Paid);
        board.close();
    }

    #[tokio::test]
    async fn rebusca_tardia_depois_de_close_e_no_op() {
        let order = Uuid::new_v4();
        let remote = FakePaymentRemote::new(summary_for(order, PaidStatus::Unpaid, 900));
        let service = PaymentService::new(remote.clone());
        let notifier = PaymentNotifier::new("ws://127.0.0.1:1/hub");
        let board = PaymentBoard::open(service, notifier, order).await.unwrap();

        let before = board.summary();
        board.close();
        // uma chamada que termina depois do fechamento não muda nada
        remote.set_summary(summary_for(order, PaidStatus::Paid, 900));
        board.state.apply(summary_for(order, PaidStatus::Paid, 900));
        assert_eq!(board.summary(), before);
    }

    #[tokio::test]
    async fn evento_completed_de_outra_ordem_e_ignorado() {
        let order = Uuid::new_v4();
        let other = Uuid::new_v4();
        let remote = FakePaymentRemote::new(summary_for(order, PaidStatus::Unpaid, 400));
        let service = PaymentService::new(remote.clone());
        let notifier = PaymentNotifier::new("ws://127.0.0.1:1/hub");
        let board = PaymentBoard::open(service, notifier.clone(), order)
            .await
            .unwrap();

        let apply = {
            let state = board.state.clone();
            move |event: &PaymentEvent| {
                if let PaymentEvent::Completed {
                    repair_order_id: o,
                    summary,
                } = event
                {
                    if *o == order {
                        state.apply(summary.clone());
                    }
                }
            }
        };
        apply(&PaymentEvent::Completed {
            repair_order_id: other,
            summary: summary_for(other, PaidStatus::Paid, 999),
        });
        assert_eq!(board.summary().unwrap().paid_status, PaidStatus::Unpaid);
        board.close();
    }

    #[tokio::test]
    async fn create_payment_valida_antes_de_chamar_o_backend() {
        let order = Uuid::new_v4();
        let remote = FakePaymentRemote::new(summary_for(order, PaidStatus::Unpaid, 100));
        let service = PaymentService::new(remote.clone());
        let input = CreatePaymentInput {
            amount: Decimal::from(-10),
            method: crate::models::payment::PaymentMethod::Cash,
            description: None,
        };
        let err = service.create_payment(order, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
