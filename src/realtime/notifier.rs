// src/realtime/notifier.rs

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use crate::common::error::RealtimeError;
use crate::models::payment::PaymentEvent;
use crate::realtime::connection;

type Handler = Arc<dyn Fn(&PaymentEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Created,
    StatusUpdated,
    Completed,
}

/// Token devolvido ao registrar um handler; cancela exatamente aquela
/// inscrição. Vários consumidores podem escutar o mesmo tipo de evento sem
/// sobrescrever uns aos outros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

/// Quadro que o cliente manda ao servidor para entrar/sair de um grupo.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlFrame<'a> {
    action: &'a str,
    repair_order_id: Uuid,
}

/// Estado compartilhado entre o notificador e as tasks de conexão.
pub(crate) struct NotifierShared {
    connected: AtomicBool,
    groups: Mutex<HashSet<Uuid>>,
    created: Mutex<Vec<(u64, Handler)>>,
    status_updated: Mutex<Vec<(u64, Handler)>>,
    completed: Mutex<Vec<(u64, Handler)>>,
    next_id: AtomicU64,
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
}

impl NotifierShared {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            groups: Mutex::new(HashSet::new()),
            created: Mutex::new(Vec::new()),
            status_updated: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            outbound: Mutex::new(None),
        }
    }

    fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        if !connected {
            *Self::lock(&self.outbound) = None;
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_outbound(&self, sender: mpsc::UnboundedSender<Message>) {
        *Self::lock(&self.outbound) = Some(sender);
    }

    fn send_control(&self, action: &str, repair_order_id: Uuid) -> bool {
        let frame = ControlFrame {
            action,
            repair_order_id,
        };
        let Ok(text) = serde_json::to_string(&frame) else {
            return false;
        };
        let outbound = Self::lock(&self.outbound);
        match outbound.as_ref() {
            Some(sender) => sender.send(Message::Text(text.into())).is_ok(),
            None => false,
        }
    }

    fn table(&self, kind: EventKind) -> &Mutex<Vec<(u64, Handler)>> {
        match kind {
            EventKind::Created => &self.created,
            EventKind::StatusUpdated => &self.status_updated,
            EventKind::Completed => &self.completed,
        }
    }

    fn subscribe(&self, kind: EventKind, handler: Handler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Self::lock(self.table(kind)).push((id, handler));
        Subscription { kind, id }
    }

    fn unsubscribe(&self, sub: Subscription) {
        Self::lock(self.table(sub.kind)).retain(|(id, _)| *id != sub.id);
    }

    /// Entrega um evento aos inscritos, respeitando o filtro de grupos.
    ///
    /// Eventos de uma ordem de serviço cujo grupo não está ativo são
    /// descartados; é isso que torna eventos atrasados depois de um
    /// `leave_group` um no-op por construção. `StatusUpdated` não carrega a
    /// ordem no payload; ele é entregue enquanto houver algum grupo ativo
    /// (o consumidor rebusca o resumo da própria ordem, então uma dica
    /// alheia é inofensiva).
    pub(crate) fn dispatch(&self, event: &PaymentEvent) {
        let delivering = {
            let groups = Self::lock(&self.groups);
            match event.repair_order_id() {
                Some(id) => groups.contains(&id),
                None => !groups.is_empty(),
            }
        };
        if !delivering {
            tracing::debug!(?event, "evento descartado: grupo não está ativo");
            return;
        }
        let kind = match event {
            PaymentEvent::Created { .. } => EventKind::Created,
            PaymentEvent::StatusUpdated { .. } => EventKind::StatusUpdated,
            PaymentEvent::Completed { .. } => EventKind::Completed,
        };
        // Clona os handles fora do lock: um handler pode (des)inscrever.
        let handlers: Vec<Handler> = Self::lock(self.table(kind))
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }
}

/// Mantém a visão de pagamentos de uma ordem de serviço atualizada sem
/// refresh manual: canal push por grupo, três tipos de evento, entrega
/// na ordem em que o servidor mandou (dentro de uma mesma ordem de serviço).
///
/// A conexão é opcional por contrato: se o canal não sobe, o estado fica
/// "desconectado" e a UI segue funcionando com refresh manual / polling.
#[derive(Clone)]
pub struct PaymentNotifier {
    shared: Arc<NotifierShared>,
    ws_url: String,
}

impl PaymentNotifier {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(NotifierShared::new()),
            ws_url: ws_url.into(),
        }
    }

    /// Estabelece o canal. Idempotente: chamar já conectado é um no-op.
    /// Falha de conexão deixa o estado em "desconectado"; não é fatal.
    pub async fn connect(&self) -> Result<(), RealtimeError> {
        if self.is_connected() {
            return Ok(());
        }
        connection::open(self.shared.clone(), &self.ws_url).await
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Passa a receber os eventos da ordem de serviço dada.
    /// Deve ser chamado depois de `connect()` ter sucesso.
    pub fn join_group(&self, repair_order_id: Uuid) -> Result<(), RealtimeError> {
        if !self.is_connected() {
            return Err(RealtimeError::NotConnected);
        }
        NotifierShared::lock(&self.shared.groups).insert(repair_order_id);
        self.shared.send_control("joinGroup", repair_order_id);
        Ok(())
    }

    /// Limpeza best-effort: nunca falha, mesmo com a conexão já caída.
    /// O grupo sai do registro antes do aviso ao servidor, então eventos
    /// já enfileirados para ele são descartados na chegada.
    pub fn leave_group(&self, repair_order_id: Uuid) {
        NotifierShared::lock(&self.shared.groups).remove(&repair_order_id);
        self.shared.send_control("leaveGroup", repair_order_id);
    }

    // --- Inscrições ---

    pub fn on_payment_created(
        &self,
        handler: impl Fn(&PaymentEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.subscribe(EventKind::Created, Arc::new(handler))
    }

    pub fn on_payment_status_updated(
        &self,
        handler: impl Fn(&PaymentEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared
            .subscribe(EventKind::StatusUpdated, Arc::new(handler))
    }

    pub fn on_payment_completed(
        &self,
        handler: impl Fn(&PaymentEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared
            .subscribe(EventKind::Completed, Arc::new(handler))
    }

    pub fn unsubscribe(&self, sub: Subscription) {
        self.shared.unsubscribe(sub);
    }

    /// Derruba o canal (best-effort). As tasks de leitura/escrita terminam
    /// quando o lado remoto perceber o fechamento.
    pub fn disconnect(&self) {
        self.shared.set_connected(false);
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<NotifierShared> {
        &self.shared
    }
}
