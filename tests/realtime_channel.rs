// tests/realtime_channel.rs
//
// Sobe um servidor WebSocket de verdade (tokio-tungstenite) e verifica o
// caminho completo: connect -> joinGroup -> eventos entregues na ordem de
// envio -> leave/disconnect tolerantes.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use oficina_client::models::payment::{
    PaidStatus, PaymentEvent, PaymentStatus, PaymentSummary,
};
use oficina_client::realtime::PaymentNotifier;

fn summary(order: Uuid) -> PaymentSummary {
    PaymentSummary {
        repair_order_id: order,
        total_cost: Decimal::from(1200),
        discount: Decimal::from(100),
        amount_to_pay: Decimal::from(1100),
        paid_status: PaidStatus::Paid,
        customer_name: "Beatriz Nunes".to_string(),
        vehicle_description: "Honda Fit 2020".to_string(),
        records: Vec::new(),
    }
}

#[tokio::test]
async fn eventos_chegam_na_ordem_em_que_o_servidor_mandou() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let order = Uuid::new_v4();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        // primeiro quadro do cliente: joinGroup
        let frame = ws.next().await.unwrap().unwrap();
        let text = frame.into_text().unwrap();
        assert!(text.contains("joinGroup"));
        assert!(text.contains(&order.to_string()));

        let created = PaymentEvent::Created {
            payment_id: Uuid::new_v4(),
            repair_order_id: order,
        };
        let updated = PaymentEvent::StatusUpdated {
            payment_id: Uuid::new_v4(),
            new_status: PaymentStatus::Paid,
        };
        let completed = PaymentEvent::Completed {
            repair_order_id: order,
            summary: summary(order),
        };
        for event in [&created, &updated, &completed] {
            ws.send(Message::Text(serde_json::to_string(event).unwrap().into()))
                .await
                .unwrap();
        }
        // segura o socket aberto enquanto o cliente consome
        tokio::time::sleep(Duration::from_millis(300)).await;
    });

    let notifier = PaymentNotifier::new(format!("ws://{addr}"));
    notifier.connect().await.unwrap();
    // idempotente: reconectar já conectado é um no-op
    notifier.connect().await.unwrap();
    assert!(notifier.is_connected());

    let (tx, mut rx) = mpsc::unbounded_channel::<PaymentEvent>();
    let t1 = tx.clone();
    let t2 = tx.clone();
    let _created = notifier.on_payment_created(move |e| {
        let _ = t1.send(e.clone());
    });
    let _status = notifier.on_payment_status_updated(move |e| {
        let _ = t2.send(e.clone());
    });
    let _completed = notifier.on_payment_completed(move |e| {
        let _ = tx.send(e.clone());
    });

    notifier.join_group(order).unwrap();

    let first = timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let second = timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let third = timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(first, PaymentEvent::Created { .. }));
    assert!(matches!(second, PaymentEvent::StatusUpdated { .. }));
    match third {
        PaymentEvent::Completed {
            repair_order_id,
            summary,
        } => {
            assert_eq!(repair_order_id, order);
            assert_eq!(summary.paid_status, PaidStatus::Paid);
        }
        other => panic!("esperava Completed, veio {other:?}"),
    }

    notifier.leave_group(order);
    notifier.disconnect();
    server.await.unwrap();
}

#[tokio::test]
async fn falha_de_conexao_deixa_o_estado_desconectado_sem_panico() {
    // porta 1: connection refused imediato
    let notifier = PaymentNotifier::new("ws://127.0.0.1:1/hub");
    assert!(notifier.connect().await.is_err());
    assert!(!notifier.is_connected());
    // limpeza best-effort continua segura sem conexão
    notifier.leave_group(Uuid::new_v4());
    notifier.disconnect();
}
