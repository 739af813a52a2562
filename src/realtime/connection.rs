// src/realtime/connection.rs

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::common::error::RealtimeError;
use crate::models::payment::PaymentEvent;
use crate::realtime::notifier::NotifierShared;

/// Abre o socket e sobe as duas tasks de longa duração: o laço de escrita
/// (quadros de controle join/leave) e o laço único de leitura, que despacha
/// os eventos na ordem de chegada; é isso que preserva a ordem de envio do
/// servidor dentro de uma mesma ordem de serviço.
pub(crate) async fn open(shared: Arc<NotifierShared>, url: &str) -> Result<(), RealtimeError> {
    let (stream, _) = match connect_async(url).await {
        Ok(ok) => ok,
        Err(err) => {
            shared.set_connected(false);
            tracing::warn!(%err, url, "falha ao conectar o canal de eventos; seguindo sem push");
            return Err(RealtimeError::Connect(err));
        }
    };
    let (mut sink, mut read) = stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    shared.set_outbound(tx);
    shared.set_connected(true);
    tracing::info!(url, "canal de eventos conectado");

    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let reader_shared = shared.clone();
    tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<PaymentEvent>(&text) {
                    Ok(event) => reader_shared.dispatch(&event),
                    Err(err) => {
                        tracing::debug!(%err, "quadro ignorado: não é um PaymentEvent")
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "erro no canal de eventos");
                    break;
                }
            }
        }
        reader_shared.set_connected(false);
        tracing::info!("canal de eventos desconectado");
    });

    Ok(())
}
