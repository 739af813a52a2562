// src/common/error.rs

use thiserror::Error;

// Nossos tipos de erro, com `thiserror` para melhor ergonomia.

/// Falha ao falar com o backend. Qualquer variante aqui dispara o desvio
/// para o espelho local nos serviços; nunca chega à UI como erro.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Resposta HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Falha ao decodificar a resposta: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Erros que os serviços devolvem ao chamador.
/// Indisponibilidade remota NÃO aparece aqui (vira fallback silencioso);
/// `Remote` só propaga nos serviços sem espelho local (pagamentos).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Erro de validação")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Registro não encontrado: id {0}")]
    NotFound(i64),

    #[error("Já existe um registro com o nome '{0}'")]
    DuplicateName(String),

    #[error("Falha ao gerar a exportação: {0}")]
    Export(#[from] csv::Error),

    #[error("Falha na chamada remota: {0}")]
    Remote(#[from] RemoteError),
}

/// Erros do canal de eventos em tempo real.
/// A falha de conexão não é fatal para quem consome: o consumidor continua
/// funcionando com atualização manual / polling.
#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("Falha ao conectar ao canal de eventos: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Canal de eventos não está conectado")]
    NotConnected,
}
