// src/models/export.rs

use serde::{Deserialize, Serialize};

/// Formatos de exportação aceitos pelo backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => "application/vnd.ms-excel",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xls",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Arquivo exportado pronto para download.
/// Em modo degradado o conteúdo é sempre CSV, mesmo quando o formato pedido
/// foi Excel ou PDF (o mime acompanha o pedido); a origem `FallbackCache` no
/// `Fetched` que embrulha este payload é o que sinaliza o conteúdo substituto.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
}

impl ExportPayload {
    pub fn new(resource: &str, format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: format.mime(),
            file_name: format!("{}.{}", resource, format.extension()),
        }
    }
}
