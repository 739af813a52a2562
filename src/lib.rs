// src/lib.rs
//
// Camada de dados do cliente da oficina: serviços resilientes (cache-aside
// sobre o backend REST, com espelho local em modo degradado) e o notificador
// de pagamentos em tempo real.

pub mod api;
pub mod common;
pub mod config;
pub mod fallback;
pub mod models;
pub mod realtime;
pub mod services;

pub use config::{ClientConfig, OficinaClient};
pub use models::filter::{DataOrigin, Fetched, ListFilter, Page};
pub use realtime::PaymentNotifier;
pub use services::{BranchService, PartService, PaymentBoard, PaymentService, PolicyService};
