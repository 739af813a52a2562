// tests/degraded_mode.rs
//
// Exercita o contrato resiliente de ponta a ponta pela API pública, com um
// cliente remoto fake permanentemente fora do ar: tudo que a UI faria online
// precisa continuar funcionando contra o espelho local.

use std::sync::Arc;

use async_trait::async_trait;

use oficina_client::api::PolicyRemote;
use oficina_client::common::error::{RemoteError, ServiceError};
use oficina_client::fallback::{fixtures, FallbackStore};
use oficina_client::models::audit::AuditEntry;
use oficina_client::models::export::ExportFormat;
use oficina_client::models::filter::{DataOrigin, ListFilter, Page};
use oficina_client::models::policy::{
    ComplianceReport, CreatePolicyInput, Policy, PolicyPriority, PolicyStatus, UpdatePolicyInput,
};
use oficina_client::services::PolicyService;

/// Backend fora do ar: toda chamada falha com 503.
struct DownRemote;

fn down() -> RemoteError {
    RemoteError::Status {
        code: 503,
        body: "service unavailable".to_string(),
    }
}

#[async_trait]
impl PolicyRemote for DownRemote {
    async fn list(&self, _: &ListFilter) -> Result<Page<Policy>, RemoteError> {
        Err(down())
    }
    async fn get(&self, _: i64) -> Result<Policy, RemoteError> {
        Err(down())
    }
    async fn create(&self, _: &CreatePolicyInput) -> Result<Policy, RemoteError> {
        Err(down())
    }
    async fn update(&self, _: i64, _: &UpdatePolicyInput) -> Result<Policy, RemoteError> {
        Err(down())
    }
    async fn delete(&self, _: i64) -> Result<(), RemoteError> {
        Err(down())
    }
    async fn transition(&self, _: i64, _: &str) -> Result<Policy, RemoteError> {
        Err(down())
    }
    async fn bulk_update(
        &self,
        _: &[i64],
        _: &UpdatePolicyInput,
    ) -> Result<Vec<Policy>, RemoteError> {
        Err(down())
    }
    async fn bulk_delete(&self, _: &[i64]) -> Result<(), RemoteError> {
        Err(down())
    }
    async fn bulk_transition(&self, _: &[i64], _: &str) -> Result<Vec<Policy>, RemoteError> {
        Err(down())
    }
    async fn audit_log(&self, _: i64) -> Result<Vec<AuditEntry>, RemoteError> {
        Err(down())
    }
    async fn compliance(&self, _: i64) -> Result<ComplianceReport, RemoteError> {
        Err(down())
    }
    async fn categories(&self) -> Result<Vec<String>, RemoteError> {
        Err(down())
    }
    async fn tags(&self) -> Result<Vec<String>, RemoteError> {
        Err(down())
    }
    async fn export(&self, _: &ListFilter, _: ExportFormat) -> Result<Vec<u8>, RemoteError> {
        Err(down())
    }
}

fn degraded_service() -> PolicyService {
    // visível com RUST_LOG=oficina_client=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
    let store = Arc::new(FallbackStore::new(fixtures::policies, "local"));
    PolicyService::new(Arc::new(DownRemote), store)
}

#[tokio::test]
async fn listagem_degradada_pagina_como_o_servidor() {
    // 5 políticas ativas nas fixtures; page=2 limit=2 => 3ª e 4ª na ordem
    let service = degraded_service();
    let filter = ListFilter::new().with_status("active").with_page(2, 2);
    let fetched = service.list(&filter).await;

    assert_eq!(fetched.origin, DataOrigin::FallbackCache);
    assert!(service.is_degraded());
    let page = fetched.data;
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn criacao_degradada_gera_ids_monotonicos() {
    let service = degraded_service();
    let input = |name: &str| CreatePolicyInput {
        name: name.to_string(),
        description: String::new(),
        category: "operacional".to_string(),
        priority: PolicyPriority::Low,
        tags: Vec::new(),
    };

    // fixtures vão até o id 7
    let a = service.create(input("Nova política A")).await.unwrap();
    let b = service.create(input("Nova política B")).await.unwrap();
    assert_eq!(a.data.id, 8);
    assert_eq!(b.data.id, 9);
    assert_eq!(a.origin, DataOrigin::FallbackCache);
}

#[tokio::test]
async fn nome_duplicado_nao_muta_a_colecao() {
    let service = degraded_service();
    let before = service.list(&ListFilter::new().with_page(1, 100)).await.data.total;

    let err = service
        .create(CreatePolicyInput {
            name: "garantia de serviço".to_string(), // já existe, caixa diferente
            description: String::new(),
            category: "garantia".to_string(),
            priority: PolicyPriority::Low,
            tags: Vec::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(_)));

    let after = service.list(&ListFilter::new().with_page(1, 100)).await.data.total;
    assert_eq!(before, after);
}

#[tokio::test]
async fn lote_com_id_inexistente_e_sucesso_parcial() {
    let service = degraded_service();
    let updated = service.bulk_deactivate(&[1, 999]).await.unwrap();
    assert_eq!(updated.data.len(), 1);
    assert_eq!(updated.data[0].id, 1);
    assert_eq!(updated.data[0].status, PolicyStatus::Inactive);
}

#[tokio::test]
async fn auditoria_e_append_only_e_some_com_a_entidade() {
    let service = degraded_service();

    service
        .update(
            2,
            UpdatePolicyInput {
                description: Some("Desconto revisado".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    service.archive(2).await.unwrap();

    let log = service.audit_log(2).await.unwrap().data;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].action, "updated");
    assert_eq!(log[1].action, "archive");

    service.delete(2).await.unwrap();
    assert!(matches!(
        service.audit_log(2).await,
        Err(ServiceError::NotFound(2))
    ));
}

#[tokio::test]
async fn transicao_nao_valida_estado_anterior() {
    let service = degraded_service();
    // política 7 está arquivada; ativar direto é permitido
    let policy = service.activate(7).await.unwrap();
    assert_eq!(policy.data.status, PolicyStatus::Active);
}

#[tokio::test]
async fn export_degradado_carrega_csv_com_o_mime_pedido() {
    let service = degraded_service();
    let filter = ListFilter::new().with_status("active").with_page(1, 100);
    let payload = service.export(&filter, ExportFormat::Excel).await.unwrap();

    // limitação conhecida: conteúdo CSV com mime de Excel, sinalizado pela origem
    assert_eq!(payload.origin, DataOrigin::FallbackCache);
    assert_eq!(payload.data.mime, "application/vnd.ms-excel");
    assert_eq!(payload.data.file_name, "policies.xls");
    let text = String::from_utf8(payload.data.bytes.clone()).unwrap();
    assert!(text.starts_with("\"id\",\"name\""));
    // cabeçalho + 5 ativas
    assert_eq!(text.lines().count(), 6);
}

#[tokio::test]
async fn filtros_derivados_vem_do_espelho() {
    let service = degraded_service();
    let categories = service.categories().await;
    assert_eq!(categories.origin, DataOrigin::FallbackCache);
    assert!(categories.data.contains(&"garantia".to_string()));
    // distintas e ordenadas
    let mut sorted = categories.data.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(categories.data, sorted);

    let tags = service.tags().await;
    assert!(tags.data.contains(&"cliente".to_string()));
}

#[tokio::test]
async fn conformidade_degradada_deriva_da_entidade() {
    let service = degraded_service();
    let report = service.compliance(4).await.unwrap();
    assert_eq!(report.origin, DataOrigin::FallbackCache);
    assert_eq!(report.data.policy_id, 4);
}

#[tokio::test]
async fn busca_textual_e_filtro_de_tags_sao_aplicados() {
    let service = degraded_service();

    let por_texto = service
        .list(&ListFilter::new().with_search("FROTA").with_page(1, 10))
        .await
        .data;
    assert_eq!(por_texto.total, 1);
    assert_eq!(por_texto.items[0].id, 2);

    // subconjunto: precisa carregar todas as tags pedidas
    let por_tags = service
        .list(
            &ListFilter::new()
                .with_tags(vec!["garantia".to_string(), "retrabalho".to_string()])
                .with_page(1, 10),
        )
        .await
        .data;
    assert_eq!(por_tags.total, 1);
    assert_eq!(por_tags.items[0].id, 5);
}
