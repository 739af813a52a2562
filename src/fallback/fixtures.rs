// src/fallback/fixtures.rs
//
// Conjunto fixo de dados embutidos que semeia o espelho local na primeira
// leitura em modo degradado. Só existe em memória; nunca é persistido.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::branch::Branch;
use crate::models::entity::EntityStatus;
use crate::models::part::Part;
use crate::models::policy::{ComplianceState, Policy, PolicyPriority, PolicyStatus};

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn policies() -> Vec<Policy> {
    let policy = |id: i64,
                  name: &str,
                  description: &str,
                  category: &str,
                  status: PolicyStatus,
                  priority: PolicyPriority,
                  compliance: ComplianceState,
                  tags: &[&str],
                  created: DateTime<Utc>| Policy {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        status,
        priority,
        compliance,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: created,
        updated_at: created,
    };

    vec![
        policy(
            1,
            "Garantia de serviço",
            "Todo serviço executado tem garantia de 90 dias ou 5.000 km.",
            "garantia",
            PolicyStatus::Active,
            PolicyPriority::High,
            ComplianceState::Compliant,
            &["garantia", "cliente"],
            ts(2025, 3, 10),
        ),
        policy(
            2,
            "Desconto para frota",
            "Clientes com 5+ veículos cadastrados recebem 10% de desconto em mão de obra.",
            "comercial",
            PolicyStatus::Active,
            PolicyPriority::Medium,
            ComplianceState::Compliant,
            &["desconto", "frota"],
            ts(2025, 4, 2),
        ),
        policy(
            3,
            "Aprovação de orçamento",
            "Nenhum serviço inicia sem aprovação expressa do orçamento pelo cliente.",
            "operacional",
            PolicyStatus::Active,
            PolicyPriority::Critical,
            ComplianceState::Compliant,
            &["orcamento", "cliente"],
            ts(2025, 1, 20),
        ),
        policy(
            4,
            "Descarte de peças usadas",
            "Peças substituídas ficam à disposição do cliente por 7 dias antes do descarte.",
            "operacional",
            PolicyStatus::Active,
            PolicyPriority::Low,
            ComplianceState::PendingReview,
            &["pecas", "descarte"],
            ts(2025, 5, 18),
        ),
        policy(
            5,
            "Retrabalho sem custo",
            "Defeito reincidente dentro da garantia é retrabalhado sem custo de mão de obra.",
            "garantia",
            PolicyStatus::Active,
            PolicyPriority::High,
            ComplianceState::Compliant,
            &["garantia", "retrabalho"],
            ts(2025, 6, 1),
        ),
        policy(
            6,
            "Pagamento antecipado de peças importadas",
            "Peças importadas sob encomenda exigem sinal de 50% no ato do pedido.",
            "financeiro",
            PolicyStatus::Inactive,
            PolicyPriority::Medium,
            ComplianceState::NonCompliant,
            &["pagamento", "pecas"],
            ts(2025, 2, 14),
        ),
        policy(
            7,
            "Política de cortesia 2024",
            "Lavagem cortesia para serviços acima de R$ 500 (encerrada).",
            "comercial",
            PolicyStatus::Archived,
            PolicyPriority::Low,
            ComplianceState::Compliant,
            &["cortesia"],
            ts(2024, 11, 30),
        ),
    ]
}

pub fn parts() -> Vec<Part> {
    let part = |id: i64,
                name: &str,
                sku: &str,
                category: &str,
                price: Decimal,
                stock: Decimal,
                created: DateTime<Utc>| Part {
        id,
        name: name.to_string(),
        sku: sku.to_string(),
        category: category.to_string(),
        unit_price: price,
        stock_quantity: stock,
        status: EntityStatus::Active,
        created_at: created,
        updated_at: created,
    };

    vec![
        part(
            1,
            "Pastilha de freio dianteira",
            "FR-1021",
            "freios",
            Decimal::new(18990, 2),
            Decimal::from(24),
            ts(2025, 3, 5),
        ),
        part(
            2,
            "Filtro de óleo",
            "MO-0343",
            "motor",
            Decimal::new(3250, 2),
            Decimal::from(60),
            ts(2025, 3, 5),
        ),
        part(
            3,
            "Amortecedor traseiro",
            "SU-2210",
            "suspensao",
            Decimal::new(42900, 2),
            Decimal::from(8),
            ts(2025, 4, 12),
        ),
        part(
            4,
            "Bateria 60Ah",
            "EL-0060",
            "eletrica",
            Decimal::new(58900, 2),
            Decimal::from(11),
            ts(2025, 5, 22),
        ),
    ]
}

pub fn branches() -> Vec<Branch> {
    let branch = |id: i64, name: &str, address: &str, phone: &str, created: DateTime<Utc>| Branch {
        id,
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        status: EntityStatus::Active,
        created_at: created,
        updated_at: created,
    };

    vec![
        branch(
            1,
            "Matriz Centro",
            "Av. das Oficinas, 1200 - Centro",
            "11 4002-1200",
            ts(2024, 8, 1),
        ),
        branch(
            2,
            "Filial Norte",
            "Rua dos Mecânicos, 88 - Zona Norte",
            "11 4002-0088",
            ts(2025, 1, 15),
        ),
        branch(
            3,
            "Filial ABC",
            "Av. Industrial, 450 - Santo André",
            "11 4002-0450",
            ts(2025, 7, 3),
        ),
    ]
}
