// src/common/csv.rs
//
// Construção local de CSV para o modo degradado de `export()`.
// Contrato do arquivo: linha de cabeçalho fixa com os campos públicos da
// entidade; campos texto entre aspas duplas; campos numéricos sem aspas;
// listas (tags) juntadas por ponto-e-vírgula dentro das aspas.

use csv::{QuoteStyle, WriterBuilder};

use crate::models::branch::Branch;
use crate::models::part::Part;
use crate::models::policy::Policy;

/// Uma entidade que sabe se serializar como linha de CSV.
pub trait CsvRow {
    const HEADER: &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

pub fn write_csv<T: CsvRow>(items: &[T]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());
    wtr.write_record(T::HEADER)?;
    for item in items {
        wtr.write_record(item.row())?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

impl CsvRow for Policy {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "category",
        "status",
        "priority",
        "compliance",
        "tags",
        "createdAt",
        "updatedAt",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.category.clone(),
            self.status.as_str().to_string(),
            self.priority.as_str().to_string(),
            self.compliance.as_str().to_string(),
            self.tags.join(";"),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl CsvRow for Part {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "sku",
        "category",
        "unitPrice",
        "stockQuantity",
        "status",
        "createdAt",
        "updatedAt",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.sku.clone(),
            self.category.clone(),
            self.unit_price.to_string(),
            self.stock_quantity.to_string(),
            self.status.as_str().to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl CsvRow for Branch {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "address",
        "phone",
        "status",
        "createdAt",
        "updatedAt",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.address.clone(),
            self.phone.clone(),
            self.status.as_str().to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::EntityStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn texto_entre_aspas_e_numerico_sem_aspas() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let branch = Branch {
            id: 1,
            name: "Matriz".into(),
            address: "Av. Central, 100".into(),
            phone: "11 4002-8922".into(),
            status: EntityStatus::Active,
            created_at: ts,
            updated_at: ts,
        };
        let bytes = write_csv(&[branch]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"id\",\"name\",\"address\",\"phone\",\"status\",\"createdAt\",\"updatedAt\""
        );
        let row = lines.next().unwrap();
        // id numérico fica sem aspas; texto fica entre aspas
        assert!(row.starts_with("1,\"Matriz\""));
        assert!(row.contains("\"Av. Central, 100\""));
    }

    #[test]
    fn tags_sao_juntadas_por_ponto_e_virgula() {
        use crate::models::policy::{ComplianceState, Policy, PolicyPriority, PolicyStatus};
        let ts = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let policy = Policy {
            id: 7,
            name: "Garantia de freios".into(),
            description: "Cobertura de 90 dias".into(),
            category: "garantia".into(),
            status: PolicyStatus::Active,
            priority: PolicyPriority::High,
            compliance: ComplianceState::Compliant,
            tags: vec!["freios".into(), "garantia".into()],
            created_at: ts,
            updated_at: ts,
        };
        let bytes = write_csv(&[policy]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"freios;garantia\""));
    }
}
