// src/fallback/store.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::common::error::ServiceError;
use crate::models::audit::AuditEntry;
use crate::models::entity::CacheEntity;
use crate::models::filter::{ListFilter, Page};

/// Espelho local em memória de um recurso do backend.
///
/// Construído e injetado explicitamente (nada de singleton de módulo), para
/// que cada teste instancie o seu. Semeado uma única vez, de forma preguiçosa,
/// a partir das fixtures embutidas; nunca persiste entre execuções e nunca
/// reconcilia de volta com o servidor: é estritamente um modo degradado do
/// lado do cliente.
pub struct FallbackStore<T: CacheEntity> {
    inner: Mutex<StoreInner<T>>,
    seeder: fn() -> Vec<T>,
    operator: String,
}

struct StoreInner<T> {
    seeded: bool,
    entries: Vec<T>,
    audits: HashMap<i64, Vec<AuditEntry>>,
}

impl<T: CacheEntity> FallbackStore<T> {
    pub fn new(seeder: fn() -> Vec<T>, operator: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                seeded: false,
                entries: Vec::new(),
                audits: HashMap::new(),
            }),
            seeder,
            operator: operator.into(),
        }
    }

    /// Trava o estado, semeando na primeira passagem.
    fn lock(&self) -> MutexGuard<'_, StoreInner<T>> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !inner.seeded {
            inner.entries = (self.seeder)();
            inner.seeded = true;
        }
        inner
    }

    /// Esvazia entradas, trilhas e a marca de semeadura (isolamento de teste).
    pub fn reset(&self) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.entries.clear();
        inner.audits.clear();
        inner.seeded = false;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cópia de todas as entradas, na ordem original.
    pub fn all(&self) -> Vec<T> {
        self.lock().entries.clone()
    }

    /// Aplica os mesmos predicados da API viva e pagina com a mesma fórmula.
    pub fn list(&self, filter: &ListFilter) -> Page<T> {
        let inner = self.lock();
        let filtered: Vec<T> = inner
            .entries
            .iter()
            .filter(|e| e.matches(filter))
            .cloned()
            .collect();
        Page::paginate(filtered, filter.page, filter.effective_limit())
    }

    pub fn get(&self, id: i64) -> Result<T, ServiceError> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    /// Insere uma entidade nova: id = max(existentes) + 1 (ou 1 se vazio),
    /// rejeitando nome duplicado ANTES de qualquer mutação.
    pub fn create(&self, mut entity: T, detail: impl Into<String>) -> Result<T, ServiceError> {
        let mut inner = self.lock();
        let name = entity.name().trim().to_lowercase();
        if inner
            .entries
            .iter()
            .any(|e| e.name().trim().to_lowercase() == name)
        {
            return Err(ServiceError::DuplicateName(entity.name().to_string()));
        }
        let next_id = inner.entries.iter().map(|e| e.id()).max().unwrap_or(0) + 1;
        entity.assign_id(next_id);
        let audit = AuditEntry::now("created", &self.operator, detail);
        inner.audits.insert(next_id, vec![audit]);
        inner.entries.push(entity.clone());
        Ok(entity)
    }

    /// Mutação pontual: aplica `f`, re-estampa `updatedAt` e registra
    /// exatamente uma entrada de auditoria com o nome da ação.
    /// Serve tanto para update (merge raso) quanto para as transições de
    /// estado. As transições não validam o estado anterior: qualquer estado pode
    /// ir para qualquer outro.
    pub fn mutate(
        &self,
        id: i64,
        action: &str,
        detail: impl Into<String>,
        f: impl FnOnce(&mut T),
    ) -> Result<T, ServiceError> {
        let mut inner = self.lock();
        let operator = self.operator.clone();
        let entity = inner
            .entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(ServiceError::NotFound(id))?;
        f(entity);
        entity.touch(Utc::now());
        let updated = entity.clone();
        inner
            .audits
            .entry(id)
            .or_default()
            .push(AuditEntry::now(action, &operator, detail));
        Ok(updated)
    }

    /// Remove a entidade E a trilha de auditoria dela, juntas.
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.lock();
        let position = inner
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or(ServiceError::NotFound(id))?;
        inner.entries.remove(position);
        inner.audits.remove(&id);
        Ok(())
    }

    /// Variante em lote: ids ausentes são pulados em silêncio, pois sucesso
    /// parcial é aceitável no contexto de lote.
    pub fn bulk_mutate(
        &self,
        ids: &[i64],
        action: &str,
        detail: &str,
        f: impl Fn(&mut T),
    ) -> Vec<T> {
        let mut updated = Vec::new();
        for &id in ids {
            if let Ok(entity) = self.mutate(id, action, detail, &f) {
                updated.push(entity);
            }
        }
        updated
    }

    pub fn bulk_delete(&self, ids: &[i64]) {
        for &id in ids {
            let _ = self.delete(id);
        }
    }

    pub fn audit_log(&self, id: i64) -> Result<Vec<AuditEntry>, ServiceError> {
        let inner = self.lock();
        if !inner.entries.iter().any(|e| e.id() == id) {
            return Err(ServiceError::NotFound(id));
        }
        Ok(inner.audits.get(&id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::EntityStatus;
    use crate::models::branch::Branch;
    use chrono::{TimeZone, Utc};

    fn branch(id: i64, name: &str) -> Branch {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        Branch {
            id,
            name: name.to_string(),
            address: "Rua A, 1".to_string(),
            phone: String::new(),
            status: EntityStatus::Active,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn empty_seed() -> Vec<Branch> {
        Vec::new()
    }

    fn two_seed() -> Vec<Branch> {
        vec![branch(3, "Matriz"), branch(7, "Filial Norte")]
    }

    #[test]
    fn create_atribui_ids_crescentes_a_partir_do_maximo() {
        let store = FallbackStore::new(two_seed, "local");
        let a = store.create(branch(0, "Filial Sul"), "nova filial").unwrap();
        let b = store.create(branch(0, "Filial Leste"), "nova filial").unwrap();
        assert_eq!(a.id, 8);
        assert_eq!(b.id, 9);
    }

    #[test]
    fn create_em_loja_vazia_comeca_em_um() {
        let store = FallbackStore::new(empty_seed, "local");
        let a = store.create(branch(0, "Matriz"), "").unwrap();
        assert_eq!(a.id, 1);
    }

    #[test]
    fn nome_duplicado_e_rejeitado_sem_mutar_a_colecao() {
        let store = FallbackStore::new(two_seed, "local");
        let before = store.len();
        let err = store.create(branch(0, "  MATRIZ "), "").unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName(_)));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn mutate_adiciona_exatamente_uma_entrada_de_auditoria() {
        let store = FallbackStore::new(two_seed, "local");
        store
            .mutate(3, "deactivate", "pausa temporária", |b| {
                b.status = EntityStatus::Inactive
            })
            .unwrap();
        let log = store.audit_log(3).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, "deactivate");
        assert_eq!(log[0].actor, "local");
    }

    #[test]
    fn mutate_nao_valida_estado_anterior() {
        let store = FallbackStore::new(two_seed, "local");
        // inativa duas vezes seguidas: nenhuma validação de transição
        for _ in 0..2 {
            store
                .mutate(3, "deactivate", "", |b| b.status = EntityStatus::Inactive)
                .unwrap();
        }
        assert_eq!(store.audit_log(3).unwrap().len(), 2);
    }

    #[test]
    fn delete_remove_entidade_e_trilha_juntas() {
        let store = FallbackStore::new(two_seed, "local");
        store.mutate(3, "update", "", |_| {}).unwrap();
        store.delete(3).unwrap();
        assert!(matches!(store.get(3), Err(ServiceError::NotFound(3))));
        assert!(matches!(store.audit_log(3), Err(ServiceError::NotFound(3))));
        // nada órfão no mapa interno
        assert!(!store.lock().audits.contains_key(&3));
    }

    #[test]
    fn bulk_pula_ids_inexistentes_sem_erro() {
        let store = FallbackStore::new(two_seed, "local");
        let updated = store.bulk_mutate(&[3, 999], "deactivate", "", |b| {
            b.status = EntityStatus::Inactive
        });
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, 3);
        assert_eq!(store.get(3).unwrap().status, EntityStatus::Inactive);
    }

    #[test]
    fn reset_volta_a_semear_na_proxima_leitura() {
        let store = FallbackStore::new(two_seed, "local");
        store.create(branch(0, "Filial Sul"), "").unwrap();
        assert_eq!(store.len(), 3);
        store.reset();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn nao_encontrado_vira_erro_tipado() {
        let store = FallbackStore::new(empty_seed, "local");
        assert!(matches!(store.get(42), Err(ServiceError::NotFound(42))));
        assert!(matches!(
            store.mutate(42, "update", "", |_| {}),
            Err(ServiceError::NotFound(42))
        ));
    }
}
