// crates/peticoes-core/src/runtime/store.rs
// ============================================================================
// Module: Peticoes In-Memory Store
// Description: Simple in-memory petition store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`PetitionStore`] for tests and local demos. It is not intended for
//! production use; duplicate detection mirrors the relational semantics
//! (absent emails never conflict).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::Petition;
use crate::core::PetitionId;
use crate::core::PetitionInput;
use crate::core::PetitionOrder;
use crate::core::PetitionRef;
use crate::core::SignatureRecord;
use crate::core::Timestamp;
use crate::core::is_uuid_shaped;
use crate::interfaces::PetitionFilter;
use crate::interfaces::PetitionStore;
use crate::interfaces::SignatureInsert;
use crate::interfaces::StoreError;
use crate::interfaces::TimeWindow;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable state behind the store mutex.
#[derive(Debug, Default)]
struct InMemoryState {
    /// Petitions keyed by identifier.
    petitions: BTreeMap<String, Petition>,
    /// Signature rows in insertion order.
    signatures: Vec<SignatureRecord>,
}

/// In-memory petition store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPetitionStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryPetitionStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state, mapping a poisoned mutex into a store error.
    fn locked(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("store mutex poisoned".to_string()))
    }
}

/// Returns true when a petition matches a lookup key.
fn key_matches(petition: &Petition, key: &str) -> bool {
    (is_uuid_shaped(key) && petition.id.as_str() == key) || petition.slug == key
}

/// Builds a stored petition row from a write payload.
fn petition_from_input(
    input: &PetitionInput,
    id: PetitionId,
    created: Timestamp,
    updated: Timestamp,
) -> Petition {
    Petition {
        id,
        title: input.title.clone(),
        slug: input.slug.clone(),
        summary: input.summary.clone(),
        description: input.description.clone(),
        image_url: input.image_url.clone(),
        goal: input.goal,
        deadline: input.deadline,
        status: input.status.clone(),
        require_cpf: input.require_cpf,
        require_phone: input.require_phone,
        primary_color: input.primary_color.clone(),
        terms_text: input.terms_text.clone(),
        created_date: created,
        updated_date: updated,
    }
}

impl PetitionStore for InMemoryPetitionStore {
    fn resolve_petition(&self, key: &str) -> Result<Option<PetitionRef>, StoreError> {
        let guard = self.locked()?;
        Ok(guard.petitions.values().find(|petition| key_matches(petition, key)).map(
            |petition| PetitionRef {
                id: petition.id.clone(),
                require_cpf: petition.require_cpf,
                require_phone: petition.require_phone,
            },
        ))
    }

    fn get_petition(&self, key: &str) -> Result<Option<Petition>, StoreError> {
        let guard = self.locked()?;
        Ok(guard.petitions.values().find(|petition| key_matches(petition, key)).cloned())
    }

    fn list_petitions(&self, filter: &PetitionFilter) -> Result<Vec<Petition>, StoreError> {
        let guard = self.locked()?;
        let needle = filter.q.as_deref().map(str::to_lowercase);
        let mut rows: Vec<Petition> = guard
            .petitions
            .values()
            .filter(|petition| {
                filter.status.as_deref().is_none_or(|status| petition.status == status)
            })
            .filter(|petition| {
                needle.as_deref().is_none_or(|needle| {
                    petition.title.to_lowercase().contains(needle)
                        || petition.slug.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        drop(guard);
        match filter.order {
            PetitionOrder::CreatedDateAsc => {
                rows.sort_by(|a, b| a.created_date.cmp(&b.created_date));
            }
            PetitionOrder::CreatedDateDesc => {
                rows.sort_by(|a, b| b.created_date.cmp(&a.created_date));
            }
            PetitionOrder::IdAsc => rows.sort_by(|a, b| a.id.cmp(&b.id)),
            PetitionOrder::IdDesc => rows.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        let offset = usize::try_from(filter.offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit.max(0)).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    fn upsert_petition(
        &self,
        input: &PetitionInput,
        candidate_id: &PetitionId,
        now: Timestamp,
    ) -> Result<Petition, StoreError> {
        let mut guard = self.locked()?;
        let existing = guard
            .petitions
            .values()
            .find(|petition| petition.slug == input.slug)
            .map(|petition| (petition.id.clone(), petition.created_date));
        let row = existing.map_or_else(
            || petition_from_input(input, candidate_id.clone(), now, now),
            |(id, created)| petition_from_input(input, id, created, now),
        );
        guard.petitions.insert(row.id.as_str().to_string(), row.clone());
        drop(guard);
        Ok(row)
    }

    fn update_petition(
        &self,
        id: &PetitionId,
        input: &PetitionInput,
        now: Timestamp,
    ) -> Result<Option<Petition>, StoreError> {
        let mut guard = self.locked()?;
        let Some(existing) = guard.petitions.get(id.as_str()) else {
            return Ok(None);
        };
        let row = petition_from_input(input, id.clone(), existing.created_date, now);
        guard.petitions.insert(id.as_str().to_string(), row.clone());
        drop(guard);
        Ok(Some(row))
    }

    fn insert_signature(&self, record: &SignatureRecord) -> Result<SignatureInsert, StoreError> {
        let mut guard = self.locked()?;
        if let Some(email) = record.email.as_deref() {
            let duplicate = guard.signatures.iter().any(|existing| {
                existing.petition_id == record.petition_id
                    && existing.email.as_deref() == Some(email)
            });
            if duplicate {
                return Ok(SignatureInsert::DuplicateEmail);
            }
        }
        guard.signatures.push(record.clone());
        drop(guard);
        Ok(SignatureInsert::Inserted)
    }

    fn list_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SignatureRecord>, StoreError> {
        let guard = self.locked()?;
        let mut rows: Vec<SignatureRecord> = guard
            .signatures
            .iter()
            .filter(|row| row.petition_id == *petition_id && window.contains(row.created_date))
            .cloned()
            .collect();
        drop(guard);
        rows.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    fn count_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<u64, StoreError> {
        let guard = self.locked()?;
        let count = guard
            .signatures
            .iter()
            .filter(|row| row.petition_id == *petition_id && window.contains(row.created_date))
            .count();
        drop(guard);
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    fn signature_times(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<Vec<Timestamp>, StoreError> {
        let guard = self.locked()?;
        let times = guard
            .signatures
            .iter()
            .filter(|row| row.petition_id == *petition_id && window.contains(row.created_date))
            .map(|row| row.created_date)
            .collect();
        drop(guard);
        Ok(times)
    }
}
