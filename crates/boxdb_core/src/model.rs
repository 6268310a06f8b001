//! Entity type registry of a store.

use crate::error::{StoreError, StoreResult};
use boxdb_engine::EntityTypeId;
use std::any::TypeId;
use std::collections::HashMap;

/// A registered entity type.
#[derive(Debug, Clone, Copy)]
struct Registration {
    id: EntityTypeId,
    type_id: TypeId,
    rust_name: &'static str,
}

/// Maps entity names to engine type ids.
///
/// The model stores:
/// - Entity name to type id mapping
/// - The Rust type each name was first registered with
/// - The next type id to assign
///
/// Type ids start at 1 and are never reused within a store.
#[derive(Debug)]
pub(crate) struct Model {
    types: HashMap<&'static str, Registration>,
    next_type_id: u32,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an empty model.
    pub(crate) fn new() -> Self {
        Self {
            types: HashMap::new(),
            next_type_id: 1,
        }
    }

    /// Looks up a registered name, checking that it belongs to `T`.
    pub(crate) fn lookup<T: 'static>(
        &self,
        name: &'static str,
    ) -> StoreResult<Option<EntityTypeId>> {
        match self.types.get(name) {
            None => Ok(None),
            Some(reg) if reg.type_id == TypeId::of::<T>() => Ok(Some(reg.id)),
            Some(reg) => Err(StoreError::validation(format!(
                "entity name '{name}' is already registered for {}",
                reg.rust_name
            ))),
        }
    }

    /// Gets or assigns the type id for `T` under `name`.
    pub(crate) fn get_or_register<T: 'static>(
        &mut self,
        name: &'static str,
    ) -> StoreResult<EntityTypeId> {
        if let Some(id) = self.lookup::<T>(name)? {
            return Ok(id);
        }

        let id = EntityTypeId::new(self.next_type_id);
        self.next_type_id = self
            .next_type_id
            .checked_add(1)
            .ok_or_else(|| StoreError::validation("entity type ids exhausted"))?;
        self.types.insert(
            name,
            Registration {
                id,
                type_id: TypeId::of::<T>(),
                rust_name: std::any::type_name::<T>(),
            },
        );
        Ok(id)
    }

    /// Returns the registered entity names with their type ids, ordered by id.
    pub(crate) fn entity_types(&self) -> Vec<(String, EntityTypeId)> {
        let mut types: Vec<_> = self
            .types
            .iter()
            .map(|(name, reg)| ((*name).to_string(), reg.id))
            .collect();
        types.sort_by_key(|(_, id)| *id);
        types
    }
}
