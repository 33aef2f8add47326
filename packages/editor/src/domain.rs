//! # Settings Domains
//!
//! A domain is one category of settings that can be edited and broadcast on
//! its own: the body type, a single library. Its accepted state is a global
//! default plus optional per-entity overrides.

use crate::{Document, EditorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of a settings domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DomainKey(String);

impl DomainKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entity (character sheet) that may own a settings override
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a session edits for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The global default
    Global,

    /// One entity's own copy
    Entity(EntityId),
}

impl Scope {
    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            Scope::Global => None,
            Scope::Entity(id) => Some(id),
        }
    }
}

/// Where an applied document is accepted
pub trait SettingsTarget<D> {
    fn domain(&self) -> &DomainKey;

    /// Store `document` as the accepted state for `scope`
    fn accept(&mut self, scope: &Scope, document: D) -> Result<(), EditorError>;
}

/// Accepted state of one domain
#[derive(Debug, Clone)]
pub struct SettingsDomain<D> {
    key: DomainKey,
    global: D,
    overrides: BTreeMap<EntityId, D>,
}

impl<D: Document> SettingsDomain<D> {
    pub fn new(key: DomainKey, global: D) -> Self {
        Self {
            key,
            global,
            overrides: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &DomainKey {
        &self.key
    }

    pub fn global(&self) -> &D {
        &self.global
    }

    pub fn override_for(&self, entity: &EntityId) -> Option<&D> {
        self.overrides.get(entity)
    }

    /// Accepted document for `scope`; entities without an override see the
    /// global default
    pub fn accepted(&self, scope: &Scope) -> &D {
        match scope {
            Scope::Global => &self.global,
            Scope::Entity(id) => self.overrides.get(id).unwrap_or(&self.global),
        }
    }

    /// Drop an entity override, returning it to the global default
    pub fn clear_override(&mut self, entity: &EntityId) -> Option<D> {
        self.overrides.remove(entity)
    }
}

impl<D: Document> SettingsTarget<D> for SettingsDomain<D> {
    fn domain(&self) -> &DomainKey {
        &self.key
    }

    fn accept(&mut self, scope: &Scope, document: D) -> Result<(), EditorError> {
        match scope {
            Scope::Global => self.global = document,
            Scope::Entity(id) => {
                self.overrides.insert(id.clone(), document);
            }
        }
        Ok(())
    }
}
