//! Open character sheets as settings responders.
//!
//! A sheet reads the body type (and any other domains it lists). When its
//! owner's settings, or the global default it falls back to, are applied,
//! the sheet marks its layout stale and rebuilds.

use crate::{DomainKey, DomainResponder, EditorError, EntityId, OpenDocument};

#[derive(Debug, Clone)]
pub struct SheetView {
    entity: EntityId,
    title: String,
    domains: Vec<DomainKey>,

    /// Whether the sheet carries its own copy of the settings
    has_override: bool,

    rebuilds: usize,
    needs_rebuild: bool,
}

impl SheetView {
    pub fn new(entity: EntityId, title: impl Into<String>, domains: Vec<DomainKey>) -> Self {
        Self {
            entity,
            title: title.into(),
            domains,
            has_override: false,
            rebuilds: 0,
            needs_rebuild: false,
        }
    }

    pub fn with_override(mut self) -> Self {
        self.has_override = true;
        self
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// Whether an update for `entity` concerns this sheet
    fn affected_by(&self, entity: Option<&EntityId>) -> bool {
        match entity {
            Some(owner) => owner == &self.entity,
            // Global defaults only show through on sheets without their own copy
            None => !self.has_override,
        }
    }
}

impl DomainResponder for SheetView {
    fn domain_updated(
        &mut self,
        entity: Option<&EntityId>,
        full_update: bool,
    ) -> Result<(), EditorError> {
        if !self.affected_by(entity) {
            return Ok(());
        }

        self.needs_rebuild = true;
        if full_update {
            self.rebuilds += 1;
            self.needs_rebuild = false;
            tracing::debug!(sheet = %self.entity, "sheet rebuilt");
        }
        Ok(())
    }
}

impl OpenDocument for SheetView {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn reads_domain(&self, domain: &DomainKey) -> bool {
        self.domains.contains(domain)
    }

    fn as_responder(&mut self) -> Option<&mut dyn DomainResponder> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(id: &str) -> SheetView {
        SheetView::new(EntityId::new(id), id, vec![DomainKey::new("body_type")])
    }

    #[test]
    fn test_owner_update_rebuilds() {
        let mut zara = sheet("zara");
        zara.domain_updated(Some(&EntityId::new("zara")), true).unwrap();
        zara.domain_updated(Some(&EntityId::new("bors")), true).unwrap();

        assert_eq!(zara.rebuilds(), 1);
    }

    #[test]
    fn test_global_update_skips_overridden_sheets() {
        let mut plain = sheet("zara");
        let mut custom = sheet("bors").with_override();

        plain.domain_updated(None, true).unwrap();
        custom.domain_updated(None, true).unwrap();

        assert_eq!(plain.rebuilds(), 1);
        assert_eq!(custom.rebuilds(), 0);
    }

    #[test]
    fn test_partial_update_only_marks_stale() {
        let mut zara = sheet("zara");
        zara.domain_updated(None, false).unwrap();

        assert!(zara.needs_rebuild());
        assert_eq!(zara.rebuilds(), 0);
    }
}
