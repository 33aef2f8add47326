//! # Settings Propagation
//!
//! After a session applies its document, every other open document that
//! reads from the same domain gets a chance to refresh derived state.
//!
//! The bus keeps no registry. The window manager owns the list of open
//! documents and hands it over for each broadcast; the bus filters it down
//! to documents that both read the domain and expose the
//! [`DomainResponder`] capability.
//!
//! Delivery is synchronous and follows the order of the candidate list. A
//! responder that fails, or panics, is recorded in the report and the
//! broadcast moves on to the next one.

use crate::{DomainKey, EditorError, EntityId};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Capability: react to an applied settings domain
pub trait DomainResponder {
    /// `entity` is the owner whose settings changed, or `None` for the
    /// global default
    fn domain_updated(
        &mut self,
        entity: Option<&EntityId>,
        full_update: bool,
    ) -> Result<(), EditorError>;
}

/// Any open document known to the window manager
pub trait OpenDocument {
    fn title(&self) -> String;

    /// Whether this document reads settings from `domain`
    fn reads_domain(&self, domain: &DomainKey) -> bool;

    /// The responder capability, if this document has one
    fn as_responder(&mut self) -> Option<&mut dyn DomainResponder> {
        None
    }
}

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BroadcastReport {
    /// Titles of responders that were notified successfully, in order
    pub notified: Vec<String>,

    /// Candidates that did not read the domain or had no responder
    pub skipped: usize,

    /// `(title, error)` for every responder that failed
    pub failures: Vec<(String, String)>,
}

impl BroadcastReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Observer broadcast for applied settings domains
#[derive(Debug, Default, Clone, Copy)]
pub struct PropagationBus;

impl PropagationBus {
    pub fn new() -> Self {
        Self
    }

    pub fn broadcast(
        &self,
        domain: &DomainKey,
        entity: Option<&EntityId>,
        full_update: bool,
        candidates: &mut [&mut dyn OpenDocument],
    ) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for candidate in candidates.iter_mut() {
            if !candidate.reads_domain(domain) {
                report.skipped += 1;
                continue;
            }

            let title = candidate.title();
            let Some(responder) = candidate.as_responder() else {
                report.skipped += 1;
                continue;
            };

            let result = catch_unwind(AssertUnwindSafe(|| {
                responder.domain_updated(entity, full_update)
            }));

            match result {
                Ok(Ok(())) => report.notified.push(title),
                Ok(Err(err)) => {
                    tracing::warn!(%domain, responder = %title, error = %err, "responder failed");
                    report.failures.push((title, err.to_string()));
                }
                Err(panic) => {
                    let message = panic_message(&*panic);
                    tracing::error!(%domain, responder = %title, %message, "responder panicked");
                    report.failures.push((title, message));
                }
            }
        }

        tracing::debug!(
            %domain,
            notified = report.notified.len(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "broadcast settings update"
        );

        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panel {
        title: &'static str,
        domain: &'static str,
        responds: bool,
        fail_with: Option<&'static str>,
        panics: bool,
        seen: Vec<(Option<EntityId>, bool)>,
    }

    impl Panel {
        fn new(title: &'static str, domain: &'static str) -> Self {
            Self {
                title,
                domain,
                responds: true,
                fail_with: None,
                panics: false,
                seen: vec![],
            }
        }
    }

    impl DomainResponder for Panel {
        fn domain_updated(
            &mut self,
            entity: Option<&EntityId>,
            full_update: bool,
        ) -> Result<(), EditorError> {
            if self.panics {
                panic!("layout exploded");
            }
            if let Some(message) = self.fail_with {
                return Err(EditorError::Responder(message.to_string()));
            }
            self.seen.push((entity.cloned(), full_update));
            Ok(())
        }
    }

    impl OpenDocument for Panel {
        fn title(&self) -> String {
            self.title.to_string()
        }

        fn reads_domain(&self, domain: &DomainKey) -> bool {
            domain.as_str() == self.domain
        }

        fn as_responder(&mut self) -> Option<&mut dyn DomainResponder> {
            if self.responds {
                Some(self)
            } else {
                None
            }
        }
    }

    #[test]
    fn test_filters_by_domain_and_capability() {
        let mut sheet = Panel::new("sheet", "body");
        let mut other = Panel::new("template", "library");
        let mut mute = Panel::new("notes", "body");
        mute.responds = false;

        let entity = EntityId::new("sheet-1");
        let report = PropagationBus::new().broadcast(
            &DomainKey::new("body"),
            Some(&entity),
            true,
            &mut [&mut sheet, &mut other, &mut mute],
        );

        assert_eq!(report.notified, vec!["sheet".to_string()]);
        assert_eq!(report.skipped, 2);
        assert_eq!(sheet.seen, vec![(Some(entity), true)]);
        assert!(other.seen.is_empty());
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut first = Panel::new("first", "body");
        first.fail_with = Some("stale cache");
        let mut second = Panel::new("second", "body");
        second.panics = true;
        let mut third = Panel::new("third", "body");

        let report = PropagationBus::new().broadcast(
            &DomainKey::new("body"),
            None,
            false,
            &mut [&mut first, &mut second, &mut third],
        );

        assert!(!report.all_succeeded());
        assert_eq!(report.notified, vec!["third".to_string()]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0, "first");
        assert!(report.failures[0].1.contains("stale cache"));
        assert_eq!(report.failures[1], ("second".to_string(), "layout exploded".to_string()));
        assert_eq!(third.seen, vec![(None, false)]);
    }

    #[test]
    fn test_notifies_in_enumeration_order() {
        let mut a = Panel::new("a", "body");
        let mut b = Panel::new("b", "body");
        let mut c = Panel::new("c", "body");

        let report = PropagationBus::new().broadcast(
            &DomainKey::new("body"),
            None,
            true,
            &mut [&mut c, &mut a, &mut b],
        );

        assert_eq!(report.notified, vec!["c", "a", "b"]);
    }
}
