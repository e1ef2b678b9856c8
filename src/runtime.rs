//! Listener bookkeeping with scoped release.
//!
//! Every event source a component subscribes to (scroll, viewport
//! intersection, pointer, device orientation) is represented by a
//! [`ListenerGuard`]. The guard is registered on creation and unregistered
//! when dropped, so a torn-down session leaves nothing behind regardless of
//! the path it took out.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Event stream a listener is attached to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ListenerKind {
    Scroll,
    Intersection(String),
    PointerMove,
    PointerLeave,
    DeviceOrientation,
    DeviceMotion,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: BTreeMap<u64, ListenerKind>,
}

/// Shared registry of attached listeners.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener; it stays attached for the guard's lifetime.
    pub fn attach(&self, kind: ListenerKind) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        tracing::trace!(id, ?kind, "listener attached");
        inner.active.insert(id, kind);
        ListenerGuard {
            id,
            registry: Rc::clone(&self.inner),
        }
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_attached(&self, kind: &ListenerKind) -> bool {
        self.inner.borrow().active.values().any(|k| k == kind)
    }

    /// Attached listener kinds, sorted.
    pub fn kinds(&self) -> Vec<ListenerKind> {
        let mut kinds: Vec<_> = self.inner.borrow().active.values().cloned().collect();
        kinds.sort();
        kinds
    }
}

/// Detaches its listener on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(kind) = self.registry.borrow_mut().active.remove(&self.id) {
            tracing::trace!(id = self.id, ?kind, "listener detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_drop() {
        let registry = ListenerRegistry::new();
        let guard = registry.attach(ListenerKind::Scroll);
        assert_eq!(registry.active_count(), 1);
        assert!(registry.is_attached(&ListenerKind::Scroll));
        drop(guard);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn guards_are_independent() {
        let registry = ListenerRegistry::new();
        let a = registry.attach(ListenerKind::Intersection("work".into()));
        let b = registry.attach(ListenerKind::Intersection("faq".into()));
        drop(a);
        assert_eq!(
            registry.kinds(),
            vec![ListenerKind::Intersection("faq".into())]
        );
        drop(b);
        assert!(registry.kinds().is_empty());
    }

    #[test]
    fn dropping_a_collection_releases_all() {
        let registry = ListenerRegistry::new();
        let guards = vec![
            registry.attach(ListenerKind::PointerMove),
            registry.attach(ListenerKind::PointerLeave),
            registry.attach(ListenerKind::Scroll),
        ];
        assert_eq!(registry.active_count(), 3);
        drop(guards);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn early_return_releases() {
        fn work(registry: &ListenerRegistry, bail: bool) -> Option<()> {
            let _guard = registry.attach(ListenerKind::DeviceMotion);
            if bail {
                return None;
            }
            Some(())
        }
        let registry = ListenerRegistry::new();
        assert!(work(&registry, true).is_none());
        assert_eq!(registry.active_count(), 0);
    }
}
