//! Dirty tracking.
//!
//! Marks are a set, so marking the same component twice during one dispatch
//! still yields a single re-render. Draining returns ids in ascending order,
//! which keeps response encoding deterministic.

use std::collections::BTreeSet;

use weft_api::ComponentId;

use crate::registry::ComponentRegistry;

#[derive(Debug, Default, Clone)]
pub struct DirtyTracker {
    marked: BTreeSet<ComponentId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: ComponentId) {
        self.marked.insert(id);
    }

    pub fn is_dirty(&self, id: ComponentId) -> bool {
        self.marked.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Take all marks, leaving the tracker empty.
    pub fn drain(&mut self) -> Vec<ComponentId> {
        std::mem::take(&mut self.marked).into_iter().collect()
    }

    /// Take all marks and drop the ones the client should not re-render:
    /// ids that no longer resolve, and ids whose ancestor is also dirty
    /// (re-rendering the ancestor already covers them).
    pub fn drain_pruned(&mut self, registry: &ComponentRegistry) -> Vec<ComponentId> {
        let marked = std::mem::take(&mut self.marked);
        marked
            .iter()
            .copied()
            .filter(|id| registry.resolve(*id).is_some())
            .filter(|id| !registry.ancestors(*id).any(|a| marked.contains(&a)))
            .collect()
    }
}
