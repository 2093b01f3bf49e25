//! Component registry: identity allocation, containment and resolution.
//!
//! The registry is an arena owned by one session. Containment is strictly
//! tree-shaped: every node has at most one parent, a parent owns its children,
//! and the child's parent link is only a lookup key into the arena.
//!
//! Client-facing lookups go through [`ComponentRegistry::resolve`], which
//! reports "not found" for anything the client may still reference but that
//! is no longer on screen: removed, detached from the root, or hidden.

use std::collections::HashMap;
use std::sync::Arc;

use weft_api::{ComponentId, EventType};

use crate::component::{Capabilities, Component};
use crate::dispatch::EventHandler;
use crate::error::KernelError;

/// Monotonic id source. Ids are never reused, even after removal, so a stale
/// client reference can never hit a different component.
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> ComponentId {
        let id = ComponentId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

struct Node {
    component: Box<dyn Component>,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    hidden: bool,
    handlers: Vec<(EventType, EventHandler)>,
}

/// Per-session arena of live components.
pub struct ComponentRegistry {
    ids: IdAllocator,
    nodes: HashMap<ComponentId, Node>,
    root: Option<ComponentId>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
            nodes: HashMap::new(),
            root: None,
        }
    }

    /// Insert a component with no parent. It does not resolve until it is
    /// made the root or attached under the root.
    pub fn insert(&mut self, component: impl Component) -> ComponentId {
        self.insert_boxed(Box::new(component))
    }

    pub fn insert_boxed(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = self.ids.allocate();
        self.nodes.insert(
            id,
            Node {
                component,
                parent: None,
                children: Vec::new(),
                hidden: false,
                handlers: Vec::new(),
            },
        );
        id
    }

    /// Insert a component as the last child of `parent`.
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        component: impl Component,
    ) -> Result<ComponentId, KernelError> {
        if !self.nodes.contains_key(&parent) {
            return Err(KernelError::ComponentNotFound(parent));
        }
        let id = self.insert(component);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Make `id` the root of the tree. The previous root stays registered
    /// but no longer resolves.
    pub fn set_root(&mut self, id: ComponentId) -> Result<(), KernelError> {
        let node = self
            .nodes
            .get(&id)
            .ok_or(KernelError::ComponentNotFound(id))?;
        if node.parent.is_some() {
            return Err(KernelError::InvalidTree(format!(
                "component {} has a parent and cannot be the root",
                id
            )));
        }
        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// Attach a parentless component as the last child of `parent`.
    pub fn attach(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), KernelError> {
        if !self.nodes.contains_key(&parent) {
            return Err(KernelError::ComponentNotFound(parent));
        }
        let node = self
            .nodes
            .get(&child)
            .ok_or(KernelError::ComponentNotFound(child))?;
        if node.parent.is_some() {
            return Err(KernelError::InvalidTree(format!(
                "component {} already has a parent",
                child
            )));
        }
        if Some(child) == self.root {
            return Err(KernelError::InvalidTree(format!(
                "root component {} cannot be attached",
                child
            )));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(KernelError::InvalidTree(format!(
                "attaching {} under {} would create a cycle",
                child, parent
            )));
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach a component (and its subtree) from its parent without
    /// destroying it. It stops resolving until re-attached.
    pub fn detach(&mut self, id: ComponentId) -> Result<(), KernelError> {
        let parent = self
            .nodes
            .get_mut(&id)
            .ok_or(KernelError::ComponentNotFound(id))?
            .parent
            .take();
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(&parent)
        {
            node.children.retain(|c| *c != id);
        }
        Ok(())
    }

    /// Remove a component and its whole subtree. Returns the removed ids.
    pub fn remove(&mut self, id: ComponentId) -> Result<Vec<ComponentId>, KernelError> {
        self.detach(id)?;
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
                removed.push(next);
            }
        }
        tracing::debug!(component = %id, count = removed.len(), "removed component subtree");
        Ok(removed)
    }

    /// Hide or show a component. Hidden subtrees stay registered but neither
    /// resolve nor render (e.g. an inactive tab).
    pub fn set_hidden(&mut self, id: ComponentId, hidden: bool) -> Result<(), KernelError> {
        self.nodes
            .get_mut(&id)
            .ok_or(KernelError::ComponentNotFound(id))?
            .hidden = hidden;
        Ok(())
    }

    pub fn is_hidden(&self, id: ComponentId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.hidden)
    }

    /// Whether `id` is registered at all, regardless of visibility.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Resolve a client-held id to a live, visible component.
    ///
    /// `None` is the "not found" outcome: removed, detached from the root,
    /// or hidden (itself or through an ancestor).
    pub fn resolve(&self, id: ComponentId) -> Option<&dyn Component> {
        if !self.is_present(id) {
            return None;
        }
        self.nodes.get(&id).map(|n| n.component.as_ref())
    }

    pub(crate) fn resolve_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        if !self.is_present(id) {
            return None;
        }
        self.nodes.get_mut(&id).map(|n| n.component.as_mut())
    }

    /// Whether `id` is connected to the root through visible nodes only.
    pub fn is_present(&self, id: ComponentId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current == root,
            }
        }
    }

    /// Typed access for server-side code. Ignores visibility: handlers may
    /// update components that are currently hidden.
    pub fn get<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.nodes
            .get(&id)
            .and_then(|n| n.component.as_ref().as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)
            .and_then(|n| n.component.as_mut().as_any_mut().downcast_mut::<T>())
    }

    /// Untyped access, regardless of visibility.
    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.nodes.get(&id).map(|n| n.component.as_ref())
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        self.nodes.get_mut(&id).map(|n| n.component.as_mut())
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Walk parent links upward, nearest ancestor first.
    pub fn ancestors(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Register an event handler. Handlers for one event type run in
    /// registration order.
    pub fn add_handler<F>(
        &mut self,
        id: ComponentId,
        kind: EventType,
        handler: F,
    ) -> Result<(), KernelError>
    where
        F: Fn(&mut crate::EventContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(KernelError::ComponentNotFound(id))?;
        if !node.component.capabilities().contains(Capabilities::EVENTS) {
            return Err(KernelError::MissingCapability {
                id,
                capability: "events",
            });
        }
        node.handlers.push((kind, Arc::new(handler)));
        Ok(())
    }

    /// Handlers registered for `kind` on `id`, in registration order.
    pub fn handlers(&self, id: ComponentId, kind: EventType) -> Vec<EventHandler> {
        self.nodes
            .get(&id)
            .map(|n| {
                n.handlers
                    .iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, h)| Arc::clone(h))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct event types with at least one handler on `id`.
    pub fn handled_types(&self, id: ComponentId) -> Vec<EventType> {
        let mut kinds: Vec<EventType> = self
            .nodes
            .get(&id)
            .map(|n| n.handlers.iter().map(|(k, _)| *k).collect())
            .unwrap_or_default();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
