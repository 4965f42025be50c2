//! In-memory folder tree

use std::collections::{HashMap, HashSet};

use super::CollectionService;
use crate::expression::DocRef;

/// Parent to children edges keyed by parent uuid
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollections {
    children: HashMap<String, Vec<DocRef>>,
}

impl InMemoryCollections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child` directly beneath `parent`
    pub fn add_child(&mut self, parent: &DocRef, child: DocRef) {
        let Some(uuid) = parent.uuid.clone() else {
            tracing::warn!(parent = %parent, "Folder without uuid cannot have children");
            return;
        };
        let entry = self.children.entry(uuid).or_default();
        if !entry.contains(&child) {
            entry.push(child);
        }
    }
}

impl CollectionService for InMemoryCollections {
    fn descendants(&self, folder: &DocRef, doc_type: &str) -> Vec<DocRef> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<&DocRef> = vec![folder];

        while let Some(current) = stack.pop() {
            let Some(uuid) = current.uuid.as_deref() else {
                continue;
            };
            if !visited.insert(uuid) {
                continue;
            }
            let Some(children) = self.children.get(uuid) else {
                continue;
            };
            // Reverse so children pop in insertion order
            for child in children.iter().rev() {
                stack.push(child);
            }
            for child in children {
                if child.doc_type == doc_type && !found.contains(child) {
                    found.push(child.clone());
                }
            }
        }
        found
    }
}
