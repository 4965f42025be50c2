//! Fixed doc-ref name table

use std::collections::HashMap;

use super::DocRefInfoService;
use crate::expression::DocRef;

/// Resolves names from a uuid to name table
#[derive(Debug, Clone, Default)]
pub struct StaticDocRefNames {
    names: HashMap<String, String>,
}

impl StaticDocRefNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, uuid: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(uuid, name);
        self
    }

    pub fn insert(&mut self, uuid: impl Into<String>, name: impl Into<String>) {
        self.names.insert(uuid.into(), name.into());
    }
}

impl DocRefInfoService for StaticDocRefNames {
    fn resolve_name(&self, doc_ref: &DocRef) -> Option<String> {
        doc_ref
            .uuid
            .as_deref()
            .and_then(|uuid| self.names.get(uuid))
            .cloned()
    }
}
