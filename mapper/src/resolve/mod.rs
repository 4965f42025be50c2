//! Resolver collaborators
//!
//! Lookups a term handler needs for doc-ref conditions. Implementations are
//! supplied by the caller; in-memory versions are provided for embedding
//! and tests.
//!
//! Resolvers report "not found" as `None` or an empty list, never as an
//! error; the handler turns a gap into an always-false predicate.

mod cache;
mod collection;
mod dictionary;
mod names;

use std::fmt;
use std::sync::Arc;

pub use cache::CachedWordListProvider;
pub use collection::InMemoryCollections;
pub use dictionary::{Dictionary, DictionaryStore};
pub use names::StaticDocRefNames;

use crate::expression::DocRef;

/// Resolves a dictionary reference to its word list
pub trait WordListProvider: Send + Sync {
    fn words(&self, dictionary: &DocRef) -> Option<Vec<String>>;
}

impl<T: WordListProvider + ?Sized> WordListProvider for Arc<T> {
    fn words(&self, dictionary: &DocRef) -> Option<Vec<String>> {
        (**self).words(dictionary)
    }
}

/// Resolves folder contents
pub trait CollectionService: Send + Sync {
    /// All documents of `doc_type` anywhere beneath `folder`
    fn descendants(&self, folder: &DocRef, doc_type: &str) -> Vec<DocRef>;
}

/// Resolves the current display name of a document
pub trait DocRefInfoService: Send + Sync {
    fn resolve_name(&self, doc_ref: &DocRef) -> Option<String>;
}

/// Optional collaborators shared by every handler of a mapper
#[derive(Clone, Default)]
pub struct Collaborators {
    pub word_lists: Option<Arc<dyn WordListProvider>>,
    pub collections: Option<Arc<dyn CollectionService>>,
    pub doc_ref_info: Option<Arc<dyn DocRefInfoService>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word_lists(mut self, provider: Arc<dyn WordListProvider>) -> Self {
        self.word_lists = Some(provider);
        self
    }

    pub fn with_collections(mut self, service: Arc<dyn CollectionService>) -> Self {
        self.collections = Some(service);
        self
    }

    pub fn with_doc_ref_info(mut self, service: Arc<dyn DocRefInfoService>) -> Self {
        self.doc_ref_info = Some(service);
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("word_lists", &self.word_lists.is_some())
            .field("collections", &self.collections.is_some())
            .field("doc_ref_info", &self.doc_ref_info.is_some())
            .finish()
    }
}
