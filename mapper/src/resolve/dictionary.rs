//! In-memory dictionaries

use std::collections::{HashMap, HashSet};

use super::WordListProvider;
use crate::constants::DICTIONARY_DOC_TYPE;
use crate::expression::DocRef;

/// Newline-separated word list, optionally importing other dictionaries
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    pub doc_ref: DocRef,
    pub text: String,
    pub imports: Vec<DocRef>,
}

impl Dictionary {
    /// New dictionary with a random uuid
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            doc_ref: DocRef::random(DICTIONARY_DOC_TYPE).with_name(name),
            text: text.into(),
            imports: Vec::new(),
        }
    }

    pub fn with_imports(mut self, imports: impl IntoIterator<Item = DocRef>) -> Self {
        self.imports.extend(imports);
        self
    }

    /// Trimmed, non-blank lines of this dictionary alone
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

/// Dictionaries keyed by uuid
#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    dictionaries: HashMap<String, Dictionary>,
}

impl DictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dictionary and return its reference; a dictionary without a
    /// uuid cannot be referenced and is skipped
    pub fn add(&mut self, dictionary: Dictionary) -> DocRef {
        let doc_ref = dictionary.doc_ref.clone();
        match &doc_ref.uuid {
            Some(uuid) => {
                self.dictionaries.insert(uuid.clone(), dictionary);
            }
            None => tracing::warn!(doc_ref = %doc_ref, "Dictionary without uuid not stored"),
        }
        doc_ref
    }

    pub fn get(&self, doc_ref: &DocRef) -> Option<&Dictionary> {
        doc_ref
            .uuid
            .as_deref()
            .and_then(|uuid| self.dictionaries.get(uuid))
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    /// Imports first (depth-first), then the dictionary's own lines
    fn collect(&self, dictionary: &Dictionary, visited: &mut HashSet<String>, out: &mut Vec<String>) {
        for import in &dictionary.imports {
            let Some(uuid) = import.uuid.as_deref() else {
                continue;
            };
            if !visited.insert(uuid.to_string()) {
                tracing::debug!(dictionary = %dictionary.doc_ref, import = %import, "Skipping repeated import");
                continue;
            }
            match self.dictionaries.get(uuid) {
                Some(imported) => self.collect(imported, visited, out),
                None => tracing::debug!(import = %import, "Imported dictionary not found"),
            }
        }
        out.extend(dictionary.lines().map(str::to_string));
    }
}

impl WordListProvider for DictionaryStore {
    fn words(&self, doc_ref: &DocRef) -> Option<Vec<String>> {
        let dictionary = self.get(doc_ref)?;
        let mut visited = HashSet::new();
        if let Some(uuid) = &dictionary.doc_ref.uuid {
            visited.insert(uuid.clone());
        }
        let mut words = Vec::new();
        self.collect(dictionary, &mut visited, &mut words);
        Some(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_trimmed_and_non_blank() {
        let dictionary = Dictionary::new("Feeds", "  A \n\n B\r\n   \nC");
        assert_eq!(dictionary.lines().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(dictionary.doc_ref.doc_type, DICTIONARY_DOC_TYPE);
        assert_eq!(dictionary.doc_ref.name.as_deref(), Some("Feeds"));
    }

    #[test]
    fn test_words_with_imports() {
        let mut store = DictionaryStore::new();
        let base = store.add(Dictionary::new("Base", "x\ny"));
        let top = store.add(Dictionary::new("Top", "z").with_imports([base]));
        assert_eq!(store.words(&top), Some(vec!["x".into(), "y".into(), "z".into()]));
    }

    #[test]
    fn test_import_cycle_terminates() {
        let mut store = DictionaryStore::new();
        let mut a = Dictionary::new("A", "a");
        let mut b = Dictionary::new("B", "b");
        a.imports.push(b.doc_ref.clone());
        b.imports.push(a.doc_ref.clone());
        let a_ref = store.add(a);
        store.add(b);
        assert_eq!(store.words(&a_ref), Some(vec!["b".into(), "a".into()]));
    }

    #[test]
    fn test_unknown_dictionary() {
        let store = DictionaryStore::new();
        assert_eq!(store.words(&DocRef::random(DICTIONARY_DOC_TYPE)), None);
        assert_eq!(store.words(&DocRef::empty(DICTIONARY_DOC_TYPE)), None);
    }

    #[test]
    fn test_missing_import_is_skipped() {
        let mut store = DictionaryStore::new();
        let top = store.add(
            Dictionary::new("Top", "z").with_imports([DocRef::random(DICTIONARY_DOC_TYPE)]),
        );
        assert_eq!(store.words(&top), Some(vec!["z".into()]));
    }
}
