use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a named configuration document (dictionary, folder, pipeline, user...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocRef {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DocRef {
    pub fn new(doc_type: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            uuid: Some(uuid.into()),
            name: None,
        }
    }

    /// New reference with a random v4 uuid
    pub fn random(doc_type: impl Into<String>) -> Self {
        Self::new(doc_type, uuid::Uuid::new_v4().to_string())
    }

    /// Reference that names a type but no document
    pub fn empty(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            uuid: None,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.uuid) {
            (Some(name), _) => write!(f, "{}", name),
            (None, Some(uuid)) => write!(f, "{}:{}", self.doc_type, uuid),
            (None, None) => write!(f, "{}:<none>", self.doc_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let doc_ref = DocRef::new("Dictionary", "1234").with_name("Feeds");
        let json = serde_json::to_string(&doc_ref).unwrap();
        assert_eq!(json, r#"{"type":"Dictionary","uuid":"1234","name":"Feeds"}"#);

        let parsed: DocRef = serde_json::from_str(r#"{"type":"Folder"}"#).unwrap();
        assert_eq!(parsed, DocRef::empty("Folder"));
    }

    #[test]
    fn test_random_has_uuid() {
        let doc_ref = DocRef::random("Folder");
        assert_eq!(doc_ref.uuid.as_deref().map(str::len), Some(36));
    }
}
