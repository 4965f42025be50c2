//! Term handlers
//!
//! A [`TermHandler`] is bound to one query field. It owns the backing column
//! (or attribute) the field maps to and the converter that turns raw term
//! values into typed values, and it implements the semantics of every
//! condition on top of the backend's primitive predicates.
//!
//! Values that fail to convert and references that fail to resolve are not
//! errors: the term compiles to an always-false predicate and the gap is
//! logged.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::backend::{CaseSensitivity, LikePattern, PredicateBackend};
use crate::constants::{LIST_SEPARATOR, WILDCARD};
use crate::convert::{Converter, IntoValues, MultiConverter, each, split_list};
use crate::error::MapperError;
use crate::expression::{Condition, DocRef, ExpressionTerm};
use crate::field::{FieldType, QueryField};
use crate::resolve::Collaborators;
use crate::value::{CompareOp, Value};

/// Compiles terms on one field into backend predicates
pub struct TermHandler<B: PredicateBackend> {
    field: QueryField,
    backing: B::Field,
    converter: Arc<dyn MultiConverter<Value>>,
    use_name: bool,
    case: CaseSensitivity,
    _backend: PhantomData<fn() -> B>,
}

impl<B: PredicateBackend> TermHandler<B> {
    /// Handler converting each raw value independently
    pub fn new<T, C>(field: QueryField, backing: B::Field, converter: C) -> Self
    where
        C: Converter<T> + 'static,
        T: Into<Value> + 'static,
    {
        Self::multi::<T, _>(field, backing, each(converter))
    }

    /// Handler with a batch converter
    pub fn multi<T, M>(field: QueryField, backing: B::Field, converter: M) -> Self
    where
        M: MultiConverter<T> + 'static,
        T: Into<Value> + 'static,
    {
        Self {
            field,
            backing,
            converter: Arc::new(IntoValues::new(converter)),
            use_name: false,
            case: CaseSensitivity::default(),
            _backend: PhantomData,
        }
    }

    /// Compare doc refs by name instead of uuid
    pub fn use_name(mut self, use_name: bool) -> Self {
        self.use_name = use_name;
        self
    }

    /// Case policy for equality, membership, wildcard and ordering terms
    ///
    /// Defaults to ignoring case. The CONTAINS family and the
    /// `_CASE_SENSITIVE` conditions pick their own policy.
    pub fn case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }

    pub fn field(&self) -> &QueryField {
        &self.field
    }

    pub fn backing(&self) -> &B::Field {
        &self.backing
    }

    /// Compile one term
    pub fn apply(
        &self,
        backend: &B,
        term: &ExpressionTerm,
        ctx: &Collaborators,
    ) -> Result<B::Predicate, MapperError> {
        let Some(condition) = term.condition else {
            return Err(MapperError::MissingCondition {
                field: self.field.name.clone(),
            });
        };
        let value = term.value_str();

        match condition {
            Condition::Equals => Ok(self.equality(backend, value, false, self.case, true)),
            Condition::NotEquals => Ok(self.equality(backend, value, true, self.case, true)),
            Condition::EqualsCaseSensitive => {
                Ok(self.equality(backend, value, false, CaseSensitivity::Sensitive, false))
            }
            Condition::NotEqualsCaseSensitive => {
                Ok(self.equality(backend, value, true, CaseSensitivity::Sensitive, false))
            }
            Condition::Contains
            | Condition::ContainsCaseSensitive
            | Condition::StartsWith
            | Condition::StartsWithCaseSensitive
            | Condition::EndsWith
            | Condition::EndsWithCaseSensitive => Ok(self.pattern(backend, condition, value)),
            Condition::Between => Ok(self.between(backend, value)),
            Condition::GreaterThan => Ok(self.comparison(backend, condition, CompareOp::Gt, value)),
            Condition::GreaterThanOrEqualTo => {
                Ok(self.comparison(backend, condition, CompareOp::Gte, value))
            }
            Condition::LessThan => Ok(self.comparison(backend, condition, CompareOp::Lt, value)),
            Condition::LessThanOrEqualTo => {
                Ok(self.comparison(backend, condition, CompareOp::Lte, value))
            }
            Condition::In => Ok(self.in_values(backend, value)),
            Condition::InDictionary => Ok(self.in_dictionary(backend, term.doc_ref.as_ref(), ctx)),
            Condition::InFolder => self.in_folder(backend, term.doc_ref.as_ref(), ctx),
            Condition::IsDocRef | Condition::IsUserRef => {
                self.is_doc_ref(backend, condition, term.doc_ref.as_ref(), ctx)
            }
            Condition::IsNull => Ok(backend.is_null(&self.backing)),
            Condition::IsNotNull => Ok(backend.is_not_null(&self.backing)),
            Condition::MatchesRegex => Ok(backend.regex(&self.backing, value)),
            Condition::Unknown => Err(MapperError::unsupported_condition(
                &self.field.name,
                condition,
            )),
        }
    }

    fn convert(&self, raw: &[String]) -> Vec<Value> {
        self.converter.convert_all(raw)
    }

    fn convert_one(&self, raw: &str) -> Option<Value> {
        single(self.convert(&[raw.to_string()]))
    }

    fn gap(&self, backend: &B, condition: Condition, reason: &str) -> B::Predicate {
        tracing::debug!(
            field = %self.field.name,
            condition = %condition,
            reason,
            "Term compiles to always-false"
        );
        backend.always_false()
    }

    /// EQUALS and NOT_EQUALS with or without forced case sensitivity
    fn equality(
        &self,
        backend: &B,
        raw: &str,
        negate: bool,
        case: CaseSensitivity,
        wildcard: bool,
    ) -> B::Predicate {
        let values = self.convert(&[raw.to_string()]);
        if values.is_empty() {
            return if negate {
                backend.is_not_null(&self.backing)
            } else {
                backend.is_null(&self.backing)
            };
        }

        match <[Value; 1]>::try_from(values) {
            Ok([Value::Text(text)]) if wildcard && text.contains(WILDCARD) => {
                let like = backend.like(&self.backing, LikePattern::from_wildcard(&text), case);
                if negate { backend.not(like) } else { like }
            }
            Ok([value]) => {
                let op = if negate { CompareOp::Ne } else { CompareOp::Eq };
                backend.compare(&self.backing, op, value, case)
            }
            Err(values) => {
                let in_list = backend.in_list(&self.backing, values, case);
                if negate { backend.not(in_list) } else { in_list }
            }
        }
    }

    /// CONTAINS, STARTS_WITH and ENDS_WITH families
    fn pattern(&self, backend: &B, condition: Condition, raw: &str) -> B::Predicate {
        let Some(value) = self.convert_one(raw) else {
            return self.gap(backend, condition, "value did not convert to exactly one value");
        };
        let text = value.to_string();
        let (pattern, case) = match condition {
            Condition::Contains => (LikePattern::contains(&text), CaseSensitivity::Insensitive),
            Condition::StartsWith => (LikePattern::starts_with(&text), CaseSensitivity::Insensitive),
            Condition::EndsWith => (LikePattern::ends_with(&text), CaseSensitivity::Insensitive),
            Condition::ContainsCaseSensitive => {
                (LikePattern::contains(&text), CaseSensitivity::Sensitive)
            }
            Condition::StartsWithCaseSensitive => {
                (LikePattern::starts_with(&text), CaseSensitivity::Sensitive)
            }
            _ => (LikePattern::ends_with(&text), CaseSensitivity::Sensitive),
        };
        backend.like(&self.backing, pattern, case)
    }

    fn comparison(&self, backend: &B, condition: Condition, op: CompareOp, raw: &str) -> B::Predicate {
        match self.convert_one(raw) {
            Some(value) => backend.compare(&self.backing, op, value, self.case),
            None => self.gap(backend, condition, "value did not convert to exactly one value"),
        }
    }

    /// Half-open range from a "low,high" value
    fn between(&self, backend: &B, raw: &str) -> B::Predicate {
        let parts: Vec<&str> = raw.split(LIST_SEPARATOR).map(str::trim).collect();
        let [low, high] = parts.as_slice() else {
            tracing::warn!(
                field = %self.field.name,
                value = raw,
                parts = parts.len(),
                "BETWEEN needs exactly two comma-separated values"
            );
            return backend.always_false();
        };

        match (self.convert_one(low), self.convert_one(high)) {
            (Some(low), Some(high)) => backend.range(&self.backing, low, high, self.case),
            _ => {
                tracing::warn!(
                    field = %self.field.name,
                    value = raw,
                    "BETWEEN bounds did not each convert to one value"
                );
                backend.always_false()
            }
        }
    }

    fn membership(&self, backend: &B, condition: Condition, raw: &[String]) -> B::Predicate {
        let values = self.convert(raw);
        if values.is_empty() {
            return self.gap(backend, condition, "no values converted");
        }
        backend.in_list(&self.backing, values, self.case)
    }

    fn in_values(&self, backend: &B, raw: &str) -> B::Predicate {
        let tokens = split_list(raw);
        if tokens.is_empty() {
            return self.gap(backend, Condition::In, "empty value list");
        }
        self.membership(backend, Condition::In, &tokens)
    }

    fn in_dictionary(
        &self,
        backend: &B,
        doc_ref: Option<&DocRef>,
        ctx: &Collaborators,
    ) -> B::Predicate {
        let condition = Condition::InDictionary;
        let Some(doc_ref) = doc_ref else {
            return self.gap(backend, condition, "no dictionary reference");
        };
        let Some(provider) = &ctx.word_lists else {
            return self.gap(backend, condition, "no word list provider");
        };
        let Some(words) = provider.words(doc_ref) else {
            return self.gap(backend, condition, "dictionary not found");
        };
        self.membership(backend, condition, &words)
    }

    fn in_folder(
        &self,
        backend: &B,
        doc_ref: Option<&DocRef>,
        ctx: &Collaborators,
    ) -> Result<B::Predicate, MapperError> {
        let condition = Condition::InFolder;
        if self.field.field_type != FieldType::DocRef {
            return Ok(self.gap(backend, condition, "field is not a doc ref field"));
        }
        let Some(doc_type) = self.field.doc_ref_type.as_deref() else {
            return Ok(self.gap(backend, condition, "field has no doc ref type"));
        };
        let Some(folder) = doc_ref else {
            return Ok(self.gap(backend, condition, "no folder reference"));
        };
        let Some(collections) = &ctx.collections else {
            return Ok(self.gap(backend, condition, "no collection service"));
        };

        let mut raw: Vec<String> = Vec::new();
        for descendant in collections.descendants(folder, doc_type) {
            if let Some(value) = self.doc_ref_value(&descendant, ctx)?
                && !raw.contains(&value)
            {
                raw.push(value);
            }
        }
        Ok(self.membership(backend, condition, &raw))
    }

    fn is_doc_ref(
        &self,
        backend: &B,
        condition: Condition,
        doc_ref: Option<&DocRef>,
        ctx: &Collaborators,
    ) -> Result<B::Predicate, MapperError> {
        let Some(doc_ref) = doc_ref.filter(|d| d.uuid.is_some()) else {
            return Ok(backend.is_null(&self.backing));
        };
        let Some(raw) = self.doc_ref_value(doc_ref, ctx)? else {
            return Ok(self.gap(backend, condition, "doc ref has no name"));
        };
        Ok(match self.convert_one(&raw) {
            Some(value) => backend.compare(&self.backing, CompareOp::Eq, value, self.case),
            None => self.gap(backend, condition, "doc ref did not convert to exactly one value"),
        })
    }

    /// Name or uuid of a doc ref, per `use_name`
    ///
    /// With a name resolver configured, names come from the resolver and an
    /// unresolvable reference is an error.
    fn doc_ref_value(
        &self,
        doc_ref: &DocRef,
        ctx: &Collaborators,
    ) -> Result<Option<String>, MapperError> {
        if !self.use_name {
            return Ok(doc_ref.uuid.clone());
        }
        match &ctx.doc_ref_info {
            Some(info) => info
                .resolve_name(doc_ref)
                .map(Some)
                .ok_or_else(|| MapperError::doc_ref_not_found(doc_ref)),
            None => Ok(doc_ref.name.clone()),
        }
    }
}

fn single(values: Vec<Value>) -> Option<Value> {
    let [value] = <[Value; 1]>::try_from(values).ok()?;
    Some(value)
}

impl<B: PredicateBackend> Clone for TermHandler<B> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            backing: self.backing.clone(),
            converter: Arc::clone(&self.converter),
            use_name: self.use_name,
            case: self.case,
            _backend: PhantomData,
        }
    }
}

impl<B: PredicateBackend> fmt::Debug for TermHandler<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermHandler")
            .field("field", &self.field)
            .field("backing", &self.backing)
            .field("use_name", &self.use_name)
            .field("case", &self.case)
            .finish()
    }
}
