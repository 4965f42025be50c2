//! Expression compiler
//!
//! [`ExpressionMapper`] walks an expression tree depth-first, dispatches each
//! enabled term to the handler registered for its field, and combines the
//! results with the backend's boolean connectives.
//!
//! Simplification rules:
//! - disabled items are skipped as if absent
//! - an operator whose children all compile to nothing compiles to nothing
//! - a single compiled child passes through AND/OR unchanged and is negated
//!   by NOT; several children under NOT are negated as a conjunction
//! - an expression that compiles to nothing is the backend's always-true

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::backend::PredicateBackend;
use crate::config::MapperConfig;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::convert::{Converter, MultiConverter};
use crate::error::MapperError;
use crate::expression::{ExpressionItem, ExpressionTerm, Op};
use crate::field::QueryField;
use crate::handler::TermHandler;
use crate::resolve::Collaborators;
use crate::value::Value;

/// Fallback for terms on fields without a handler
pub type TermDelegate<P> =
    Arc<dyn Fn(&ExpressionTerm) -> Result<Option<P>, MapperError> + Send + Sync>;

/// Compiles expression trees into predicates of backend `B`
pub struct ExpressionMapper<B: PredicateBackend> {
    backend: B,
    handlers: HashMap<String, TermHandler<B>>,
    ignored: HashSet<String>,
    delegate: Option<TermDelegate<B::Predicate>>,
    collaborators: Collaborators,
    max_depth: usize,
}

impl<B: PredicateBackend> ExpressionMapper<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handlers: HashMap::new(),
            ignored: HashSet::new(),
            delegate: None,
            collaborators: Collaborators::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Mapper with limits taken from configuration
    pub fn from_config(backend: B, config: &MapperConfig) -> Self {
        Self::new(backend).with_max_depth(config.max_depth)
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Compile terms on unregistered, non-ignored fields with `delegate`;
    /// `Ok(None)` from the delegate drops the term
    pub fn with_delegate<F>(mut self, delegate: F) -> Self
    where
        F: Fn(&ExpressionTerm) -> Result<Option<B::Predicate>, MapperError>
            + Send
            + Sync
            + 'static,
    {
        self.delegate = Some(Arc::new(delegate));
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Register a fully configured handler, replacing any handler of the
    /// same field
    pub fn register(&mut self, handler: TermHandler<B>) -> &mut Self {
        let name = handler.field().name.clone();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::warn!(field = %name, "Replaced existing term handler");
        }
        self
    }

    /// Register a handler converting each raw value independently
    pub fn register_handler<T, C>(
        &mut self,
        field: QueryField,
        backing: B::Field,
        converter: C,
        use_name: bool,
    ) -> &mut Self
    where
        C: Converter<T> + 'static,
        T: Into<Value> + 'static,
    {
        self.register(TermHandler::new(field, backing, converter).use_name(use_name))
    }

    /// Register a handler with a batch converter
    pub fn register_multi_handler<T, M>(
        &mut self,
        field: QueryField,
        backing: B::Field,
        converter: M,
        use_name: bool,
    ) -> &mut Self
    where
        M: MultiConverter<T> + 'static,
        T: Into<Value> + 'static,
    {
        self.register(TermHandler::multi(field, backing, converter).use_name(use_name))
    }

    /// Skip terms on `field` silently
    pub fn ignore_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.ignored.insert(field.into());
        self
    }

    pub fn has_handler(&self, field: &str) -> bool {
        self.handlers.contains_key(field)
    }

    /// Compile an expression; an expression without constraints compiles to
    /// the backend's always-true predicate
    pub fn compile(&self, item: &ExpressionItem) -> Result<B::Predicate, MapperError> {
        tracing::debug!(
            backend = self.backend.name(),
            items = item.item_count(),
            "Compiling expression"
        );
        Ok(self
            .visit(item, 0)?
            .unwrap_or_else(|| self.backend.always_true()))
    }

    fn visit(&self, item: &ExpressionItem, depth: usize) -> Result<Option<B::Predicate>, MapperError> {
        if depth > self.max_depth {
            return Err(MapperError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        if !item.enabled() {
            return Ok(None);
        }

        let op = match item {
            ExpressionItem::Term(term) => return self.visit_term(term),
            ExpressionItem::Operator(op) => op,
        };

        let mut compiled = Vec::new();
        for child in op.enabled_children() {
            if let Some(predicate) = self.visit(child, depth + 1)? {
                compiled.push(predicate);
            }
        }

        if compiled.len() <= 1 {
            return Ok(compiled.pop().map(|only| match op.op {
                Op::Not => self.backend.not(only),
                Op::And | Op::Or => only,
            }));
        }

        Ok(Some(match op.op {
            Op::And => self.backend.and(compiled),
            Op::Or => self.backend.or(compiled),
            Op::Not => self.backend.not(self.backend.and(compiled)),
        }))
    }

    fn visit_term(&self, term: &ExpressionTerm) -> Result<Option<B::Predicate>, MapperError> {
        let Some(field) = term.field.as_deref().filter(|f| !f.is_empty()) else {
            return Err(MapperError::MissingField);
        };
        let Some(condition) = term.condition else {
            return Err(MapperError::MissingCondition {
                field: field.to_string(),
            });
        };

        if let Some(handler) = self.handlers.get(field) {
            tracing::trace!(field, condition = %condition, "Dispatching term to handler");
            return handler
                .apply(&self.backend, term, &self.collaborators)
                .map(Some);
        }
        if self.ignored.contains(field) {
            tracing::trace!(field, "Skipping ignored field");
            return Ok(None);
        }
        if let Some(delegate) = &self.delegate {
            tracing::trace!(field, condition = %condition, "Dispatching term to delegate");
            return delegate(term);
        }
        Err(MapperError::missing_handler(field))
    }
}

impl<B: PredicateBackend + fmt::Debug> fmt::Debug for ExpressionMapper<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&String> = self.handlers.keys().collect();
        fields.sort();
        f.debug_struct("ExpressionMapper")
            .field("backend", &self.backend)
            .field("handlers", &fields)
            .field("ignored", &self.ignored)
            .field("delegate", &self.delegate.is_some())
            .field("collaborators", &self.collaborators)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
