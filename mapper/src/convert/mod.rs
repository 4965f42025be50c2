//! Value converters
//!
//! A [`Converter`] maps one raw text value to at most one typed value. A
//! [`MultiConverter`] maps a batch of raw values to any number of typed
//! values, either by applying a converter to each input ([`each`]) or by a
//! batched lookup of its own.
//!
//! Converters never fail: input that does not resolve is dropped, and the
//! term handler decides what a short result means.

mod date;
mod standard;

use std::marker::PhantomData;

pub use date::{DateConverter, parse_date_expression, parse_timestamp};
pub use standard::{
    BooleanConverter, FloatConverter, IntegerConverter, LowercaseConverter, TextConverter,
};

use crate::value::Value;

/// One-to-one conversion of a raw text value
pub trait Converter<T>: Send + Sync {
    fn convert(&self, value: &str) -> Option<T>;
}

impl<T, F> Converter<T> for F
where
    F: Fn(&str) -> Option<T> + Send + Sync,
{
    fn convert(&self, value: &str) -> Option<T> {
        self(value)
    }
}

/// Many-to-many conversion of raw text values
pub trait MultiConverter<T>: Send + Sync {
    fn convert_all(&self, values: &[String]) -> Vec<T>;
}

/// Multi-value converter that applies `C` to each input independently
#[derive(Debug, Clone)]
pub struct Each<C> {
    converter: C,
}

/// Lift a single-value converter to a multi-value one
pub fn each<C>(converter: C) -> Each<C> {
    Each { converter }
}

impl<T, C> MultiConverter<T> for Each<C>
where
    C: Converter<T>,
{
    fn convert_all(&self, values: &[String]) -> Vec<T> {
        values
            .iter()
            .filter_map(|value| self.converter.convert(value))
            .collect()
    }
}

/// Multi-value converter backed by a function over the whole batch
pub struct Batch<F> {
    lookup: F,
}

/// Wrap a batched lookup as a multi-value converter
pub fn batch<F>(lookup: F) -> Batch<F> {
    Batch { lookup }
}

impl<T, F> MultiConverter<T> for Batch<F>
where
    F: Fn(&[String]) -> Vec<T> + Send + Sync,
{
    fn convert_all(&self, values: &[String]) -> Vec<T> {
        (self.lookup)(values)
    }
}

/// Erases the output type of a multi-value converter into [`Value`]
pub(crate) struct IntoValues<M, T> {
    inner: M,
    _output: PhantomData<fn() -> T>,
}

impl<M, T> IntoValues<M, T> {
    pub(crate) fn new(inner: M) -> Self {
        Self {
            inner,
            _output: PhantomData,
        }
    }
}

impl<M, T> MultiConverter<Value> for IntoValues<M, T>
where
    M: MultiConverter<T>,
    T: Into<Value>,
{
    fn convert_all(&self, values: &[String]) -> Vec<Value> {
        self.inner
            .convert_all(values)
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

/// Split a comma-separated term value, trimming tokens and dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(crate::constants::LIST_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
