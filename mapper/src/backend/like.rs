//! Backend-neutral wildcard patterns
//!
//! A [`LikePattern`] is a sequence of literal runs and "any characters"
//! gaps. Each backend renders it in its own syntax with the literals
//! escaped, so user input never acts as a metacharacter.

use crate::constants::WILDCARD;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeToken {
    Literal(String),
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    tokens: Vec<LikeToken>,
}

impl LikePattern {
    pub fn contains(value: &str) -> Self {
        Self::from_tokens(vec![
            LikeToken::Any,
            LikeToken::Literal(value.to_string()),
            LikeToken::Any,
        ])
    }

    pub fn starts_with(value: &str) -> Self {
        Self::from_tokens(vec![LikeToken::Literal(value.to_string()), LikeToken::Any])
    }

    pub fn ends_with(value: &str) -> Self {
        Self::from_tokens(vec![LikeToken::Any, LikeToken::Literal(value.to_string())])
    }

    pub fn exact(value: &str) -> Self {
        Self::from_tokens(vec![LikeToken::Literal(value.to_string())])
    }

    /// Pattern from user input where `*` matches any run of characters
    pub fn from_wildcard(value: &str) -> Self {
        let mut tokens = Vec::new();
        for (i, part) in value.split(WILDCARD).enumerate() {
            if i > 0 {
                tokens.push(LikeToken::Any);
            }
            if !part.is_empty() {
                tokens.push(LikeToken::Literal(part.to_string()));
            }
        }
        Self::from_tokens(tokens)
    }

    fn from_tokens(tokens: Vec<LikeToken>) -> Self {
        let mut normalized: Vec<LikeToken> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token {
                LikeToken::Literal(s) if s.is_empty() => {}
                LikeToken::Any if normalized.last() == Some(&LikeToken::Any) => {}
                token => normalized.push(token),
            }
        }
        Self { tokens: normalized }
    }

    pub fn tokens(&self) -> &[LikeToken] {
        &self.tokens
    }

    /// Copy with every literal lowercased
    pub fn lowercase(&self) -> Self {
        self.fold_case(str::to_lowercase)
    }

    /// Copy with `fold` applied to every literal
    pub fn fold_case(&self, fold: impl Fn(&str) -> String) -> Self {
        Self {
            tokens: self
                .tokens
                .iter()
                .map(|token| match token {
                    LikeToken::Literal(s) => LikeToken::Literal(fold(s)),
                    LikeToken::Any => LikeToken::Any,
                })
                .collect(),
        }
    }

    /// SQL LIKE pattern, for use with `ESCAPE '\'`
    pub fn to_like(&self) -> String {
        self.render(escape_like_pattern, "%")
    }

    /// SQLite GLOB pattern
    pub fn to_glob(&self) -> String {
        self.render(escape_glob_pattern, "*")
    }

    /// Anchored regular expression
    pub fn to_regex(&self) -> String {
        format!("(?s)^{}$", self.render(regex::escape, ".*"))
    }

    fn render(&self, escape: impl Fn(&str) -> String, any: &str) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                LikeToken::Literal(s) => escape(s),
                LikeToken::Any => any.to_string(),
            })
            .collect()
    }
}

/// Escape SQL LIKE metacharacters (%, _, \) in user input
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Escape GLOB metacharacters (*, ?, [) with bracket classes
pub fn escape_glob_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' => out.push_str("[*]"),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }
    out
}
