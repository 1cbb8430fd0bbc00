//! Field-rule records
//!
//! A schema is a flat list of [`FieldSpec`]s plus optional cross-field
//! [`Refinement`]s. Rules are plain data; all behavior lives in the
//! evaluator.

use once_cell::sync::Lazy;
use regex::Regex;

/// A compiled pattern owned by a `static`
pub type Pattern = &'static Lazy<Regex>;

/// Whether a field may be absent from the input record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing or `null` is reported as "Required"
    Required,
    /// Missing or `null` is skipped and left out of the output
    Optional,
    /// Like `Optional`, and an empty string also bypasses the text rules
    OptionalOrEmpty,
}

/// Constraint applied to a string value
#[derive(Debug, Clone)]
pub enum TextRule {
    MinLength { min: usize, message: &'static str },
    MaxLength { max: usize, message: &'static str },
    Matches { pattern: Pattern, message: &'static str },
    OneOf { allowed: &'static [&'static str] },
}

impl TextRule {
    pub fn min_length(min: usize, message: &'static str) -> Self {
        Self::MinLength { min, message }
    }

    pub fn max_length(max: usize, message: &'static str) -> Self {
        Self::MaxLength { max, message }
    }

    /// Shorthand for `min_length(1, ..)`
    pub fn non_empty(message: &'static str) -> Self {
        Self::MinLength { min: 1, message }
    }

    pub fn matches(pattern: Pattern, message: &'static str) -> Self {
        Self::Matches { pattern, message }
    }

    pub fn one_of(allowed: &'static [&'static str]) -> Self {
        Self::OneOf { allowed }
    }
}

/// Expected JSON type of a field and the constraints for that type
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(Vec<TextRule>),
    Boolean {
        /// When set, `false` is rejected with this message
        must_be_true: Option<&'static str>,
    },
    Integer {
        min: i64,
        min_message: &'static str,
        max: i64,
        max_message: &'static str,
    },
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "string",
            FieldKind::Boolean { .. } => "boolean",
            FieldKind::Integer { .. } => "number",
        }
    }
}

/// One declared field of a schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub presence: Presence,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: &'static str, rules: Vec<TextRule>) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind: FieldKind::Text(rules),
        }
    }

    pub fn boolean(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind: FieldKind::Boolean { must_be_true: None },
        }
    }

    pub fn must_be_true(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind: FieldKind::Boolean {
                must_be_true: Some(message),
            },
        }
    }

    pub fn integer(
        name: &'static str,
        (min, min_message): (i64, &'static str),
        (max, max_message): (i64, &'static str),
    ) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind: FieldKind::Integer {
                min,
                min_message,
                max,
                max_message,
            },
        }
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn optional_or_empty(mut self) -> Self {
        self.presence = Presence::OptionalOrEmpty;
        self
    }
}

/// Cross-field constraint evaluated after the per-field pass
#[derive(Debug, Clone)]
pub enum Refinement {
    /// `confirm` must equal `field`; the violation is reported on `confirm`
    FieldsEqual {
        field: &'static str,
        confirm: &'static str,
        message: &'static str,
    },
}
