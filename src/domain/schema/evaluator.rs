use serde_json::{Map, Value};

use super::rules::{FieldKind, FieldSpec, Presence, Refinement, TextRule};
use crate::domain::errors::ValidationErrors;

/// A validated record: declared fields only, unknown keys dropped
pub type ValidatedRecord = Map<String, Value>;

/// Immutable description of one input shape
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl ValidationSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check `input` against every field and refinement.
    ///
    /// All violations are collected in one pass; nothing short-circuits on
    /// the first failure. Refinements only run once the fields they compare
    /// were present with the right type.
    pub fn validate(&self, input: &Value) -> Result<ValidatedRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let Some(record) = input.as_object() else {
            errors.push(
                "",
                format!("Expected object, received {}", json_type_name(input)),
            );
            return Err(errors);
        };

        let mut validated = Map::new();

        for spec in &self.fields {
            match record.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.presence == Presence::Required {
                        errors.push(spec.name, "Required");
                    }
                }
                Some(value) => {
                    if let Some(accepted) = check_field(spec, value, &mut errors) {
                        validated.insert(spec.name.to_string(), accepted);
                    }
                }
            }
        }

        for refinement in &self.refinements {
            apply_refinement(refinement, &validated, &mut errors);
        }

        errors.into_result().map(|_| validated)
    }
}

/// Returns the value to keep when its type is right, whether or not the
/// value-level rules passed.
fn check_field(spec: &FieldSpec, value: &Value, errors: &mut ValidationErrors) -> Option<Value> {
    match &spec.kind {
        FieldKind::Text(rules) => {
            let Some(text) = value.as_str() else {
                errors.push(spec.name, type_mismatch(&spec.kind, value));
                return None;
            };

            if !(text.is_empty() && spec.presence == Presence::OptionalOrEmpty) {
                for rule in rules {
                    if let Some(message) = check_text(rule, text) {
                        errors.push(spec.name, message);
                    }
                }
            }

            Some(value.clone())
        }
        FieldKind::Boolean { must_be_true } => {
            let Some(flag) = value.as_bool() else {
                errors.push(spec.name, type_mismatch(&spec.kind, value));
                return None;
            };

            if let Some(message) = must_be_true {
                if !flag {
                    errors.push(spec.name, *message);
                }
            }

            Some(value.clone())
        }
        FieldKind::Integer {
            min,
            min_message,
            max,
            max_message,
        } => {
            let Some(number) = as_integer(value) else {
                if value.is_number() {
                    errors.push(spec.name, "Expected integer, received float");
                } else {
                    errors.push(spec.name, type_mismatch(&spec.kind, value));
                }
                return None;
            };

            if number < *min {
                errors.push(spec.name, *min_message);
            }
            if number > *max {
                errors.push(spec.name, *max_message);
            }

            Some(Value::from(number))
        }
    }
}

fn check_text(rule: &TextRule, text: &str) -> Option<String> {
    match rule {
        TextRule::MinLength { min, message } => {
            (text.chars().count() < *min).then(|| message.to_string())
        }
        TextRule::MaxLength { max, message } => {
            (text.chars().count() > *max).then(|| message.to_string())
        }
        TextRule::Matches { pattern, message } => {
            (!pattern.is_match(text)).then(|| message.to_string())
        }
        TextRule::OneOf { allowed } => (!allowed.iter().any(|a| *a == text)).then(|| {
            let expected: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
            format!(
                "Invalid enum value. Expected {}, received '{}'",
                expected.join(" | "),
                text
            )
        }),
    }
}

fn apply_refinement(
    refinement: &Refinement,
    validated: &ValidatedRecord,
    errors: &mut ValidationErrors,
) {
    match refinement {
        Refinement::FieldsEqual {
            field,
            confirm,
            message,
        } => {
            if let (Some(a), Some(b)) = (validated.get(*field), validated.get(*confirm)) {
                if a != b {
                    errors.push(*confirm, *message);
                }
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn type_mismatch(kind: &FieldKind, value: &Value) -> String {
    format!("Expected {}, received {}", kind.label(), json_type_name(value))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
