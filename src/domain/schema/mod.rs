//! Declarative input schemas
//!
//! - rules.rs: typed field-rule records
//! - evaluator.rs: `ValidationSchema` and the generic evaluator
//! - definitions.rs: the concrete form schemas

pub mod definitions;
pub mod evaluator;
pub mod rules;

#[cfg(test)]
mod tests;

pub use definitions::{
    ADDRESS, COMPETITION_FILTER, PAYMENT_DETAILS, RESET_PASSWORD, SIGN_IN, SIGN_UP,
    TICKET_PURCHASE, UPDATE_PASSWORD,
};
pub use evaluator::{ValidatedRecord, ValidationSchema};
pub use rules::{FieldKind, FieldSpec, Presence, Refinement, TextRule};
