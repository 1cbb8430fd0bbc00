//! Input shapes accepted by the site's forms

use once_cell::sync::Lazy;
use regex::Regex;

use super::evaluator::ValidationSchema;
use super::rules::{FieldSpec, Refinement, TextRule};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

static UPPERCASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]").expect("Invalid uppercase regex"));

static LOWERCASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]").expect("Invalid lowercase regex"));

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("Invalid digit regex"));

static SPECIAL_CHAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("Invalid special character regex"));

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("Invalid name regex"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s()-]{10,15}$").expect("Invalid phone regex"));

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Invalid UUID regex")
});

static CARD_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{16}$").expect("Invalid card number regex"));

static EXPIRY_MONTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])$").expect("Invalid expiry month regex"));

static EXPIRY_YEAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}$").expect("Invalid expiry year regex"));

static CVV_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid CVV regex"));

pub const PRICE_RANGES: &[&str] = &["all", "under10", "10to50", "over50"];
pub const SORT_ORDERS: &[&str] = &["endingSoon", "newest", "priceAsc", "priceDesc"];

pub const MAX_TICKETS_PER_PURCHASE: i64 = 100;

// Reusable field rules

fn email_field() -> FieldSpec {
    FieldSpec::text(
        "email",
        vec![
            TextRule::non_empty("Email is required"),
            TextRule::matches(&EMAIL_REGEX, "Please enter a valid email address"),
        ],
    )
}

fn password_rules() -> Vec<TextRule> {
    vec![
        TextRule::min_length(8, "Password must be at least 8 characters"),
        TextRule::matches(
            &UPPERCASE_REGEX,
            "Password must contain at least one uppercase letter",
        ),
        TextRule::matches(
            &LOWERCASE_REGEX,
            "Password must contain at least one lowercase letter",
        ),
        TextRule::matches(&DIGIT_REGEX, "Password must contain at least one number"),
        TextRule::matches(
            &SPECIAL_CHAR_REGEX,
            "Password must contain at least one special character",
        ),
    ]
}

fn name_field() -> FieldSpec {
    FieldSpec::text(
        "name",
        vec![
            TextRule::min_length(2, "Name must be at least 2 characters"),
            TextRule::max_length(50, "Name must be less than 50 characters"),
            TextRule::matches(
                &NAME_REGEX,
                "Name can only contain letters, spaces, hyphens and apostrophes",
            ),
        ],
    )
}

fn phone_field() -> FieldSpec {
    FieldSpec::text(
        "phone",
        vec![TextRule::matches(
            &PHONE_REGEX,
            "Please enter a valid phone number",
        )],
    )
    .optional_or_empty()
}

fn passwords_match() -> Refinement {
    Refinement::FieldsEqual {
        field: "password",
        confirm: "confirmPassword",
        message: "Passwords do not match",
    }
}

// Authentication

pub static SIGN_UP: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("sign_up")
        .field(email_field())
        .field(FieldSpec::text("password", password_rules()))
        .field(FieldSpec::text("confirmPassword", vec![]))
        .field(name_field())
        .field(phone_field())
        .field(FieldSpec::must_be_true(
            "ageVerification",
            "You must confirm you are 18 years or older",
        ))
        .refine(passwords_match())
});

pub static SIGN_IN: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("sign_in")
        .field(email_field())
        .field(FieldSpec::text(
            "password",
            vec![TextRule::non_empty("Password is required")],
        ))
});

pub static RESET_PASSWORD: Lazy<ValidationSchema> =
    Lazy::new(|| ValidationSchema::new("reset_password").field(email_field()));

pub static UPDATE_PASSWORD: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("update_password")
        .field(FieldSpec::text("password", password_rules()))
        .field(FieldSpec::text("confirmPassword", vec![]))
        .refine(passwords_match())
});

// Competitions

pub static TICKET_PURCHASE: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("ticket_purchase")
        .field(FieldSpec::text(
            "competitionId",
            vec![TextRule::matches(&UUID_REGEX, "Invalid competition ID")],
        ))
        .field(FieldSpec::integer(
            "quantity",
            (1, "Minimum 1 ticket"),
            (MAX_TICKETS_PER_PURCHASE, "Maximum 100 tickets"),
        ))
        .field(FieldSpec::text(
            "skillAnswer",
            vec![TextRule::non_empty("Skill answer is required")],
        ))
});

pub static COMPETITION_FILTER: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("competition_filter")
        .field(FieldSpec::text("category", vec![]).optional())
        .field(FieldSpec::text("priceRange", vec![TextRule::one_of(PRICE_RANGES)]).optional())
        .field(FieldSpec::text("sortBy", vec![TextRule::one_of(SORT_ORDERS)]).optional())
});

// Payments

pub static PAYMENT_DETAILS: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("payment_details")
        .field(FieldSpec::text(
            "cardNumber",
            vec![TextRule::matches(
                &CARD_NUMBER_REGEX,
                "Card number must be 16 digits",
            )],
        ))
        .field(FieldSpec::text(
            "cardholderName",
            vec![
                TextRule::min_length(2, "Cardholder name is required"),
                TextRule::max_length(50, "Cardholder name is too long"),
            ],
        ))
        .field(FieldSpec::text(
            "expiryMonth",
            vec![TextRule::matches(&EXPIRY_MONTH_REGEX, "Invalid expiry month")],
        ))
        .field(FieldSpec::text(
            "expiryYear",
            vec![TextRule::matches(&EXPIRY_YEAR_REGEX, "Invalid expiry year")],
        ))
        .field(FieldSpec::text(
            "cvv",
            vec![TextRule::matches(&CVV_REGEX, "CVV must be 3 or 4 digits")],
        ))
        .field(FieldSpec::boolean("saveCard").optional())
});

// Addresses

pub static ADDRESS: Lazy<ValidationSchema> = Lazy::new(|| {
    ValidationSchema::new("address")
        .field(FieldSpec::text(
            "line1",
            vec![TextRule::non_empty("Address line 1 is required")],
        ))
        .field(FieldSpec::text("line2", vec![]).optional())
        .field(FieldSpec::text(
            "city",
            vec![TextRule::non_empty("City is required")],
        ))
        .field(FieldSpec::text(
            "state",
            vec![TextRule::non_empty("State/County is required")],
        ))
        .field(FieldSpec::text(
            "postalCode",
            vec![TextRule::non_empty("Postal code is required")],
        ))
        .field(FieldSpec::text(
            "country",
            vec![TextRule::non_empty("Country is required")],
        ))
});
