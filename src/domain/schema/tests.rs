//! Tests for the schema evaluator and the form schemas

mod sign_up_tests {
    use super::super::definitions::SIGN_UP;
    use serde_json::json;

    fn valid_sign_up() -> serde_json::Value {
        json!({
            "email": "test@example.com",
            "password": "Password123!",
            "confirmPassword": "Password123!",
            "name": "John Doe",
            "phone": "+1234567890",
            "ageVerification": true
        })
    }

    #[test]
    fn test_valid_sign_up() {
        let validated = SIGN_UP.validate(&valid_sign_up()).unwrap();
        assert_eq!(validated["name"], "John Doe");
        assert_eq!(validated["ageVerification"], true);
    }

    #[test]
    fn test_invalid_sign_up_collects_every_violation() {
        let invalid = json!({
            "email": "not-an-email",
            "password": "weak",
            "confirmPassword": "different",
            "name": "J",
            "phone": "not-a-phone",
            "ageVerification": false
        });

        let errors = SIGN_UP.validate(&invalid).unwrap_err();

        assert!(errors.has_path("email"));
        assert!(errors.has_path("name"));
        assert!(errors.has_path("phone"));
        assert!(errors.has_path("ageVerification"));
        assert!(errors.has_path("confirmPassword"));
        // weak: too short, no uppercase, no digit, no special character
        assert_eq!(errors.messages_for("password").len(), 4);
    }

    #[test]
    fn test_password_mismatch_is_reported_on_confirm_field() {
        let mut data = valid_sign_up();
        data["confirmPassword"] = json!("Password123?");

        let errors = SIGN_UP.validate(&data).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.messages_for("confirmPassword"),
            vec!["Passwords do not match"]
        );
    }

    #[test]
    fn test_markup_in_name_is_rejected_by_pattern() {
        let mut data = valid_sign_up();
        data["name"] = json!("<b>John</b>");

        let errors = SIGN_UP.validate(&data).unwrap_err();

        assert_eq!(
            errors.messages_for("name"),
            vec!["Name can only contain letters, spaces, hyphens and apostrophes"]
        );
    }

    #[test]
    fn test_name_length_bounds() {
        let mut data = valid_sign_up();

        data["name"] = json!("Jo");
        assert!(SIGN_UP.validate(&data).is_ok());

        data["name"] = json!("a".repeat(50));
        assert!(SIGN_UP.validate(&data).is_ok());

        data["name"] = json!("a".repeat(51));
        assert!(SIGN_UP.validate(&data).is_err());

        data["name"] = json!("O'Brien-Smith");
        assert!(SIGN_UP.validate(&data).is_ok());
    }

    #[test]
    fn test_phone_may_be_empty_or_absent() {
        let mut data = valid_sign_up();

        data["phone"] = json!("");
        assert_eq!(SIGN_UP.validate(&data).unwrap()["phone"], "");

        data.as_object_mut().unwrap().remove("phone");
        assert!(!SIGN_UP.validate(&data).unwrap().contains_key("phone"));

        data["phone"] = json!("(020) 7946-0958");
        assert!(SIGN_UP.validate(&data).is_ok());

        data["phone"] = json!("12345");
        assert!(SIGN_UP.validate(&data).is_err());
    }

    #[test]
    fn test_age_verification_must_be_true_boolean() {
        let mut data = valid_sign_up();

        data["ageVerification"] = json!(false);
        let errors = SIGN_UP.validate(&data).unwrap_err();
        assert_eq!(
            errors.messages_for("ageVerification"),
            vec!["You must confirm you are 18 years or older"]
        );

        data["ageVerification"] = json!("true");
        let errors = SIGN_UP.validate(&data).unwrap_err();
        assert_eq!(
            errors.messages_for("ageVerification"),
            vec!["Expected boolean, received string"]
        );
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut data = valid_sign_up();
        data["isAdmin"] = json!(true);

        let validated = SIGN_UP.validate(&data).unwrap();
        assert!(!validated.contains_key("isAdmin"));
        assert_eq!(validated.len(), 6);
    }
}

mod sign_in_tests {
    use super::super::definitions::{RESET_PASSWORD, SIGN_IN, UPDATE_PASSWORD};
    use serde_json::json;

    #[test]
    fn test_valid_sign_in() {
        let data = json!({"email": "test@example.com", "password": "Password123!"});
        assert!(SIGN_IN.validate(&data).is_ok());
    }

    #[test]
    fn test_sign_in_only_requires_non_empty_password() {
        let data = json!({"email": "test@example.com", "password": "x"});
        assert!(SIGN_IN.validate(&data).is_ok());

        let data = json!({"email": "test@example.com", "password": ""});
        let errors = SIGN_IN.validate(&data).unwrap_err();
        assert_eq!(errors.messages_for("password"), vec!["Password is required"]);
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = SIGN_IN.validate(&json!({})).unwrap_err();
        assert_eq!(errors.messages_for("email"), vec!["Required"]);
        assert_eq!(errors.messages_for("password"), vec!["Required"]);

        let errors = SIGN_IN
            .validate(&json!({"email": null, "password": "x"}))
            .unwrap_err();
        assert_eq!(errors.messages_for("email"), vec!["Required"]);
    }

    #[test]
    fn test_empty_email_reports_required_first() {
        let errors = RESET_PASSWORD
            .validate(&json!({"email": ""}))
            .unwrap_err();
        assert_eq!(
            errors.messages_for("email"),
            vec!["Email is required", "Please enter a valid email address"]
        );
    }

    #[test]
    fn test_update_password_refinement() {
        let ok = json!({"password": "Password123!", "confirmPassword": "Password123!"});
        assert!(UPDATE_PASSWORD.validate(&ok).is_ok());

        let mismatch = json!({"password": "Password123!", "confirmPassword": "nope"});
        let errors = UPDATE_PASSWORD.validate(&mismatch).unwrap_err();
        assert!(errors.has_path("confirmPassword"));
    }

    #[test]
    fn test_refinement_skipped_when_field_has_wrong_type() {
        let data = json!({"password": "Password123!", "confirmPassword": 5});
        let errors = UPDATE_PASSWORD.validate(&data).unwrap_err();

        assert_eq!(
            errors.messages_for("confirmPassword"),
            vec!["Expected string, received number"]
        );
    }
}

mod competition_tests {
    use super::super::definitions::{COMPETITION_FILTER, TICKET_PURCHASE};
    use serde_json::json;

    fn purchase(quantity: serde_json::Value) -> serde_json::Value {
        json!({
            "competitionId": "123e4567-e89b-12d3-a456-426614174000",
            "quantity": quantity,
            "skillAnswer": "42"
        })
    }

    #[test]
    fn test_valid_ticket_purchase() {
        let validated = TICKET_PURCHASE.validate(&purchase(json!(5))).unwrap();
        assert_eq!(validated["quantity"], 5);
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(TICKET_PURCHASE.validate(&purchase(json!(1))).is_ok());
        assert!(TICKET_PURCHASE.validate(&purchase(json!(100))).is_ok());

        let errors = TICKET_PURCHASE.validate(&purchase(json!(101))).unwrap_err();
        assert_eq!(errors.messages_for("quantity"), vec!["Maximum 100 tickets"]);

        let errors = TICKET_PURCHASE.validate(&purchase(json!(0))).unwrap_err();
        assert_eq!(errors.messages_for("quantity"), vec!["Minimum 1 ticket"]);
    }

    #[test]
    fn test_quantity_must_be_integer() {
        let errors = TICKET_PURCHASE
            .validate(&purchase(json!(2.5)))
            .unwrap_err();
        assert_eq!(
            errors.messages_for("quantity"),
            vec!["Expected integer, received float"]
        );

        let errors = TICKET_PURCHASE
            .validate(&purchase(json!("5")))
            .unwrap_err();
        assert_eq!(
            errors.messages_for("quantity"),
            vec!["Expected number, received string"]
        );

        // Integral floats are accepted and normalized
        let validated = TICKET_PURCHASE.validate(&purchase(json!(3.0))).unwrap();
        assert_eq!(validated["quantity"], 3);
    }

    #[test]
    fn test_invalid_ticket_purchase() {
        let invalid = json!({
            "competitionId": "not-a-uuid",
            "quantity": 101,
            "skillAnswer": ""
        });

        let errors = TICKET_PURCHASE.validate(&invalid).unwrap_err();
        assert_eq!(
            errors.messages_for("competitionId"),
            vec!["Invalid competition ID"]
        );
        assert!(errors.has_path("quantity"));
        assert_eq!(
            errors.messages_for("skillAnswer"),
            vec!["Skill answer is required"]
        );
    }

    #[test]
    fn test_competition_id_requires_hyphenated_uuid() {
        let mut data = purchase(json!(1));
        data["competitionId"] = json!("123e4567e89b12d3a456426614174000");
        assert!(TICKET_PURCHASE.validate(&data).is_err());

        data["competitionId"] = json!("123E4567-E89B-12D3-A456-426614174000");
        assert!(TICKET_PURCHASE.validate(&data).is_ok());
    }

    #[test]
    fn test_competition_filter() {
        assert!(COMPETITION_FILTER.validate(&json!({})).is_ok());
        assert!(COMPETITION_FILTER
            .validate(&json!({"category": "cars", "priceRange": "under10", "sortBy": "newest"}))
            .is_ok());

        let errors = COMPETITION_FILTER
            .validate(&json!({"priceRange": "free"}))
            .unwrap_err();
        assert_eq!(
            errors.messages_for("priceRange"),
            vec!["Invalid enum value. Expected 'all' | 'under10' | '10to50' | 'over50', received 'free'"]
        );
    }
}

mod payment_and_address_tests {
    use super::super::definitions::{ADDRESS, PAYMENT_DETAILS};
    use serde_json::json;

    fn valid_card() -> serde_json::Value {
        json!({
            "cardNumber": "4242424242424242",
            "cardholderName": "Jane Doe",
            "expiryMonth": "09",
            "expiryYear": "29",
            "cvv": "123"
        })
    }

    #[test]
    fn test_valid_payment_details() {
        assert!(PAYMENT_DETAILS.validate(&valid_card()).is_ok());

        let mut with_flag = valid_card();
        with_flag["saveCard"] = json!(true);
        assert!(PAYMENT_DETAILS.validate(&with_flag).is_ok());
    }

    #[test]
    fn test_payment_field_formats() {
        let cases = [
            ("cardNumber", json!("4242 4242 4242 4242"), "Card number must be 16 digits"),
            ("expiryMonth", json!("13"), "Invalid expiry month"),
            ("expiryMonth", json!("00"), "Invalid expiry month"),
            ("expiryYear", json!("2029"), "Invalid expiry year"),
            ("cvv", json!("12"), "CVV must be 3 or 4 digits"),
            ("cardholderName", json!("J"), "Cardholder name is required"),
        ];

        for (field, value, message) in cases {
            let mut data = valid_card();
            data[field] = value;
            let errors = PAYMENT_DETAILS.validate(&data).unwrap_err();
            assert_eq!(errors.messages_for(field), vec![message], "field {}", field);
        }

        let mut four_digit_cvv = valid_card();
        four_digit_cvv["cvv"] = json!("1234");
        assert!(PAYMENT_DETAILS.validate(&four_digit_cvv).is_ok());
    }

    #[test]
    fn test_address() {
        let address = json!({
            "line1": "1 High Street",
            "city": "London",
            "state": "Greater London",
            "postalCode": "SW1A 1AA",
            "country": "UK"
        });
        assert!(ADDRESS.validate(&address).is_ok());

        let errors = ADDRESS
            .validate(&json!({"line1": "", "city": "", "state": "", "postalCode": "", "country": ""}))
            .unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(!errors.has_path("line2"));
    }
}

mod evaluator_tests {
    use super::super::definitions::SIGN_IN;
    use super::super::evaluator::ValidationSchema;
    use super::super::rules::{FieldSpec, TextRule};
    use serde_json::json;

    #[test]
    fn test_non_object_input() {
        let errors = SIGN_IN.validate(&json!("email=a@b.com")).unwrap_err();
        assert_eq!(
            errors.messages_for(""),
            vec!["Expected object, received string"]
        );
    }

    #[test]
    fn test_custom_schema() {
        let schema = ValidationSchema::new("nickname")
            .field(FieldSpec::text("nick", vec![TextRule::max_length(3, "Too long")]));

        assert_eq!(schema.name(), "nickname");
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.validate(&json!({"nick": "abc"})).is_ok());
        assert!(schema.validate(&json!({"nick": "abcd"})).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let schema = ValidationSchema::new("nickname")
            .field(FieldSpec::text("nick", vec![TextRule::max_length(3, "Too long")]));

        assert!(schema.validate(&json!({"nick": "ééé"})).is_ok());
    }
}
