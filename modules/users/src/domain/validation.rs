//! User input schema and the field-error formatter used by the REST layer.
//!
//! Input arrives as loosely-typed JSON (or form fields), so presence and type are
//! checked here before the `validator` rules run on the typed candidate.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::contract::model::NewUser;

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const EMAIL_INVALID: &str = "Email must be valid";

/// Code used for absent (or `null`) fields.
pub const REQUIRED: &str = "required";

/// Key validator uses for schema-level (non-field) errors.
const SCHEMA_LEVEL_KEY: &str = "__all__";

#[derive(Debug, Clone, Validate)]
struct UserInput {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    name: String,
    #[validate(email(message = "Email must be valid"))]
    email: String,
}

enum RawField {
    Missing,
    WrongType,
    Text(String),
}

fn read_field(input: &Value, key: &str) -> RawField {
    match input.get(key) {
        None | Some(Value::Null) => RawField::Missing,
        Some(Value::String(s)) => RawField::Text(s.clone()),
        Some(_) => RawField::WrongType,
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validate an arbitrary input value against the user schema.
///
/// Every field is checked; the returned `ValidationErrors` lists all failing
/// fields, not just the first one.
pub fn validate_user(input: &Value) -> Result<NewUser, ValidationErrors> {
    let name = read_field(input, "name");
    let email = read_field(input, "email");

    let candidate = UserInput {
        name: match &name {
            RawField::Text(s) => s.clone(),
            _ => String::new(),
        },
        email: match &email {
            RawField::Text(s) => s.clone(),
            _ => String::new(),
        },
    };
    let rule_errors = candidate.validate().err().unwrap_or_else(ValidationErrors::new);

    let mut errors = ValidationErrors::new();
    for (key, raw, type_error) in [
        ("name", &name, error_with_message("length", NAME_TOO_SHORT)),
        ("email", &email, error_with_message("email", EMAIL_INVALID)),
    ] {
        match raw {
            RawField::Missing => errors.add(key, ValidationError::new(REQUIRED)),
            RawField::WrongType => errors.add(key, type_error),
            RawField::Text(_) => {
                if let Some(found) = rule_errors.field_errors().get(key) {
                    for err in found.iter() {
                        errors.add(key, err.clone());
                    }
                }
            }
        }
    }

    if errors.errors().is_empty() {
        Ok(NewUser {
            name: candidate.name,
            email: candidate.email,
        })
    } else {
        Err(errors)
    }
}

/// Flatten validation failures into `field -> message`.
///
/// Messages of one field are joined with `", "`. A bare "required" becomes a
/// field-specific sentence. Schema-level errors are dropped.
pub fn format_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter(|(field, errs)| *field != SCHEMA_LEVEL_KEY && !errs.is_empty())
        .map(|(field, errs)| {
            let field = field.to_string();
            let joined = errs
                .iter()
                .map(|e| e.message.as_deref().unwrap_or(&e.code))
                .collect::<Vec<_>>()
                .join(", ");

            let message = if joined.trim().to_lowercase() == REQUIRED {
                format!("The {field} field is required")
            } else {
                joined
            };
            (field, message)
        })
        .collect()
}
