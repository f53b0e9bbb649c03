//! Cognito-specific attribute types

use std::sync::LazyLock;

use carina_core::resource::Value;
use carina_core::schema::AttributeType;
use regex::Regex;

use crate::types::{AliasAttribute, MfaConfiguration, VerifiedAttribute};

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{S}\p{N}\p{P}]+@[\p{L}\p{M}\p{S}\p{N}\p{P}]+$")
        .expect("EMAIL_ADDRESS is a valid regex pattern")
});

static ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:[\w-]+:[a-zA-Z0-9-]+:([a-z]{2}-(gov-)?[a-z]+-\d)?:(\d{12})?:.+$")
        .expect("ARN is a valid regex pattern")
});

/// Placeholder the service replaces with the verification code
const CODE_PLACEHOLDER: &str = "{####}";

fn expect_string(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "Expected string".to_string())
}

/// Alias attribute (email, phone_number, preferred_username)
pub fn alias_attribute() -> AttributeType {
    AttributeType::Custom {
        name: "AliasAttribute".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| expect_string(value)?.parse::<AliasAttribute>().map(|_| ()),
    }
}

/// Auto-verified attribute (email, phone_number)
pub fn verified_attribute() -> AttributeType {
    AttributeType::Custom {
        name: "VerifiedAttribute".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| expect_string(value)?.parse::<VerifiedAttribute>().map(|_| ()),
    }
}

/// MFA mode (off, on, optional); wire form OFF/ON/OPTIONAL is accepted too
pub fn mfa_configuration() -> AttributeType {
    AttributeType::Custom {
        name: "MfaConfiguration".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| expect_string(value)?.parse::<MfaConfiguration>().map(|_| ()),
    }
}

/// Subject line of the verification email: 1-140 characters
pub fn email_verification_subject() -> AttributeType {
    AttributeType::Custom {
        name: "EmailVerificationSubject".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| check_length(expect_string(value)?, 1, 140),
    }
}

/// Body of the verification email: 6-20000 characters containing `{####}`
pub fn email_verification_message() -> AttributeType {
    AttributeType::Custom {
        name: "EmailVerificationMessage".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| check_code_message(expect_string(value)?, 20000),
    }
}

/// SMS authentication or verification message: 6-140 characters containing `{####}`
pub fn sms_message() -> AttributeType {
    AttributeType::Custom {
        name: "SmsMessage".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| check_code_message(expect_string(value)?, 140),
    }
}

/// Email address in `local@domain` form
pub fn email_address() -> AttributeType {
    AttributeType::Custom {
        name: "EmailAddress".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if EMAIL_ADDRESS.is_match(s) {
                Ok(())
            } else {
                Err(format!("Invalid email address '{}'", s))
            }
        },
    }
}

/// Amazon Resource Name
pub fn arn() -> AttributeType {
    AttributeType::Custom {
        name: "Arn".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if ARN.is_match(s) {
                Ok(())
            } else {
                Err(format!("Invalid ARN '{}'", s))
            }
        },
    }
}

fn check_length(s: &str, min: usize, max: usize) -> Result<(), String> {
    let len = s.chars().count();
    if len < min || len > max {
        return Err(format!(
            "must be between {} and {} characters, got {}",
            min, max, len
        ));
    }
    Ok(())
}

fn check_code_message(s: &str, max: usize) -> Result<(), String> {
    check_length(s, 6, max)?;
    if !s.contains(CODE_PLACEHOLDER) {
        return Err(format!("must contain the {} placeholder", CODE_PLACEHOLDER));
    }
    Ok(())
}
