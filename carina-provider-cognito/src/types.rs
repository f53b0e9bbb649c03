//! Typed user pool model
//!
//! Converts between the engine's loosely typed attribute map and the
//! structures the handler and client work with.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use carina_core::resource::Value;
use serde::{Serialize, Serializer};

use crate::error::{UserPoolError, UserPoolResult};
use crate::utils::enum_variant;

/// DSL resource type handled by this provider
pub const RESOURCE_TYPE: &str = "cognito.user_pool";

macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $type_name:expr, {
            $($variant:ident => ($dsl:expr, $wire:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All accepted values
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value as written in configuration
            pub fn as_dsl(self) -> &'static str {
                match self {
                    $($name::$variant => $dsl),+
                }
            }

            /// Value as sent to the identity service
            pub fn as_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let variant = enum_variant(s);
                $(
                    if variant.eq_ignore_ascii_case($dsl) || variant == $wire {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(
                    "Invalid {} '{}', expected one of: {}",
                    $type_name,
                    s,
                    [$($dsl),+].join(", ")
                ))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_dsl())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire())
            }
        }
    };
}

define_enum!(
    /// Alternate sign-in identifier. Fixed at pool creation.
    AliasAttribute, "AliasAttribute", {
        Email => ("email", "email"),
        PhoneNumber => ("phone_number", "phone_number"),
        PreferredUsername => ("preferred_username", "preferred_username"),
    }
);

define_enum!(
    /// Attribute the service verifies with a confirmation code
    VerifiedAttribute, "VerifiedAttribute", {
        Email => ("email", "email"),
        PhoneNumber => ("phone_number", "phone_number"),
    }
);

define_enum!(
    /// Pool-wide multi-factor authentication mode
    MfaConfiguration, "MfaConfiguration", {
        Off => ("off", "OFF"),
        On => ("on", "ON"),
        Optional => ("optional", "OPTIONAL"),
    }
);

impl Default for MfaConfiguration {
    fn default() -> Self {
        MfaConfiguration::Off
    }
}

/// Email delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_arn: Option<String>,
}

impl EmailConfiguration {
    /// True when no setting carries a value
    pub fn is_empty(&self) -> bool {
        self.reply_to_email_address.as_deref().is_none_or(str::is_empty)
            && self.source_arn.as_deref().is_none_or(str::is_empty)
    }
}

/// SMS delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmsConfiguration {
    pub sns_caller_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Desired configuration of a user pool
///
/// Empty lists, empty maps and `None` all mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPoolConfig {
    pub name: String,
    pub alias_attributes: Vec<AliasAttribute>,
    pub auto_verified_attributes: Vec<VerifiedAttribute>,
    pub email_configuration: Option<EmailConfiguration>,
    pub email_verification_subject: Option<String>,
    pub email_verification_message: Option<String>,
    pub mfa_configuration: MfaConfiguration,
    pub sms_authentication_message: Option<String>,
    pub sms_configuration: Option<SmsConfiguration>,
    pub sms_verification_message: Option<String>,
    pub tags: BTreeMap<String, String>,
}

/// Remote user pool as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolRecord {
    /// Server-assigned identifier, e.g. `us-east-1_ABC123`
    pub id: String,
    pub pool: UserPoolConfig,
}

impl UserPoolConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a typed config from DSL attributes
    ///
    /// Enum values are checked here. A block written as an empty list, as a
    /// list whose element is not a map, or an email block with no settings
    /// fails with [`UserPoolError::ConfigurationShape`].
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> UserPoolResult<Self> {
        let mut config = UserPoolConfig {
            name: optional_string(attributes, "name")?.unwrap_or_default(),
            alias_attributes: enum_list(attributes, "alias_attributes")?,
            auto_verified_attributes: enum_list(attributes, "auto_verified_attributes")?,
            email_verification_subject: optional_string(attributes, "email_verification_subject")?,
            email_verification_message: optional_string(attributes, "email_verification_message")?,
            sms_authentication_message: optional_string(attributes, "sms_authentication_message")?,
            sms_verification_message: optional_string(attributes, "sms_verification_message")?,
            ..Default::default()
        };

        if let Some(mfa) = optional_string(attributes, "mfa_configuration")? {
            config.mfa_configuration = mfa
                .parse()
                .map_err(|e| UserPoolError::invalid("mfa_configuration", e))?;
        }

        if let Some(block) = nested_block(attributes, "email_configuration")? {
            let email = EmailConfiguration {
                reply_to_email_address: optional_string(block, "reply_to_email_address")?,
                source_arn: optional_string(block, "source_arn")?,
            };
            if email.is_empty() {
                return Err(UserPoolError::shape("email_configuration", "block is empty"));
            }
            config.email_configuration = Some(email);
        }

        if let Some(block) = nested_block(attributes, "sms_configuration")? {
            let sns_caller_arn = optional_string(block, "sns_caller_arn")?.ok_or_else(|| {
                UserPoolError::shape("sms_configuration", "sns_caller_arn is required")
            })?;
            config.sms_configuration = Some(SmsConfiguration {
                sns_caller_arn,
                external_id: optional_string(block, "external_id")?,
            });
        }

        match attributes.get("tags") {
            None => {}
            Some(Value::Map(map)) => {
                for (key, value) in map {
                    let value = value.as_str().ok_or_else(|| {
                        UserPoolError::invalid("tags", format!("value for '{}' must be a string", key))
                    })?;
                    config.tags.insert(key.clone(), value.to_string());
                }
            }
            Some(_) => return Err(UserPoolError::invalid("tags", "expected a map")),
        }

        Ok(config)
    }

    /// Canonical DSL attributes for this config
    ///
    /// Unset fields are left out rather than written as empty values.
    pub fn to_attributes(&self) -> HashMap<String, Value> {
        let mut attributes = HashMap::new();

        if !self.name.is_empty() {
            attributes.insert("name".to_string(), Value::String(self.name.clone()));
        }
        if !self.alias_attributes.is_empty() {
            attributes.insert(
                "alias_attributes".to_string(),
                dsl_list(self.alias_attributes.iter().map(|a| a.as_dsl())),
            );
        }
        if !self.auto_verified_attributes.is_empty() {
            attributes.insert(
                "auto_verified_attributes".to_string(),
                dsl_list(self.auto_verified_attributes.iter().map(|a| a.as_dsl())),
            );
        }
        if let Some(email) = &self.email_configuration {
            let mut block = HashMap::new();
            insert_string(&mut block, "reply_to_email_address", &email.reply_to_email_address);
            insert_string(&mut block, "source_arn", &email.source_arn);
            attributes.insert("email_configuration".to_string(), Value::Map(block));
        }
        insert_string(&mut attributes, "email_verification_subject", &self.email_verification_subject);
        insert_string(&mut attributes, "email_verification_message", &self.email_verification_message);
        attributes.insert(
            "mfa_configuration".to_string(),
            Value::String(self.mfa_configuration.as_dsl().to_string()),
        );
        insert_string(&mut attributes, "sms_authentication_message", &self.sms_authentication_message);
        if let Some(sms) = &self.sms_configuration {
            let mut block = HashMap::new();
            block.insert(
                "sns_caller_arn".to_string(),
                Value::String(sms.sns_caller_arn.clone()),
            );
            insert_string(&mut block, "external_id", &sms.external_id);
            attributes.insert("sms_configuration".to_string(), Value::Map(block));
        }
        insert_string(&mut attributes, "sms_verification_message", &self.sms_verification_message);
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            attributes.insert("tags".to_string(), Value::Map(tags));
        }

        attributes
    }
}

/// Read a string attribute; an empty string counts as unset
fn optional_string(attributes: &HashMap<String, Value>, key: &str) -> UserPoolResult<Option<String>> {
    match attributes.get(key) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(UserPoolError::invalid(key, "expected a string")),
    }
}

fn enum_list<T>(attributes: &HashMap<String, Value>, key: &str) -> UserPoolResult<Vec<T>>
where
    T: FromStr<Err = String>,
{
    match attributes.get(key) {
        None => Ok(Vec::new()),
        Some(Value::List(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.parse().map_err(|e| UserPoolError::invalid(key, e)),
                _ => Err(UserPoolError::invalid(key, "list items must be strings")),
            })
            .collect(),
        Some(_) => Err(UserPoolError::invalid(key, "expected a list")),
    }
}

/// Resolve a single nested block written as a map or as `[map]`
fn nested_block<'a>(
    attributes: &'a HashMap<String, Value>,
    key: &'static str,
) -> UserPoolResult<Option<&'a HashMap<String, Value>>> {
    match attributes.get(key) {
        None => Ok(None),
        Some(Value::Map(map)) => Ok(Some(map)),
        Some(Value::List(items)) => match items.first() {
            Some(Value::Map(map)) if items.len() == 1 => Ok(Some(map)),
            Some(Value::Map(_)) => Err(UserPoolError::shape(
                key,
                format!("at most one block allowed, got {}", items.len()),
            )),
            Some(_) => Err(UserPoolError::shape(key, "block element is not a map")),
            None => Err(UserPoolError::shape(key, "block list is empty")),
        },
        Some(_) => Err(UserPoolError::shape(key, "expected a block")),
    }
}

fn dsl_list<'a>(values: impl Iterator<Item = &'a str>) -> Value {
    Value::List(values.map(|v| Value::String(v.to_string())).collect())
}

fn insert_string(target: &mut HashMap<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        target.insert(key.to_string(), Value::String(v.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn attrs(pairs: Vec<(&str, Value)>) -> HashMap<String, Value> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn enums_accept_dsl_namespaced_and_wire_forms() {
        assert_eq!("off".parse::<MfaConfiguration>(), Ok(MfaConfiguration::Off));
        assert_eq!("OPTIONAL".parse::<MfaConfiguration>(), Ok(MfaConfiguration::Optional));
        assert_eq!(
            "cognito.user_pool.MfaConfiguration.on".parse::<MfaConfiguration>(),
            Ok(MfaConfiguration::On)
        );
        assert_eq!(
            "AliasAttribute.preferred_username".parse::<AliasAttribute>(),
            Ok(AliasAttribute::PreferredUsername)
        );
        assert!("preferred_username".parse::<VerifiedAttribute>().is_err());
    }

    #[test]
    fn enum_error_lists_accepted_values() {
        let err = "required".parse::<MfaConfiguration>().unwrap_err();
        assert!(err.contains("off, on, optional"));
    }

    #[test]
    fn mfa_defaults_to_off() {
        let config = UserPoolConfig::from_attributes(&attrs(vec![("name", s("pool1"))])).unwrap();
        assert_eq!(config.mfa_configuration, MfaConfiguration::Off);
        assert_eq!(config.to_attributes().get("mfa_configuration"), Some(&s("off")));
    }

    #[test]
    fn parses_full_configuration() {
        let mut email = HashMap::new();
        email.insert("reply_to_email_address".to_string(), s("noreply@example.com"));
        email.insert("source_arn".to_string(), s(""));
        let mut sms = HashMap::new();
        sms.insert("sns_caller_arn".to_string(), s("arn:aws:iam::123456789012:role/sms"));
        let mut tags = HashMap::new();
        tags.insert("env".to_string(), s("prod"));

        let config = UserPoolConfig::from_attributes(&attrs(vec![
            ("name", s("pool1")),
            ("alias_attributes", Value::List(vec![s("email"), s("phone_number")])),
            ("auto_verified_attributes", Value::List(vec![s("email")])),
            ("email_configuration", Value::List(vec![Value::Map(email)])),
            ("sms_configuration", Value::Map(sms)),
            ("mfa_configuration", s("MfaConfiguration.optional")),
            ("tags", Value::Map(tags)),
        ]))
        .unwrap();

        assert_eq!(
            config.alias_attributes,
            vec![AliasAttribute::Email, AliasAttribute::PhoneNumber]
        );
        assert_eq!(config.auto_verified_attributes, vec![VerifiedAttribute::Email]);
        assert_eq!(
            config.email_configuration,
            Some(EmailConfiguration {
                reply_to_email_address: Some("noreply@example.com".to_string()),
                source_arn: None,
            })
        );
        assert_eq!(
            config.sms_configuration.as_ref().map(|s| s.sns_caller_arn.as_str()),
            Some("arn:aws:iam::123456789012:role/sms")
        );
        assert_eq!(config.mfa_configuration, MfaConfiguration::Optional);
        assert_eq!(config.tags.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn empty_block_list_is_a_shape_error() {
        let err = UserPoolConfig::from_attributes(&attrs(vec![
            ("name", s("pool1")),
            ("email_configuration", Value::List(vec![])),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            UserPoolError::ConfigurationShape {
                block: "email_configuration",
                ..
            }
        ));
    }

    #[test]
    fn email_block_without_settings_is_a_shape_error() {
        let mut blank = HashMap::new();
        blank.insert("reply_to_email_address".to_string(), s(""));
        for block in [
            Value::Map(HashMap::new()),
            Value::List(vec![Value::Map(HashMap::new())]),
            Value::Map(blank),
        ] {
            let err = UserPoolConfig::from_attributes(&attrs(vec![
                ("name", s("pool1")),
                ("email_configuration", block.clone()),
            ]))
            .unwrap_err();
            assert!(
                matches!(
                    err,
                    UserPoolError::ConfigurationShape {
                        block: "email_configuration",
                        ..
                    }
                ),
                "{:?} should be rejected",
                block
            );
        }
    }

    #[test]
    fn non_map_block_element_is_a_shape_error() {
        let err = UserPoolConfig::from_attributes(&attrs(vec![
            ("name", s("pool1")),
            ("sms_configuration", Value::List(vec![s("arn")])),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            UserPoolError::ConfigurationShape {
                block: "sms_configuration",
                ..
            }
        ));
    }

    #[test]
    fn sms_block_without_caller_arn_is_a_shape_error() {
        let err = UserPoolConfig::from_attributes(&attrs(vec![
            ("name", s("pool1")),
            ("sms_configuration", Value::Map(HashMap::new())),
        ]))
        .unwrap_err();
        assert!(matches!(err, UserPoolError::ConfigurationShape { .. }));
    }

    #[test]
    fn invalid_enum_is_rejected() {
        let err = UserPoolConfig::from_attributes(&attrs(vec![
            ("name", s("pool1")),
            ("auto_verified_attributes", Value::List(vec![s("fax")])),
        ]))
        .unwrap_err();
        assert!(matches!(err, UserPoolError::InvalidAttribute { ref name, .. } if name == "auto_verified_attributes"));
    }

    #[test]
    fn attributes_round_trip_through_canonical_form() {
        let config = UserPoolConfig {
            name: "pool1".to_string(),
            auto_verified_attributes: vec![VerifiedAttribute::PhoneNumber],
            email_verification_subject: Some("Your code".to_string()),
            sms_configuration: Some(SmsConfiguration {
                sns_caller_arn: "arn:aws:iam::123456789012:role/sms".to_string(),
                external_id: Some("ext".to_string()),
            }),
            ..Default::default()
        };
        let parsed = UserPoolConfig::from_attributes(&config.to_attributes()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unset_fields_are_omitted() {
        let attributes = UserPoolConfig::new("pool1").to_attributes();
        let mut keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["mfa_configuration", "name"]);
    }

    #[test]
    fn serializes_with_wire_values() {
        let json = serde_json::to_string(&MfaConfiguration::Optional).unwrap();
        assert_eq!(json, "\"OPTIONAL\"");
        let json = serde_json::to_string(&EmailConfiguration {
            reply_to_email_address: Some("a@b.c".to_string()),
            source_arn: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"ReplyToEmailAddress":"a@b.c"}"#);
    }
}
