//! Cognito user pool schema definition

use carina_core::resource::Value;
use carina_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::types;
use crate::types::RESOURCE_TYPE;

/// Returns the schema for Cognito user pools
pub fn user_pool_schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A Cognito user pool: a managed directory of end-user identities")
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .force_new()
                .with_provider_name("PoolName")
                .with_description("Name of the user pool"),
        )
        .attribute(
            AttributeSchema::new(
                "alias_attributes",
                AttributeType::List(Box::new(types::alias_attribute())),
            )
            .force_new()
            .with_provider_name("AliasAttributes")
            .with_description("Attributes users may sign in with besides the username"),
        )
        .attribute(
            AttributeSchema::new(
                "auto_verified_attributes",
                AttributeType::List(Box::new(types::verified_attribute())),
            )
            .with_provider_name("AutoVerifiedAttributes")
            .with_description("Attributes verified automatically with a confirmation code"),
        )
        .attribute(
            AttributeSchema::new(
                "email_configuration",
                AttributeType::Block(vec![
                    AttributeSchema::new("reply_to_email_address", types::email_address())
                        .with_provider_name("ReplyToEmailAddress"),
                    AttributeSchema::new("source_arn", types::arn())
                        .with_provider_name("SourceArn"),
                ]),
            )
            .with_provider_name("EmailConfiguration"),
        )
        .attribute(
            AttributeSchema::new("email_verification_subject", types::email_verification_subject())
                .with_provider_name("EmailVerificationSubject"),
        )
        .attribute(
            AttributeSchema::new("email_verification_message", types::email_verification_message())
                .with_provider_name("EmailVerificationMessage"),
        )
        .attribute(
            AttributeSchema::new("mfa_configuration", types::mfa_configuration())
                .with_default(Value::String("off".to_string()))
                .with_provider_name("MfaConfiguration")
                .with_description("Multi-factor authentication mode: off, on or optional"),
        )
        .attribute(
            AttributeSchema::new("sms_authentication_message", types::sms_message())
                .with_provider_name("SmsAuthenticationMessage"),
        )
        .attribute(
            AttributeSchema::new(
                "sms_configuration",
                AttributeType::Block(vec![
                    AttributeSchema::new("sns_caller_arn", types::arn())
                        .required()
                        .with_provider_name("SnsCallerArn"),
                    AttributeSchema::new("external_id", types::arn())
                        .with_provider_name("ExternalId"),
                ]),
            )
            .with_provider_name("SmsConfiguration"),
        )
        .attribute(
            AttributeSchema::new("sms_verification_message", types::sms_message())
                .with_provider_name("SmsVerificationMessage"),
        )
        .attribute(
            AttributeSchema::new("tags", AttributeType::Map(Box::new(AttributeType::String)))
                .with_provider_name("UserPoolTags"),
        )
}
