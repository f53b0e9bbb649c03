//! [`UserPoolClient`] backed by the AWS Cognito Identity Provider SDK

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_cognitoidentityprovider::types::{
    AliasAttributeType, EmailConfigurationType, SmsConfigurationType, UserPoolMfaType,
    UserPoolType, VerifiedAttributeType,
};

use crate::client::{CreateUserPoolInput, UpdateUserPoolInput, UserPoolClient};
use crate::error::ClientError;
use crate::types::{
    AliasAttribute, EmailConfiguration, MfaConfiguration, SmsConfiguration, UserPoolConfig,
    UserPoolRecord, VerifiedAttribute,
};

/// Cognito Identity Provider client
pub struct SdkUserPoolClient {
    client: CognitoClient,
}

impl SdkUserPoolClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: CognitoClient::new(config),
        }
    }

    /// Create with a specific client (for testing)
    pub fn with_client(client: CognitoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserPoolClient for SdkUserPoolClient {
    async fn create_user_pool(
        &self,
        input: CreateUserPoolInput,
    ) -> Result<UserPoolRecord, ClientError> {
        let output = self
            .client
            .create_user_pool()
            .pool_name(input.pool_name)
            .set_alias_attributes(non_empty(
                input.alias_attributes.iter().map(|a| alias_attribute_type(*a)),
            ))
            .set_auto_verified_attributes(non_empty(
                input
                    .auto_verified_attributes
                    .iter()
                    .map(|a| verified_attribute_type(*a)),
            ))
            .set_email_configuration(input.email_configuration.as_ref().map(email_configuration_type))
            .set_email_verification_subject(input.email_verification_subject)
            .set_email_verification_message(input.email_verification_message)
            .set_mfa_configuration(input.mfa_configuration.map(mfa_type))
            .set_sms_authentication_message(input.sms_authentication_message)
            .set_sms_configuration(input.sms_configuration.as_ref().map(sms_configuration_type))
            .set_sms_verification_message(input.sms_verification_message)
            .set_user_pool_tags(
                (!input.user_pool_tags.is_empty())
                    .then(|| input.user_pool_tags.into_iter().collect::<HashMap<_, _>>()),
            )
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;

        let pool = output
            .user_pool
            .ok_or_else(|| ClientError::Transport("CreateUserPool returned no user pool".to_string()))?;
        record_from_pool(pool)
    }

    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPoolRecord, ClientError> {
        let result = self
            .client
            .describe_user_pool()
            .user_pool_id(user_pool_id)
            .send()
            .await;

        match result {
            Ok(output) => {
                let pool = output.user_pool.ok_or_else(|| {
                    ClientError::Transport("DescribeUserPool returned no user pool".to_string())
                })?;
                record_from_pool(pool)
            }
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                if not_found {
                    Err(ClientError::NotFound(user_pool_id.to_string()))
                } else {
                    Err(ClientError::Transport(format!("{:?}", err)))
                }
            }
        }
    }

    async fn update_user_pool(&self, input: UpdateUserPoolInput) -> Result<(), ClientError> {
        self.client
            .update_user_pool()
            .user_pool_id(input.user_pool_id)
            .set_auto_verified_attributes(input.auto_verified_attributes.map(|attrs| {
                attrs.into_iter().map(verified_attribute_type).collect()
            }))
            .set_email_configuration(input.email_configuration.as_ref().map(email_configuration_type))
            .set_email_verification_subject(input.email_verification_subject)
            .set_email_verification_message(input.email_verification_message)
            .set_mfa_configuration(input.mfa_configuration.map(mfa_type))
            .set_sms_authentication_message(input.sms_authentication_message)
            .set_sms_configuration(input.sms_configuration.as_ref().map(sms_configuration_type))
            .set_sms_verification_message(input.sms_verification_message)
            .set_user_pool_tags(input.user_pool_tags.map(|tags| tags.into_iter().collect()))
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;

        Ok(())
    }

    async fn delete_user_pool(&self, user_pool_id: &str) -> Result<(), ClientError> {
        self.client
            .delete_user_pool()
            .user_pool_id(user_pool_id)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;

        Ok(())
    }
}

fn non_empty<T>(items: impl Iterator<Item = T>) -> Option<Vec<T>> {
    let items: Vec<T> = items.collect();
    (!items.is_empty()).then_some(items)
}

fn alias_attribute_type(attr: AliasAttribute) -> AliasAttributeType {
    AliasAttributeType::from(attr.as_wire())
}

fn verified_attribute_type(attr: VerifiedAttribute) -> VerifiedAttributeType {
    VerifiedAttributeType::from(attr.as_wire())
}

fn mfa_type(mfa: MfaConfiguration) -> UserPoolMfaType {
    UserPoolMfaType::from(mfa.as_wire())
}

fn email_configuration_type(email: &EmailConfiguration) -> EmailConfigurationType {
    EmailConfigurationType::builder()
        .set_reply_to_email_address(email.reply_to_email_address.clone())
        .set_source_arn(email.source_arn.clone())
        .build()
}

fn sms_configuration_type(sms: &SmsConfiguration) -> SmsConfigurationType {
    SmsConfigurationType::builder()
        .sns_caller_arn(&sms.sns_caller_arn)
        .set_external_id(sms.external_id.clone())
        .build()
}

/// Convert a service response into a record
///
/// Values the service leaves out, or returns empty, stay unset.
/// Enum values this provider does not model are skipped with a warning.
fn record_from_pool(pool: UserPoolType) -> Result<UserPoolRecord, ClientError> {
    let id = pool
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ClientError::Transport("user pool response has no id".to_string()))?;

    let config = UserPoolConfig {
        name: pool.name.unwrap_or_default(),
        alias_attributes: parse_known(
            pool.alias_attributes
                .unwrap_or_default()
                .iter()
                .map(|a| a.as_str()),
        ),
        auto_verified_attributes: parse_known(
            pool.auto_verified_attributes
                .unwrap_or_default()
                .iter()
                .map(|a| a.as_str()),
        ),
        // The service reports a default email block even when none was configured
        email_configuration: pool
            .email_configuration
            .map(|email| EmailConfiguration {
                reply_to_email_address: email.reply_to_email_address.filter(|v| !v.is_empty()),
                source_arn: email.source_arn.filter(|v| !v.is_empty()),
            })
            .filter(|email| *email != EmailConfiguration::default()),
        email_verification_subject: pool.email_verification_subject.filter(|v| !v.is_empty()),
        email_verification_message: pool.email_verification_message.filter(|v| !v.is_empty()),
        mfa_configuration: parse_known(pool.mfa_configuration.iter().map(|m| m.as_str()))
            .into_iter()
            .next()
            .unwrap_or_default(),
        sms_authentication_message: pool.sms_authentication_message.filter(|v| !v.is_empty()),
        sms_configuration: pool
            .sms_configuration
            .filter(|sms| !sms.sns_caller_arn.is_empty())
            .map(|sms| SmsConfiguration {
                sns_caller_arn: sms.sns_caller_arn,
                external_id: sms.external_id.filter(|v| !v.is_empty()),
            }),
        sms_verification_message: pool.sms_verification_message.filter(|v| !v.is_empty()),
        tags: pool.user_pool_tags.unwrap_or_default().into_iter().collect(),
    };

    Ok(UserPoolRecord { id, pool: config })
}

fn parse_known<'a, T: FromStr<Err = String>>(values: impl Iterator<Item = &'a str>) -> Vec<T> {
    values
        .filter_map(|v| match v.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Ignoring value from Cognito: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_conversions_use_wire_values() {
        assert_eq!(alias_attribute_type(AliasAttribute::PhoneNumber).as_str(), "phone_number");
        assert_eq!(verified_attribute_type(VerifiedAttribute::Email).as_str(), "email");
        assert_eq!(mfa_type(MfaConfiguration::Optional), UserPoolMfaType::Optional);
    }

    #[test]
    fn record_from_pool_keeps_only_present_values() {
        let pool = UserPoolType::builder()
            .id("us-east-1_ABC123")
            .name("pool1")
            .auto_verified_attributes(VerifiedAttributeType::Email)
            .mfa_configuration(UserPoolMfaType::Off)
            .email_verification_subject("")
            .user_pool_tags("env", "prod")
            .build();

        let record = record_from_pool(pool).unwrap();

        assert_eq!(record.id, "us-east-1_ABC123");
        assert_eq!(record.pool.name, "pool1");
        assert_eq!(record.pool.auto_verified_attributes, vec![VerifiedAttribute::Email]);
        assert_eq!(record.pool.mfa_configuration, MfaConfiguration::Off);
        assert_eq!(record.pool.email_verification_subject, None);
        assert!(record.pool.email_configuration.is_none());
        assert_eq!(record.pool.tags.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn record_from_pool_drops_default_email_block() {
        let pool = UserPoolType::builder()
            .id("us-east-1_ABC123")
            .email_configuration(EmailConfigurationType::builder().build())
            .build();
        assert!(record_from_pool(pool).unwrap().pool.email_configuration.is_none());
    }

    #[test]
    fn record_from_pool_requires_id() {
        let pool = UserPoolType::builder().name("pool1").build();
        assert!(record_from_pool(pool).is_err());
    }

    #[test]
    fn sms_configuration_carries_external_id() {
        let sms = sms_configuration_type(&SmsConfiguration {
            sns_caller_arn: "arn:aws:iam::123456789012:role/sms".to_string(),
            external_id: Some("ext-1".to_string()),
        });
        assert_eq!(sms.sns_caller_arn(), "arn:aws:iam::123456789012:role/sms");
        assert_eq!(sms.external_id(), Some("ext-1"));
    }
}
