//! User pool lifecycle handler
//!
//! Maps a [`UserPoolConfig`] onto CreateUserPool, DescribeUserPool,
//! UpdateUserPool and DeleteUserPool calls. Create and Update re-read the
//! pool afterwards so the returned record reflects the service, not the
//! request echo.

use carina_core::differ::changed_attributes;
use serde::Serialize;

use crate::client::{CreateUserPoolInput, UpdateUserPoolInput, UserPoolClient};
use crate::error::{ClientError, Operation, UserPoolError, UserPoolResult};
use crate::types::{EmailConfiguration, SmsConfiguration, UserPoolConfig, UserPoolRecord};

pub struct UserPoolHandler<C> {
    client: C,
}

impl<C: UserPoolClient> UserPoolHandler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create a pool and return its refreshed record
    ///
    /// Nothing is sent when a block is malformed. If the refresh finds the
    /// pool already gone, that is reported as `NotFound` rather than
    /// undoing the create.
    pub async fn create(&self, config: &UserPoolConfig) -> UserPoolResult<UserPoolRecord> {
        let input = build_create_input(config)?;
        log::debug!("Creating Cognito User Pool: {}", to_json(&input));

        let created = self
            .client
            .create_user_pool(input)
            .await
            .map_err(UserPoolError::remote(Operation::Create))?;

        self.read(&created.id)
            .await?
            .ok_or_else(|| UserPoolError::Client(ClientError::NotFound(created.id)))
    }

    /// Fetch the pool; `Ok(None)` means it no longer exists
    pub async fn read(&self, user_pool_id: &str) -> UserPoolResult<Option<UserPoolRecord>> {
        log::debug!("Reading Cognito User Pool: {}", user_pool_id);

        match self.client.describe_user_pool(user_pool_id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                log::warn!("Cognito User Pool {} is already gone", user_pool_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Send the fields that differ between `previous` and `desired`, then re-read
    ///
    /// `alias_attributes` and `name` are never sent; both force a new pool.
    pub async fn update(
        &self,
        user_pool_id: &str,
        desired: &UserPoolConfig,
        previous: &UserPoolConfig,
    ) -> UserPoolResult<Option<UserPoolRecord>> {
        let input = build_update_input(user_pool_id, desired, previous)?;
        log::debug!("Updating Cognito User Pool: {}", to_json(&input));

        self.client
            .update_user_pool(input)
            .await
            .map_err(UserPoolError::remote(Operation::Update))?;

        self.read(user_pool_id).await
    }

    pub async fn delete(&self, user_pool_id: &str) -> UserPoolResult<()> {
        log::debug!("Deleting Cognito User Pool: {}", user_pool_id);

        self.client
            .delete_user_pool(user_pool_id)
            .await
            .map_err(UserPoolError::remote(Operation::Delete))
    }
}

fn build_create_input(config: &UserPoolConfig) -> UserPoolResult<CreateUserPoolInput> {
    if config.name.is_empty() {
        return Err(UserPoolError::invalid("name", "name is required"));
    }

    Ok(CreateUserPoolInput {
        pool_name: config.name.clone(),
        alias_attributes: config.alias_attributes.clone(),
        auto_verified_attributes: config.auto_verified_attributes.clone(),
        email_configuration: config
            .email_configuration
            .as_ref()
            .map(email_configuration)
            .transpose()?,
        email_verification_subject: config.email_verification_subject.clone(),
        email_verification_message: config.email_verification_message.clone(),
        mfa_configuration: Some(config.mfa_configuration),
        sms_authentication_message: config.sms_authentication_message.clone(),
        sms_configuration: config
            .sms_configuration
            .as_ref()
            .map(sms_configuration)
            .transpose()?,
        sms_verification_message: config.sms_verification_message.clone(),
        user_pool_tags: config.tags.clone(),
    })
}

fn build_update_input(
    user_pool_id: &str,
    desired: &UserPoolConfig,
    previous: &UserPoolConfig,
) -> UserPoolResult<UpdateUserPoolInput> {
    let mut input = UpdateUserPoolInput::new(user_pool_id);

    for attribute in changed_attributes(&desired.to_attributes(), &previous.to_attributes()) {
        match attribute.as_str() {
            "auto_verified_attributes" => {
                input.auto_verified_attributes = Some(desired.auto_verified_attributes.clone());
            }
            "email_configuration" => {
                input.email_configuration = Some(match &desired.email_configuration {
                    Some(block) => email_configuration(block)?,
                    // Sent empty so the service drops its settings
                    None => EmailConfiguration::default(),
                });
            }
            "email_verification_subject" => {
                input.email_verification_subject = Some(cleared(&desired.email_verification_subject));
            }
            "email_verification_message" => {
                input.email_verification_message = Some(cleared(&desired.email_verification_message));
            }
            "mfa_configuration" => {
                input.mfa_configuration = Some(desired.mfa_configuration);
            }
            "sms_authentication_message" => {
                input.sms_authentication_message = Some(cleared(&desired.sms_authentication_message));
            }
            "sms_configuration" => match &desired.sms_configuration {
                Some(block) => input.sms_configuration = Some(sms_configuration(block)?),
                None => log::warn!(
                    "sms_configuration removed from Cognito User Pool {}; the service keeps its current settings",
                    user_pool_id
                ),
            },
            "sms_verification_message" => {
                input.sms_verification_message = Some(cleared(&desired.sms_verification_message));
            }
            "tags" => {
                input.user_pool_tags = Some(desired.tags.clone());
            }
            // Fixed after creation; the schema marks it ForceNew
            "alias_attributes" => log::warn!(
                "alias_attributes change on Cognito User Pool {} is not applied on update",
                user_pool_id
            ),
            _ => {}
        }
    }

    Ok(input)
}

/// Rebuild an email block, dropping empty values; a block with no settings is rejected
fn email_configuration(block: &EmailConfiguration) -> UserPoolResult<EmailConfiguration> {
    if block.is_empty() {
        return Err(UserPoolError::shape("email_configuration", "block is empty"));
    }
    Ok(EmailConfiguration {
        reply_to_email_address: non_empty(&block.reply_to_email_address),
        source_arn: non_empty(&block.source_arn),
    })
}

/// Rebuild an SMS block; the caller ARN must be present
fn sms_configuration(block: &SmsConfiguration) -> UserPoolResult<SmsConfiguration> {
    if block.sns_caller_arn.is_empty() {
        return Err(UserPoolError::shape(
            "sms_configuration",
            "sns_caller_arn is required",
        ));
    }
    Ok(SmsConfiguration {
        sns_caller_arn: block.sns_caller_arn.clone(),
        external_id: non_empty(&block.external_id),
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// A removed string is sent as empty to clear the remote value
fn cleared(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn to_json(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
