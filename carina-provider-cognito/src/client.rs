//! Remote directory client abstraction
//!
//! The handler only talks to the identity service through [`UserPoolClient`],
//! so the AWS SDK stays at the edge and tests can swap in an in-memory double.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ClientError;
use crate::types::{
    AliasAttribute, EmailConfiguration, MfaConfiguration, SmsConfiguration, UserPoolRecord,
    VerifiedAttribute,
};

/// Request for CreateUserPool. Unset fields are omitted from the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserPoolInput {
    pub pool_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias_attributes: Vec<AliasAttribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auto_verified_attributes: Vec<VerifiedAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_configuration: Option<EmailConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_configuration: Option<MfaConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_authentication_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_configuration: Option<SmsConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_verification_message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub user_pool_tags: BTreeMap<String, String>,
}

/// Request for UpdateUserPool. Only `Some` fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserPoolInput {
    pub user_pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_verified_attributes: Option<Vec<VerifiedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_configuration: Option<EmailConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_configuration: Option<MfaConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_authentication_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_configuration: Option<SmsConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_verification_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_pool_tags: Option<BTreeMap<String, String>>,
}

impl UpdateUserPoolInput {
    pub fn new(user_pool_id: impl Into<String>) -> Self {
        Self {
            user_pool_id: user_pool_id.into(),
            ..Default::default()
        }
    }

    /// True when the request only targets the pool and changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::new(self.user_pool_id.clone())
    }
}

/// Capability to manage user pools in the identity service
#[async_trait]
pub trait UserPoolClient: Send + Sync {
    /// Create a pool and return the record the service assigned
    async fn create_user_pool(&self, input: CreateUserPoolInput)
    -> Result<UserPoolRecord, ClientError>;

    /// Fetch a pool by identifier
    ///
    /// Returns [`ClientError::NotFound`] when the pool does not exist.
    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPoolRecord, ClientError>;

    async fn update_user_pool(&self, input: UpdateUserPoolInput) -> Result<(), ClientError>;

    async fn delete_user_pool(&self, user_pool_id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl UserPoolClient for Box<dyn UserPoolClient> {
    async fn create_user_pool(
        &self,
        input: CreateUserPoolInput,
    ) -> Result<UserPoolRecord, ClientError> {
        (**self).create_user_pool(input).await
    }

    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPoolRecord, ClientError> {
        (**self).describe_user_pool(user_pool_id).await
    }

    async fn update_user_pool(&self, input: UpdateUserPoolInput) -> Result<(), ClientError> {
        (**self).update_user_pool(input).await
    }

    async fn delete_user_pool(&self, user_pool_id: &str) -> Result<(), ClientError> {
        (**self).delete_user_pool(user_pool_id).await
    }
}
