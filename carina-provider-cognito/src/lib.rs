//! Carina Cognito Provider
//!
//! Manages Cognito user pools through the Carina provider contract.
//!
//! ## Module Structure
//!
//! - `handler` - Create/Read/Update/Delete for a single user pool
//! - `client` - Remote directory client trait and request types
//! - `sdk` - Client implementation over the AWS SDK
//! - `types` - Typed user pool configuration
//! - `schemas` - Attribute schemas and validators
//! - `config` - Provider configuration

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod schemas;
pub mod sdk;
pub mod types;
pub mod utils;

pub use client::UserPoolClient;
pub use config::ProviderConfig;
pub use error::{ClientError, Operation, UserPoolError};
pub use handler::UserPoolHandler;
pub use sdk::SdkUserPoolClient;
pub use types::{RESOURCE_TYPE, UserPoolConfig, UserPoolRecord};

use carina_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use carina_core::resource::{Resource, ResourceId, State};
use carina_core::schema::ResourceSchema;

/// User pool resource type
pub struct CognitoUserPoolType;

impl ResourceType for CognitoUserPoolType {
    fn name(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        schemas::user_pool::user_pool_schema()
    }
}

/// Cognito Provider
pub struct CognitoProvider<C = SdkUserPoolClient> {
    handler: UserPoolHandler<C>,
}

impl CognitoProvider<SdkUserPoolClient> {
    /// Create a new Cognito Provider for the specified region
    pub async fn new(region: &str) -> Self {
        Self::from_config(&ProviderConfig::new(region)).await
    }

    pub async fn from_config(config: &ProviderConfig) -> Self {
        let sdk_config = config.load_sdk_config().await;
        Self::with_client(SdkUserPoolClient::new(&sdk_config))
    }
}

impl<C: UserPoolClient> CognitoProvider<C> {
    /// Create with a specific client (for testing)
    pub fn with_client(client: C) -> Self {
        Self {
            handler: UserPoolHandler::new(client),
        }
    }

    pub fn handler(&self) -> &UserPoolHandler<C> {
        &self.handler
    }

    async fn read_user_pool(&self, id: ResourceId, identifier: Option<&str>) -> ProviderResult<State> {
        check_resource_type(&id)?;
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id));
        };

        match self.handler.read(identifier).await {
            Ok(record) => Ok(to_state(id, record)),
            Err(e) => Err(e.into_provider_error(id)),
        }
    }

    async fn create_user_pool(&self, resource: Resource) -> ProviderResult<State> {
        check_resource_type(&resource.id)?;
        let result = match UserPoolConfig::from_attributes(&resource.attributes) {
            Ok(config) => self.handler.create(&config).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => Ok(to_state(resource.id, Some(record))),
            Err(e) => Err(e.into_provider_error(resource.id)),
        }
    }

    async fn update_user_pool(
        &self,
        id: ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        check_resource_type(&id)?;
        let result = async {
            let desired = UserPoolConfig::from_attributes(&to.attributes)?;
            let previous = UserPoolConfig::from_attributes(&from.attributes)?;
            self.handler.update(identifier, &desired, &previous).await
        }
        .await;

        match result {
            Ok(record) => Ok(to_state(id, record)),
            Err(e) => Err(e.into_provider_error(id)),
        }
    }

    async fn delete_user_pool(&self, id: ResourceId, identifier: &str) -> ProviderResult<()> {
        check_resource_type(&id)?;
        self.handler
            .delete(identifier)
            .await
            .map_err(|e| e.into_provider_error(id))
    }
}

fn check_resource_type(id: &ResourceId) -> ProviderResult<()> {
    if id.resource_type == RESOURCE_TYPE {
        Ok(())
    } else {
        Err(
            ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
                .for_resource(id.clone()),
        )
    }
}

/// State for a record; an absent record leaves no identifier behind
fn to_state(id: ResourceId, record: Option<UserPoolRecord>) -> State {
    match record {
        Some(record) => State::existing(id, record.pool.to_attributes()).with_identifier(record.id),
        None => State::not_found(id),
    }
}

impl<C: UserPoolClient + 'static> Provider for CognitoProvider<C> {
    fn name(&self) -> &'static str {
        "cognito"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(CognitoUserPoolType)]
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_user_pool(id, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_user_pool(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_user_pool(id, &identifier, &from, &to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_user_pool(id, &identifier).await })
    }
}
