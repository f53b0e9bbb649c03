//! Provider configuration

use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use carina_core::resource::Value;

use crate::error::{UserPoolError, UserPoolResult};
use crate::utils::normalize_region;

/// Settings from the engine's `provider cognito { ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// AWS region in AWS format (e.g., "us-east-1")
    pub region: String,
    /// Alternate service endpoint, e.g. a local emulator
    pub endpoint_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(region: &str) -> Self {
        Self {
            region: normalize_region(region),
            endpoint_url: None,
        }
    }

    /// Build from provider block attributes
    ///
    /// `region` is required and accepts both `aws.Region.us_east_1` and
    /// `us-east-1`.
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> UserPoolResult<Self> {
        let region = get_string(attributes, "region")
            .ok_or_else(|| UserPoolError::Configuration("Missing required attribute: region".to_string()))?;

        Ok(Self {
            region: normalize_region(region),
            endpoint_url: get_string(attributes, "endpoint_url").map(str::to_string),
        })
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Load the AWS SDK configuration (credentials, retries) for this region
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        loader.load().await
    }
}

fn get_string<'a>(attributes: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
