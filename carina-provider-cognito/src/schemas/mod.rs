//! Cognito resource schema definitions

pub mod types;
pub mod user_pool;

use carina_core::schema::ResourceSchema;

/// Returns all Cognito schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![user_pool::user_pool_schema()]
}
