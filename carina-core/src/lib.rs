//! Carina Core
//!
//! Resource model, attribute schemas and the provider contract shared by
//! the orchestration engine and every Carina provider.

pub mod differ;
pub mod provider;
pub mod resource;
pub mod schema;
