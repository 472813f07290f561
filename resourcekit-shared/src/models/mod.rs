/// Domain models for ResourceKit
///
/// - `resource`: The owned resource row plus its create, update and list payloads
///
/// Persistence lives in `crate::store`; models carry no queries themselves.

pub mod resource;

pub use resource::{NewResource, Resource, ResourceChanges, ResourceFilter, ResourceStatus};
