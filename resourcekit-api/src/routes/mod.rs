/// API route handlers
///
/// - `health`: Health check endpoint
/// - `resources`: Resource CRUD and bulk create

pub mod health;
pub mod resources;
