/// Authentication and authorization
///
/// # Modules
///
/// - [`jwt`]: HS256 bearer token creation and verification
/// - [`middleware`]: `AuthContext` resolution from request headers
/// - [`authorization`]: Ownership checks on resources
///
/// # Example
///
/// ```
/// use resourcekit_shared::auth::jwt::{create_token, Claims};
/// use resourcekit_shared::auth::middleware::authenticate;
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
/// let token = create_token(&Claims::new(Uuid::new_v4()), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
///
/// let auth = authenticate(&headers, secret)?;
/// println!("Caller: {}", auth.user_id);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
