pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;
pub mod policy;
pub mod session;

pub use claims::{Claims, RequestContext};

use chrono::{Duration, Utc};
use db::models::user::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use util::config;

/// Generates a session JWT and its expiry timestamp for a given user.
pub fn generate_jwt(
    user_id: i64,
    role: Role,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);

    let claims = Claims {
        sub: user_id,
        role,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}

/// Verifies signature and expiry. Any failure yields `None`.
pub fn decode_jwt(token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()
    .map(|data| data.claims)
}
