//! Defines the claims carried by auth tokens and how tokens are created,
//! verified, and extracted from requests.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{Error, app_state::JwtKeys, user::UserId};

/// How many days a token stays valid after being issued.
pub const TOKEN_DURATION_DAYS: i64 = 7;

/// The contents of an auth token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub user_id: UserId,

    /// The email associated with the token.
    pub email: String,

    /// The time the token was issued as a unix timestamp.
    pub iat: usize,

    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

/// Create a signed token for a user that expires in [TOKEN_DURATION_DAYS] days.
///
/// # Errors
/// Returns an error if the token could not be signed. The underlying cause is
/// logged on the server, the client only sees an internal server error.
pub fn encode_token(
    user_id: UserId,
    email: &str,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        email: email.to_owned(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(TOKEN_DURATION_DAYS)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("could not sign auth token: {error}");
        Error::TokenCreation
    })
}

/// Verify a token string and return its claims.
///
/// # Errors
/// Returns [Error::InvalidToken] if the signature does not match or the token
/// has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::MissingToken)?;

        let keys = JwtKeys::from_ref(state);

        decode_token(bearer.token(), &keys.decoding_key)
    }
}
