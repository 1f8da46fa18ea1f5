//! Reads the caller's identity out of a bearer token.
//!
//! Tokens reach this service only through the API gateway, which has already
//! verified signature and expiry. Here the payload is decoded without any
//! verification and a single string claim is taken as the user id.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::{Map, Value};

pub fn identity_from_token(token: &str, claim: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()?;

    data.claims
        .get(claim)?
        .as_str()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
