use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Compare two secrets in constant time
///
/// Used for both manage codes and admin tokens so that response timing does
/// not leak how many leading characters were right.
pub fn verify_secret(provided: &str, expected: &str) -> bool {
    provided.as_bytes().len() == expected.as_bytes().len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authorizes privileged operations against the configured admin tokens
pub struct AdminAuth {
    tokens: Vec<String>,
}

impl AdminAuth {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn verify(&self, credential: &str) -> bool {
        // Check every token so timing does not depend on which one matched
        self.tokens
            .iter()
            .fold(false, |matched, token| verify_secret(credential, token) | matched)
    }

    /// Pick the credential a request presents: an explicit body value wins
    /// over a bearer header.
    pub fn credential<'a>(body: Option<&'a str>, headers: &'a HeaderMap) -> Option<&'a str> {
        body.map(str::trim)
            .filter(|code| !code.is_empty())
            .or_else(|| bearer_token(headers))
    }
}
