/// Bearer-token authorization
///
/// The HTTP layer extracts the credential from `Authorization: Bearer <token>`
/// and asks an [`Authorizer`] whether to let the request through. The only
/// implementation today is [`StaticTokenAuthorizer`], which matches a single
/// configured token.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::token::{Authorizer, StaticTokenAuthorizer};
///
/// let authorizer = StaticTokenAuthorizer::new("s3cret");
/// assert!(authorizer.authorize("s3cret"));
/// assert!(!authorizer.authorize("guess"));
/// ```

/// Decides whether a presented credential is allowed
pub trait Authorizer: Send + Sync {
    /// Returns `true` if the credential grants access
    fn authorize(&self, credential: &str) -> bool;
}

/// Allows exactly one static token
#[derive(Clone)]
pub struct StaticTokenAuthorizer {
    token: String,
}

impl StaticTokenAuthorizer {
    /// Creates an authorizer for `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuthorizer")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Authorizer for StaticTokenAuthorizer {
    fn authorize(&self, credential: &str) -> bool {
        !self.token.is_empty() && constant_time_compare(credential, &self.token)
    }
}

/// Constant-time string comparison
///
/// Compares every byte so the time taken does not reveal where two
/// equal-length strings first differ.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
