use axum::http::{HeaderMap, header};

/// Role of the caller on this request. Admin implies logged-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionRole {
    Anonymous,
    User,
    Admin,
}

/// Session lookup is owned by the wider backend's identity layer; the
/// assistant surface only consumes it through this trait.
pub trait SessionAuth: Send + Sync {
    fn role(&self, headers: &HeaderMap) -> SessionRole;
}

/// Grants everyone user access and nobody admin access. For development
/// setups without an identity layer.
#[derive(Debug, Default)]
pub struct NoopSessions;

impl SessionAuth for NoopSessions {
    fn role(&self, _headers: &HeaderMap) -> SessionRole {
        SessionRole::User
    }
}

/// Single-key deployment auth: a bearer token matching the configured
/// admin key hash is admin, anything else is anonymous.
#[derive(Debug)]
pub struct AdminKeyAuth {
    admin_key_hash: String,
}

impl AdminKeyAuth {
    pub fn new(admin_key_hash: impl Into<String>) -> Self {
        Self {
            admin_key_hash: admin_key_hash.into(),
        }
    }

    pub fn hash_key(key: &str) -> String {
        blake3::hash(key.as_bytes()).to_hex().to_string()
    }
}

impl SessionAuth for AdminKeyAuth {
    fn role(&self, headers: &HeaderMap) -> SessionRole {
        let Some(token) = bearer_token(headers) else {
            return SessionRole::Anonymous;
        };
        if !self.admin_key_hash.is_empty() && Self::hash_key(token) == self.admin_key_hash {
            SessionRole::Admin
        } else {
            SessionRole::Anonymous
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn roles_are_ordered() {
        assert!(SessionRole::Admin > SessionRole::User);
        assert!(SessionRole::User > SessionRole::Anonymous);
    }

    #[test]
    fn matching_key_is_admin() {
        let auth = AdminKeyAuth::new(AdminKeyAuth::hash_key("s3cret"));
        assert_eq!(auth.role(&headers_with_bearer("s3cret")), SessionRole::Admin);
        assert_eq!(
            auth.role(&headers_with_bearer("wrong")),
            SessionRole::Anonymous
        );
        assert_eq!(auth.role(&HeaderMap::new()), SessionRole::Anonymous);
    }

    #[test]
    fn empty_hash_never_matches() {
        let auth = AdminKeyAuth::new("");
        assert_eq!(
            auth.role(&headers_with_bearer("anything")),
            SessionRole::Anonymous
        );
    }
}
