use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token; `sub` is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Decode a token, rejecting bad signatures and expired tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let service = TokenService::new("test_secret_key", Duration::minutes(120));
        let token = service.issue("user@example.com").expect("token issues");

        let claims = service.verify(&token).expect("token verifies");
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.exp - claims.iat, 120 * 60);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new("secret1", Duration::minutes(5));
        let verifier = TokenService::new("secret2", Duration::minutes(5));
        let token = issuer.issue("user@example.com").expect("token issues");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new("test_secret_key", Duration::minutes(-5));
        let token = service.issue("user@example.com").expect("token issues");
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let service = TokenService::new("test_secret_key", Duration::minutes(5));
        assert!(service.verify("invalid_token").is_err());
    }
}
