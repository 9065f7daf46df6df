//! Bearer token issuing and decoding.
//!
//! Every login flow produces the same payload:
//! `{ person: { id, name, cpf, email }, profile: { name, permissions } }`.
//! `iat`/`exp` are only present when an expiration is configured.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Person, Principal, Profile};
use crate::errors::AppResult;

/// Who the token was issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonClaims {
    /// Customer id, or employee id for employee logins
    pub id: Uuid,
    pub name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
}

impl PersonClaims {
    /// Claims for the record `id` wrapping `person`.
    pub fn new(id: Uuid, person: &Person) -> Self {
        Self {
            id,
            name: person.name().to_string(),
            cpf: person.cpf().map(str::to_string),
            email: person.email().map(str::to_string),
        }
    }
}

/// Profile granted to the bearer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileClaims {
    pub name: String,
    pub permissions: Vec<String>,
}

impl ProfileClaims {
    pub fn new(profile: &Profile, permissions: Vec<String>) -> Self {
        Self {
            name: profile.name().to_string(),
            permissions,
        }
    }
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub person: PersonClaims,
    pub profile: ProfileClaims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Principal {
            id: claims.person.id,
            name: claims.person.name,
            profile: claims.profile.name,
            permissions: claims.profile.permissions,
        }
    }
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiration: Option<Duration>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], algorithm: Algorithm, expiration: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            expiration,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            config.jwt_algorithm,
            config.jwt_expiration_minutes.map(Duration::minutes),
        )
    }

    /// Sign a payload for `person` holding `profile`.
    pub fn issue(&self, person: PersonClaims, profile: ProfileClaims) -> AppResult<String> {
        let (iat, exp) = match self.expiration {
            Some(lifetime) => {
                let now = Utc::now();
                (Some(now.timestamp()), Some((now + lifetime).timestamp()))
            }
            None => (None, None),
        };

        self.create_token(&TokenClaims {
            person,
            profile,
            iat,
            exp,
        })
    }

    pub fn create_token(&self, claims: &TokenClaims) -> AppResult<String> {
        let token = encode(&Header::new(self.algorithm), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify the signature (and `exp`, when present) and return the payload.
    pub fn decode_token(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    const SECRET: &[u8] = b"test-secret-key-minimum-32-chars!!";

    fn claims() -> (PersonClaims, ProfileClaims) {
        (
            PersonClaims {
                id: Uuid::new_v4(),
                name: "Ana Souza".to_string(),
                cpf: Some("52998224725".to_string()),
                email: Some("ana@example.com".to_string()),
            },
            ProfileClaims {
                name: "customer".to_string(),
                permissions: vec![
                    "can_view_customers".to_string(),
                    "can_update_customer".to_string(),
                ],
            },
        )
    }

    #[test]
    fn test_issue_then_decode() {
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS256, None);
        let (person, profile) = claims();

        let token = issuer.issue(person.clone(), profile.clone()).unwrap();
        let decoded = issuer.decode_token(&token).unwrap();

        assert_eq!(decoded.person, person);
        // Link order is preserved
        assert_eq!(decoded.profile.permissions, profile.permissions);
        assert!(decoded.exp.is_none());
        assert!(decoded.iat.is_none());
    }

    #[test]
    fn test_expiration_is_opt_in() {
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS512, Some(Duration::minutes(30)));
        let (person, profile) = claims();

        let decoded = issuer
            .decode_token(&issuer.issue(person, profile).unwrap())
            .unwrap();
        let (iat, exp) = (decoded.iat.unwrap(), decoded.exp.unwrap());
        assert_eq!(exp - iat, 30 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS256, None);
        let (person, profile) = claims();
        let token = issuer
            .create_token(&TokenClaims {
                person,
                profile,
                iat: Some(0),
                exp: Some(1),
            })
            .unwrap();

        assert!(matches!(issuer.decode_token(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS256, None);
        let other = TokenIssuer::new(b"another-secret-key-of-32-chars!!!!", Algorithm::HS256, None);
        let (person, profile) = claims();

        let token = other.issue(person, profile).unwrap();
        assert!(issuer.decode_token(&token).is_err());
        assert!(issuer.decode_token("not-a-token").is_err());
    }

    #[test]
    fn test_anonymous_payload_has_null_identity_fields() {
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS256, None);
        let person = Person::anonymous();
        let (_, profile) = claims();

        let token = issuer
            .issue(PersonClaims::new(Uuid::new_v4(), &person), profile)
            .unwrap();
        let decoded = issuer.decode_token(&token).unwrap();
        assert!(decoded.person.name.starts_with("Anonymous User - "));

        let json = serde_json::to_value(&decoded).unwrap();
        assert!(json["person"]["cpf"].is_null());
        assert!(json["person"]["email"].is_null());
        assert!(json.get("exp").is_none());
    }

    #[test]
    fn test_claims_into_principal() {
        let (person, profile) = claims();
        let principal = Principal::from(TokenClaims {
            person: person.clone(),
            profile,
            iat: None,
            exp: None,
        });

        assert_eq!(principal.id, person.id);
        assert_eq!(principal.profile, "customer");
        assert!(principal.has_permission("can_view_customers"));
    }
}
