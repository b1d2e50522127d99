use std::{collections::HashMap, marker::PhantomData};

use anyhow::{anyhow, Error};
use headers::authorization::{Bearer, Credentials};
use http::{header, Request, Response, StatusCode};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tower_http::validate_request::ValidateRequest;

use crate::claims::Claims;

pub mod claims;

pub const ANY_ID: &str = "*";

pub struct Keys {
    encoding: EncodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
        }
    }

    pub fn token(&self, claims: &Claims) -> Result<String, Error> {
        encode(&Header::default(), claims, &self.encoding).map_err(|e| anyhow!(e))
    }
}

/// Accepts either a static token mapped to a user or an HS256 JWT.
/// With neither configured every request is treated as an administrator.
pub struct ManyValidate<ResBody> {
    tokens: HashMap<String, String>,
    decoding: Option<DecodingKey>,
    _ty: PhantomData<fn() -> ResBody>,
}

impl<ResBody> ManyValidate<ResBody> {
    /// `tokens` maps a static bearer token to the user it authenticates
    pub fn new(secret: String, tokens: HashMap<String, String>) -> Self {
        Self {
            tokens,
            decoding: (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes())),
            _ty: PhantomData,
        }
    }

    fn is_open(&self) -> bool {
        self.tokens.is_empty() && self.decoding.is_none()
    }

    fn claims(&self, token: &str) -> Option<Claims> {
        if let Some(user) = self.tokens.get(token) {
            return Some(if user == ANY_ID {
                Claims::admin()
            } else {
                Claims::user(user.clone())
            });
        }
        let decoding = self.decoding.as_ref()?;
        decode::<Claims>(token, decoding, &Validation::default())
            .ok()
            .map(|data| data.claims)
    }
}

impl<ResBody> Clone for ManyValidate<ResBody> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            decoding: self.decoding.clone(),
            _ty: PhantomData,
        }
    }
}

impl<B, ResBody: Default> ValidateRequest<B> for ManyValidate<ResBody> {
    type ResponseBody = ResBody;

    fn validate(&mut self, request: &mut Request<B>) -> Result<(), Response<Self::ResponseBody>> {
        if self.is_open() {
            request.extensions_mut().insert(Claims::admin());
            return Ok(());
        }

        let claims = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(Bearer::decode)
            .and_then(|bearer| self.claims(bearer.token()));

        match claims {
            Some(claims) => {
                request.extensions_mut().insert(claims);
                Ok(())
            }
            None => {
                let mut response = Response::new(ResBody::default());
                *response.status_mut() = StatusCode::UNAUTHORIZED;
                Err(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/api/channels");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_open_when_unconfigured() {
        let mut validate = ManyValidate::<()>::new(String::new(), HashMap::new());
        let mut req = request(None);
        assert!(validate.validate(&mut req).is_ok());
        assert_eq!(req.extensions().get::<Claims>(), Some(&Claims::admin()));
    }

    #[test]
    fn test_static_token() {
        let tokens = HashMap::from([
            ("t-alice".to_string(), "alice".to_string()),
            ("t-root".to_string(), ANY_ID.to_string()),
        ]);
        let mut validate = ManyValidate::<()>::new(String::new(), tokens);

        let mut req = request(Some("t-alice"));
        assert!(validate.validate(&mut req).is_ok());
        assert_eq!(req.extensions().get::<Claims>(), Some(&Claims::user("alice")));

        let mut req = request(Some("t-root"));
        assert!(validate.validate(&mut req).is_ok());
        assert!(req.extensions().get::<Claims>().unwrap().admin);

        let err = validate.validate(&mut request(Some("nope"))).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(validate.validate(&mut request(None)).is_err());
    }

    #[test]
    fn test_jwt() {
        let secret = "airtime-secret";
        let claims = Claims {
            sub: "alice".to_string(),
            exp: 4_102_444_800,
            admin: false,
        };
        let token = Keys::new(secret.as_bytes()).token(&claims).unwrap();

        let mut validate = ManyValidate::<()>::new(secret.to_string(), HashMap::new());
        let mut req = request(Some(&token));
        assert!(validate.validate(&mut req).is_ok());
        assert_eq!(req.extensions().get::<Claims>(), Some(&claims));

        let forged = Keys::new(b"other").token(&claims).unwrap();
        assert!(validate.validate(&mut request(Some(&forged))).is_err());
    }

    fn assert_layer_safe<T: Clone + Send + Sync + 'static>() {}

    #[test]
    fn test_shareable_with_unsync_body() {
        // response bodies such as axum's are Send but not Sync
        assert_layer_safe::<ManyValidate<std::cell::Cell<u8>>>();
    }
}
