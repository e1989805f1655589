//! One-shot notifications carried across a redirect in a signed cookie.
//!
//! Cookie value: `<level>:<url-encoded message>.<hex HMAC-SHA256>`. A cookie
//! that fails verification is treated as absent and cleared.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Redirect, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::state::AppState;

pub const COOKIE_NAME: &str = "flash";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "warning" => Some(FlashLevel::Warning),
            "danger" => Some(FlashLevel::Danger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }
}

/// HMAC key derived from `SECRET_KEY`.
#[derive(Clone)]
pub struct FlashKey {
    secret: Arc<[u8]>,
}

impl FlashKey {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
        }
    }

    fn mac(&self, payload: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(payload.as_bytes());
        Some(mac)
    }

    pub fn encode(&self, flash: &Flash) -> Option<String> {
        let payload = format!(
            "{}:{}",
            flash.level.as_str(),
            urlencoding::encode(&flash.message)
        );
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Some(format!("{payload}.{signature}"))
    }

    pub fn decode(&self, value: &str) -> Option<Flash> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.mac(payload)?.verify_slice(&signature).ok()?;

        let (level, message) = payload.split_once(':')?;
        Some(Flash {
            level: FlashLevel::parse(level)?,
            message: urlencoding::decode(message).ok()?.into_owned(),
        })
    }
}

/// 303 redirect to `to` that sets the flash cookie.
pub fn redirect(to: &str, flash: &Flash, key: &FlashKey) -> Response {
    let mut response = Redirect::to(to).into_response();
    let cookie = key
        .encode(flash)
        .map(|value| format!("{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax"))
        .and_then(|cookie| HeaderValue::from_str(&cookie).ok());
    match cookie {
        Some(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        None => warn!("Dropping flash message that could not be encoded"),
    }
    response
}

fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// The flash left by the previous response, if any. Pages pass it to their
/// template and then call `settle` so the cookie is cleared.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    flash: Option<Flash>,
    had_cookie: bool,
}

impl IncomingFlash {
    pub fn from_headers(headers: &HeaderMap, key: &FlashKey) -> Self {
        match read_cookie(headers, COOKIE_NAME) {
            Some(value) => Self {
                flash: key.decode(value),
                had_cookie: true,
            },
            None => Self::default(),
        }
    }

    pub fn take(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    pub fn settle(self, mut response: Response) -> Response {
        if self.had_cookie {
            response.headers_mut().append(
                SET_COOKIE,
                HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
            );
        }
        response
    }
}

#[async_trait]
impl FromRequestParts<AppState> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.flash_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    fn key() -> FlashKey {
        FlashKey::new("test-secret")
    }

    #[test]
    fn test_encode_decode() {
        let flash = Flash::danger("Could not parse résumé: bad; data. 100%");
        let value = key().encode(&flash).unwrap();
        assert_eq!(key().decode(&value), Some(flash));
    }

    #[test]
    fn test_tampered_message_rejected() {
        let value = key().encode(&Flash::success("Uploaded & parsed.")).unwrap();
        let tampered = value.replacen("success:Uploaded", "success:Hacked", 1);
        assert_eq!(key().decode(&tampered), None);
    }

    #[test]
    fn test_other_secret_rejected() {
        let value = key().encode(&Flash::warning("hi")).unwrap();
        assert_eq!(FlashKey::new("other").decode(&value), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(key().decode("not-a-flash"), None);
        assert_eq!(key().decode("success:hi.zz"), None);
    }

    #[test]
    fn test_redirect_sets_cookie() {
        let response = redirect("/candidates", &Flash::success("Uploaded & parsed."), &key());
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/candidates");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=success:Uploaded%20%26%20parsed."));
    }

    #[test]
    fn test_incoming_flash_reads_and_clears() {
        let value = key().encode(&Flash::warning("Provide job description.")).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; flash={value}")).unwrap(),
        );

        let mut incoming = IncomingFlash::from_headers(&headers, &key());
        let flash = incoming.take().unwrap();
        assert_eq!(flash.level, FlashLevel::Warning);

        let response = incoming.settle(().into_response());
        let cleared = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_no_cookie_no_clear() {
        let incoming = IncomingFlash::from_headers(&HeaderMap::new(), &key());
        let response = incoming.settle(().into_response());
        assert!(response.headers().get(SET_COOKIE).is_none());
    }
}
