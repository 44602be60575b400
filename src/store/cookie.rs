//! Cookie-backed payload store.
//!
//! Wraps the request's [`CookieJar`] so the schedule core can treat the
//! browser cookie like any other `PayloadStore`. Mutations accumulate in
//! the jar; the handler hands the jar back to axum so the response carries
//! the matching `Set-Cookie` headers.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use super::{PayloadStore, StoreError};

/// Characters RFC 6265 forbids in a cookie-value, plus `%` itself.
const COOKIE_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

pub struct CookieStore {
    jar: CookieJar,
}

impl CookieStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Hand the jar back so the response can carry the mutations.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl PayloadStore for CookieStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(cookie) = self.jar.get(key) else {
            return Ok(None);
        };

        let decoded = percent_decode_str(cookie.value())
            .decode_utf8()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(decoded.into_owned()))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let encoded = utf8_percent_encode(&value, COOKIE_UNSAFE).to_string();
        let mut cookie = Cookie::new(key.to_string(), encoded);
        cookie.set_path("/");
        cookie.set_same_site(SameSite::Lax);
        cookie.make_permanent();
        self.jar = self.jar.clone().add(cookie);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let mut cookie = Cookie::new(key.to_string(), "");
        cookie.set_path("/");
        self.jar = self.jar.clone().remove(cookie);
        Ok(())
    }
}
