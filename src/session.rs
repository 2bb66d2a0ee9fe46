//! Session credentials (cookie values) and the request headers built from them.

use crate::error::{ScrapeError, ScrapeResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; SM-A125F) AppleWebKit/537.36 \
                                 (KHTML, like Gecko) Chrome/122.0.0.0 Mobile Safari/537.36";
const IG_APP_ID: &str = "936619743392459";

/// Logged-in web session cookies. All four are required by the query endpoint.
#[derive(Clone)]
pub struct Session {
    pub session_id: String,
    pub ds_user_id: String,
    pub csrf_token: String,
    pub mid: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ds_user_id", &self.ds_user_id)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Read `SESSIONID`, `DS_USER_ID`, `CSRFTOKEN` and `MID` from the process environment.
    pub fn from_env() -> ScrapeResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name -> value lookup. Blank values count as missing; every
    /// missing name is reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ScrapeResult<Self> {
        let mut missing = Vec::new();
        let mut take = |name: &'static str| -> String {
            match lookup(name).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };
        let session_id = take("SESSIONID");
        let ds_user_id = take("DS_USER_ID");
        let csrf_token = take("CSRFTOKEN");
        let mid = take("MID");

        if !missing.is_empty() {
            return Err(ScrapeError::MissingCredentials(missing));
        }
        Ok(Self { session_id, ds_user_id, csrf_token, mid })
    }

    pub fn cookie_header(&self) -> String {
        format!(
            "sessionid={}; ds_user_id={}; csrftoken={}; mid={};",
            self.session_id, self.ds_user_id, self.csrf_token, self.mid
        )
    }
}

/// Headers the web client sends on GraphQL XHRs.
pub fn build_headers(referer_url: &str, session: &Session) -> ScrapeResult<HeaderMap> {
    let value = |s: &str| {
        HeaderValue::from_str(s).map_err(|e| ScrapeError::InvalidConfig(format!("bad header value: {e}")))
    };
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(HeaderName::from_static("x-requested-with"), HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(HeaderName::from_static("x-ig-app-id"), HeaderValue::from_static(IG_APP_ID));
    headers.insert(REFERER, value(referer_url)?);
    headers.insert(COOKIE, value(&session.cookie_header())?);
    Ok(headers)
}
