use crate::error::{ScrapeError, ScrapeResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Kind of target content, as it appears in the URL path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Reel, // /reel/<shortcode>
    Post, // /p/<shortcode>
}

impl MediaKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            MediaKind::Reel => "reel",
            MediaKind::Post => "p",
        }
    }
}

/// Target content parsed from a reel or post URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub shortcode: String,
}

fn media_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"instagram\.com/(reel|p)/([^/?#]+)").expect("static regex"))
}

impl MediaRef {
    pub fn parse(url: &str) -> ScrapeResult<Self> {
        let caps = media_re()
            .captures(url.trim())
            .ok_or_else(|| ScrapeError::InvalidUrl(url.trim().to_string()))?;
        let kind = if &caps[1] == "reel" { MediaKind::Reel } else { MediaKind::Post };
        Ok(Self { kind, shortcode: caps[2].to_string() })
    }

    /// Canonical page URL, sent as the `Referer` header.
    pub fn referer_url(&self) -> String {
        format!("https://www.instagram.com/{}/{}/", self.kind.path_segment(), self.shortcode)
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.path_segment(), self.shortcode)
    }
}
