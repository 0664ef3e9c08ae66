//! Coarse request-key classification
//!
//! The ladder only needs a rough idea of where a URL points; anything it
//! does not recognize gets the generic candidate list. Host matching is
//! suffix-based so subdomains (`www.`, `m.`, `vm.`) classify the same.

use crate::core::admission::RequestKey;
use url::Url;

/// Coarse platform classification of a request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformHint {
    /// YouTube Shorts (or a youtu.be short link)
    YoutubeShorts,
    /// Regular YouTube video (not a Short)
    YoutubeRegular,
    /// TikTok video
    Tiktok,
    /// Instagram reel
    InstagramReel,
    /// Instagram post (image-first)
    InstagramPost,
    /// Anything else
    Generic,
}

impl PlatformHint {
    /// Classify a request key by host and path.
    pub fn classify(key: &RequestKey) -> Self {
        let Ok(url) = Url::parse(key.as_str()) else {
            return PlatformHint::Generic;
        };
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        let path = url.path().to_ascii_lowercase();

        if host_matches(&host, "youtu.be") {
            return PlatformHint::YoutubeShorts;
        }
        if host_matches(&host, "youtube.com") {
            return if path.starts_with("/shorts/") {
                PlatformHint::YoutubeShorts
            } else {
                PlatformHint::YoutubeRegular
            };
        }
        if host_matches(&host, "tiktok.com") {
            return PlatformHint::Tiktok;
        }
        if host_matches(&host, "instagram.com") || host_matches(&host, "instagr.am") {
            return if path.starts_with("/p/") {
                PlatformHint::InstagramPost
            } else {
                PlatformHint::InstagramReel
            };
        }
        PlatformHint::Generic
    }

    /// True for hints this gateway is normally willing to serve.
    pub fn is_supported(&self) -> bool {
        !matches!(self, PlatformHint::YoutubeRegular)
    }

    /// Coarse source label recorded with download stats.
    pub fn source_label(&self) -> &'static str {
        match self {
            PlatformHint::YoutubeShorts | PlatformHint::YoutubeRegular => "shorts",
            PlatformHint::Tiktok => "tiktok",
            PlatformHint::InstagramReel | PlatformHint::InstagramPost => "reels",
            PlatformHint::Generic => "other",
        }
    }

    /// True for either Instagram variant.
    pub fn is_instagram(&self) -> bool {
        matches!(self, PlatformHint::InstagramReel | PlatformHint::InstagramPost)
    }
}

/// Exact host or dot-separated subdomain match.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
