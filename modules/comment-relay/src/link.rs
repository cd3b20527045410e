//! Link classification and YouTube video id extraction.
//!
//! User input is untrusted: [`detect_platform`] never fails, while
//! [`extract_video_id`] only accepts the watch, short-link, embed and `/v/`
//! forms.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Short-link hosts: the id is the first path segment.
const SHORT_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Canonical and mobile hosts: `/watch?v=`, `/embed/{id}`, `/v/{id}`.
const CANONICAL_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unrecognized link: {0}")]
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Youtube,
    Unknown,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Youtube => write!(f, "youtube"),
            Platform::Unknown => write!(f, "unknown"),
        }
    }
}

fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_ascii_lowercase())
}

/// Classify a link by its host. Anything unparsable is `Unknown`.
pub fn detect_platform(url: &str) -> Platform {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return Platform::Unknown;
    };

    match host_of(&parsed) {
        Some(host) if SHORT_HOSTS.contains(&host.as_str()) => Platform::Youtube,
        Some(host) if CANONICAL_HOSTS.contains(&host.as_str()) => Platform::Youtube,
        _ => Platform::Unknown,
    }
}

/// Extract the video id from a YouTube link.
pub fn extract_video_id(url: &str) -> Result<String, LinkError> {
    let unrecognized = || LinkError::Unrecognized(url.to_string());

    let parsed = Url::parse(url.trim()).map_err(|_| unrecognized())?;
    let host = host_of(&parsed).ok_or_else(unrecognized)?;
    let mut segments = parsed.path().trim_start_matches('/').split('/');

    let id = if SHORT_HOSTS.contains(&host.as_str()) {
        segments.next().map(str::to_string)
    } else if CANONICAL_HOSTS.contains(&host.as_str()) {
        match segments.next() {
            Some("watch") if parsed.path() == "/watch" => parsed
                .query_pairs()
                .find(|(key, value)| key == "v" && !value.is_empty())
                .map(|(_, value)| value.into_owned()),
            Some("embed") | Some("v") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    id.filter(|id| !id.is_empty()).ok_or_else(unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_every_supported_form() {
        let forms = [
            "https://www.youtube.com/watch?v=B9oIps6Cb50",
            "https://www.youtube.com/watch?v=B9oIps6Cb50&t=5",
            "https://youtube.com/watch?feature=share&v=B9oIps6Cb50",
            "https://m.youtube.com/watch?v=B9oIps6Cb50",
            "http://www.youtube.com/embed/B9oIps6Cb50",
            "https://www.youtube.com/embed/B9oIps6Cb50?start=10",
            "https://www.youtube.com/v/B9oIps6Cb50",
            "https://youtu.be/B9oIps6Cb50",
            "https://www.youtu.be/B9oIps6Cb50",
            "https://youtu.be/B9oIps6Cb50?si=xyz",
            "  https://WWW.YOUTUBE.COM/watch?v=B9oIps6Cb50  ",
        ];

        for form in forms {
            assert_eq!(
                extract_video_id(form).as_deref(),
                Ok("B9oIps6Cb50"),
                "form: {form}"
            );
        }
    }

    #[test]
    fn blank_v_is_skipped_for_the_next_one() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=&v=B9oIps6Cb50").as_deref(),
            Ok("B9oIps6Cb50")
        );
        assert!(extract_video_id("https://www.youtube.com/watch?v=&v=").is_err());
    }

    #[test]
    fn short_link_takes_first_segment_only() {
        assert_eq!(
            extract_video_id("https://youtu.be/B9oIps6Cb50/extra").as_deref(),
            Ok("B9oIps6Cb50")
        );
    }

    #[test]
    fn rejects_unrecognized_links() {
        let bad = [
            "https://example.com/video",
            "https://vimeo.com/watch?v=B9oIps6Cb50",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/watch/extra?v=B9oIps6Cb50",
            "https://www.youtube.com/channel/UC123",
            "https://www.youtube.com/embed/",
            "https://youtu.be/",
            "not a url",
            "",
        ];

        for url in bad {
            assert!(
                matches!(extract_video_id(url), Err(LinkError::Unrecognized(_))),
                "should reject: {url}"
            );
        }
    }

    #[test]
    fn detects_youtube_hosts() {
        assert_eq!(detect_platform("https://www.youtube.com/watch?v=x"), Platform::Youtube);
        assert_eq!(detect_platform("https://m.youtube.com/watch?v=x"), Platform::Youtube);
        assert_eq!(detect_platform("https://youtu.be/x"), Platform::Youtube);
        assert_eq!(detect_platform("https://www.youtu.be/B9oIps6Cb50"), Platform::Youtube);
    }

    #[test]
    fn unknown_hosts_and_garbage_never_fail() {
        let inputs = [
            "https://example.com/video",
            "https://notyoutube.com/watch?v=x",
            "http://",
            "http://[::1",
            "::::",
            "\u{0}\u{ffff}",
            "",
        ];
        for input in inputs {
            assert_eq!(detect_platform(input), Platform::Unknown, "input: {input:?}");
        }
        assert_eq!(Platform::Unknown.to_string(), "unknown");
        assert_eq!(Platform::Youtube.to_string(), "youtube");
    }
}
