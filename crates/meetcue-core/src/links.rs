//! Join link resolution and room-code matching for Google Meet.
//!
//! This module provides:
//! - [`resolve_join_url`]: pick the first usable join URL of a meeting
//! - [`extract_room_code`]: the canonical room code of a Meet URL, used to
//!   recognise a meeting that is already open in the current page
//!
//! # Example
//!
//! ```
//! use meetcue_core::links::extract_room_code;
//!
//! let code = extract_room_code("https://meet.google.com/ABC-defg-hij?authuser=0");
//! assert_eq!(code.as_deref(), Some("abc-defg-hij"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::meeting::{JoinSource, Meeting};

/// Host serving the conferencing pages.
pub const MEET_HOST: &str = "meet.google.com";

/// Regex for extracting URLs from text.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\)\]]+"#).expect("Invalid URL regex"));

/// Regex for detecting Microsoft Outlook SafeLinks.
///
/// The original URL is encoded in the `url` query parameter.
static SAFELINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^/]*safelinks\.protection\.outlook\.com/?\?[^?]*url=([^&]+)")
        .expect("Invalid SafeLink regex")
});

/// Meet room codes are three groups of lowercase letters; hyphens optional.
static ROOM_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{3})-?([a-z]{4})-?([a-z]{3})$").expect("Invalid room code regex")
});

/// Returns the first usable join URL of `meeting`, trying its join sources
/// in order.
pub fn resolve_join_url(meeting: &Meeting) -> Option<String> {
    meeting.join_sources.iter().find_map(resolve_source)
}

/// Resolves a single join source into a URL.
///
/// - `Link` must parse as an `http`/`https` URL
/// - `ConferenceId` is expanded to `https://meet.google.com/<id>`
/// - `Location` yields the first Meet URL found in the text
pub fn resolve_source(source: &JoinSource) -> Option<String> {
    match source {
        JoinSource::Link(link) => usable_link(link),
        JoinSource::ConferenceId(code) => {
            let code = code.trim();
            if code.is_empty() {
                None
            } else {
                Some(format!("https://{MEET_HOST}/{code}"))
            }
        }
        JoinSource::Location(text) => meet_url_in_text(text),
    }
}

/// Extracts the canonical room code (`abc-defg-hij`) from a Meet URL.
///
/// Returns `None` for other hosts and for Meet pages that are not a room
/// (landing page, `/new`, `/lookup/...`).
pub fn extract_room_code(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if parsed.host_str()? != MEET_HOST {
        return None;
    }

    let segment = parsed.path_segments()?.find(|s| !s.is_empty())?;
    let segment = segment.to_ascii_lowercase();
    let caps = ROOM_CODE_REGEX.captures(&segment)?;

    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

fn usable_link(link: &str) -> Option<String> {
    let link = unwrap_safelink(link.trim());
    let parsed = Url::parse(&link).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(link)
}

fn meet_url_in_text(text: &str) -> Option<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| unwrap_safelink(m.as_str()))
        .find(|url| is_meet_url(url))
}

fn is_meet_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| u.host_str() == Some(MEET_HOST))
}

/// Unwraps a Microsoft Outlook SafeLink to get the original URL.
///
/// If the URL is not a SafeLink, it is returned unchanged.
fn unwrap_safelink(url: &str) -> String {
    if let Some(caps) = SAFELINK_REGEX.captures(url)
        && let Some(encoded) = caps.get(1)
        && let Ok(decoded) = urlencoding::decode(encoded.as_str())
    {
        return decoded.into_owned();
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meeting_with(sources: Vec<JoinSource>) -> Meeting {
        let start = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
        let mut meeting = Meeting::new("m", "M", start, start);
        meeting.join_sources = sources;
        meeting
    }

    mod resolve {
        use super::*;

        #[test]
        fn prefers_first_usable_source() {
            let meeting = meeting_with(vec![
                JoinSource::Link("https://meet.google.com/aaa-bbbb-ccc".into()),
                JoinSource::ConferenceId("xxx-yyyy-zzz".into()),
            ]);
            assert_eq!(
                resolve_join_url(&meeting).as_deref(),
                Some("https://meet.google.com/aaa-bbbb-ccc")
            );
        }

        #[test]
        fn skips_unusable_link() {
            let meeting = meeting_with(vec![
                JoinSource::Link("not a url".into()),
                JoinSource::Link("ftp://example.com/file".into()),
                JoinSource::ConferenceId("xxx-yyyy-zzz".into()),
            ]);
            assert_eq!(
                resolve_join_url(&meeting).as_deref(),
                Some("https://meet.google.com/xxx-yyyy-zzz")
            );
        }

        #[test]
        fn conference_id_expands_to_meet_url() {
            let url = resolve_source(&JoinSource::ConferenceId(" abc-defg-hij ".into()));
            assert_eq!(url.as_deref(), Some("https://meet.google.com/abc-defg-hij"));
        }

        #[test]
        fn empty_conference_id_is_unusable() {
            assert_eq!(resolve_source(&JoinSource::ConferenceId("  ".into())), None);
        }

        #[test]
        fn location_yields_meet_url_only() {
            let source = JoinSource::Location(
                "Room 4 / docs https://docs.google.com/x then https://meet.google.com/abc-defg-hij"
                    .into(),
            );
            assert_eq!(
                resolve_source(&source).as_deref(),
                Some("https://meet.google.com/abc-defg-hij")
            );
        }

        #[test]
        fn location_without_meet_url() {
            let source = JoinSource::Location("Conference room B".into());
            assert_eq!(resolve_source(&source), None);
        }

        #[test]
        fn unwraps_safelinks() {
            let link = JoinSource::Link("https://nam01.safelinks.protection.outlook.com/?url=https%3A%2F%2Fmeet.google.com%2Fabc-defg-hij&data=abc".into());
            assert_eq!(
                resolve_source(&link).as_deref(),
                Some("https://meet.google.com/abc-defg-hij")
            );

            let location = JoinSource::Location("Join: https://eur01.safelinks.protection.outlook.com/?url=https%3A%2F%2Fmeet.google.com%2Fxyz-uvwx-rst&sdata=q".into());
            assert_eq!(
                resolve_source(&location).as_deref(),
                Some("https://meet.google.com/xyz-uvwx-rst")
            );
        }

        #[test]
        fn no_sources_no_url() {
            assert_eq!(resolve_join_url(&meeting_with(vec![])), None);
        }
    }

    mod room_code {
        use super::*;

        #[test]
        fn plain_room_url() {
            assert_eq!(
                extract_room_code("https://meet.google.com/abc-defg-hij").as_deref(),
                Some("abc-defg-hij")
            );
        }

        #[test]
        fn ignores_query_and_trailing_slash() {
            assert_eq!(
                extract_room_code("https://meet.google.com/abc-defg-hij/?authuser=1&hs=179")
                    .as_deref(),
                Some("abc-defg-hij")
            );
        }

        #[test]
        fn canonicalizes_case_and_hyphens() {
            assert_eq!(
                extract_room_code("https://MEET.google.com/ABCDEFGHIJ").as_deref(),
                Some("abc-defg-hij")
            );
        }

        #[test]
        fn rejects_non_room_pages() {
            assert_eq!(extract_room_code("https://meet.google.com/"), None);
            assert_eq!(extract_room_code("https://meet.google.com/new"), None);
            assert_eq!(
                extract_room_code("https://meet.google.com/landing?authuser=0"),
                None
            );
        }

        #[test]
        fn rejects_other_hosts() {
            assert_eq!(extract_room_code("https://meet.jit.si/abc-defg-hij"), None);
            assert_eq!(extract_room_code("https://zoom.us/j/123456789"), None);
        }

        #[test]
        fn rejects_garbage() {
            assert_eq!(extract_room_code(""), None);
            assert_eq!(extract_room_code("abc-defg-hij"), None);
        }
    }
}
