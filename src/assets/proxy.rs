//! Origin classification and same-origin proxy routing.
//!
//! Flattened bitmap export requires every painted source to be local,
//! same-origin, or routed through the same-origin proxy. The types here let a
//! session decide that before any pixels move, and rewrite foreign URLs so
//! the decision comes out right.

use crate::foundation::error::{VeneerError, VeneerResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Where an image's bytes came from, as far as export gating is concerned.
pub enum Provenance {
    /// Local filesystem or built in memory.
    Local,
    /// Remote, served from the application's own origin.
    SameOrigin,
    /// Remote, foreign origin; flattened export would be tainted.
    CrossOrigin,
    /// Remote, rewritten through the same-origin proxy endpoint.
    Proxied,
}

impl Provenance {
    /// Whether a flattened bitmap containing this source may be exported.
    pub fn exportable(self) -> bool {
        !matches!(self, Provenance::CrossOrigin)
    }
}

/// Classify a source string against the application origin.
///
/// Schemeless strings are local paths. `http(s)` URLs are same-origin when
/// scheme and authority match `app_origin` (case-insensitively) and
/// cross-origin otherwise, including when no application origin is known.
pub fn classify_origin(source: &str, app_origin: Option<&str>) -> Provenance {
    let Some(source_origin) = origin_of(source) else {
        return Provenance::Local;
    };
    match app_origin.and_then(origin_of) {
        Some(app) if app == source_origin => Provenance::SameOrigin,
        _ => Provenance::CrossOrigin,
    }
}

/// Whether `s` is a remote `http(s)` URL rather than a local path.
pub(crate) fn is_remote_url(s: &str) -> bool {
    origin_of(s).is_some()
}

/// `scheme://authority` of an `http(s)` URL, lowercased. `None` for anything
/// else, including other schemes.
fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    if authority.is_empty() {
        return None;
    }

    Some(format!(
        "{}://{}",
        scheme.to_ascii_lowercase(),
        authority.to_ascii_lowercase()
    ))
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Same-origin passthrough endpoint, e.g. `/api/proxy-image`.
pub struct ProxyRoute {
    endpoint: String,
}

impl ProxyRoute {
    /// Route targeting `endpoint`; must be non-empty.
    pub fn new(endpoint: impl Into<String>) -> VeneerResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(VeneerError::validation("proxy endpoint must be non-empty"));
        }
        Ok(Self { endpoint })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Rewrite a remote URL to pass through the proxy:
    /// `{endpoint}?url=<percent-encoded url>`.
    pub fn route(&self, url: &str) -> String {
        format!("{}?url={}", self.endpoint, percent_encode(url))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(raw: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(raw.len() * 3);
    for &b in raw.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0xF) as usize] as char);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemeless_sources_are_local() {
        assert_eq!(classify_origin("slabs/verde.jpg", None), Provenance::Local);
        assert_eq!(
            classify_origin("mockups/bathroom.png", Some("https://evershine.example")),
            Provenance::Local
        );
    }

    #[test]
    fn origin_match_is_case_insensitive_on_scheme_and_host() {
        let app = Some("https://Evershine.Example");
        assert_eq!(
            classify_origin("HTTPS://evershine.example/img/a.jpg", app),
            Provenance::SameOrigin
        );
        assert_eq!(
            classify_origin("https://cdn.example/img/a.jpg", app),
            Provenance::CrossOrigin
        );
    }

    #[test]
    fn remote_url_without_known_app_origin_is_cross_origin() {
        assert_eq!(
            classify_origin("https://cdn.example/a.jpg", None),
            Provenance::CrossOrigin
        );
    }

    #[test]
    fn port_is_part_of_the_origin() {
        let app = Some("https://evershine.example:8443");
        assert_eq!(
            classify_origin("https://evershine.example/a.jpg", app),
            Provenance::CrossOrigin
        );
        assert_eq!(
            classify_origin("https://evershine.example:8443/a.jpg", app),
            Provenance::SameOrigin
        );
    }

    #[test]
    fn route_percent_encodes_the_url_parameter() {
        let proxy = ProxyRoute::new("/api/proxy-image").unwrap();
        assert_eq!(
            proxy.route("https://cdn.example/slabs/verde marble.jpg?v=1&s=2"),
            "/api/proxy-image?url=https%3A%2F%2Fcdn.example%2Fslabs%2Fverde%20marble.jpg%3Fv%3D1%26s%3D2"
        );
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        assert!(ProxyRoute::new("  ").is_err());
    }

    #[test]
    fn only_cross_origin_blocks_export() {
        assert!(Provenance::Local.exportable());
        assert!(Provenance::SameOrigin.exportable());
        assert!(Provenance::Proxied.exportable());
        assert!(!Provenance::CrossOrigin.exportable());
    }
}
