//! Certificate share links.
//!
//! Links have the shape `{base}/#/certificate/{org}/{program}/{token}`.
//! The organization and program segments are percent-encoded for the URL;
//! the token is already URL-safe and is carried verbatim in both
//! directions, so the codec performs the only decode of it.

use crate::core::claim::CertificateLinkClaim;
use crate::core::clock::Clock;
use crate::core::codec::{Token, TokenCodec};
use crate::error::{CertLinkError, DecodeFailure};

/// Route prefix that introduces the certificate path segments.
const CERTIFICATE_ROUTE: &str = "certificate";

/// The parts of a parsed share link.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareLink {
    /// Organization identifier from the URL path.
    pub organization_id: String,
    /// Program identifier from the URL path.
    pub program_id: String,
    /// The raw token segment, exactly as it appeared in the URL.
    pub token: String,
}

impl std::fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareLink")
            .field("organization_id", &self.organization_id)
            .field("program_id", &self.program_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ShareLink {
    /// Validate the token and require its claim to match the URL segments.
    ///
    /// A token moved under a different organization or program path is
    /// reported as [`DecodeFailure::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns whatever [`TokenCodec::decode`] returns, or `Invalid` on a
    /// segment mismatch.
    pub fn verify<C: Clock>(
        &self,
        codec: &TokenCodec<C>,
    ) -> Result<CertificateLinkClaim, DecodeFailure> {
        let claim = codec.decode(&self.token)?;
        if claim.organization_id != self.organization_id || claim.program_id != self.program_id {
            tracing::debug!("certificate link path does not match its token");
            return Err(DecodeFailure::Invalid);
        }
        Ok(claim)
    }
}

/// Build a shareable URL for a minted token.
pub fn format_share_link(
    base_url: &str,
    organization_id: &str,
    program_id: &str,
    token: &Token,
) -> String {
    format!(
        "{}/#/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        CERTIFICATE_ROUTE,
        urlencoding::encode(organization_id),
        urlencoding::encode(program_id),
        token.as_str()
    )
}

/// Extract organization, program, and raw token from a share URL.
///
/// Accepts hash routes (`/#/certificate/...`) and plain paths
/// (`/certificate/...`). Query strings and trailing slashes are ignored.
///
/// # Errors
///
/// Returns [`CertLinkError::InvalidShareLink`] if the URL is not absolute,
/// has no `certificate/{org}/{program}/{token}` tail, or a segment is empty.
pub fn parse_share_link(url: &str) -> Result<ShareLink, CertLinkError> {
    let invalid = |reason: &str| CertLinkError::InvalidShareLink {
        url: sanitize_url_for_display(url),
        reason: reason.to_string(),
    };

    let parsed = reqwest::Url::parse(url).map_err(|_| invalid("not an absolute URL"))?;
    let route = match parsed.fragment() {
        Some(fragment) => fragment.split('?').next().unwrap_or_default(),
        None => parsed.path(),
    };
    let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();

    let start = segments
        .iter()
        .rposition(|s| *s == CERTIFICATE_ROUTE)
        .ok_or_else(|| invalid("missing '/certificate/' route"))?;

    let &[organization, program, token] = &segments[start + 1..] else {
        return Err(invalid(
            "expected /certificate/{organization}/{program}/{token}",
        ));
    };

    let decode_segment = |segment: &str, name: &str| {
        urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .map_err(|_| invalid(&format!("{name} segment is not valid percent-encoded UTF-8")))
    };

    Ok(ShareLink {
        organization_id: decode_segment(organization, "organization")?,
        program_id: decode_segment(program, "program")?,
        token: token.to_string(),
    })
}

/// Longest URL echoed back in error messages and logs.
const MAX_DISPLAY_URL_LEN: usize = 256;

/// Reduce a URL to a form safe for error messages.
///
/// Strips credentials (userinfo), query parameters, and fragment so
/// secrets embedded in the URL never reach logs. Only scheme, host, port,
/// and path are preserved. Input that does not parse as a URL keeps only
/// what follows its last `@`, cut at the first `?` or `#`.
pub fn sanitize_url_for_display(url: &str) -> String {
    let display = match reqwest::Url::parse(url) {
        // An `@` left in the query or fragment means the parser split what
        // was meant as userinfo, so the host and port cannot be trusted.
        Ok(parsed) if has_stray_at(&parsed) => format!("{}://[redacted]", parsed.scheme()),
        Ok(mut parsed) => {
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => strip_unparsed_url(url),
    };
    truncate_for_display(&replace_control_chars(&display), MAX_DISPLAY_URL_LEN)
}

fn has_stray_at(url: &reqwest::Url) -> bool {
    url.query().is_some_and(|q| q.contains('@'))
        || url.fragment().is_some_and(|f| f.contains('@'))
}

fn strip_unparsed_url(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, url),
    };
    let host_and_path = rest.rsplit_once('@').map_or(rest, |(_, after)| after);
    let host_and_path = host_and_path.split(['?', '#']).next().unwrap_or_default();
    match scheme {
        Some(scheme) => format!("{scheme}://{host_and_path}"),
        None => host_and_path.to_string(),
    }
}

/// Replace control characters (including ANSI escapes) with U+FFFD so
/// untrusted text cannot drive the terminal.
pub fn replace_control_chars(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

fn truncate_for_display(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}
