use crate::foundation::IdentityError;
use reqwest::Url;

/// Parse an absolute http(s) base URL from configuration.
pub fn parse_base_url(field: &str, raw: &str) -> Result<Url, IdentityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::ConfigError(format!("{field} is empty")));
    }
    let url = Url::parse(trimmed).map_err(|err| IdentityError::ConfigError(format!("invalid {field}={trimmed}: {err}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(IdentityError::ConfigError(format!("{field} must use http or https: got scheme={}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(IdentityError::ConfigError(format!("{field} cannot be used as a base url: {trimmed}")));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
///
/// Every segment is treated as opaque data: `/`, `?`, `#`, `%` and spaces inside a
/// DID are escaped so the server sees exactly one path segment per element. `.` and
/// `..` would be dropped by path normalization and are rejected.
pub fn join_segments<S: AsRef<str>>(base: &Url, segments: &[S]) -> Result<Url, IdentityError> {
    if let Some(dot) = segments.iter().map(|segment| segment.as_ref()).find(|segment| is_dot_segment(segment)) {
        return Err(IdentityError::InvalidInput(format!("path segment {dot:?} is not allowed")));
    }
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| IdentityError::ConfigError(format!("cannot append path to url={base}")))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment.as_ref());
        }
    }
    Ok(url)
}

pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Port a request to `url` will use (explicit, or the scheme default).
pub fn effective_port(url: &Url, fallback: u16) -> u16 {
    url.port_or_known_default().unwrap_or(fallback)
}

/// `url` with userinfo replaced by `redacted`. Text that does not parse is hidden entirely.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return "<unparseable url>".to_string();
    };
    if parsed.username().is_empty() && parsed.password().is_none() {
        return url.to_string();
    }
    if parsed.set_password(None).is_err() || parsed.set_username("redacted").is_err() {
        return "<redacted url>".to_string();
    }
    parsed.to_string()
}
