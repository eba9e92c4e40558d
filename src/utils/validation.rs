use crate::utils::error::{CurlError, Result};
use std::net::IpAddr;
use url::Host;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> CurlError {
    CurlError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parses a bare host name or IP address (no scheme, port or path).
/// IPv6 addresses may be given with or without brackets.
pub fn validate_host(field_name: &str, host: &str) -> Result<Host> {
    if host.trim().is_empty() {
        return Err(invalid(field_name, host, "Host cannot be empty"));
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(match ip {
            IpAddr::V4(addr) => Host::Ipv4(addr),
            IpAddr::V6(addr) => Host::Ipv6(addr),
        });
    }

    Host::parse(host).map_err(|e| invalid(field_name, host, format!("Invalid host: {}", e)))
}

/// 請求路徑必須是以 `/` 開頭的絕對路徑。
pub fn validate_request_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(invalid(field_name, path, "Path must start with '/'"));
    }

    if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid(
            field_name,
            path,
            "Path contains whitespace or control characters",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(invalid(field_name, "[]", "List cannot be empty"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
