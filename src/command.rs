use thiserror::Error;

use crate::types::ScanRequest;

/// Longest name we accept; matches the DNS limit.
const MAX_HOSTNAME_LEN: usize = 253;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostnameError {
    #[error("hostname is empty")]
    Empty,
    #[error("hostname exceeds {MAX_HOSTNAME_LEN} characters")]
    TooLong,
    #[error("hostname contains forbidden character {0:?}")]
    ForbiddenChar(char),
}

/// Validate a user-supplied hostname before it goes anywhere near a process
/// argument list.
///
/// Strict allow-list: ASCII alphanumerics plus `.` `-` `_` `:` and the
/// brackets of an IPv6 literal. Everything else is rejected outright; we
/// never try to escape our way around a suspicious name. The child is
/// spawned from an argv vector (no shell), so a name that passes here cannot
/// be interpreted as anything but a single argument.
pub fn sanitize_hostname(raw: &str) -> Result<&str, HostnameError> {
    if raw.is_empty() {
        return Err(HostnameError::Empty);
    }
    if raw.len() > MAX_HOSTNAME_LEN {
        return Err(HostnameError::TooLong);
    }
    for c in raw.chars() {
        let ok = c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '[' | ']');
        if !ok {
            return Err(HostnameError::ForbiddenChar(c));
        }
    }
    Ok(raw)
}

/// Build the testssl.sh argument vector for one request.
///
/// The tool always prints console output to stdout; `--htmlfile /dev/stderr`
/// abuses the stderr pipe to stream the HTML report instead of writing a
/// file. The hostname must already have passed [`sanitize_hostname`].
pub fn build_args(req: &ScanRequest) -> Vec<String> {
    let mut args = vec!["--quiet".to_string()];
    if req.quick {
        args.push("--headers".to_string());
    }
    args.push("--htmlfile".to_string());
    args.push("/dev/stderr".to_string());
    args.push(req.hostname.clone());
    args
}
