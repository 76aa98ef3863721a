/// How the caller was classified from its User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    /// Command-line HTTP tool (curl, wget); wants raw console text.
    Agent,
    /// Everything else; wants the rendered HTML report.
    Browser,
}

/// The two logical output channels of the scan process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Console/progress output on the child's stdout pipe.
    Primary,
    /// HTML report redirected onto the child's stderr pipe.
    Secondary,
}

/// Classify a caller from its User-Agent string.
///
/// Case-sensitive substring match: `curl` or `wget` anywhere in the agent
/// string means a CLI client. A missing User-Agent counts as a browser.
pub fn classify_agent(user_agent: Option<&str>) -> ClientType {
    match user_agent {
        Some(ua) if ua.contains("curl") || ua.contains("wget") => ClientType::Agent,
        _ => ClientType::Browser,
    }
}

/// Pure selector: which output channel a client type gets to see.
pub fn select_stream(client: ClientType) -> StreamKind {
    match client {
        ClientType::Agent => StreamKind::Primary,
        ClientType::Browser => StreamKind::Secondary,
    }
}

/// One scan request, fixed for the lifetime of the HTTP request.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub hostname: String,
    pub client: ClientType,
    pub quick: bool,
    pub console_echo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curl_and_wget_are_agents() {
        assert_eq!(classify_agent(Some("curl/8.1")), ClientType::Agent);
        assert_eq!(classify_agent(Some("wget/1.21")), ClientType::Agent);
        assert_eq!(
            classify_agent(Some("fetcher (curl-compatible)")),
            ClientType::Agent
        );
    }

    #[test]
    fn browsers_and_missing_agent_are_browsers() {
        assert_eq!(classify_agent(Some("Mozilla/5.0")), ClientType::Browser);
        // match is case-sensitive by contract
        assert_eq!(classify_agent(Some("CURL/8.1")), ClientType::Browser);
        assert_eq!(classify_agent(None), ClientType::Browser);
    }

    #[test]
    fn selector_maps_agent_to_primary() {
        assert_eq!(select_stream(ClientType::Agent), StreamKind::Primary);
        assert_eq!(select_stream(ClientType::Browser), StreamKind::Secondary);
    }
}
