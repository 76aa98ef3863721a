use testssl_web::command::{build_args, sanitize_hostname};
use testssl_web::types::{classify_agent, select_stream, ClientType, ScanRequest, StreamKind};

#[test]
fn curl_request_builds_exact_command() {
    // GET /?q=example.com with agent curl/8.1 and QUICK unset.
    let client = classify_agent(Some("curl/8.1"));
    assert_eq!(client, ClientType::Agent);
    assert_eq!(select_stream(client), StreamKind::Primary);

    let hostname = sanitize_hostname("example.com").expect("valid hostname");
    let request = ScanRequest {
        hostname: hostname.to_string(),
        client,
        quick: false,
        console_echo: false,
    };
    assert_eq!(
        build_args(&request),
        vec!["--quiet", "--htmlfile", "/dev/stderr", "example.com"]
    );
}

#[test]
fn quick_flag_only_adds_headers() {
    let request = ScanRequest {
        hostname: "example.com".to_string(),
        client: ClientType::Browser,
        quick: true,
        console_echo: false,
    };
    let args = build_args(&request);
    assert_eq!(args[1], "--headers");
    assert_eq!(args.last().unwrap(), "example.com");
}

#[test]
fn hostname_never_reaches_args_unvalidated() {
    assert!(sanitize_hostname("example.com; rm -rf /").is_err());
    assert!(sanitize_hostname("`id`").is_err());
    assert!(sanitize_hostname("host name").is_err());
}
