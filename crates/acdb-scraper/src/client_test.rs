use super::*;

const TEMPLATE: &str = "https://www.nationalnanpa.com/enas/displayNpaCityReport.do?npaId={code}";

fn code(s: &str) -> AreaCode {
    s.parse().unwrap()
}

fn test_client(template: &str) -> NanpaClient {
    NanpaClient::new(template, 5, "acdb-test/0.1", 0, 0).expect("failed to build test client")
}

#[test]
fn lookup_url_substitutes_zero_padded_code() {
    let client = test_client(TEMPLATE);
    assert_eq!(
        client.lookup_url(code("212")).unwrap(),
        "https://www.nationalnanpa.com/enas/displayNpaCityReport.do?npaId=212"
    );
    assert_eq!(
        client.lookup_url(code("007")).unwrap(),
        "https://www.nationalnanpa.com/enas/displayNpaCityReport.do?npaId=007"
    );
}

#[test]
fn lookup_url_supports_path_placeholder() {
    let client = test_client("http://localhost:8080/npa/{code}/report");
    assert_eq!(
        client.lookup_url(code("905")).unwrap(),
        "http://localhost:8080/npa/905/report"
    );
}

#[test]
fn new_rejects_template_without_placeholder() {
    let result = NanpaClient::new("https://example.com/lookup", 5, "ua", 0, 0);
    assert!(
        matches!(result, Err(FetchError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}

#[test]
fn new_rejects_relative_template() {
    let result = NanpaClient::new("/lookup/{code}", 5, "ua", 0, 0);
    assert!(
        matches!(result, Err(FetchError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}

#[test]
fn new_rejects_non_http_scheme() {
    let result = NanpaClient::new("ftp://example.com/{code}", 5, "ua", 0, 0);
    assert!(
        matches!(result, Err(FetchError::InvalidUrl { ref reason, .. }) if reason.contains("ftp")),
        "expected InvalidUrl mentioning the scheme"
    );
}
