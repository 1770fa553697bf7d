use super::*;
use shared::domain::PageNumber;

fn response(path: Option<&str>, page: Option<i64>) -> AnswerResponse {
    AnswerResponse {
        answer: "42".to_string(),
        highlighted_pdf_path: path.map(str::to_string),
        page_number: page,
    }
}

#[test]
fn ask_url_uses_well_known_port_and_path() {
    let endpoint = ServiceEndpoint::for_host("10.0.0.7").expect("endpoint");
    assert_eq!(endpoint.ask_url().as_str(), "http://10.0.0.7:5001/chatbot");
}

#[test]
fn resource_url_joins_relative_and_rooted_paths() {
    let endpoint = ServiceEndpoint::for_host("localhost").expect("endpoint");
    assert_eq!(
        endpoint.resource_url("docs/a.pdf").expect("url").as_str(),
        "http://localhost:5001/docs/a.pdf"
    );
    assert_eq!(
        endpoint.resource_url("/docs/a.pdf").expect("url").as_str(),
        "http://localhost:5001/docs/a.pdf"
    );
}

#[test]
fn viewer_target_carries_page_from_response() {
    let endpoint = ServiceEndpoint::for_host("127.0.0.1").expect("endpoint");
    let target = endpoint
        .viewer_target(&response(Some("docs/a.pdf"), Some(3)))
        .expect("target")
        .expect("highlight present");

    assert_eq!(target.resource_url, "http://127.0.0.1:5001/docs/a.pdf");
    assert_eq!(target.page, PageNumber::new(3).expect("page"));
    assert_eq!(
        target.viewer_url(),
        "http://127.0.0.1:5001/docs/a.pdf#page=3"
    );
}

#[test]
fn viewer_target_defaults_to_first_page() {
    let endpoint = ServiceEndpoint::for_host("127.0.0.1").expect("endpoint");
    let target = endpoint
        .viewer_target(&response(Some("docs/a.pdf"), None))
        .expect("target")
        .expect("highlight present");
    assert_eq!(target.page, PageNumber::FIRST);
}

#[test]
fn no_highlight_means_no_viewer() {
    let endpoint = ServiceEndpoint::for_host("127.0.0.1").expect("endpoint");
    assert!(endpoint
        .viewer_target(&response(None, Some(3)))
        .expect("target")
        .is_none());
    assert!(endpoint
        .viewer_target(&response(Some("  "), None))
        .expect("target")
        .is_none());
}

#[test]
fn rejects_unparseable_host() {
    let err = ServiceEndpoint::new("http", "bad host", 5001, "chatbot").expect_err("invalid");
    assert!(err.to_string().contains("bad host"));
}

#[test]
fn viewer_path_cannot_leave_the_service_origin() {
    let endpoint = ServiceEndpoint::for_host("127.0.0.1").expect("endpoint");
    for path in [
        "https://evil.example/a.pdf",
        "file:///etc/passwd",
        "http://127.0.0.1:8080/a.pdf",
        "javascript:alert(1)",
    ] {
        let err = endpoint
            .viewer_target(&response(Some(path), Some(2)))
            .expect_err("foreign path rejected");
        assert!(
            matches!(err, AskError::ForeignViewerUrl { .. }),
            "{path} gave {err:?}"
        );
        assert_eq!(err.kind(), crate::error::FailureKind::Malformed);
    }
}

#[test]
fn same_origin_absolute_path_is_accepted() {
    let endpoint = ServiceEndpoint::for_host("127.0.0.1").expect("endpoint");
    let url = endpoint
        .resource_url("http://127.0.0.1:5001/static/a.pdf")
        .expect("same origin");
    assert_eq!(url.as_str(), "http://127.0.0.1:5001/static/a.pdf");
}
