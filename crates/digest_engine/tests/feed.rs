use digest_core::EntryId;
use digest_engine::{FeedError, FeedSettings, FeedSource, MinifluxClient};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;

fn client_for(server: &MockServer) -> MinifluxClient {
    MinifluxClient::new(FeedSettings::new(server.uri(), "secret")).expect("client")
}

#[tokio::test]
async fn lists_unread_entries_with_token() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/entries"))
        .and(query_param("status", "unread"))
        .and(header("X-Auth-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "entries": [
                { "id": 11, "title": "First", "url": "https://a.example/1" },
                { "id": "12", "title": null, "url": "https://youtu.be/xyz" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = client_for(&server).list_unread().await.expect("list ok");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, Some(EntryId::Number(11)));
    assert_eq!(entries[0].title(), "First");
    assert_eq!(entries[1].id, Some(EntryId::Text("12".to_string())));
    assert_eq!(entries[1].title(), "");
    assert_eq!(entries[1].resolved_id(), Some(12));
}

#[tokio::test]
async fn listing_failure_reports_status() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/entries"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Access Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_unread().await.expect_err("401");

    assert_eq!(
        err,
        FeedError::HttpStatus {
            status: 401,
            message: "Access Unauthorized".to_string()
        }
    );
}

#[tokio::test]
async fn non_list_entries_is_invalid_payload() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": {} })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_unread().await.expect_err("invalid");

    assert!(matches!(err, FeedError::InvalidPayload(_)), "{err:?}");
}

#[tokio::test]
async fn mark_read_walks_request_shapes_until_one_is_accepted() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/entries"))
        .and(query_param("status", "read"))
        .and(body_json(json!({ "entry_ids": [42] })))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/entries"))
        .and(body_json(json!({ "entry_ids": [42], "status": "read" })))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/entries"))
        .and(query_param("status", "read"))
        .and(header("X-Auth-Token", "secret"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/entries/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    client_for(&server).mark_read(42).await.expect("third shape accepted");
}

#[tokio::test]
async fn mark_read_stops_on_other_failures() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/entries"))
        .and(query_param("status", "read"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).mark_read(7).await.expect_err("500 is final");

    assert!(matches!(err, FeedError::HttpStatus { status: 500, .. }), "{err:?}");
}

#[tokio::test]
async fn mark_read_rejection_on_last_shape_is_an_error() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(404))
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(&server).mark_read(9).await.expect_err("all rejected");

    assert!(matches!(err, FeedError::HttpStatus { status: 404, .. }), "{err:?}");
    let requests = server.received_requests().await.expect("recording enabled");
    let final_request = requests.last().expect("four requests");
    assert_eq!(final_request.method.as_str(), "PUT");
    assert_eq!(final_request.url.path(), "/v1/entries/9");
}
