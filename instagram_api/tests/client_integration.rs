use std::time::Duration;

use instagram_api::{
    sign, Client, Context, ContextError, Credentials, Error, OAuth, Params, RecentMediaQuery,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const SECRET: &str = "6dc1787668c64c939929c17683d7cb74";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn signed_client(server: &MockServer) -> Client {
    Client::new(Credentials::new("cid", SECRET, "tok"), true)
        .unwrap()
        .with_base_url(&format!("{}/v1", server.uri()))
}

fn query_value(req: &Request, key: &str) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn query_without_sig(req: &Request) -> Params {
    let mut params = Params::from_url(&req.url);
    params.remove("sig");
    params
}

#[tokio::test]
async fn get_self_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("self.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    let resp = client.get_self(&Context::new()).await.unwrap();
    assert_eq!(resp.meta.unwrap().code, 200);
    assert_eq!(resp.data.unwrap().username, "go_ig_test_0219");
    assert!(resp.raw_body.is_none());
}

#[tokio::test]
async fn signed_request_carries_valid_sig() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self/media/recent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("recent_media_page2.json")),
        )
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    let query = RecentMediaQuery::default().with_count(3);
    client.get_recent_media(&Context::new(), &query).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(query_value(req, "count").as_deref(), Some("3"));
    assert_eq!(query_value(req, "access_token").as_deref(), Some("tok"));
    assert_eq!(query_value(req, "client_id"), None);

    let expected = sign::signature("/users/self/media/recent", &query_without_sig(req), SECRET);
    assert_eq!(query_value(req, "sig"), Some(expected));
}

#[tokio::test]
async fn unsigned_client_id_request_has_no_sig() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .and(query_param("client_id", "cid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("self.json")))
        .mount(&mock_server)
        .await;

    let client = Client::new(Credentials::new("cid", "", ""), false)
        .unwrap()
        .with_base_url(&format!("{}/v1", mock_server.uri()));
    client.get_self(&Context::new()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(query_value(&requests[0], "sig"), None);
}

#[tokio::test]
async fn get_media_recent_comments_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/media/1979320569926821011_11073382793/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("comments.json")))
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    let resp = client
        .get_media_recent_comments(&Context::new(), "1979320569926821011_11073382793")
        .await
        .unwrap();
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[0].text, "first!");

    let requests = mock_server.received_requests().await.unwrap();
    let expected = sign::signature(
        "/media/1979320569926821011_11073382793/comments",
        &query_without_sig(&requests[0]),
        SECRET,
    );
    assert_eq!(query_value(&requests[0], "sig"), Some(expected));
}

#[tokio::test]
async fn api_error_from_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(load_fixture("error_invalid_token.json")),
        )
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    match client.get_self(&Context::new()).await {
        Err(Error::Api(e)) => {
            assert_eq!(e.code, 400);
            assert_eq!(e.error_type, "OAuthAccessTokenException");
            assert_eq!(e.error_message, "The access_token provided is invalid.");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    assert!(!client.verify_credentials(&Context::new()).await.unwrap());
}

#[tokio::test]
async fn api_error_without_meta_uses_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    match client.get_self(&Context::new()).await {
        Err(Error::Api(e)) => {
            assert_eq!(e.code, 503);
            assert_eq!(e.error_message, "503 Service Unavailable");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn meta_error_inside_http_200_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("error_invalid_token.json")),
        )
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    let err = client.get_self(&Context::new()).await.unwrap_err();
    assert!(matches!(err, Error::Api(ref e) if e.code == 400));
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    let err = client.get_self(&Context::new()).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn raw_body_is_captured_per_response() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("comments.json");

    Mock::given(method("GET"))
        .and(path("/v1/media/42/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server).with_raw_body(true);
    let (ctx_a, ctx_b) = (Context::new(), Context::new());
    let (a, b) = tokio::join!(
        client.get_media_recent_comments(&ctx_a, "42"),
        client.get_media_recent_comments(&ctx_b, "42"),
    );
    assert_eq!(a.unwrap().raw_body.as_deref(), Some(body.as_str()));
    assert_eq!(b.unwrap().raw_body.as_deref(), Some(body.as_str()));
}

#[tokio::test]
async fn path_with_query_is_malformed_request() {
    let mock_server = MockServer::start().await;
    let client = signed_client(&mock_server);

    let err = client
        .get::<instagram_api::types::UserResponse>(
            &Context::new(),
            "/users/self?count=1",
            Params::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedRequest(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_context_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("self.json")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = Context::new();
    ctx.cancel();
    let err = signed_client(&mock_server).get_self(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::Canceled)));
}

#[tokio::test]
async fn deadline_aborts_slow_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("self.json"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let ctx = Context::new().with_timeout(Duration::from_millis(50));
    let err = signed_client(&mock_server).get_self(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::DeadlineExceeded)));
    assert!(err.is_context());
}

#[tokio::test]
async fn http_client_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("self.json"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = signed_client(&mock_server).with_http_client(http);
    let ctx = Context::new();
    let err = client.get_self(&ctx).await.unwrap_err();

    assert!(ctx.err().is_none());
    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    assert!(!err.is_context());
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let client = Client::new(Credentials::new("cid", SECRET, "tok"), true)
        .unwrap()
        .with_base_url("http://127.0.0.1:1/v1");

    let err = client.get_self(&Context::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    assert!(!err.is_context());
}

#[tokio::test]
async fn unsafe_media_id_is_rejected_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("comments.json")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = signed_client(&mock_server);
    for id in ["42#frag", "42/likes"] {
        let err = client
            .get_media_recent_comments(&Context::new(), id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(_)), "{}: got {:?}", id, err);
    }
}

#[tokio::test]
async fn recent_media_then_next_page_resigns() {
    let mock_server = MockServer::start().await;
    let page1 = load_fixture("recent_media.json").replace("__BASE_URL__", &mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/v1/users/self/media/recent"))
        .and(query_param("max_id", "1979318816263541001_11073382793"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("recent_media_page2.json")),
        )
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/users/self/media/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page1))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = Context::new();
    let client = signed_client(&mock_server);
    let query = RecentMediaQuery::default().with_count(3);
    let first = client.get_recent_media(&ctx, &query).await.unwrap();
    assert_eq!(first.data.len(), 3);
    assert!(first.data.iter().all(|m| !m.id.is_empty()));

    let pagination = first.pagination.unwrap();
    let next = client.next_medias(&ctx, &pagination).await.unwrap().unwrap();
    assert_eq!(next.data.len(), 1);

    let last = next.pagination.unwrap();
    assert!(client.next_medias(&ctx, &last).await.unwrap().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first_sig = query_value(&requests[0], "sig").unwrap();
    let second_sig = query_value(&requests[1], "sig").unwrap();
    assert_ne!(first_sig, second_sig);
    assert!(!second_sig.starts_with("9d0c1f3a"));

    let expected = sign::signature(
        "/users/self/media/recent",
        &query_without_sig(&requests[1]),
        SECRET,
    );
    assert_eq!(second_sig, expected);
    assert_eq!(
        query_value(&requests[1], "access_token").as_deref(),
        Some("tok")
    );
}

#[tokio::test]
async fn oauth_access_token_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fb2e77d.47a0479900504cb3ab4a1f626d174d2d",
            "user": {"id": "1574083", "username": "snoopdogg"}
        })))
        .mount(&mock_server)
        .await;

    let oauth = OAuth::new("cid", SECRET, "http://localhost/")
        .unwrap()
        .with_token_url(&format!("{}/oauth/access_token", mock_server.uri()));
    let token = oauth.access_token(&Context::new(), "abc123").await.unwrap();
    assert_eq!(token, "fb2e77d.47a0479900504cb3ab4a1f626d174d2d");
}

#[tokio::test]
async fn oauth_rejection_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_type": "OAuthException",
            "code": 400,
            "error_message": "Matching code was not found or was already used."
        })))
        .mount(&mock_server)
        .await;

    let oauth = OAuth::new("cid", SECRET, "http://localhost/")
        .unwrap()
        .with_token_url(&format!("{}/oauth/access_token", mock_server.uri()));
    match oauth.access_token(&Context::new(), "used").await {
        Err(Error::Api(e)) => assert_eq!(e.error_type, "OAuthException"),
        other => panic!("expected an API error, got {:?}", other),
    }
}
