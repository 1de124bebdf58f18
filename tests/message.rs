mod common;

use common::{memory_storage, test_config, TestServer, VALID_TOKEN};
use customer_api::types::MessagePolicy;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn message_inherits_the_default_authorizer() {
    let storage = memory_storage();
    let server = TestServer::spawn(storage.clone()).await;

    let res = server
        .client
        .get(server.url("/api/v1/message"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.get("/api/v1/message").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "message": "Hello" })
    );

    assert_eq!(storage.calls(), 0);
}

#[tokio::test]
async fn public_message_skips_the_authorizer() {
    let server =
        TestServer::spawn_with(test_config(MessagePolicy::Public), memory_storage()).await;

    for token in [None, Some("forged"), Some(VALID_TOKEN)] {
        let mut req = server.client.get(server.url("/api/v1/message"));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), r#"{"message":"Hello"}"#);
    }
}

#[tokio::test]
async fn message_ignores_request_body_and_headers() {
    let server = TestServer::spawn(memory_storage()).await;

    let res = server
        .get("/api/v1/message")
        .header("content-type", "application/json")
        .header("x-api-key", "anything")
        .body(r#"{"message":"Bye"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"message":"Hello"}"#);
}
