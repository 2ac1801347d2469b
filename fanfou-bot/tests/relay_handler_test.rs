//! Integration tests for the chat side: the handler chain built by the runner, driven
//! with inbound messages, against a mocked provider and a recording bot.

mod common;

use common::{harness, inbound, Harness};
use fanfou_bot::{build_handler_chain, BotConfig};
use mockito::Matcher;
use relay_core::{Credential, HandlerResponse, Identity, MessageContent};
use storage::CredentialStore;

const ALICE: i64 = 1001;

async fn authorize(h: &Harness, identity: i64) {
    h.store
        .put(Identity(identity), &Credential::new("alice-token", "alice-secret"))
        .await
        .unwrap();
}

async fn run(h: &Harness, config: &BotConfig, content: MessageContent) -> HandlerResponse {
    let chain = build_handler_chain(config, &h.components);
    chain.handle(&inbound(ALICE, content)).await.unwrap()
}

/// **Test: /start replies with the authorize URL carrying the sender's identity.**
#[tokio::test]
async fn test_start_replies_with_authorize_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/oauth/request_token")
        .with_status(200)
        .with_body("oauth_token=req-token&oauth_token_secret=req-secret")
        .create_async()
        .await;
    let h = harness(&server.url(), true);

    let response = run(&h, &h.config, MessageContent::from_text("/start")).await;

    let sent = h.bot.sent_to(Identity(ALICE));
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("/oauth/authorize?oauth_token=req-token"));
    assert!(sent[0].contains("identity%3D1001"));
    assert_eq!(response, HandlerResponse::Reply(sent[0].clone()));
}

/// **Test: /start reports a provider failure to the user instead of failing the chain.**
#[tokio::test]
async fn test_start_provider_failure_is_replied() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/oauth/request_token")
        .with_status(401)
        .with_body("Invalid consumer")
        .create_async()
        .await;
    let h = harness(&server.url(), true);

    run(&h, &h.config, MessageContent::from_text("/start")).await;

    assert_eq!(h.bot.sent_to(Identity(ALICE)), vec!["Invalid consumer".to_string()]);
}

/// **Test: Text from an authorized user is posted and the post URL is replied.**
#[tokio::test]
async fn test_text_is_posted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/statuses/update.json")
        .match_body(Matcher::UrlEncoded("status".into(), "hello".into()))
        .with_status(200)
        .with_body(r#"{"id":"42"}"#)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;

    run(&h, &h.config, MessageContent::from_text("hello")).await;

    mock.assert_async().await;
    assert_eq!(
        h.bot.sent_to(Identity(ALICE)),
        vec!["https://fanfou.com/statuses/42".to_string()]
    );
}

/// **Test: Text from an unknown user gets the /start hint and makes no provider call.**
#[tokio::test]
async fn test_text_unauthenticated_gets_hint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/statuses/update.json")
        .expect(0)
        .create_async()
        .await;
    let h = harness(&server.url(), true);

    run(&h, &h.config, MessageContent::from_text("hello")).await;

    mock.assert_async().await;
    let sent = h.bot.sent_to(Identity(ALICE));
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("/start"));
}

/// **Test: A provider business error is replied verbatim.**
#[tokio::test]
async fn test_text_provider_error_replied_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/statuses/update.json")
        .with_status(400)
        .with_body(r#"{"request":"/statuses/update.json","error":"duplicate status"}"#)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;

    run(&h, &h.config, MessageContent::from_text("hello")).await;

    assert_eq!(h.bot.sent_to(Identity(ALICE)), vec!["duplicate status".to_string()]);
}

/// **Test: A photo is downloaded through the transport and uploaded with its caption.**
#[tokio::test]
async fn test_photo_is_uploaded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/photos/upload.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("evening walk".to_string()),
            Matcher::Regex("photo-bytes".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"p1"}"#)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;
    h.bot.add_file("file-large", b"photo-bytes");

    run(
        &h,
        &h.config,
        MessageContent::Photo {
            file_ref: "file-large".to_string(),
            caption: Some("evening walk".to_string()),
        },
    )
    .await;

    mock.assert_async().await;
    assert_eq!(
        h.bot.sent_to(Identity(ALICE)),
        vec!["https://fanfou.com/statuses/p1".to_string()]
    );
}

/// **Test: A failed download is replied and nothing is uploaded.**
#[tokio::test]
async fn test_photo_download_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/photos/upload.json")
        .expect(0)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;

    run(
        &h,
        &h.config,
        MessageContent::Photo {
            file_ref: "missing".to_string(),
            caption: None,
        },
    )
    .await;

    mock.assert_async().await;
    assert_eq!(h.bot.sent_to(Identity(ALICE)).len(), 1);
}

/// **Test: An unregistered command is posted verbatim as a status.**
#[tokio::test]
async fn test_unknown_command_is_posted_as_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/statuses/update.json")
        .match_body(Matcher::UrlEncoded(
            "status".into(),
            "/me is happy today".into(),
        ))
        .with_status(200)
        .with_body(r#"{"id":"43"}"#)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;

    let response = run(&h, &h.config, MessageContent::from_text("/me is happy today")).await;

    mock.assert_async().await;
    let url = "https://fanfou.com/statuses/43".to_string();
    assert_eq!(h.bot.sent_to(Identity(ALICE)), vec![url.clone()]);
    assert_eq!(response, HandlerResponse::Reply(url));
}

/// **Test: Unsupported content (stickers, voice) gets no post and no reply.**
#[tokio::test]
async fn test_unsupported_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/statuses/update.json")
        .expect(0)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    authorize(&h, ALICE).await;

    let response = run(&h, &h.config, MessageContent::Unsupported("sticker".to_string())).await;

    mock.assert_async().await;
    assert_eq!(response, HandlerResponse::Continue);
    assert!(h.bot.sent().is_empty());
}

/// **Test: With an allowlist, other senders are dropped before any handler runs.**
#[tokio::test]
async fn test_allowlist_blocks_other_senders() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/request_token")
        .expect(0)
        .create_async()
        .await;
    let h = harness(&server.url(), true);
    let mut config = h.config.clone();
    config.allowed_users = vec![Identity(7)];

    let response = run(&h, &config, MessageContent::from_text("/start")).await;

    mock.assert_async().await;
    assert_eq!(response, HandlerResponse::Stop);
    assert!(h.bot.sent().is_empty());
}
