//! Webhook transport tests against a local mock server.

use std::io::Write;

use docchat::{
    Backend, Conversation, MessagesConfig, Sender, SessionId, WebhookClient, WebhookConfig,
    WebhookError,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.7\n%test document\n%%EOF\n";

fn config(server: &MockServer) -> WebhookConfig {
    WebhookConfig {
        chat_url: format!("{}/webhook/chat", server.uri()),
        upload_url: format!("{}/webhook/upload-document", server.uri()),
        timeout_secs: 5,
    }
}

fn client(server: &MockServer) -> WebhookClient {
    WebhookClient::new(&config(server)).unwrap()
}

#[tokio::test]
async fn chat_posts_session_and_input() {
    let server = MockServer::start().await;
    let session = SessionId::new();

    Mock::given(method("POST"))
        .and(path("/webhook/chat"))
        .and(body_json(json!({
            "sessionId": session.to_string(),
            "action": "sendMessage",
            "chatInput": "What is in the document?",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": "## Summary\n* point"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = client(&server)
        .send_message(session, "What is in the document?")
        .await
        .unwrap();
    assert_eq!(output.as_deref(), Some("## Summary\n* point"));
}

#[tokio::test]
async fn chat_reply_without_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "other": 1 })))
        .mount(&server)
        .await;

    let output = client(&server)
        .send_message(SessionId::new(), "hi")
        .await
        .unwrap();
    assert_eq!(output, None);
}

#[tokio::test]
async fn chat_error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("workflow crashed"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message(SessionId::new(), "hi")
        .await
        .unwrap_err();
    match err {
        WebhookError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "workflow crashed");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_reply_that_is_not_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message(SessionId::new(), "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::Decode(_)));
}

#[tokio::test]
async fn upload_sends_multipart_form() {
    let server = MockServer::start().await;
    let session = SessionId::new();

    Mock::given(method("POST"))
        .and(path("/webhook/upload-document"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .upload_file(session, "report.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\"; filename=\"report.pdf\""));
    assert!(body.contains("Content-Type: application/pdf"));
    assert!(body.contains("%PDF-1.7"));
    assert!(body.contains(&format!("name=\"sessionId\"\r\n\r\n{session}")));
    assert!(body.contains("name=\"action\"\r\n\r\nuploadFile"));
}

#[tokio::test]
async fn upload_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/upload-document"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let err = client(&server)
        .upload_file(SessionId::new(), "big.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::Status { status, .. } if status.as_u16() == 413));
}

#[tokio::test]
async fn conversation_falls_back_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut chat = Conversation::new(client(&server), MessagesConfig::default());
    let reply = chat.send("hello").await.unwrap();

    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text, MessagesConfig::default().connection_error);
    assert!(!chat.is_pending());
}

#[tokio::test]
async fn conversation_falls_back_when_server_unreachable() {
    let config = WebhookConfig {
        chat_url: "http://127.0.0.1:1/webhook/chat".to_string(),
        upload_url: "http://127.0.0.1:1/webhook/upload-document".to_string(),
        timeout_secs: 5,
    };
    let mut chat = Conversation::new(
        WebhookClient::new(&config).unwrap(),
        MessagesConfig::default(),
    );

    let reply = chat.send("hello").await.unwrap();
    assert_eq!(reply.text, MessagesConfig::default().connection_error);
}

#[tokio::test]
async fn conversation_uploads_pdf_from_disk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/upload-document"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(PDF_BYTES).unwrap();

    let mut chat = Conversation::new(client(&server), MessagesConfig::default());
    let reply = chat.upload_pdf(file.path()).await.unwrap();
    assert_eq!(reply.text, "File received successfully!");

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert!(messages[0].text.starts_with("PDF file sent: "));
}
