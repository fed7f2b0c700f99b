//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer, TestUser,
};
use reqwest::StatusCode;
use serde_json::json;

async fn private_chat(server: &TestServer, a: &TestUser, b: &TestUser) -> ChatResponse {
    let response = server
        .post_auth(
            "/api/v1/chats",
            &a.token,
            &CreateChatRequest::private(&b.id.to_string()),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn send(server: &TestServer, user: &TestUser, chat_id: &str, text: &str) -> MessageResponse {
    let response = server
        .post_auth(
            &format!("/api/v1/chats/{chat_id}/messages"),
            &user.token,
            &SendMessageRequest::text(text),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/chats").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/api/v1/chats", "garbage").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_private_chat_is_reused() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();

    let first = private_chat(&server, &alice, &bob).await;
    assert_eq!(first.kind, "private");
    assert_eq!(first.creator_id, alice.id.to_string());

    let second = private_chat(&server, &bob, &alice).await;
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn test_group_membership() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let carol = server.user("carol").await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/chats",
            &alice.token,
            &CreateChatRequest::group("Weekend", &[&bob.id.to_string()]),
        )
        .await
        .unwrap();
    let group: ChatResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(group.name.as_deref(), Some("Weekend"));

    // Outsiders cannot see the chat
    let response = server
        .get_auth(&format!("/api/v1/chats/{}", group.id), &carol.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/chats/{}/participants", group.id),
            &alice.token,
            &json!({ "user_ids": [carol.id.to_string()] }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/chats/{}", group.id), &carol.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/chats/{}/participants/{}", group.id, carol.id),
            &carol.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_unknown_chat_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();

    let response = server.get_auth("/api/v1/chats/1", &alice.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth("/api/v1/chats/not-a-number", &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_archive_mute_and_pin() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;

    let response = server
        .put_empty(&format!("/api/v1/chats/{}/archive", chat.id), &alice.token)
        .await
        .unwrap();
    let archived: ChatResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(archived.archived);

    // Archived chats are hidden from the default listing
    let response = server.get_auth("/api/v1/chats", &alice.token).await.unwrap();
    let listed: Vec<ChatResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listed.iter().all(|c| c.id != chat.id));

    let response = server
        .get_auth("/api/v1/chats?archived=true", &alice.token)
        .await
        .unwrap();
    let listed: Vec<ChatResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listed.iter().any(|c| c.id == chat.id));

    // Flags belong to the caller only
    let response = server
        .get_auth(&format!("/api/v1/chats/{}", chat.id), &bob.token)
        .await
        .unwrap();
    let bobs_view: ChatResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!bobs_view.archived);

    let response = server
        .put_empty(&format!("/api/v1/chats/{}/mute", chat.id), &alice.token)
        .await
        .unwrap();
    let muted: ChatResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(muted.muted);
    assert!(muted.muted_until.is_none());

    let response = server
        .put_empty(&format!("/api/v1/chats/{}/pin", chat.id), &alice.token)
        .await
        .unwrap();
    let pinned: ChatResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pinned.pinned);
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_reply_and_list() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;

    let first = send(&server, &alice, &chat.id, "lunch?").await;
    assert_eq!(first.message_type, "text");
    assert_eq!(first.sender_id, alice.id.to_string());

    let response = server
        .post_auth(
            &format!("/api/v1/chats/{}/messages", chat.id),
            &bob.token,
            &SendMessageRequest::reply("sure", &first.id),
        )
        .await
        .unwrap();
    let reply: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.reply_to.as_deref(), Some(first.id.as_str()));

    let response = server
        .get_auth(&format!("/api/v1/messages/{}/replies", first.id), &alice.token)
        .await
        .unwrap();
    let replies: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply.id);

    let response = server
        .get_auth(&format!("/api/v1/chats/{}/messages", chat.id), &alice.token)
        .await
        .unwrap();
    let messages: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;

    let response = server
        .post_auth(
            &format!("/api/v1/chats/{}/messages", chat.id),
            &alice.token,
            &SendMessageRequest::text("  "),
        )
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(error.error.code, "EMPTY_CONTENT");
}

#[tokio::test]
async fn test_delete_scopes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;
    let mine = send(&server, &alice, &chat.id, "oops").await;
    let everyone = send(&server, &alice, &chat.id, "really oops").await;

    let response = server
        .delete_auth(&format!("/api/v1/messages/{}", mine.id), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Hidden for the sender, still there for bob
    let response = server
        .get_auth(&format!("/api/v1/messages/{}", mine.id), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
    let response = server
        .get_auth(&format!("/api/v1/messages/{}", mine.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Only the sender may delete
    let response = server
        .delete_auth(
            &format!("/api/v1/messages/{}?scope=for_all", everyone.id),
            &bob.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/messages/{}?scope=for_all", everyone.id),
            &alice.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server
        .get_auth(&format!("/api/v1/messages/{}", everyone.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_forward_into_another_chat() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let carol = server.user("carol").await.unwrap();
    let with_bob = private_chat(&server, &alice, &bob).await;
    let with_carol = private_chat(&server, &alice, &carol).await;
    let original = send(&server, &bob, &with_bob.id, "meme").await;

    let response = server
        .post_auth(
            &format!("/api/v1/messages/{}/forward", original.id),
            &alice.token,
            &ForwardRequest {
                chat_id: with_carol.id.clone(),
            },
        )
        .await
        .unwrap();
    let forwarded: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(forwarded.chat_id, with_carol.id);
    assert_eq!(forwarded.sender_id, alice.id.to_string());
    assert_eq!(forwarded.forwarded_from.as_deref(), Some(original.id.as_str()));
    assert_eq!(forwarded.content, "meme");

    // The target chat must be one of the caller's
    let response = server
        .post_auth(
            &format!("/api/v1/messages/{}/forward", original.id),
            &carol.token,
            &ForwardRequest {
                chat_id: with_bob.id.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_read_receipts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;
    let message = send(&server, &alice, &chat.id, "seen?").await;
    let path = format!("/api/v1/messages/{}/read", message.id);

    for _ in 0..2 {
        let response = server.post_auth(&path, &bob.token, &json!({})).await.unwrap();
        let marker: ReadMarkerResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(marker.user_id, bob.id.to_string());
    }

    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let receipts: Vec<ReadMarkerResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].message_id, message.id);
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;
    let message = send(&server, &alice, &chat.id, "party").await;
    let path = format!("/api/v1/messages/{}/reactions", message.id);

    let response = server
        .post_auth(&path, &bob.token, &ReactionRequest::new("🎉"))
        .await
        .unwrap();
    let reaction: ReactionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reaction.user.id, bob.id.to_string());

    let response = server
        .post_auth(&path, &bob.token, &ReactionRequest::new("🎉"))
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(error.error.code, "REACTION_ALREADY_EXISTS");

    // Someone else's reaction cannot be changed
    let response = server
        .patch_auth(
            &format!("/api/v1/reactions/{}", reaction.id),
            &alice.token,
            &ReactionRequest::new("👎"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(
            &format!("/api/v1/reactions/{}", reaction.id),
            &bob.token,
            &ReactionRequest::new("🥳"),
        )
        .await
        .unwrap();
    let updated: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.emoji, "🥳");

    let response = server
        .delete_auth(&format!("/api/v1/reactions/{}", reaction.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let remaining: Vec<ReactionResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(remaining.is_empty());
}

// ============================================================================
// Search and Export
// ============================================================================

#[tokio::test]
async fn test_search_ranks_by_occurrences() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;
    send(&server, &alice, &chat.id, "pizza tonight").await;
    send(&server, &bob, &chat.id, "pizza pizza pizza").await;
    send(&server, &bob, &chat.id, "no thanks").await;

    let response = server
        .get_auth("/api/v1/search/messages?q=pizza", &alice.token)
        .await
        .unwrap();
    let page: Page<SearchHit> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].message.content, "pizza pizza pizza");
    assert_eq!(page.data[0].occurrences, 3);

    let response = server
        .get_auth("/api/v1/search/messages?q=pi", &alice.token)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(error.error.code, "QUERY_TOO_SHORT");
}

#[tokio::test]
async fn test_export_csv() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    let chat = private_chat(&server, &alice, &bob).await;
    send(&server, &alice, &chat.id, "hello, bob").await;

    let response = server
        .get_auth(
            &format!("/api/v1/chats/{}/export?format=csv", chat.id),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    assert_eq!(
        disposition.as_deref(),
        Some(format!("attachment; filename=\"chat-{}.csv\"", chat.id).as_str())
    );
    let body = response.text().await.unwrap();
    assert!(body.starts_with("id,created_at,sender_id,sender_name,type,content,blob_ref\r\n"));
    assert!(body.contains("\"hello, bob\""));

    let response = server
        .get_auth(
            &format!("/api/v1/chats/{}/export?format=pdf", chat.id),
            &alice.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

// ============================================================================
// Presence
// ============================================================================

#[tokio::test]
async fn test_status_update() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();
    private_chat(&server, &alice, &bob).await;

    let response = server
        .put_auth(
            "/api/v1/users/@me/status",
            &alice.token,
            &json!({ "status": "idle" }),
        )
        .await
        .unwrap();
    let presence: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(presence["chats_notified"], 1);
}
