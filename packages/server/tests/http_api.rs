//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, tokens, room lifecycle, history).

mod fixtures;
use fixtures::TestServer;

use serde_json::{Value, json};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(server.url("/api/health"))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    // テスト項目: トークンなし・不正なトークンのリクエストは 401
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let missing = client
        .get(server.url("/api/chat/rooms"))
        .send()
        .await
        .expect("Failed to send request");
    let garbage = client
        .get(server.url("/api/chat/rooms"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(missing.status(), 401);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(garbage.status(), 401);
}

#[tokio::test]
async fn test_dev_token_endpoint() {
    // テスト項目: 開発用トークンエンドポイントは既知の ID にだけトークンを発行する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let issued: Value = client
        .post(server.url("/api/tokens"))
        .json(&json!({ "profileId": "alice" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let unknown = client
        .post(server.url("/api/tokens"))
        .json(&json!({ "profileId": "ghost" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果): 発行されたトークンで API を呼べる
    let token = issued["accessToken"].as_str().unwrap();
    let rooms = client
        .get(server.url("/api/chat/my-rooms"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(rooms.status(), 200);
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn test_create_room_and_listings() {
    // テスト項目: 部屋を作成すると作成者だけが参加者で、一覧に参加状態が表示される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(server.url("/api/chat/rooms"))
        .bearer_auth(server.token("alice"))
        .json(&json!({ "title": "Team" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let room: Value = response.json().await.unwrap();
    assert_eq!(room["title"], "Team");
    assert_eq!(room["participants"], json!(["alice"]));

    let mine: Value = client
        .get(server.url("/api/chat/my-rooms"))
        .bearer_auth(server.token("alice"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["isMember"], true);

    let all_for_bob: Value = client
        .get(server.url("/api/chat/rooms"))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all_for_bob[0]["roomId"], room["roomId"]);
    assert_eq!(all_for_bob[0]["isMember"], false);
    assert_eq!(all_for_bob[0]["participantCount"], 1);
}

#[tokio::test]
async fn test_create_room_validation() {
    // テスト項目: 空のタイトルは 400
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(server.url("/api/chat/rooms"))
        .bearer_auth(server.token("alice"))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_CONTENT");
}

#[tokio::test]
async fn test_join_leave_lifecycle() {
    // テスト項目: 参加 → 再参加 → 退出 → 最後の退出で部屋が消える
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room_id = server.create_room("alice", "Team").await;
    let post = |path: String, user: &str| {
        client
            .post(server.url(&path))
            .bearer_auth(server.token(user))
            .send()
    };

    // when (操作): bob が二度参加する
    let first: Value = post(format!("/api/chat/rooms/{room_id}/join"), "bob")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = post(format!("/api/chat/rooms/{room_id}/join"), "bob")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(first["alreadyParticipant"], false);
    assert_eq!(second["alreadyParticipant"], true);

    // when (操作): alice、bob の順に退出する
    let alice_left: Value = post(format!("/api/chat/rooms/{room_id}/leave"), "alice")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bob_left: Value = post(format!("/api/chat/rooms/{room_id}/leave"), "bob")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(alice_left["remainingParticipants"], 1);
    assert_eq!(alice_left["roomDeleted"], false);
    assert_eq!(bob_left["remainingParticipants"], 0);
    assert_eq!(bob_left["roomDeleted"], true);

    let members = client
        .get(server.url(&format!("/api/chat/rooms/{room_id}/members")))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();
    assert_eq!(members.status(), 404);
}

#[tokio::test]
async fn test_join_errors() {
    // テスト項目: 存在しない部屋は 404、不正な ID は 400、参加していない部屋からの退出は 404
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room_id = server.create_room("alice", "Team").await;

    let missing = client
        .post(server.url("/api/chat/rooms/00000000-0000-4000-8000-000000000000/join"))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();
    let malformed = client
        .post(server.url("/api/chat/rooms/not-a-room/join"))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();
    let not_member = client
        .post(server.url(&format!("/api/chat/rooms/{room_id}/leave")))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();

    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["code"], "ROOM_NOT_FOUND");
    assert_eq!(malformed.status(), 400);
    let body: Value = malformed.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_CONTENT");
    assert_eq!(not_member.status(), 404);
}

#[tokio::test]
async fn test_room_full() {
    // テスト項目: 容量に達した部屋への参加は 409 ROOM_FULL
    let server = TestServer::start_with(&["--max-participants", "1"]).await;
    let room_id = server.create_room("alice", "Pair").await;

    let response = reqwest::Client::new()
        .post(server.url(&format!("/api/chat/rooms/{room_id}/join")))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ROOM_FULL");
}

#[tokio::test]
async fn test_history_access_and_validation() {
    // テスト項目: 履歴は参加者だけが読め、limit とカーソルは検証される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room_id = server.create_room("alice", "Team").await;
    let get = |query: &str, user: &str| {
        client
            .get(server.url(&format!("/api/chat/rooms/{room_id}/messages{query}")))
            .bearer_auth(server.token(user))
            .send()
    };

    // when (操作):
    let as_member = get("", "alice").await.unwrap();
    let as_outsider = get("", "bob").await.unwrap();
    let zero_limit = get("?limit=0", "alice").await.unwrap();
    let bad_cursor = get("?cursor=yesterday", "alice").await.unwrap();

    // then (期待する結果):
    assert_eq!(as_member.status(), 200);
    let page: Value = as_member.json().await.unwrap();
    assert_eq!(page["messages"], json!([]));
    assert_eq!(page["hasMore"], false);
    assert!(page["nextCursor"].is_null());
    assert_eq!(as_outsider.status(), 403);
    assert_eq!(zero_limit.status(), 400);
    assert_eq!(bad_cursor.status(), 400);
}
