//! WebSocket integration tests.
//!
//! Realtime flows: registration, joining, message fan-out, errors and
//! single-session takeover.

mod fixtures;
use fixtures::{TestServer, next_event, next_event_of, next_message, send_event};

use serde_json::json;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[tokio::test]
async fn test_connect_without_token_is_rejected() {
    // テスト項目: トークンなし・不正なトークンでの WebSocket 接続は拒否される
    let server = TestServer::start().await;

    let missing = connect_async(server.url("/ws").replace("http://", "ws://")).await;
    let garbage = connect_async(server.ws_url("not-a-jwt")).await;

    assert!(missing.is_err());
    assert!(garbage.is_err());
}

#[tokio::test]
async fn test_registered_lists_existing_rooms() {
    // テスト項目: 接続直後の socket/registered に参加中の部屋が含まれる
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;

    // when (操作):
    let (_ws, registered) = server.connect("alice").await;
    let (_bob_ws, bob_registered) = server.connect("bob").await;

    // then (期待する結果):
    assert_eq!(registered["profileId"], "alice");
    assert_eq!(registered["roomIds"], json!([room_id]));
    assert!(registered["connectionId"].is_string());
    assert_eq!(bob_registered["roomIds"], json!([]));
}

#[tokio::test]
async fn test_join_and_message_fan_out() {
    // テスト項目: 参加した接続を含む全参加者にメッセージが配信される
    // given (前提条件): alice の部屋に bob が WebSocket から参加する
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;
    let (mut alice, _) = server.connect("alice").await;
    let (mut bob, _) = server.connect("bob").await;

    send_event(&mut bob, json!({ "type": "room.join", "roomId": room_id })).await;
    let joined = next_event_of(&mut bob, "room.joined").await;
    assert_eq!(joined["alreadyParticipant"], false);
    let history = next_event_of(&mut bob, "message/history").await;
    assert_eq!(history["messages"], json!([]));

    let notice = next_event_of(&mut alice, "room.membership-changed").await;
    assert_eq!(notice["profileId"], "bob");
    assert_eq!(notice["change"], "joined");

    // when (操作): bob が発言する
    send_event(
        &mut bob,
        json!({ "type": "message.send", "roomId": room_id, "content": "  hello  " }),
    )
    .await;

    // then (期待する結果): 二人とも同じメッセージを受け取る
    let to_alice = next_event_of(&mut alice, "message:new").await;
    let to_bob = next_event_of(&mut bob, "message:new").await;
    assert_eq!(to_alice, to_bob);
    assert_eq!(to_alice["message"]["content"], "hello");
    assert_eq!(to_alice["message"]["profileId"], "bob");
    assert_eq!(to_alice["message"]["userName"], "Bob");
    assert_eq!(to_alice["message"]["roomId"], room_id);
}

#[tokio::test]
async fn test_legacy_event_names_are_accepted() {
    // テスト項目: 旧形式のイベント名（joinRoom / sendMessage）も受け付ける
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;
    let (mut bob, _) = server.connect("bob").await;

    send_event(&mut bob, json!({ "type": "joinRoom", "roomId": room_id })).await;
    next_event_of(&mut bob, "room.joined").await;
    send_event(
        &mut bob,
        json!({ "type": "sendMessage", "roomId": room_id, "content": "hi" }),
    )
    .await;

    let message = next_event_of(&mut bob, "message:new").await;
    assert_eq!(message["message"]["content"], "hi");
}

#[tokio::test]
async fn test_send_by_non_participant_is_forbidden() {
    // テスト項目: 参加していない部屋への発言はエラーフレームになり、配信されない
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;
    let (mut alice, _) = server.connect("alice").await;
    let (mut carol, _) = server.connect("carol").await;

    // when (操作):
    send_event(
        &mut carol,
        json!({ "type": "message.send", "roomId": room_id, "content": "let me in" }),
    )
    .await;

    // then (期待する結果):
    let error = next_event(&mut carol).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["code"], "FORBIDDEN");

    // alice には何も届いていない（ping の応答が最初のフレーム）
    send_event(&mut alice, json!({ "type": "ping", "echo": 7 })).await;
    let pong = next_event(&mut alice).await;
    assert_eq!(pong["type"], "pong");
    assert_eq!(pong["echo"], 7);
}

#[tokio::test]
async fn test_http_join_reaches_live_connection() {
    // テスト項目: HTTP で参加しても、既存の WebSocket 接続に部屋の配信が届く
    // given (前提条件): 二人とも接続済みで、alice が部屋を作り bob が HTTP で参加する
    let server = TestServer::start().await;
    let (mut alice, _) = server.connect("alice").await;
    let (mut bob, _) = server.connect("bob").await;
    let room_id = server.create_room("alice", "Team").await;

    let response = reqwest::Client::new()
        .post(server.url(&format!("/api/chat/rooms/{room_id}/join")))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // 参加通知が届いた時点で bob の接続は購読済み
    let notice = next_event_of(&mut bob, "room.membership-changed").await;
    assert_eq!(notice["profileId"], "bob");
    next_event_of(&mut alice, "room.membership-changed").await;

    // when (操作):
    send_event(
        &mut alice,
        json!({ "type": "message.send", "roomId": room_id, "content": "welcome" }),
    )
    .await;

    // then (期待する結果):
    let message = next_event_of(&mut bob, "message:new").await;
    assert_eq!(message["message"]["content"], "welcome");
    assert_eq!(message["message"]["userName"], "Alice");
}

#[tokio::test]
async fn test_leave_notifies_remaining_participants() {
    // テスト項目: 退出すると残りの参加者に通知され、最後の退出で部屋が消える
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;
    let (mut alice, _) = server.connect("alice").await;
    let (mut bob, _) = server.connect("bob").await;
    send_event(&mut bob, json!({ "type": "room.join", "roomId": room_id })).await;
    next_event_of(&mut bob, "room.joined").await;

    // when (操作): bob が退出する
    send_event(&mut bob, json!({ "type": "room.leave", "roomId": room_id })).await;

    // then (期待する結果):
    let left = next_event_of(&mut bob, "room.left").await;
    assert_eq!(left["remainingParticipants"], 1);
    assert_eq!(left["roomDeleted"], false);
    let notice = loop {
        let event = next_event_of(&mut alice, "room.membership-changed").await;
        if event["change"] == "left" {
            break event;
        }
    };
    assert_eq!(notice["profileId"], "bob");

    // when (操作): alice も退出する
    send_event(&mut alice, json!({ "type": "room.leave", "roomId": room_id })).await;

    // then (期待する結果):
    let left = next_event_of(&mut alice, "room.left").await;
    assert_eq!(left["remainingParticipants"], 0);
    assert_eq!(left["roomDeleted"], true);

    send_event(&mut bob, json!({ "type": "room.join", "roomId": room_id })).await;
    let error = next_event_of(&mut bob, "error").await;
    assert_eq!(error["code"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn test_single_session_supersedes_previous_connection() {
    // テスト項目: single-session では新しい接続が古い接続を置き換える
    // given (前提条件):
    let server = TestServer::start_with(&["--presence-policy", "single-session"]).await;
    let (mut first, _) = server.connect("alice").await;

    // when (操作): 同じ ID でもう一度接続する
    let (_second, registered) = server.connect("alice").await;

    // then (期待する結果): 古い接続は通知の後に 4001 で閉じられる
    assert_eq!(registered["profileId"], "alice");
    let notice = next_event(&mut first).await;
    assert_eq!(notice["type"], "session.superseded");
    match next_message(&mut first).await {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 4001),
        other => panic!("expected close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_multi_device_keeps_both_connections() {
    // テスト項目: multi-device（既定）では同じ ID の全ての接続にメッセージが届く
    let server = TestServer::start().await;
    let room_id = server.create_room("alice", "Team").await;
    let (mut phone, _) = server.connect("alice").await;
    let (mut laptop, _) = server.connect("alice").await;

    send_event(
        &mut phone,
        json!({ "type": "message.send", "roomId": room_id, "content": "sync" }),
    )
    .await;

    let on_phone = next_event_of(&mut phone, "message:new").await;
    let on_laptop = next_event_of(&mut laptop, "message:new").await;
    assert_eq!(on_phone, on_laptop);
}
