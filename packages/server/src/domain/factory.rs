//! Identifier factories.
//!
//! 値オブジェクトの検証（`RoomId::new` など）と ID の採番を分けておくための
//! ファクトリ群です。

use uuid::Uuid;

use super::{ConnectionId, MessageId, RoomId};

/// Mints identifiers for newly created rooms (random UUID v4).
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        RoomId::from_uuid(Uuid::new_v4())
    }
}

/// Mints message identifiers.
///
/// UUID v7 carries the creation time in its high bits, so within a room the
/// id order follows the append order and can break `createdAt` ties in
/// history cursors.
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId::from_uuid(Uuid::now_v7())
    }
}

/// Handle for one live WebSocket connection; never persisted.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_is_canonical_uuid_v4() {
        // テスト項目: 採番した RoomId は小文字ハイフン区切りの UUID v4 で、そのまま再検証を通る
        // when (操作):
        let room_id = RoomIdFactory::generate();

        // then (期待する結果):
        let parsed = Uuid::parse_str(room_id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(room_id.as_str(), room_id.as_str().to_lowercase());
        assert_eq!(RoomId::new(room_id.to_string()).unwrap(), room_id);
    }

    #[test]
    fn test_message_ids_are_v7_and_follow_creation_time() {
        // テスト項目: MessageId は UUID v7 で、時間をおいて採番した ID ほど大きい
        // given (前提条件):
        let earlier = MessageIdFactory::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));

        // when (操作):
        let later = MessageIdFactory::generate();

        // then (期待する結果):
        assert_eq!(later.as_uuid().get_version_num(), 7);
        assert!(earlier < later);
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 接続ごとに異なるハンドルが払い出される
        let ids: std::collections::HashSet<_> =
            (0..100).map(|_| ConnectionIdFactory::generate()).collect();

        assert_eq!(ids.len(), 100);
    }
}
