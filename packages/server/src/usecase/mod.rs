//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（HTTP / WebSocket）から呼び出され、Domain 層を操作します。

pub mod connect_participant;
pub mod coordinator;
pub mod create_room;
pub mod disconnect_participant;
pub mod error;
pub mod fetch_history;
mod identity;
pub mod join_room;
pub mod leave_room;

pub use connect_participant::{ConnectOutcome, ConnectParticipantUseCase};
pub use coordinator::{MessagePage, RoomDeletion, RoomMembershipCoordinator};
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, CoordinatorError};
pub use fetch_history::{FetchHistoryUseCase, HistoryEntry, HistoryPage};
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
