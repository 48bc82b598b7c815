use serde::{Deserialize, Serialize};

/// A person assigned tasks on the board.
///
/// `avatar` is a reference to an uploaded image (a path under the static
/// uploads root). The upload itself is handled by an external collaborator;
/// this server stores the reference and hands it back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub board_id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

/// Input for adding a member to a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberInput {
    pub name: String,
    pub avatar: Option<String>,
}

/// Input for updating a member. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberInput {
    pub name: Option<String>,
    pub avatar: Option<String>,
}
