use serde::{Deserialize, Serialize};

/// The top-level container scoping a set of members and their tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
}

/// Input for creating a new board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoardInput {
    pub name: String,
}

/// Input for renaming a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBoardInput {
    pub name: Option<String>,
}
