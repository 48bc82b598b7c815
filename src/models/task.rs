use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A schedulable unit of work for one member on one calendar day.
///
/// The three hour fields are tracked independently — `consumed` is not
/// required to equal `estimate - remaining`. Splitting and merging conserve
/// the total of each field across the tasks involved.
///
/// `id` is `None` until the persistence layer has assigned one; every task
/// handed out by the API is persisted and carries an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub name: String,
    /// The board day this task is scheduled on.
    pub date: NaiveDate,
    pub member_id: i64,
    /// Estimated hours.
    pub estimate: f64,
    /// Hours already spent.
    pub consumed: f64,
    /// Hours left.
    pub remaining: f64,
}

impl Task {
    /// Whether this task occupies the given board cell.
    pub fn is_at(&self, member_id: i64, date: NaiveDate) -> bool {
        self.member_id == member_id && self.date == date
    }
}

/// A task while partial input is being applied to it.
///
/// `date` and `member_id` are transiently absent here; the manager only
/// produces a [`Task`] once the completeness rules have passed.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub member_id: Option<i64>,
    pub estimate: f64,
    pub consumed: f64,
    pub remaining: f64,
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: Some(task.name),
            date: Some(task.date),
            member_id: Some(task.member_id),
            estimate: task.estimate,
            consumed: task.consumed,
            remaining: task.remaining,
        }
    }
}

/// Partial update for a task. Used for both creation and edits.
///
/// Absent fields leave the current value untouched (merge-patch semantics).
/// `date` stays a string here so an unparsable value is reported through
/// the validation rule set together with any other violations, instead of
/// being rejected at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
    pub estimate: Option<f64>,
    pub consumed: Option<f64>,
    pub remaining: Option<f64>,
    /// Member id to assign the task to.
    pub member: Option<i64>,
}

/// Input for merging another task into the one addressed by the URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeTaskInput {
    /// Id of the task to fold in. It is deleted once its hours have been
    /// added to the target.
    pub source: i64,
}

/// Input for moving a task to a different member and/or day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskInput {
    pub member: i64,
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
}

/// Both halves of a split: the shrunk original and its new sibling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    pub task: Task,
    pub sibling: Task,
}
