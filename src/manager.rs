//! Task lifecycle manager.
//!
//! The sole authority for creating, validating and transforming [`Task`]
//! entities. Handlers hand it typed patches and entities; it owns the
//! hydration, split, merge and move algorithms and drives the persistence
//! gateway, using one explicit transaction per multi-row unit of work.

use chrono::NaiveDate;

use crate::db::{self, Database};
use crate::error::{Error, Result};
use crate::models::{Task, TaskDraft, TaskPatch};

#[derive(Clone)]
pub struct TaskManager {
    db: Database,
}

impl TaskManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Loads a task by id.
    pub fn find(&self, id: i64) -> Result<Task> {
        self.db.get_task(id)?.ok_or(Error::not_found("task", id))
    }

    /// Applies a patch onto a draft and runs the validation rule set.
    ///
    /// Fields absent from the patch keep their current value. A member id,
    /// when present, must resolve against the members table — that check
    /// runs first, so an unknown member fails before anything else is
    /// touched. Every other violation is accumulated and reported in one
    /// [`Error::Validation`] rather than stopping at the first.
    ///
    /// Persists nothing; returns the validated task.
    pub fn hydrate(&self, mut draft: TaskDraft, patch: &TaskPatch) -> Result<Task> {
        if let Some(member_id) = patch.member {
            self.db
                .get_member(member_id)?
                .ok_or(Error::not_found("member", member_id))?;
            draft.member_id = Some(member_id);
        }

        let mut violations = Vec::new();

        if let Some(name) = &patch.name {
            draft.name = Some(name.clone());
        }

        if let Some(date) = &patch.date {
            match date.parse::<NaiveDate>() {
                Ok(date) => draft.date = Some(date),
                Err(_) => violations.push(format!("Date '{date}' is not a valid YYYY-MM-DD date")),
            }
        }

        if let Some(estimate) = patch.estimate {
            match checked_hours("Estimate", estimate) {
                Ok(estimate) => draft.estimate = estimate,
                Err(violation) => violations.push(violation),
            }
        }

        if let Some(consumed) = patch.consumed {
            match checked_hours("Consumed", consumed) {
                Ok(consumed) => draft.consumed = consumed,
                Err(violation) => violations.push(violation),
            }
        }

        if let Some(remaining) = patch.remaining {
            match checked_hours("Remaining", remaining) {
                Ok(remaining) => draft.remaining = remaining,
                Err(violation) => violations.push(violation),
            }
        }

        // Completeness rules: a task the board can render needs all three.
        if draft.name.is_none() {
            violations.push("Name is required".to_string());
        }
        if draft.date.is_none() {
            violations.push("Date is required".to_string());
        }
        if draft.member_id.is_none() {
            violations.push("Member is required".to_string());
        }

        let (Some(name), Some(date), Some(member_id)) = (draft.name, draft.date, draft.member_id)
        else {
            return Err(Error::Validation(violations));
        };
        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        Ok(Task {
            id: draft.id,
            name,
            date,
            member_id,
            estimate: draft.estimate,
            consumed: draft.consumed,
            remaining: draft.remaining,
        })
    }

    /// Hydrates a fresh task from the patch and persists it.
    pub fn create(&self, patch: &TaskPatch) -> Result<Task> {
        let task = self.hydrate(TaskDraft::default(), patch)?;
        self.db.insert_task(&task)
    }

    /// Applies the patch to a stored task and persists the result.
    pub fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        let task = self.find(id)?;
        let updated = self.hydrate(task.into(), patch)?;
        if !self.db.update_task(&updated)? {
            return Err(Error::not_found("task", id));
        }
        Ok(updated)
    }

    /// Halves the task's hours and creates a sibling carrying the other
    /// half, on the same member and day with the same name.
    ///
    /// Both writes happen in one transaction; on failure the caller's task
    /// is left as it was and nothing is persisted. For each hour field,
    /// `task + sibling` equals the value before the split.
    pub fn split(&self, task: &mut Task) -> Result<Task> {
        if task.id.is_none() {
            return Err(Error::validation("Cannot split a task that has not been saved"));
        }

        let before = task.clone();

        task.estimate /= 2.0;
        task.consumed /= 2.0;
        task.remaining /= 2.0;

        // The sibling takes the complementary half so the totals are
        // conserved even when halving is inexact.
        let sibling = Task {
            id: None,
            name: before.name.clone(),
            date: before.date,
            member_id: before.member_id,
            estimate: before.estimate - task.estimate,
            consumed: before.consumed - task.consumed,
            remaining: before.remaining - task.remaining,
        };

        let result = self.db.with_tx(|tx| {
            db::update_task_row(tx, task)?;
            db::insert_task_row(tx, &sibling)
        });

        match result {
            Ok(sibling) => Ok(sibling),
            Err(e) => {
                *task = before;
                Err(e)
            }
        }
    }

    /// Folds `source`'s hours into `target` and deletes `source`, in one
    /// transaction. `target` keeps its name and placement.
    pub fn merge(&self, source: &Task, target: &mut Task) -> Result<()> {
        let Some(source_id) = source.id else {
            return Err(Error::validation("Cannot merge a task that has not been saved"));
        };

        let before = target.clone();

        target.estimate += source.estimate;
        target.consumed += source.consumed;
        target.remaining += source.remaining;

        let result = self.db.with_tx(|tx| {
            db::update_task_row(tx, target)?;
            db::delete_task_row(tx, source_id)?;
            Ok(())
        });

        if let Err(e) = result {
            *target = before;
            return Err(e);
        }
        Ok(())
    }

    /// Reassigns the task to the given member and day.
    ///
    /// Does nothing at all when the task is already there, so a drop on
    /// the cell a task came from costs no write and no reload cascade.
    pub fn move_to(&self, task: &mut Task, member_id: i64, date: NaiveDate) -> Result<()> {
        if task.is_at(member_id, date) {
            return Ok(());
        }

        // Same path as any other partial update, so member resolution and
        // validation behave identically.
        let patch = TaskPatch {
            member: Some(member_id),
            date: Some(date.to_string()),
            ..TaskPatch::default()
        };

        let updated = self.hydrate(task.clone().into(), &patch)?;
        if !self.db.update_task(&updated)? {
            return Err(Error::not_found("task", updated.id.unwrap_or_default()));
        }
        *task = updated;
        Ok(())
    }

    /// Deletes the task.
    pub fn remove(&self, task: &Task) -> Result<()> {
        let Some(id) = task.id else {
            return Err(Error::validation("Cannot remove a task that has not been saved"));
        };

        if !self.db.delete_task(id)? {
            return Err(Error::not_found("task", id));
        }
        Ok(())
    }
}

fn checked_hours(field: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err(format!("{field} must be a number"));
    }
    if value < 0.0 {
        return Err(format!("{field} must not be negative"));
    }
    Ok(value)
}
