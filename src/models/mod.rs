//! Domain models for the task board.
//!
//! # Core Concepts
//!
//! - [`Board`]: Top-level container scoping a team of members and the week
//!   being viewed.
//! - [`Member`]: A person assigned tasks on given days. Carries a reference
//!   to an avatar image whose upload lifecycle is owned by an external
//!   collaborator; this server only stores and serves the reference.
//! - [`Task`]: A unit of work for a member on a calendar day, tracking
//!   estimate/consumed/remaining hours independently.
//!
//! Tasks have a two-stage representation: [`TaskDraft`] carries the
//! transiently-optional fields while partial input is being applied, and a
//! [`Task`] exists only once the completeness rules have passed. Incoming
//! partial updates are typed as [`TaskPatch`] — one `Option` per recognized
//! field, deserialized once at the API boundary.

mod board;
mod member;
mod task;

pub use board::*;
pub use member::*;
pub use task::*;
