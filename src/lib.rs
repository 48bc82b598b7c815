//! Team task-board server.
//!
//! Boards contain members, members are assigned tasks on calendar days,
//! and each task tracks estimate/consumed/remaining hours. The JSON API is
//! consumed by the board UI; the interesting operations are splitting a
//! task into two siblings, merging one task into another, and moving a
//! task across members and days — all of which conserve the hour totals.

pub mod api;
pub mod db;
pub mod error;
pub mod manager;
pub mod models;
pub mod week;
