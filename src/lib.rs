//! Arcade shooter simulation core.
//!
//! `compute` holds the pure per-frame transitions over the `GameState`
//! defined in `entities`; `input` and `config` are shared by front-ends.

pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
