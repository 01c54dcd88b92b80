//! Authoring core for Matrix chat-automation workflows: the graph model,
//! the action type registry, templates, the editing store and JSON import/export.

pub mod compiler;
pub mod dsl;
pub mod error;
pub mod nodes;
pub mod runtime;
pub mod templates;
