//! Domain layer: entities, state machines, permission logic

pub mod cache;
pub mod entities;
pub mod permissions;
pub mod state;
pub mod validation;
