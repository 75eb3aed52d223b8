//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and the session gate.

pub mod avatar;
pub mod display;
pub mod form;
pub mod menu;
pub mod pet;
pub mod profile;
pub mod session;
pub mod validate;
