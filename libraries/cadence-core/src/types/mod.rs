//! Core domain types for Cadence

mod session;
mod track;

pub use session::{PersistedSession, SessionSnapshot, Theme};
pub use track::{Catalog, Track};
