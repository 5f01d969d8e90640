//! # Core Module
//!
//! Stateless data models, the chemistry rules and the graph store that every higher
//! layer of NucleoKit builds on.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Components, bond classes, links and chains
//! - **Chemistry** ([`chemistry`]) - Which parts may bond and with which bond class
//! - **Graph Store** ([`assembly`]) - Component table, mirrored connections and the chain
//!   union/split algorithm
//! - **Utilities** ([`utils`]) - 2D geometry helpers for rotation and distance
//!
//! ## Invariants
//!
//! - A component references a chain exactly when that chain lists it as a member.
//! - Every connection is stored on both endpoints with the same bond class, at most once.
//! - A chain has at least two members and is complete iff it holds a phosphate, a sugar
//!   and a base.

pub mod assembly;
pub mod chemistry;
pub mod models;
pub mod utils;
