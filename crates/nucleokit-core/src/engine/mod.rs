//! # Engine Module
//!
//! The stateful layer of NucleoKit. It wraps the assembly graph in an
//! [`session::AssemblyEngine`] that interprets pointer-driven intents and keeps the
//! interaction mode, the active drag and user feedback alongside the graph.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Canvas geometry, proximity threshold, fine-tune factor
//!   and notice lifetime, loadable from TOML
//! - **Interaction Modes** ([`state`]) - Idle, Connecting and Rotating, mutually exclusive
//! - **Rotation** ([`rotation`]) - Pivot snapshot and absolute rotation of a group
//! - **Group Drag** ([`drag`]) - Rigid translation of a chain and the drop outcome
//! - **Feedback** ([`feedback`]) - Time-limited notices evaluated against a caller clock
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Every public operation runs to completion before returning; nothing is scheduled
//! in the background.

pub mod config;
pub mod drag;
pub mod error;
pub mod feedback;
pub mod rotation;
pub mod session;
pub mod state;
