//! # Workflows Module
//!
//! Whole-graph procedures that run over an [`Assembly`](crate::core::assembly::Assembly)
//! in one pass and report what they changed.
//!
//! - **Auto-Assembly** ([`auto_assembly`]) - After a drop, connects every nearby pair the
//!   chemistry rules allow.
//! - **Base Pairing** ([`pairing`]) - Rebuilds hydrogen connections between complete chains
//!   whose representative bases are complementary.

pub mod auto_assembly;
pub mod pairing;
