//! # Core Models Module
//!
//! This module contains the plain data structures used to describe a nucleotide
//! assembly: the parts placed on the canvas, the connections between them, and the
//! chains they form.
//!
//! ## Key Components
//!
//! - [`component`] - Phosphate, sugar and base parts with position and rotation
//! - [`topology`] - Bond classes and the mirrored link entries stored on each part
//! - [`chain`] - Chain membership and completeness
//! - [`ids`] - Stable identifiers for components and chains
//!
//! The models carry no behavior that could break the graph invariants; every mutation
//! that touches more than one record goes through [`crate::core::assembly::Assembly`].

pub mod chain;
pub mod component;
pub mod ids;
pub mod topology;
