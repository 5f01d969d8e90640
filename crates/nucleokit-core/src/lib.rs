//! # NucleoKit Core Library
//!
//! The assembly engine behind an educational DNA/RNA builder: nucleotide parts are
//! placed on a canvas, connected under chemistry rules, grouped into chains, dragged
//! and rotated as rigid groups, and paired into double strands.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Plain data models (`Component`, `Chain`), the pure
//!   chemistry rules, the `Assembly` graph store with its chain algorithm, and geometry.
//!
//! - **[`workflows`]: Graph Procedures.** Whole-graph passes over an `Assembly`, such as
//!   the proximity auto-assembly scan and base-pairing validation.
//!
//! - **[`engine`]: The Public API.** The stateful `AssemblyEngine` session that turns
//!   pointer-driven intents into graph mutations, tracks the interaction mode, and posts
//!   feedback for a renderer to display.
//!
//! The engine never renders or performs I/O on its own; callers read the graph and the
//! notice board after each operation.

pub mod core;
pub mod engine;
pub mod workflows;
