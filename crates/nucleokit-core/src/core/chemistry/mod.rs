//! # Chemistry Module
//!
//! Stateless rules that decide whether two nucleotide parts may bond and which
//! bond class the resulting connection carries.
//!
//! ## Rules
//!
//! Checked in order, first match wins:
//!
//! 1. Parts that already share a connection are rejected.
//! 2. Two bases bond (hydrogen) only as A-T, A-U or C-G, in either order.
//! 3. Two phosphates or two sugars never bond.
//! 4. A phosphate bonds (strong) only to a sugar.
//! 5. A sugar bonds (weak) to a base unless the pair is deoxyribose-U or ribose-T.
//!
//! ```ignore
//! use nucleokit::core::chemistry::rules;
//! use nucleokit::core::models::component::{Moiety, SugarVariant};
//!
//! let bond = rules::evaluate(&Moiety::Phosphate, &Moiety::Sugar(SugarVariant::Ribose))?;
//! ```

pub mod rules;
