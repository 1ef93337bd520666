//! Pure warehouse logic for Warebot.
//!
//! This crate contains all robot logic that is independent of any store,
//! server, or runtime. Functions take plain data and return results, making
//! them unit-testable and portable between the simulation core and any
//! future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`command`] | Structured command parameters shared by every invocation surface |
//! | [`geometry`] | 3D positions and the fixed warehouse bounds box |
//! | [`movement`] | Cardinal directions and the fixed directional step |
//! | [`parser`] | Deterministic free-text command recognition (no LLM) |
//! | [`stacking`] | Stack placement height and default base position |

pub mod command;
pub mod geometry;
pub mod movement;
pub mod parser;
pub mod stacking;
