//! Core library for recode
//!
//! This crate implements the **Functional Core** of the recode application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! - **`recode_core`** (this crate): pure transformation functions with zero I/O
//! - **`recode`**: HTTP serving, the chat-provider client, and orchestration
//!   (the Imperative Shell)
//!
//! Everything here is deterministic: prompt rendering, format-instruction
//! generation, and structured-output parsing produce the same output for the
//! same input, so it is all tested with plain fixture strings and no mocking.

pub mod refactor;
