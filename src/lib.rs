//! pokebreed: plans multi-generation breeding trees.
//!
//! Layers, innermost first: `domain` (the tree engine), `application`
//! (roster and plan services), `infrastructure` (I/O and wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
