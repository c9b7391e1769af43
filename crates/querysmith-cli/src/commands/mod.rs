//! CLI command implementations.

pub mod catalog;
pub mod clear;
pub mod edit;
pub mod generate;
pub mod open;
pub mod prefs;
pub mod show;
