//! Utilities shared by the Sente server and client binaries.

pub mod logger;
pub mod time;
