//! Streaming writers for resolved rows.

pub mod jsonl;
