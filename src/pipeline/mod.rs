//! Pipeline stages for income-statement extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. the PDF backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ metadata ──▶ llm ──▶ parse ──▶ table
//! (lopdf)  (regex)     (HTTP)  (regex)   (ordered map)
//! ```
//!
//! 1. [`text`]     — extract plain text per page from the PDF bytes
//! 2. [`metadata`] — detect currency and scale/unit tokens in the full text
//! 3. [`llm`]      — drive the chat-completion call with timeout and
//!    retry/backoff; the only stage with network I/O
//! 4. [`parse`]    — split the model's free-text reply into line-item rows
//! 5. [`table`]    — merge rows into an ordered, label-unique table

pub mod llm;
pub mod metadata;
pub mod parse;
pub mod table;
pub mod text;
