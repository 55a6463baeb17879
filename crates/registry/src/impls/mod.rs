//! Builtin diagnostic listeners.
//!
//! These ship with the runtime and are activated by the observability
//! service; guard features bring their own listeners.

mod chat_log;
mod wave_log;
