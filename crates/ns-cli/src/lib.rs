//! nsroute CLI library.
//!
//! Exposes the command implementations and output formatters behind the
//! `nsroute` binary so they can be tested without spawning a process.

#![allow(clippy::format_push_string)]
#![allow(clippy::unnecessary_wraps)]

pub mod commands;
pub mod formatters;
