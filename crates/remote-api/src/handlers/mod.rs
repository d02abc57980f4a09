//! HTTP request handlers
//!
//! Handlers are thin: bodies arrive validated, the gateway does the work, and
//! `ApiError` maps its failures onto status codes.

pub mod equalizer;
pub mod player;
