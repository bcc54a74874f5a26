//! HTTP entry point for the league pool bot.
//!
//! The chat gateway forwards generated packs and manual pool edits here as
//! JSON; handlers drive a [`pool_bot::PackTracker`].

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
