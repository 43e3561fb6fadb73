//! Data model types exchanged with the forum.
//!
//! This module groups the types used by the collector:
//! - `post`: posts, comments and collapsed comment stubs as the collector sees them.
//! - `listing`: the forum's JSON wire format and its conversion into `post` types.
pub mod listing;
pub mod post;
