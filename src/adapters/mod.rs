//! Adapters implementing the port traits.
//!
//! - `live`: real disk and `git` CLI access.
//! - `recording`: wraps another adapter and captures every call to a cassette.
//! - `replaying`: serves calls from a previously captured cassette.

pub mod live;
pub mod recording;
pub mod replaying;
