//! Port implementations.
//!
//! `live` talks to the operating system, `recording` wraps another adapter
//! and captures every call to a cassette, `replaying` serves calls back
//! from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
