//! Port implementations: live services and cassette record/replay wrappers.

pub mod live;
pub mod recording;
pub mod replaying;
