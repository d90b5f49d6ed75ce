pub mod youtube_live;

pub use youtube_live::{LiveState, LiveStatusPoller, LiveTransition, YouTubeLiveChecker};
