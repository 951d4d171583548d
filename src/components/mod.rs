pub mod feature_tiles;
pub mod toast;
pub mod video_agent;
