pub mod clip;
pub mod constants;
pub mod engine;
pub mod error;
pub mod filler;
pub mod output;
pub mod playback;
pub mod registry;
