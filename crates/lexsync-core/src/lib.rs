pub mod config;
pub mod logging;

pub mod analyzer;
pub mod artifacts;
pub mod detect;
pub mod dict_segmenter;
pub mod error;
pub mod fetch;
pub mod refresh;
pub mod resources;
pub mod source;
