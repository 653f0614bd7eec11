//! HTTP Handlers

mod audio;
mod ping;
mod podcast;
mod templates;

pub use audio::*;
pub use ping::*;
pub use podcast::*;
pub use templates::*;
