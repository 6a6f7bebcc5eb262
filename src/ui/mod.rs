/// Popup UI
pub mod components;
mod host;
pub mod popup;
