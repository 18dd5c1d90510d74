pub mod overlay;

pub use overlay::{Overlay, OverlayActions, OverlayStats};
