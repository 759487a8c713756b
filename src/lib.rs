//! ytvip - page glue for the ytvip video browser
//!
//! Client-side behavior of the channel/video grid pages:
//! - row-snapping scroll navigation (arrow keys and mouse wheel)
//! - lazily loaded preview videos that play only while visible
//! - download / play-locally / score requests to the backend
//!
//! ## Usage
//!
//! For the native client:
//! ```bash
//! cargo build --features native
//! ```
//!
//! For the page bundle:
//! ```bash
//! cargo build --target wasm32-unknown-unknown --no-default-features --features dom-web
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod navigator;
pub mod input;
pub mod miniplayer;

// Backend requests (reqwest on both targets)
pub mod actions;

// UI feature flags (available on all platforms)
pub mod flags;

// Debug logging system (available on all platforms)
pub mod debug;

// Browser bindings
#[cfg(all(target_arch = "wasm32", feature = "dom-web"))]
pub mod dom;

// Re-export commonly used types
pub use config::Config;
pub use input::{handle_directional_input, DirectionalInput, NavigationOutcome, Viewport};
pub use navigator::{locate_boundary, navigate, Direction, NoOp, Row, RowNavigator};
