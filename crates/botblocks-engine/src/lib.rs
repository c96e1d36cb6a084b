//! Session runtime for botblocks.
//!
//! # Scope
//!
//! This crate ties the core crates together for a host application:
//! - **Session** - the active page, the program, the runner and the clock,
//!   driven by pointer events and one `update` per frame
//! - **Callbacks** - named click handlers bound from markup `onclick`
//! - **Loading** - markup pages, JSON levels, string tables and config
//! - **Collaborators** - fontdue text measurement, `image` header probing
//!   and a software renderer for headless screenshots
//!
//! # Not Yet Implemented
//!
//! - Drawing the level scene (tiles and robot); hosts do that with
//!   [`Camera`] and the moves [`Session::update`] releases

pub mod callbacks;
pub mod camera;
pub mod config;
pub mod font_metrics;
pub mod image_loader;
pub mod loader;
pub mod renderer;
pub mod session;
pub mod strings;

pub use botblocks_common as common;
pub use botblocks_dom as dom;
pub use botblocks_layout as layout;
pub use botblocks_markup as markup;
pub use botblocks_program as program;

pub use callbacks::{Callback, CallbackRegistry};
pub use camera::Camera;
pub use config::{ConfigError, GameConfig};
pub use font_metrics::{FontdueMeasure, system_measure};
pub use image_loader::ImageProbe;
pub use loader::{Level, LoadError, load_page, parse_page};
pub use renderer::Renderer;
pub use session::Session;
pub use strings::{StringTable, StringsError};
