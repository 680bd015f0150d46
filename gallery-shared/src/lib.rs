//! Platform-neutral gallery logic shared by the web runtime and the CLI.
//!
//! Everything here is plain data and pure functions over `glam` types; hosts
//! own the clock, the DOM or terminal, and drive [`Walkthrough::frame`].

pub mod assets;
pub mod camera;
pub mod input;
pub mod interaction;
pub mod intro;
pub mod layout;
pub mod math;
pub mod movement;
pub mod orb;
pub mod scene;
pub mod walkthrough;

pub use layout::{GalleryLayout, LayoutError};
pub use walkthrough::{GalleryEvent, Walkthrough};
