//! Terminal UI - dashboard and analyze pages with ratatui

mod event_loop;
mod input;
mod render;

pub use event_loop::{run, spawn_effect};
pub use input::{handle_key, Focus, TuiView};
pub use render::draw_ui;
