//! Theme registry and loader

mod dracula;
mod gruvbox;
mod monokai;
mod nord;
mod one_dark;

use tracing::warn;

use crate::theme::Theme;

/// Names accepted by `load_theme`
pub const THEME_NAMES: &[&str] = &[
    "gruvbox-dark",
    "gruvbox-light",
    "dracula",
    "nord",
    "one-dark",
    "monokai",
];

/// Load a theme by name, falling back to Gruvbox Dark
pub fn load_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "gruvbox-dark" => gruvbox::dark(),
        "gruvbox-light" => gruvbox::light(),
        "dracula" => dracula::default(),
        "nord" => nord::default(),
        "one-dark" | "onedark" => one_dark::default(),
        "monokai" => monokai::default(),
        other => {
            warn!("Unknown theme '{}', using gruvbox-dark", other);
            gruvbox::dark()
        }
    }
}
