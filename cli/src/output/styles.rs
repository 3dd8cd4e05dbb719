//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Stylesheet for deploy output; plain until [`Styles::colorize`] is called.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    /// Keys in key-value lines.
    pub dim: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
    }
}
