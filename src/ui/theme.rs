//! Visual theme and styling.

use console::Style;

/// envlink's visual theme.
#[derive(Debug, Clone)]
pub struct EnvlinkTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
    /// Style for paths (italic).
    pub path: Style,
}

impl Default for EnvlinkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvlinkTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            path: Style::new().italic(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            path: Style::new(),
        }
    }

    /// The colored theme when colors are enabled, otherwise the plain one.
    pub fn for_terminal() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("▸ {}", title)))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}
