use console::Style;
use once_cell::sync::Lazy;

pub struct Styles {
    pub header: Style,
    pub separator: Style,
    pub key_column: Style,
    pub heading: Style,
    pub section: Style,
    pub success: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
}

pub static STYLES: Lazy<Styles> = Lazy::new(|| Styles {
    header: Style::new().cyan().bold(),
    separator: Style::new().dim(),
    key_column: Style::new().green(),
    heading: Style::new().bold(),
    section: Style::new().bold(),
    success: Style::new().green(),
    info: Style::new().blue(),
    warning: Style::new().yellow(),
    error: Style::new().red().bold(),
});

/// Applies `style` when `use_color` is set, regardless of what the terminal reports.
pub fn paint(style: &Style, text: &str, use_color: bool) -> String {
    if use_color {
        style.clone().force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}
