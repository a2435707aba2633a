use crate::core::AmountField;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Code,
    Amount,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Code => style(text).cyan().bold(),
        StyleType::Amount => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an amount field for display; empty fields render as a dash.
pub fn format_amount(amount: AmountField, decimals: u32) -> String {
    match amount.value() {
        Some(v) => format!("{v:.prec$}", prec = decimals as usize),
        None => "—".to_string(),
    }
}

/// Creates a spinner shown while a rate request is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Formats a dismissible error banner.
pub fn error_banner(message: &str) -> String {
    format!(
        "{} {}  {}",
        style_text("Error:", StyleType::Error),
        style_text(message, StyleType::Error),
        style_text("(type `dismiss` to close)", StyleType::Subtle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(AmountField::Value(85.0), 2), "85.00");
        assert_eq!(format_amount(AmountField::Value(0.123), 2), "0.12");
        assert_eq!(format_amount(AmountField::Empty, 2), "—");
    }

    #[test]
    fn test_error_banner_contains_message() {
        let banner = error_banner("Network error.");
        assert!(banner.contains("Network error."));
        assert!(banner.contains("dismiss"));
    }
}
