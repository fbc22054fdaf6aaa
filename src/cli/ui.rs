use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
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

/// Creates a cell for displaying a return with color coding.
pub fn change_cell(change: f64) -> Cell {
    let text = format!("{change:.2}%");
    let color = if change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Right-aligned plain percentage, e.g. fees.
pub fn percentage_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}%")).set_alignment(CellAlignment::Right)
}

const MAX_STARS: usize = 5;

/// Star rating; unrated funds show a dimmed dash. Ratings off the five-star
/// scale are printed as numbers.
pub fn rating_cell(rating: i64) -> Cell {
    match usize::try_from(rating) {
        Ok(stars) if stars > MAX_STARS => Cell::new(rating).fg(Color::Yellow),
        Ok(stars) if stars > 0 => Cell::new("★".repeat(stars)).fg(Color::Yellow),
        _ => Cell::new("-").fg(Color::DarkGrey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_cell() {
        assert_eq!(rating_cell(0).content(), "-");
        assert_eq!(rating_cell(-3).content(), "-");
        assert_eq!(rating_cell(3).content(), "★★★");
        assert_eq!(rating_cell(5).content(), "★★★★★");
        assert_eq!(rating_cell(9).content(), "9");
        assert_eq!(rating_cell(i64::MAX).content(), i64::MAX.to_string());
    }
}
