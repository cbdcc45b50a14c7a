//! Shared utilities for CLI commands.

use epoch_core::{Duration, Tlp};

/// Column alignment in [`render_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Describes a code as its identity followed by its description.
pub fn describe(tlp: &Tlp) -> String {
    if tlp.description().is_empty() {
        tlp.key().to_string()
    } else {
        format!("{} ({})", tlp.key(), tlp.description())
    }
}

/// Formats a drift or adjustment with an explicit sign when positive.
pub fn signed(duration: Duration) -> String {
    if duration.total_minutes() > 0 {
        format!("+{duration}")
    } else {
        duration.to_string()
    }
}

/// Renders a header line and rows as space-separated aligned columns.
///
/// Lines carry no trailing whitespace.
pub fn render_table(columns: &[(&str, Align)], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, (header, _))| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|(name, _)| (*name).to_string()).collect();
    let mut output = String::new();
    for row in std::iter::once(&header).chain(rows) {
        let cells: Vec<String> = row
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, (_, align)), &width)| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect();
        output.push_str(cells.join("  ").trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_description_when_present() {
        assert_eq!(describe(&Tlp::new(-2, "lunch")), "-2 (lunch)");
        assert_eq!(describe(&Tlp::new(12, "")), "12");
    }

    #[test]
    fn test_signed_marks_positive_values() {
        assert_eq!(signed(Duration::from_minutes(8)), "+8m");
        assert_eq!(signed(Duration::from_minutes(-7)), "-7m");
        assert_eq!(signed(Duration::ZERO), "0m");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["a".to_string(), "1".to_string()],
            vec!["bbbb".to_string(), "22".to_string()],
        ];
        let table = render_table(&[("NAME", Align::Left), ("N", Align::Right)], &rows);
        assert_eq!(table, "NAME   N\na      1\nbbbb  22\n");
    }

    #[test]
    fn test_render_table_trims_trailing_space() {
        let rows = vec![vec!["09:00".to_string(), String::new()]];
        let table = render_table(&[("TIME", Align::Left), ("DESCRIPTION", Align::Left)], &rows);
        assert_eq!(table, "TIME   DESCRIPTION\n09:00\n");
    }
}
