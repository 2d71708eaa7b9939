use unicode_width::UnicodeWidthStr;

const MIN_COLUMN_WIDTH: usize = 1;

enum Row<'a> {
    Text(&'a str),
    Cells(Vec<&'a str>),
}

/// Aligns pipe-delimited rows into fixed-width columns, measured in terminal cells.
///
/// A row whose trimmed text starts with `|` is a table row; its cells are the
/// trimmed pieces between pipes. Every other row is copied unchanged and does
/// not affect column widths. Rows keep their own cell count, so a short row
/// renders fewer columns rather than being padded with empty cells.
pub fn render<S: AsRef<str>>(rows: &[S]) -> String {
    let parsed: Vec<Row<'_>> = rows.iter().map(|row| parse_row(row.as_ref())).collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &parsed {
        if let Row::Cells(cells) = row {
            for (idx, cell) in cells.iter().enumerate() {
                let width = cell.width();
                match widths.get_mut(idx) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width.max(MIN_COLUMN_WIDTH)),
                }
            }
        }
    }

    let mut out = String::new();
    for row in &parsed {
        match row {
            Row::Text(text) => out.push_str(text),
            Row::Cells(cells) => {
                for (idx, cell) in cells.iter().enumerate() {
                    let width = widths.get(idx).copied().unwrap_or(MIN_COLUMN_WIDTH);
                    let padding = width.saturating_sub(cell.width());
                    out.push_str("| ");
                    out.push_str(cell);
                    out.extend(std::iter::repeat(' ').take(padding));
                    out.push(' ');
                }
                out.push('|');
            }
        }
        out.push('\n');
    }

    while out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Builds a `| a | b |` row from already formatted cells.
pub fn pipe_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell.as_ref());
        row.push_str(" |");
    }
    row
}

fn parse_row(row: &str) -> Row<'_> {
    let trimmed = row.trim();
    let Some(inner) = trimmed.strip_prefix('|') else {
        return Row::Text(row);
    };
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Row::Cells(inner.split('|').map(str::trim).collect())
}

#[cfg(test)]
mod tests {
    use super::{pipe_row, render};
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn render_pads_columns_to_widest_cell() {
        let rows = vec![
            "| Side | Count |".to_string(),
            "| Buy | 1250 |".to_string(),
            "|Sell|7|".to_string(),
        ];
        let out = render(&rows);
        assert_eq!(
            out,
            "| Side | Count |\n| Buy  | 1250  |\n| Sell | 7     |"
        );
    }

    #[test]
    fn render_passes_plain_rows_through_and_trims_trailing_newline() {
        let rows = vec!["Security: sh600000", "| a | bbb |", "", "| cc | d |", ""];
        let out = render(&rows);
        assert_eq!(
            out,
            "Security: sh600000\n| a  | bbb |\n\n| cc | d   |"
        );
    }

    #[test]
    fn render_keeps_short_rows_short() {
        let rows = vec!["| a | b | c |", "| dd |"];
        assert_eq!(render(&rows), "| a  | b | c |\n| dd |");
    }

    #[test]
    fn render_uses_minimum_width_for_empty_columns() {
        let rows = vec!["| |"];
        assert_eq!(render(&rows), "|   |");
    }

    #[test]
    fn render_is_a_fixed_point_after_one_pass() {
        let rows = vec!["| Side | Avg Price | Max |", "| Buy | 10.50 | 10.6 |", "note"];
        let first = render(&rows);
        let second = render(&first.split('\n').collect::<Vec<_>>());
        assert_eq!(first, second);
    }

    #[test]
    fn pipe_row_wraps_cells() {
        assert_eq!(pipe_row(["a", "bb"]), "| a | bb |");
        assert_eq!(render(&[pipe_row(["a", "bb"])]), "| a | bb |");
    }

    #[test]
    fn render_aligns_wide_characters_by_display_width() {
        let rows = vec!["| 指标 | 买入 |", "| 最近成交时间 | 09:30:01 |", "| Count | 7 |"];
        let out = render(&rows);
        assert_eq!(
            out,
            "| 指标         | 买入     |\n| 最近成交时间 | 09:30:01 |\n| Count        | 7        |"
        );
        let widths: Vec<usize> = out.split('\n').map(UnicodeWidthStr::width).collect();
        assert!(widths.iter().all(|width| *width == widths[0]));
    }
}
