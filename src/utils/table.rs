/// A plain-text table for printing dashboard slots to the console
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| display_width(h)).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row; cells past the header count are dropped
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row_strings: Vec<String> = row
            .iter()
            .take(self.headers.len())
            .map(|s| s.to_string())
            .collect();

        for (i, col) in row_strings.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(display_width(col));
        }

        self.rows.push(row_strings);
    }

    /// Render header, separator and rows, one per line
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&self.headers));
        lines.push(self.render_separator());
        for row in &self.rows {
            lines.push(self.render_row(row));
        }
        lines.join("\n")
    }

    fn render_row(&self, row: &[String]) -> String {
        row.iter()
            .enumerate()
            .map(|(i, col)| {
                let pad = self.col_widths[i].saturating_sub(display_width(col));
                format!("{}{}", col, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

/// Width in characters; slot text carries `R$`, NBSP and accents
fn display_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Element", "Value"]);
        table.add_row(vec!["lastBid", "R$\u{a0}5,00"]);
        table.add_row(vec!["delta", "-3.85%"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Element | Value");
        assert_eq!(lines[1], "--------+--------");
        assert_eq!(lines[2], "lastBid | R$\u{a0}5,00");
        assert_eq!(lines[3], "delta   | -3.85%");
    }

    #[test]
    fn test_extra_cells_are_dropped() {
        let mut table = Table::new(vec!["A"]);
        table.add_row(vec!["x", "y"]);
        assert_eq!(table.render().lines().last(), Some("x"));
    }
}
