use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use shunt::{Token, TokenStream};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// One row per token: position, kind, payload and source location
    pub fn format_tokens(&self, stream: &TokenStream) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Kind").set_alignment(CellAlignment::Left),
            Cell::new("Token").set_alignment(CellAlignment::Left),
            Cell::new("Span").set_alignment(CellAlignment::Left),
        ]));

        for (index, token) in stream.tokens().iter().enumerate() {
            table.add_row(vec![
                Cell::new(index).set_alignment(CellAlignment::Right),
                Cell::new(token.kind),
                Cell::new(token),
                Cell::new(self.span(token)),
            ]);
        }

        format!("{}\n", table)
    }

    fn span(&self, token: &Token) -> String {
        if token.is_implicit() {
            format!("{} (implicit)", token.span)
        } else {
            format!("{} [{}..{})", token.span, token.span.start, token.span.end)
        }
    }
}
