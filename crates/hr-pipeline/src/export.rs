//! CSV rendering of a board, one row per card.

use std::io::Write;

use serde::Serialize;

use crate::pipeline::BoardView;

#[derive(Debug, Serialize)]
struct BoardRow<'a> {
    column: &'a str,
    status: &'a str,
    id: i64,
    title: &'a str,
    subtitle: &'a str,
    badges: String,
    note: &'a str,
}

/// Write `board` as CSV with a header row. Returns the number of card rows.
pub fn write_board_csv<W: Write>(board: &BoardView, writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for column in &board.columns {
        for card in &column.cards {
            csv_writer.serialize(BoardRow {
                column: column.label,
                status: column.status,
                id: card.id.0,
                title: &card.title,
                subtitle: &card.subtitle,
                badges: card.badges.join("; "),
                note: card.note.as_deref().unwrap_or_default(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    Ok(rows)
}
