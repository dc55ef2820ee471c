use hr_pipeline::pipeline::{ApprovalView, BoardView, CardView, StatusValue};
use std::fmt::Write;

fn card_line(card: &CardView) -> String {
    let mut line = format!("  #{} {}", card.id, card.title);
    if !card.subtitle.is_empty() {
        let _ = write!(line, " · {}", card.subtitle);
    }
    for badge in &card.badges {
        let _ = write!(line, " [{badge}]");
    }
    line
}

/// Plain-text kanban: one section per column, then any excluded records.
pub(crate) fn render_board(board: &BoardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", board.title, board.total);

    for column in &board.columns {
        let _ = writeln!(out, "\n{} [{}] ({})", column.label, column.count, column.color.as_str());
        if column.cards.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for card in &column.cards {
            let _ = writeln!(out, "{}", card_line(card));
            if let Some(note) = &card.note {
                let _ = writeln!(out, "     {note}");
            }
        }
    }

    if !board.diagnostics.is_empty() {
        let _ = writeln!(out, "\nExcluded records:");
        for diagnostic in &board.diagnostics {
            let _ = writeln!(out, "  ! {diagnostic}");
        }
    }
    out
}

pub(crate) fn render_approvals(view: &ApprovalView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Leave requests (filter: {}) | {} pending",
        view.filter, view.pending
    );

    if view.requests.is_empty() {
        let _ = writeln!(out, "  No leave requests found.");
    }
    for item in &view.requests {
        let marker = if item.actionable { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} #{} [{}] {} · {}",
            item.card.id,
            item.status.label(),
            item.card.title,
            item.card.subtitle
        );
        if let Some(note) = &item.card.note {
            let _ = writeln!(out, "     {note}");
        }
    }

    for diagnostic in &view.diagnostics {
        let _ = writeln!(out, "  ! {diagnostic}");
    }
    out
}
