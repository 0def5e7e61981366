//! Terminal rendering for component state.

use crate::common::{COLS, ROWS};
use crate::components::countdown::{CountdownPhase, CountdownState};
use crate::components::grid::GridState;
use colored::{ColoredString, Colorize};

const GAP: &str = "  ";

fn marker_glyph(value: u8) -> ColoredString {
    match value {
        0 => "·".dimmed(),
        1 => "1".yellow().bold(),
        v => v.to_string().yellow(),
    }
}

/// Renders every grid side by side as bordered boxes.
pub fn render_grid(state: &GridState) -> String {
    let grids = state.grids();
    let border = format!("+{}+", "-".repeat(COLS * 2 + 1));
    let edge = vec![border.as_str(); grids.len()].join(GAP);

    let mut out = String::new();
    out.push_str(&edge.dimmed().to_string());
    out.push('\n');
    for row in 0..ROWS {
        let line: Vec<String> = grids
            .iter()
            .map(|cells| {
                let body: String = cells[row]
                    .iter()
                    .map(|&value| format!("{} ", marker_glyph(value)))
                    .collect();
                format!("{} {}{}", "|".dimmed(), body, "|".dimmed())
            })
            .collect();
        out.push_str(&line.join(GAP));
        out.push('\n');
    }
    out.push_str(&edge.dimmed().to_string());
    out
}

/// Renders a one-line countdown status.
pub fn render_countdown(state: &CountdownState) -> String {
    let label = match state.phase() {
        CountdownPhase::Idle => "idle".dimmed(),
        CountdownPhase::Running => "running".green(),
        CountdownPhase::Completed => "completed".cyan().bold(),
    };
    format!("{:>3}/{} [{}]", state.remaining(), state.initial(), label)
}
