//! Plain-text rendering of boards, racks and scores
//!
//! Every square is three characters wide. Committed letters are shown as
//! ` A `, the letters of the last move as `(A)` and pending tiles as `[A]`.
//! Free bonus squares show their kind (`TW`, `DW`, `TL`, `DL`).

use crate::game::MoveDraft;
use shared::board::{BOARD_HEIGHT, BOARD_WIDTH};
use shared::{Board, BonusKind, GameView, Index, Letter, Placement, PlayerId, Position, Scoreboard};
use std::fmt::Write;

fn bonus_label(bonus: Option<BonusKind>) -> &'static str {
    match bonus {
        Some(BonusKind::TripleWord) => "TW ",
        Some(BonusKind::DoubleWord) => "DW ",
        Some(BonusKind::TripleLetter) => "TL ",
        Some(BonusKind::DoubleLetter) => "DL ",
        None => " . ",
    }
}

fn cell(board: &Board, last_played: &[Index], pending: &Placement, index: Index) -> String {
    if let Some(letter) = pending.get(&index) {
        format!("[{}]", letter)
    } else if let Some(letter) = board.get(index) {
        if last_played.contains(&index) {
            format!("({})", letter)
        } else {
            format!(" {} ", letter)
        }
    } else {
        bonus_label(index.bonus()).to_string()
    }
}

pub fn render_board(board: &Board, last_played: &[Index], pending: &Placement) -> String {
    let mut out = String::from("   ");
    for x in 0..BOARD_WIDTH {
        let _ = write!(out, "{:^3}", x);
    }
    out.push('\n');

    for y in 0..BOARD_HEIGHT {
        let _ = write!(out, "{:>2} ", y);
        for x in 0..BOARD_WIDTH {
            if let Some(position) = Position::new(x, y) {
                out.push_str(&cell(board, last_played, pending, position.to_index()));
            }
        }
        out.push('\n');
    }

    out
}

pub fn render_rack(rack: &[Option<Letter>]) -> String {
    let mut out = String::new();
    for (slot, letter) in rack.iter().enumerate() {
        match letter {
            Some(letter) => {
                let _ = write!(out, "{}:{}({}) ", slot, letter, letter.score());
            }
            None => {
                let _ = write!(out, "{}:_ ", slot);
            }
        }
    }
    out.trim_end().to_string()
}

pub fn render_scores(players: &Scoreboard, current_turn: PlayerId, me: PlayerId) -> String {
    [PlayerId::One, PlayerId::Two]
        .into_iter()
        .map(|player| {
            let summary = players.get(player);
            format!(
                "{} {} {}: {}{}",
                if player == current_turn { ">" } else { " " },
                player,
                summary.name,
                summary.score,
                if player == me { " (you)" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole screen for a player: scores, board with pending tiles, rack
pub fn render_view(view: &GameView, me: PlayerId, draft: Option<&MoveDraft>) -> String {
    let pending = draft.map(MoveDraft::placement).unwrap_or_default();

    let mut out = render_scores(&view.players, view.current_turn, me);
    out.push_str("\n\n");
    out.push_str(&render_board(&view.letters, &view.last_played, &pending));

    if view.authenticated {
        let rack = match draft {
            Some(draft) => render_rack(draft.rack()),
            None => render_rack(&view.rack.iter().copied().map(Some).collect::<Vec<_>>()),
        };
        let _ = write!(out, "\nRack: {}", rack);
    } else {
        out.push_str("\nSpectating");
    }

    out
}
