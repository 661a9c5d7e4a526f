//! PGN summarising: headers the pipeline needs plus the mainline length.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

/// What the insights pipeline keeps from a PGN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnSummary {
    pub termination: Option<String>,
    pub eco_url: Option<String>,
    pub ply_count: usize,
}

#[derive(Default)]
struct Headers {
    termination: Option<String>,
    eco_url: Option<String>,
    fen: Option<String>,
    variant: Option<String>,
}

/// Movetext state. `board` is `None` for variant games, whose moves are
/// counted without replaying them.
struct Mainline {
    headers: Headers,
    board: Option<Chess>,
    plies: usize,
    stopped: bool,
}

struct SummaryVisitor;

impl Visitor for SummaryVisitor {
    type Tags = Headers;
    type Movetext = Mainline;
    type Output = PgnSummary;

    fn begin_tags(&mut self) -> ControlFlow<PgnSummary, Headers> {
        ControlFlow::Continue(Headers::default())
    }

    fn tag(&mut self, tags: &mut Headers, name: &[u8], value: RawTag<'_>) -> ControlFlow<PgnSummary> {
        let value = value.decode_utf8_lossy().into_owned();
        match name {
            b"Termination" => tags.termination = Some(value),
            b"ECOUrl" => tags.eco_url = Some(value),
            b"FEN" => tags.fen = Some(value),
            b"Variant" => tags.variant = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, headers: Headers) -> ControlFlow<PgnSummary, Mainline> {
        let board = if headers.variant.is_some() {
            None
        } else {
            match headers.fen.as_deref() {
                Some(fen) => starting_position(fen),
                None => Some(Chess::default()),
            }
        };

        ControlFlow::Continue(Mainline {
            headers,
            board,
            plies: 0,
            stopped: false,
        })
    }

    fn san(&mut self, mainline: &mut Mainline, san_plus: SanPlus) -> ControlFlow<PgnSummary> {
        if mainline.stopped {
            return ControlFlow::Continue(());
        }

        match mainline.board.as_mut() {
            Some(board) => match san_plus.san.to_move(board) {
                Ok(mv) => {
                    board.play_unchecked(mv);
                    mainline.plies += 1;
                }
                // Count stops at the first illegal move.
                Err(_) => mainline.stopped = true,
            },
            None => mainline.plies += 1,
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _mainline: &mut Mainline) -> ControlFlow<PgnSummary, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, mainline: Mainline) -> PgnSummary {
        PgnSummary {
            termination: mainline.headers.termination,
            eco_url: mainline.headers.eco_url,
            ply_count: mainline.plies,
        }
    }
}

fn starting_position(fen: &str) -> Option<Chess> {
    let fen: Fen = fen.parse().ok()?;
    fen.into_position(CastlingMode::Chess960).ok()
}

/// Parse the first game of a PGN string.
/// Returns `None` when the text holds no game at all.
pub fn parse_pgn(pgn: &str) -> Option<PgnSummary> {
    if pgn.trim().is_empty() {
        return None;
    }

    let mut reader = Reader::new(pgn.as_bytes());
    reader.read_game(&mut SummaryVisitor).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pgn_basic() {
        let pgn = r#"[Event "Live Chess"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[ECOUrl "https://www.chess.com/openings/Kings-Pawn-Opening"]
[Termination "Player1 won by resignation"]

1. e4 {[%clk 0:09:58]} 1... e5 2. Nf3 Nc6 1-0"#;

        let summary = parse_pgn(pgn).unwrap();
        assert_eq!(summary.ply_count, 4);
        assert_eq!(summary.termination.as_deref(), Some("Player1 won by resignation"));
        assert_eq!(
            summary.eco_url.as_deref(),
            Some("https://www.chess.com/openings/Kings-Pawn-Opening")
        );
    }

    #[test]
    fn test_variations_are_not_counted() {
        let pgn = "1. e4 (1. d4 d5) 1... e5 2. Nf3 *";
        assert_eq!(parse_pgn(pgn).unwrap().ply_count, 3);
    }

    #[test]
    fn test_counting_stops_at_illegal_move() {
        let pgn = "1. e4 e5 2. Ke3 Nc6 3. Nf3 *";
        assert_eq!(parse_pgn(pgn).unwrap().ply_count, 2);
    }

    #[test]
    fn test_custom_start_position() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"]

1. e4 Kd7 2. e5 *"#;
        assert_eq!(parse_pgn(pgn).unwrap().ply_count, 3);
    }

    #[test]
    fn test_variant_moves_are_counted_without_replay() {
        let pgn = r#"[Variant "Crazyhouse"]

1. e4 d5 2. exd5 Qxd5 3. N@f3 *"#;
        assert_eq!(parse_pgn(pgn).unwrap().ply_count, 5);
    }

    #[test]
    fn test_empty_text_has_no_game() {
        assert_eq!(parse_pgn(""), None);
        assert_eq!(parse_pgn("   \n"), None);
    }
}
