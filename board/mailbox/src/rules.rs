//! Movement predicates, obstruction queries, and check detection.
//!
//! The predicates here answer "does this piece's movement rule allow the
//! move on the current board", ignoring whether the mover's own king
//! ends up in check; that filtering happens in `submit_move` through
//! [`MailboxRepresentation::does_move_cause_check`].

use board::{CastleOptions, Color, PieceKind, Square};

use crate::MailboxRepresentation;

impl MailboxRepresentation {
    /// Whether the piece at `source` may move to `target`, castling
    /// included
    pub(crate) fn move_allowed(&mut self, source: Square, target: Square) -> bool {
        if self.plain_move_allowed(source, target) {
            return true;
        }
        match self.get(source) {
            Some(piece) if piece.kind == PieceKind::King => self.castle_allowed(source, target),
            _ => false,
        }
    }

    /// The movement rule for every piece kind except the castling special
    /// case
    ///
    /// This is also the attack predicate used by check detection: castling
    /// is excluded because it can never capture, which keeps check
    /// detection from re-entering itself through the castle safety rules.
    /// Off-board targets and same-color destinations are rejected, never
    /// indexed.
    pub(crate) fn plain_move_allowed(&self, source: Square, target: Square) -> bool {
        let Some(piece) = self.get(source) else {
            return false;
        };
        if !target.is_valid() {
            return false;
        }
        if self
            .get(target)
            .is_some_and(|occupant| occupant.color == piece.color)
        {
            return false;
        }
        let d_row = target.row() - source.row();
        let d_col = target.col() - source.col();
        match piece.kind {
            PieceKind::Pawn => {
                // White pawns move toward row 0, black pawns toward row 7
                let direction: i8 = if piece.color.is_white() { -1 } else { 1 };
                let start_row: i8 = if piece.color.is_white() { 6 } else { 1 };
                if d_col == 0 && d_row == direction {
                    self.get(target).is_none()
                } else if d_col == 0 && d_row == 2 * direction {
                    source.row() == start_row
                        && !piece.has_moved
                        && self.path_clear_straight(source, target)
                        && self.get(target).is_none()
                } else if d_col.abs() == 1 && d_row == direction {
                    // diagonal steps are captures only
                    self.get(target).is_some()
                } else {
                    false
                }
            }
            PieceKind::Knight => {
                (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
            }
            PieceKind::Bishop => {
                d_row.abs() == d_col.abs() && self.path_clear_diagonal(source, target)
            }
            PieceKind::Rook => {
                (d_row == 0 || d_col == 0) && self.path_clear_straight(source, target)
            }
            PieceKind::Queen => {
                if d_row == 0 || d_col == 0 {
                    self.path_clear_straight(source, target)
                } else {
                    d_row.abs() == d_col.abs() && self.path_clear_diagonal(source, target)
                }
            }
            PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
        }
    }

    /// The castling rule
    ///
    /// The king must be unmoved on its home square, the matching right
    /// must still be held, the path to an unmoved-corner rook of its own
    /// color must be clear, and the king may not castle out of, through,
    /// or into an attacked square.
    fn castle_allowed(&mut self, source: Square, target: Square) -> bool {
        let Some(piece) = self.get(source) else {
            return false;
        };
        if piece.kind != PieceKind::King || piece.has_moved {
            return false;
        }
        let home_row: i8 = if piece.color.is_white() { 7 } else { 0 };
        if source != Square::new(home_row, 4) {
            return false;
        }
        let d_row = target.row() - source.row();
        let d_col = target.col() - source.col();
        if d_row != 0 || d_col.abs() != 2 {
            return false;
        }
        let kingside = d_col > 0;
        if !self
            .castles
            .contains(CastleOptions::right(piece.color, kingside))
        {
            return false;
        }
        let rook_square = Square::new(home_row, if kingside { 7 } else { 0 });
        let Some(rook) = self.get(rook_square) else {
            return false;
        };
        if rook.kind != PieceKind::Rook || rook.color != piece.color {
            return false;
        }
        if !self.path_clear_straight(source, rook_square) {
            return false;
        }
        if self.is_king_in_check(piece.color) {
            return false;
        }
        let step = d_col.signum();
        for hop in 1..=2 {
            if self.does_move_cause_check(source, source.offset(0, hop * step), piece.color) {
                return false;
            }
        }
        true
    }

    /// Whether every square strictly between `source` and `target` along a
    /// shared row or column is empty
    ///
    /// Non-straight inputs are reported as blocked rather than crashing on
    /// them; that keeps the contract total even though callers check the
    /// geometry first.
    pub(crate) fn path_clear_straight(&self, source: Square, target: Square) -> bool {
        if source == target {
            return true;
        }
        let (row_step, col_step) = if source.row() == target.row() {
            (0, (target.col() - source.col()).signum())
        } else if source.col() == target.col() {
            ((target.row() - source.row()).signum(), 0)
        } else {
            return false;
        };
        self.path_clear_along(source, target, row_step, col_step)
    }

    /// Whether every square strictly between `source` and `target` along a
    /// shared diagonal is empty; non-diagonal inputs are reported as
    /// blocked
    pub(crate) fn path_clear_diagonal(&self, source: Square, target: Square) -> bool {
        if source == target {
            return true;
        }
        let d_row = target.row() - source.row();
        let d_col = target.col() - source.col();
        if d_row.abs() != d_col.abs() {
            return false;
        }
        self.path_clear_along(source, target, d_row.signum(), d_col.signum())
    }

    fn path_clear_along(&self, source: Square, target: Square, row_step: i8, col_step: i8) -> bool {
        let mut square = source.offset(row_step, col_step);
        while square != target {
            // walking off the board means the target was never reachable
            if !square.is_valid() || self.get(square).is_some() {
                return false;
            }
            square = square.offset(row_step, col_step);
        }
        true
    }

    /// The square holding the given color's king, if it is on the board
    pub(crate) fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&square| {
            self.get(square)
                .is_some_and(|piece| piece.color == color && piece.kind == PieceKind::King)
        })
    }

    /// Returns `true` if the given color's king is attacked by any
    /// opposing piece
    ///
    /// A position built through the raw construction hooks may lack a
    /// king; such a king is reported as not in check rather than
    /// panicking mid-query.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        let Some(king) = self.king_square(color) else {
            return false;
        };
        Square::all().any(|square| {
            self.get(square)
                .is_some_and(|piece| piece.color != color)
                && self.plain_move_allowed(square, king)
        })
    }

    /// Whether relocating `source` to `target` would leave `color`'s king
    /// attacked
    ///
    /// The move is simulated and unconditionally reverted; the board is
    /// unchanged when this returns. Off-board coordinates answer `true`,
    /// so the caller treats them as illegal without any simulation.
    pub(crate) fn does_move_cause_check(
        &mut self,
        source: Square,
        target: Square,
        color: Color,
    ) -> bool {
        if !source.is_valid() || !target.is_valid() {
            return true;
        }
        self.with_simulated_move(source, target, |board| board.is_king_in_check(color))
    }

    /// Whether the given color has any move that leaves its own king out
    /// of check
    ///
    /// Tries every (piece, destination) pair and simulates the candidates
    /// the movement rules allow, short-circuiting on the first escape.
    /// `false` here means checkmate or stalemate depending on whether the
    /// king is currently attacked.
    pub(crate) fn can_escape_check(&mut self, color: Color) -> bool {
        for source in Square::all() {
            if !self
                .get(source)
                .is_some_and(|piece| piece.color == color)
            {
                continue;
            }
            for target in Square::all() {
                if self.move_allowed(source, target)
                    && !self.does_move_cause_check(source, target, color)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Run a read-only query against the position with `source` relocated
    /// onto `target`, restoring both squares on the way out
    ///
    /// Scoping the mutation to the closure means no early return inside a
    /// query can leave the board in the simulated state.
    fn with_simulated_move<T>(
        &mut self,
        source: Square,
        target: Square,
        query: impl FnOnce(&Self) -> T,
    ) -> T {
        let moved = self.grid[source.row() as usize][source.col() as usize].take();
        let captured = core::mem::replace(
            &mut self.grid[target.row() as usize][target.col() as usize],
            moved,
        );
        let result = query(self);
        self.grid[source.row() as usize][source.col() as usize] = core::mem::replace(
            &mut self.grid[target.row() as usize][target.col() as usize],
            captured,
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MailboxRepresentation;
    use board::Board;

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn initial() -> MailboxRepresentation {
        <MailboxRepresentation as Board>::initial_state()
    }

    #[test]
    fn test_knight_jumps_over_the_back_rank() {
        let mut board = initial();
        assert!(board.move_allowed(square("B1"), square("C3")));
        assert!(board.move_allowed(square("B1"), square("A3")));
        // not an L, and an own-piece destination
        assert!(!board.move_allowed(square("B1"), square("B3")));
        assert!(!board.move_allowed(square("B1"), square("D2")));
    }

    #[test]
    fn test_sliders_are_blocked_at_the_start() {
        let mut board = initial();
        assert!(!board.move_allowed(square("A1"), square("A3")));
        assert!(!board.move_allowed(square("C1"), square("A3")));
        assert!(!board.move_allowed(square("D1"), square("H5")));
    }

    #[test]
    fn test_pawn_moves() {
        let mut board =
            MailboxRepresentation::from_fen("4k3/8/8/3p4/4P3/8/6P1/4K3 w -");
        // single and double steps onto empty squares
        assert!(board.move_allowed(square("E4"), square("E5")));
        assert!(board.move_allowed(square("G2"), square("G4")));
        assert!(board.move_allowed(square("G2"), square("G3")));
        // diagonal only when capturing
        assert!(board.move_allowed(square("E4"), square("D5")));
        assert!(!board.move_allowed(square("E4"), square("F5")));
        // no backward or triple moves
        assert!(!board.move_allowed(square("E4"), square("E3")));
        assert!(!board.move_allowed(square("G2"), square("G5")));
    }

    #[test]
    fn test_pawn_double_step_needs_a_clear_path() {
        let board = MailboxRepresentation::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w -");
        assert!(!board.plain_move_allowed(square("E2"), square("E4")));
        assert!(!board.plain_move_allowed(square("E2"), square("E3")));
        // and no diagonal step onto an empty square
        assert!(!board.plain_move_allowed(square("E2"), square("F3")));
    }

    #[test]
    fn test_black_pawn_direction_is_reversed() {
        let mut board = initial();
        assert!(board.move_allowed(square("E7"), square("E5")));
        assert!(board.move_allowed(square("E7"), square("E6")));
        assert!(!board.move_allowed(square("E7"), square("E8")));
    }

    #[test]
    fn test_obstruction_queries_are_total() {
        let board = MailboxRepresentation::EMPTY;
        // knight-shaped and off-line inputs report blocked, not panic
        assert!(!board.path_clear_straight(Square::new(4, 4), Square::new(2, 3)));
        assert!(!board.path_clear_diagonal(Square::new(4, 4), Square::new(2, 3)));
        assert!(board.path_clear_straight(Square::new(4, 4), Square::new(4, 0)));
        assert!(board.path_clear_diagonal(Square::new(4, 4), Square::new(0, 0)));
    }

    #[test]
    fn test_rook_gives_check_along_an_open_file() {
        let board = MailboxRepresentation::from_fen("4k3/8/8/8/8/8/8/4K2r w -");
        assert!(board.is_king_in_check(Color::White));
        assert!(!board.is_king_in_check(Color::Black));
    }

    #[test]
    fn test_simulation_always_reverts() {
        let mut board = initial();
        let before = board.clone();
        // a capture-free relocation and a simulated capture both revert
        assert!(!board.does_move_cause_check(square("E2"), square("E4"), Color::White));
        assert!(!board.does_move_cause_check(square("D1"), square("D7"), Color::White));
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_range_simulation_counts_as_check() {
        let mut board = initial();
        assert!(board.does_move_cause_check(square("E2"), Square::INVALID, Color::White));
        assert!(board.does_move_cause_check(Square::INVALID, square("E4"), Color::White));
    }

    #[test]
    fn test_castle_blocked_by_intervening_pieces() {
        let mut board = initial();
        assert!(!board.move_allowed(square("E1"), square("G1")));
        assert!(!board.move_allowed(square("E1"), square("C1")));
    }

    #[test]
    fn test_castle_through_attacked_square_is_rejected() {
        // the F8 rook covers F1, the square the king slides across
        let mut board = MailboxRepresentation::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ");
        assert!(!board.move_allowed(square("E1"), square("G1")));
        // queenside is unaffected by the F-file
        assert!(board.move_allowed(square("E1"), square("C1")));
    }

    #[test]
    fn test_castle_queenside_ignores_attacks_past_the_king_path() {
        // B1 is attacked, but the king only crosses D1 and C1
        let mut board = MailboxRepresentation::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ");
        assert!(board.move_allowed(square("E1"), square("C1")));
    }

    #[test]
    fn test_castle_while_in_check_is_rejected() {
        let mut board = MailboxRepresentation::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ");
        assert!(board.is_king_in_check(Color::White));
        assert!(!board.move_allowed(square("E1"), square("G1")));
        assert!(!board.move_allowed(square("E1"), square("C1")));
    }

    #[test]
    fn test_castle_requires_the_rook_at_its_corner() {
        let mut board = MailboxRepresentation::from_fen("4k3/8/8/8/8/8/8/4K2R w Q");
        // the kingside rook is present but the right says queenside only,
        // and the queenside corner is bare
        assert!(!board.move_allowed(square("E1"), square("G1")));
        assert!(!board.move_allowed(square("E1"), square("C1")));
    }
}
