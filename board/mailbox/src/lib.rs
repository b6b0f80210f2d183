//! An 8x8 mailbox board representation and the move-legality engine on
//! top of it.
//!
//! Each square owns at most one [`Piece`]; moving transfers the piece
//! between squares and capturing destroys the occupant of the target
//! square. [`MailboxRepresentation::submit_move`] is the single entry
//! point for playing a move: it validates the request, applies it if
//! legal, and classifies the resulting position. Every rejection leaves
//! the board byte-for-byte unchanged.

use core::str::FromStr;

use board::{
    Board, CastleOptions, Color, GameOutcome, MoveOutcome, Piece, PieceKind, Square,
};

mod rules;

pub type Result<T, E = MoveError> = core::result::Result<T, E>;

/// The reasons a submitted move can be rejected
///
/// None of these mutate the board; a caller simply corrects the request
/// and resubmits.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("`{0}` is not a square on the board")]
    MalformedCoordinate(String),
    #[error("there is no piece at {0}")]
    EmptySource(Square),
    #[error("it is not {0}'s turn to move")]
    WrongTurn(Color),
    // the squares are named from/to because thiserror reserves a field
    // named `source` for the error's cause
    #[error("{color}'s {kind} cannot move from {from} to {to}")]
    IllegalPattern {
        color: Color,
        kind: PieceKind,
        from: Square,
        to: Square,
    },
    #[error("that move would leave {0}'s king in check")]
    SelfCheck(Color),
    #[error("the game is already over")]
    GameOver,
}

/// Represent the game as an 8x8 grid of optional pieces
///
/// Row 0 holds rank 8, matching [`Square`]'s coordinate model. Besides
/// the grid this carries the side to move, the castling rights, and the
/// recorded outcome once the game ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailboxRepresentation {
    grid: [[Option<Piece>; 8]; 8],
    side_to_move: Color,
    castles: CastleOptions,
    outcome: GameOutcome,
}

impl MailboxRepresentation {
    /// A board with no pieces on it and no moves made
    pub const EMPTY: Self = Self {
        grid: [[None; 8]; 8],
        side_to_move: Color::White,
        castles: CastleOptions::empty(),
        outcome: GameOutcome::InProgress,
    };

    /// The FEN prefix for the start of a chess game
    pub const INITIAL_FEN: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq";

    /// Find the piece, if any, at the given square
    ///
    /// Returns `None` if the given square is invalid.
    pub fn get(&self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }
        self.grid[square.row() as usize][square.col() as usize]
    }

    /// Whether the given square is on the board and unoccupied
    pub fn is_empty(&self, square: Square) -> bool {
        square.is_valid() && self.get(square).is_none()
    }

    /// The color whose turn it is
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The castling rights still available
    pub const fn castles(&self) -> CastleOptions {
        self.castles
    }

    /// Whether the game has ended, and how
    pub const fn game_outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Whether the game has reached checkmate or stalemate
    pub const fn is_game_over(&self) -> bool {
        !matches!(self.outcome, GameOutcome::InProgress)
    }

    /// Place a piece at the given square, or clear it with `None`
    ///
    /// This is a construction hook for position loading; it does not
    /// validate the resulting position. Invalid squares are ignored.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.grid[square.row() as usize][square.col() as usize] = piece;
        }
    }

    /// Set the color to move next
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Grant or revoke the given castling right(s)
    pub fn set_castle(&mut self, right: CastleOptions, value: bool) {
        self.castles.set(right, value);
    }

    /// Load a position from the placement, side-to-move, and castling
    /// fields of a FEN string
    ///
    /// Later FEN fields (en passant target, move clocks) are accepted and
    /// ignored, so both full FEN and the three-field prefix load. A valid
    /// position is assumed; malformed input panics. The loaded position
    /// must contain exactly one king per side.
    pub fn from_fen(fen: &str) -> Self {
        let mut board = Self::EMPTY;
        let mut terms = fen.split(' ');
        {
            let pieces = terms.next().expect("Error parsing FEN");
            for (row, rank) in pieces.split('/').enumerate() {
                assert!(row < 8, "Error parsing FEN");
                let mut col: i8 = 0;
                for c in rank.chars() {
                    if let Some(run) = c.to_digit(10) {
                        col += run as i8;
                        continue;
                    }
                    let piece = Piece::from_fen_letter(c).expect("Error parsing FEN");
                    board.set_piece(Square::new(row as i8, col), Some(piece));
                    col += 1;
                }
                assert!(col <= 8, "Error parsing FEN");
            }
        }
        {
            let side_to_move = terms.next().expect("Error parsing FEN");
            board.set_side_to_move(match side_to_move {
                "w" => Color::White,
                "b" => Color::Black,
                _ => panic!("Error parsing FEN"),
            });
        }
        if let Some(castling) = terms.next() {
            if castling != "-" {
                for c in castling.chars() {
                    let right = match c {
                        'K' => CastleOptions::WhiteKingside,
                        'Q' => CastleOptions::WhiteQueenside,
                        'k' => CastleOptions::BlackKingside,
                        'q' => CastleOptions::BlackQueenside,
                        _ => panic!("Error parsing FEN"),
                    };
                    board.set_castle(right, true);
                }
            }
        }
        for color in [Color::White, Color::Black] {
            let kings = Square::all()
                .filter(|&square| {
                    board
                        .get(square)
                        .is_some_and(|piece| piece.kind == PieceKind::King && piece.color == color)
                })
                .count();
            assert_eq!(kings, 1, "position must contain exactly one {color} king");
        }
        board
    }

    /// Serialize the placement, side-to-move, and castling fields to FEN
    pub fn to_fen(&self) -> String {
        let pieces = self
            .grid
            .iter()
            .map(|row| {
                let mut positions = String::with_capacity(8);
                let mut empty_run = 0;
                for square in row {
                    match square {
                        Some(piece) => {
                            if empty_run > 0 {
                                positions.push(char::from_digit(empty_run, 10).unwrap());
                                empty_run = 0;
                            }
                            positions.push(piece.fen_letter());
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    positions.push(char::from_digit(empty_run, 10).unwrap());
                }
                positions
            })
            .collect::<Vec<String>>()
            .join("/");
        let side_to_move = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let castling = {
            let mut options = String::with_capacity(4);
            if self.castles.contains(CastleOptions::WhiteKingside) {
                options.push('K');
            }
            if self.castles.contains(CastleOptions::WhiteQueenside) {
                options.push('Q');
            }
            if self.castles.contains(CastleOptions::BlackKingside) {
                options.push('k');
            }
            if self.castles.contains(CastleOptions::BlackQueenside) {
                options.push('q');
            }
            if options.is_empty() {
                options.push('-');
            }
            options
        };
        format!("{pieces} {side_to_move} {castling}")
    }

    /// Submit a move as two coordinates in algebraic notation (e.g. "E2",
    /// "E4")
    ///
    /// Runs the full validation sequence: the game must still be going,
    /// both coordinates must parse, the source must hold a piece of the
    /// side to move, the piece's movement rule must allow the move, and
    /// the move must not leave the mover's own king in check. Only then is
    /// the move applied, the turn passed, and the new position classified.
    pub fn submit_move(&mut self, source: &str, destination: &str) -> Result<MoveOutcome> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let from = Square::from_str(source)
            .map_err(|_| MoveError::MalformedCoordinate(source.to_owned()))?;
        let to = Square::from_str(destination)
            .map_err(|_| MoveError::MalformedCoordinate(destination.to_owned()))?;
        let Some(piece) = self.get(from) else {
            return Err(MoveError::EmptySource(from));
        };
        if piece.color != self.side_to_move {
            return Err(MoveError::WrongTurn(piece.color));
        }
        if !self.move_allowed(from, to) {
            return Err(MoveError::IllegalPattern {
                color: piece.color,
                kind: piece.kind,
                from,
                to,
            });
        }
        if self.does_move_cause_check(from, to, piece.color) {
            return Err(MoveError::SelfCheck(piece.color));
        }
        self.apply_move(from, to);
        self.side_to_move = self.side_to_move.other();
        Ok(self.classify())
    }

    /// The castling right forfeited when a rook leaves this square, or a
    /// capture lands on it
    const fn corner_right(square: Square) -> CastleOptions {
        match (square.row(), square.col()) {
            (7, 0) => CastleOptions::WhiteQueenside,
            (7, 7) => CastleOptions::WhiteKingside,
            (0, 0) => CastleOptions::BlackQueenside,
            (0, 7) => CastleOptions::BlackKingside,
            _ => CastleOptions::empty(),
        }
    }

    /// Apply an already-validated move: relocate the piece (destroying any
    /// captured piece), mark it moved, and run the per-kind bookkeeping
    fn apply_move(&mut self, source: Square, target: Square) {
        let Some(mut piece) = self.get(source) else {
            return;
        };
        if self.get(target).is_some() {
            // capturing a piece on a rook's home corner forfeits that right
            self.castles &= !Self::corner_right(target);
        }
        piece.has_moved = true;
        self.set_piece(target, Some(piece));
        self.set_piece(source, None);
        match piece.kind {
            PieceKind::King => {
                self.castles &= !CastleOptions::side_mask(piece.color);
                let lateral = target.col() - source.col();
                if lateral.abs() == 2 {
                    // a castle also slides the rook to the far side of the king
                    let (rook_from, rook_to) = if lateral > 0 {
                        (Square::new(source.row(), 7), Square::new(source.row(), 5))
                    } else {
                        (Square::new(source.row(), 0), Square::new(source.row(), 3))
                    };
                    if let Some(mut rook) = self.get(rook_from) {
                        if rook.kind == PieceKind::Rook && rook.color == piece.color {
                            rook.has_moved = true;
                            self.set_piece(rook_to, Some(rook));
                            self.set_piece(rook_from, None);
                        }
                    }
                }
            }
            PieceKind::Rook => {
                self.castles &= !Self::corner_right(source);
            }
            _ => {}
        }
    }

    /// Classify the position for the new side to move, recording and
    /// clearing out terminal states
    fn classify(&mut self) -> MoveOutcome {
        let side = self.side_to_move;
        if !self.can_escape_check(side) {
            let outcome = if self.is_king_in_check(side) {
                MoveOutcome::Checkmate
            } else {
                MoveOutcome::Stalemate
            };
            self.outcome = match (outcome, side) {
                (MoveOutcome::Checkmate, Color::White) => GameOutcome::BlackCheckmate,
                (MoveOutcome::Checkmate, Color::Black) => GameOutcome::WhiteCheckmate,
                _ => GameOutcome::Stalemate,
            };
            // the position is released once the game ends
            self.clear_board();
            return outcome;
        }
        if self.is_king_in_check(side) {
            MoveOutcome::Check
        } else {
            MoveOutcome::Ongoing
        }
    }

    /// Remove every piece from the board
    fn clear_board(&mut self) {
        self.grid = [[None; 8]; 8];
    }
}

impl Board for MailboxRepresentation {
    type Err = MoveError;

    fn from_fen(fen: &str) -> Self {
        Self::from_fen(fen)
    }

    fn to_fen(&self) -> String {
        self.to_fen()
    }

    fn initial_state() -> Self {
        Self::from_fen(Self::INITIAL_FEN)
    }

    fn submit_move(&mut self, source: &str, destination: &str) -> Result<MoveOutcome> {
        self.submit_move(source, destination)
    }

    fn game_outcome(&self) -> GameOutcome {
        self.game_outcome()
    }
}
