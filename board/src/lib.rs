use core::{fmt, str::FromStr};
use std::error;

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
    ];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// The kind denoted by the given FEN letter, in either case
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        Some(match letter.to_ascii_lowercase() {
            'p' => Self::Pawn,
            'r' => Self::Rook,
            'n' => Self::Knight,
            'b' => Self::Bishop,
            'q' => Self::Queen,
            'k' => Self::King,
            _ => return None,
        })
    }

    /// The English name of the piece kind, as used in narration
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Rook => "Rook",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Queen => "Queen",
            Self::King => "King",
        }
    }
}
impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn is_black(self) -> bool {
        match self {
            Color::White => false,
            Color::Black => true,
        }
    }

    pub const fn is_white(self) -> bool {
        match self {
            Color::White => true,
            Color::Black => false,
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

/// A piece on the board
///
/// The kind and color are fixed at creation; `has_moved` flips to true the
/// first time the piece completes a move and is never reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}
impl Piece {
    /// A freshly-created piece which has not moved yet
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Create a piece from its FEN letter (uppercase white, lowercase black)
    ///
    /// This is the construction path used when loading a position: each
    /// placement letter dispatches to the piece kind it denotes.
    ///
    /// ```
    /// # use board::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::from_fen_letter('N'), Some(Piece::new(PieceKind::Knight, Color::White)));
    /// assert_eq!(Piece::from_fen_letter('q'), Some(Piece::new(PieceKind::Queen, Color::Black)));
    /// assert_eq!(Piece::from_fen_letter('x'), None);
    /// ```
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_fen_letter(letter) {
            Some(kind) => Some(Self::new(kind, color)),
            None => None,
        }
    }

    pub const fn fen_letter(self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }
}

/// The classification of an accepted move, reported back to the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game continues and the new side to move is not in check
    Ongoing,
    /// The new side to move is in check but can escape
    Check,
    /// The new side to move has no legal move and is in check
    Checkmate,
    /// The new side to move has no legal move and is not in check
    Stalemate,
}
impl MoveOutcome {
    /// Whether this outcome ends the game
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

/// The possible outcomes of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// The game has not ended
    InProgress,
    /// White checkmated black
    WhiteCheckmate,
    /// Black checkmated white
    BlackCheckmate,
    /// Draw because the side to move had no legal moves while not in check
    Stalemate,
}

bitflags::bitflags! {
    /// Which castles are allowed (the king and rook haven't moved yet)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleOptions: u8 {
        const WhiteKingside = 0b0000_0001;
        const WhiteQueenside = 0b0000_0010;
        /// A mask for whether white can castle in either direction
        const White = 0b0000_0011;
        const BlackKingside = 0b0000_0100;
        const BlackQueenside = 0b0000_1000;
        /// A mask for whether black can castle in either direction
        const Black = 0b0000_1100;
    }
}
impl CastleOptions {
    /// The mask covering both of the given color's rights
    pub const fn side_mask(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }

    /// The single right for the given color and board side
    pub const fn right(color: Color, kingside: bool) -> Self {
        match (color, kingside) {
            (Color::White, true) => Self::WhiteKingside,
            (Color::White, false) => Self::WhiteQueenside,
            (Color::Black, true) => Self::BlackKingside,
            (Color::Black, false) => Self::BlackQueenside,
        }
    }
}

/// A coordinate on the board
///
/// Row 0 is rank 8 (the top of the board, black's back rank) and row 7 is
/// rank 1; column 0 is file A. Anything outside `[0, 8)` in either
/// coordinate is the invalid sentinel, which is never used to index a
/// board.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Square {
    row: i8,
    col: i8,
}
impl Square {
    /// An invalid square
    ///
    /// Please use this instead of making your own so it's obvious if a
    /// deliberately-invalid square appeared.
    pub const INVALID: Self = Self { row: -1, col: -1 };

    /// Produce a square from row and column, collapsing anything off the
    /// board to [`Self::INVALID`]
    ///
    /// ```
    /// # use board::Square;
    /// assert!(Square::new(0, 0).is_valid());
    /// assert!(Square::new(7, 7).is_valid());
    /// assert_eq!(Square::new(8, 0), Square::INVALID);
    /// assert_eq!(Square::new(0, -1), Square::INVALID);
    /// ```
    pub const fn new(row: i8, col: i8) -> Self {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Self { row, col }
        } else {
            Self::INVALID
        }
    }

    /// Returns if this square is on the board
    ///
    /// ```
    /// # use board::Square;
    /// assert!(!Square::INVALID.is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    /// The row index (0 = rank 8)
    pub const fn row(self) -> i8 {
        self.row
    }

    /// The column index (0 = file A)
    pub const fn col(self) -> i8 {
        self.col
    }

    /// Offset the given number of rows and columns
    ///
    /// An offset which leaves the board, or an offset of an invalid square,
    /// yields [`Self::INVALID`].
    ///
    /// ```
    /// # use board::Square;
    /// assert_eq!(Square::new(4, 4).offset(1, -2), Square::new(5, 2));
    /// assert_eq!(Square::new(0, 0).offset(-1, 0), Square::INVALID);
    /// assert_eq!(Square::INVALID.offset(1, 1), Square::INVALID);
    /// ```
    pub const fn offset(self, rows: i8, cols: i8) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }
        Self::new(self.row + rows, self.col + cols)
    }

    /// An iterator over all valid squares on the board
    ///
    /// ```
    /// assert_eq!(board::Square::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).map(|idx| Self {
            row: idx / 8,
            col: idx % 8,
        })
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Square")
            .field("row", &self.row)
            .field("col", &self.col)
            .field("readable", &self.to_string())
            .finish()
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            let file = (b'A' + self.col as u8) as char;
            let rank = (b'8' - self.row as u8) as char;
            write!(f, "{file}{rank}")
        } else {
            f.write_str("??")
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SquareParseError;
impl fmt::Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("board coordinate string was invalid")
    }
}
impl error::Error for SquareParseError {}
impl FromStr for Square {
    type Err = SquareParseError;

    /// Parse a coordinate like `"E2"`; the file letter may be either case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.as_bytes();
        if s.len() != 2 {
            return Err(SquareParseError);
        }
        let col = match s[0].to_ascii_uppercase() {
            file @ b'A'..=b'H' => (file - b'A') as i8,
            _ => return Err(SquareParseError),
        };
        let row = match s[1] {
            rank @ b'1'..=b'8' => (b'8' - rank) as i8,
            _ => return Err(SquareParseError),
        };
        Ok(Self { row, col })
    }
}

/// Functionality belonging to all board representations that can be made
pub trait Board: Sized {
    /// An error type that can be returned from a rejected move
    type Err: fmt::Debug;

    /// Parse a board from the given FEN
    fn from_fen(fen: &str) -> Self;

    /// Convert to a FEN string
    fn to_fen(&self) -> String;

    /// Get the state at the start of a chess game
    fn initial_state() -> Self;

    /// Submit a move given as two coordinates in algebraic notation
    ///
    /// Applies the move if it is legal and classifies the resulting
    /// position; otherwise returns the reason for the rejection and leaves
    /// the board untouched.
    fn submit_move(&mut self, source: &str, destination: &str) -> Result<MoveOutcome, Self::Err>;

    /// Whether the game has ended, and how
    fn game_outcome(&self) -> GameOutcome;
}
