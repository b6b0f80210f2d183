use core::fmt;

use board::{Board, MoveOutcome};

/// A backend which feeds submitted moves to a board and narrates the results
pub struct Session<B> {
    /// The current state of the board
    gamestate: B,
    /// How many half-moves have been accepted so far
    half_moves: usize,
}

impl<B: Board> Session<B>
where
    B::Err: fmt::Display,
{
    /// Create a new instance with the chess starting board
    pub fn new() -> Self {
        Self {
            gamestate: B::initial_state(),
            half_moves: 0,
        }
    }

    /// Submit a single move and print what came of it
    ///
    /// The result is returned as well so callers can branch on it; a
    /// rejection leaves the game state untouched.
    pub fn submit(&mut self, source: &str, destination: &str) -> Result<MoveOutcome, B::Err> {
        let result = self.gamestate.submit_move(source, destination);
        match &result {
            Ok(outcome) => {
                self.half_moves += 1;
                print!("{source} -> {destination}");
                match outcome {
                    MoveOutcome::Ongoing => println!(),
                    MoveOutcome::Check => println!(" (check)"),
                    MoveOutcome::Checkmate => println!(" (checkmate)"),
                    MoveOutcome::Stalemate => println!(" (stalemate)"),
                }
            }
            Err(reason) => println!("{source} -> {destination} rejected: {reason}"),
        }
        result
    }

    /// Submit a scripted sequence of moves, stopping early if the game ends
    ///
    /// Rejected moves are narrated and skipped; the rest of the script still
    /// plays.
    pub fn play_script(&mut self, moves: &[(&str, &str)]) {
        for &(source, destination) in moves {
            if let Ok(outcome) = self.submit(source, destination) {
                if outcome.is_terminal() {
                    break;
                }
            }
        }
    }

    /// How many submitted moves have been accepted
    pub fn half_moves(&self) -> usize {
        self.half_moves
    }

    /// Get the state of the game right now
    pub fn game_state(&self) -> &B {
        &self.gamestate
    }
}

impl<B: Board> Default for Session<B>
where
    B::Err: fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::GameOutcome;
    use mailbox::MailboxRepresentation;

    #[test]
    fn test_session_counts_only_accepted_moves() {
        let mut session: Session<MailboxRepresentation> = Session::new();
        assert!(session.submit("E2", "E5").is_err());
        assert!(session.submit("E2", "E4").is_ok());
        assert!(session.submit("E7", "E5").is_ok());
        assert_eq!(session.half_moves(), 2);
        assert_eq!(session.game_state().game_outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn test_script_plays_past_rejections() {
        let mut session: Session<MailboxRepresentation> = Session::new();
        session.play_script(&[("E2", "E5"), ("E2", "E4"), ("E7", "E5")]);
        assert_eq!(session.half_moves(), 2);
        assert_eq!(session.game_state().game_outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn test_script_stops_at_the_end_of_the_game() {
        let mut session: Session<MailboxRepresentation> = Session::new();
        session.play_script(&[
            ("F2", "F3"),
            ("E7", "E5"),
            ("G2", "G4"),
            ("D8", "H4"),
            // never reached
            ("A2", "A3"),
        ]);
        assert_eq!(session.half_moves(), 4);
        assert_eq!(
            session.game_state().game_outcome(),
            GameOutcome::BlackCheckmate
        );
    }
}
