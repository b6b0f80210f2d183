use backend::Session;
use mailbox::MailboxRepresentation;

fn main() {
    // A few submissions that should bounce off the validation layer
    println!("=== Rejected submissions ===");
    let mut session: Session<MailboxRepresentation> = Session::new();
    let _ = session.submit("E9", "E4");
    let _ = session.submit("E4", "E5");
    let _ = session.submit("E7", "E5");
    let _ = session.submit("E2", "E5");
    let _ = session.submit("E2", "E4");

    // Alekhine vs. Vasic, Banja Luka 1931
    println!();
    println!("=== Alekhine vs. Vasic, 1931 ===");
    let mut session: Session<MailboxRepresentation> = Session::new();
    session.play_script(&[
        ("E2", "E4"),
        ("E7", "E6"),
        ("D2", "D4"),
        ("D7", "D5"),
        ("B1", "C3"),
        ("F8", "B4"),
        ("F1", "D3"),
        ("B4", "C3"),
        ("B2", "C3"),
        ("H7", "H6"),
        ("C1", "A3"),
        ("B8", "D7"),
        ("D1", "E2"),
        ("D5", "E4"),
        ("D3", "E4"),
        ("G8", "F6"),
        ("E4", "D3"),
        ("B7", "B6"),
        ("E2", "E6"),
        ("F7", "E6"),
        ("D3", "G6"),
    ]);
    println!("final outcome: {:?}", session.game_state().game_outcome());
}
