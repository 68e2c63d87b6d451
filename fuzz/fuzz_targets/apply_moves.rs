#![no_main]
use chessworth::chess::game::Game;
use chessworth::variant::{MoveApplier, MoveOutcome};
use libfuzzer_sys::fuzz_target;

// Every byte picks one of the legal moves. Mutual destructions must remove
// exactly two pieces and never a king, rejected moves must not change the game.
fuzz_target!(|data: &[u8]| {
    let applier: MoveApplier = MoveApplier::default();
    let mut game = Game::starting();
    for byte in data {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return;
        }
        let next_move = moves[usize::from(*byte) % moves.len()];
        let before = game.clone();
        let pieces = before.position().board().occupancy().bits().count_ones();
        match applier.apply(&mut game, next_move) {
            Ok(MoveOutcome::MutualDestruction) => {
                let after = game.position().board().occupancy().bits().count_ones();
                assert_eq!(after + 2, pieces);
                assert_eq!(game.moves(), before.moves());
            },
            Ok(MoveOutcome::Normal) => {
                assert_eq!(game.moves().len(), before.moves().len() + 1);
            },
            Err(_) => assert_eq!(game, before),
        }
        // Both kings always stay on the board.
        let fen = game.position().to_string();
        let placement = fen.split(' ').next().unwrap_or_default();
        assert!(placement.contains('K') && placement.contains('k'), "{fen}");
    }
});
