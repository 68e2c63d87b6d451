#![no_main]
use chessworth::chess::position::Position;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::from_fen(input) else {
        return;
    };
    let shakmaty_setup: shakmaty::fen::Fen = input
        .parse()
        .expect("when we parsed a valid position it should be accepted by shakmaty");
    // shakmaty rejects some positions that are accepted here, e.g. the ones
    // where the side that just moved is in check.
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard) else {
        return;
    };
    assert_eq!(
        position
            .generate_moves()
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
});
