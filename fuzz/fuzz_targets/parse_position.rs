#![no_main]
use chessworth::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(position) = Position::try_from(input) {
        let printed = position.to_string();
        let reparsed = Position::from_fen(&printed).expect("printed FEN should be valid");
        assert_eq!(reparsed, position);
    }
});
