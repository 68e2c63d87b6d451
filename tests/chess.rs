use chessworth::chess::core::{Move, Player, Promotion, Square};
use chessworth::chess::game::{Game, Termination};
use chessworth::chess::position::{perft, Position};
use pretty_assertions::assert_eq;

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

/// Parsing the position and printing it back produces the same FEN. Trimmed
/// EPD inputs get the default clocks.
fn legal_position(input: &str) {
    let position = Position::from_fen(input).expect("we are parsing valid position: {input}");
    let expected = match input.split_ascii_whitespace().count() {
        4 => format!("{input} 0 1"),
        _ => input.to_string(),
    };
    assert_eq!(position.to_string(), expected);
}

#[test]
fn basic_positions() {
    // Full FEN.
    legal_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    legal_position("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
    legal_position("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
    legal_position("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
    legal_position("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    legal_position("r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9");
    legal_position("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    legal_position("rnbq1rk1/pp4pp/1b1ppn2/2p2p2/2PP4/1P2PN2/PB2BPPP/RN1Q1RK1 w - c6 0 9");
    // Trimmed FEN.
    legal_position("rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -");
}

#[test]
fn positions_after_mutual_destruction() {
    // The side that just moved can be left in check after both pieces are
    // removed: such positions are still accepted.
    legal_position("4k3/8/8/8/8/8/8/4K2r b - - 0 1");
    legal_position("rnb1kbnr/pppp1ppp/4p3/8/8/8/PPPPPPPP/R1BQKBNR b KQkq - 0 3");
}

#[test]
#[should_panic(expected = "expected 1 white king, got 0")]
fn no_white_king() {
    let _ = Position::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 black king, got 0")]
fn no_black_king() {
    let _ = Position::try_from("8/8/8/8/8/8/8/3K4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 white king, got 3")]
fn too_many_kings() {
    let _ = Position::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 white pawns, got 9")]
fn too_many_white_pawns() {
    let _ =
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 black pawns, got 9")]
fn too_many_black_pawns() {
    let _ =
        Position::try_from("rnbqkbnr/pppppppp/p7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    let _ = Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 6, got 3")]
fn wrong_en_passant_player() {
    let _ = Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1")
        .unwrap();
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 3, got 4")]
fn wrong_en_passant_rank() {
    let _ =
        Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq e4 0 1")
            .unwrap();
}

#[test]
#[should_panic(expected = "en passant square is not beyond pushed pawn")]
fn en_passant_not_beyond_pawn() {
    let _ = Position::try_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 1")
        .unwrap();
}

#[test]
fn clean_board_str() {
    // Prefix with "fen".
    assert!(Position::try_from(
        "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1"
    )
    .is_ok());
    // Prefix with "epd".
    assert!(Position::try_from(
        "epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -"
    )
    .is_ok());
    // No prefix: infer EPD.
    assert!(Position::try_from("rnbqkbnr/pp2pppp/8/3p4/3P4/3B4/PPP2PPP/RNBQK1NR b KQkq -").is_ok());
    // No prefix: infer FEN.
    assert!(
        Position::try_from("rnbqkbnr/pp2pppp/8/3p4/3P4/3B4/PPP2PPP/RNBQK1NR b KQkq - 0 1").is_ok()
    );
    // Don't crash on unicode symbols.
    assert!(Position::try_from("8/8/8/8/8/8/8/8 b 88 🔠 🔠 ").is_err());
    // Whitespaces at the start/end of the input are not accepted in from_fen
    // but will be cleaned up by try_from.
    assert!(Position::try_from(
        "rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
    )
    .is_ok());
    assert!(Position::from_fen(
        "\n epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
    )
    .is_err());
}

#[test]
fn no_crash() {
    assert!(Position::try_from("3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1").is_err());
    assert!(Position::try_from("3kn3/R2p1N2/8/8/70000000000000000B/6K1/3R4/8 b - - 0 1").is_err());
    assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - - 0 4/8 b").is_err());
    assert!(Position::try_from("\tfen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
    assert!(Position::try_from("fen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
    assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - +8 1").is_err());
    assert!(Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err());
}

#[test]
fn basic_moves() {
    let mut position = setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    position.make_move(Move::new(Square::E2, Square::E4, None));
    assert_eq!(
        position.to_string(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
    position.make_move(Move::new(Square::E7, Square::E5, None));
    assert_eq!(
        position.to_string(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
    position.make_move(Move::new(Square::G1, Square::F3, None));
    assert_eq!(
        position.to_string(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
    position.make_move(Move::new(Square::E8, Square::E7, None));
    assert_eq!(
        position.to_string(),
        "rnbq1bnr/ppppkppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQ - 2 3"
    );
}

#[test]
fn promotion_moves() {
    let mut position = setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - - 0 1");
    position.make_move(Move::new(Square::B7, Square::C8, Some(Promotion::Queen)));
    assert_eq!(
        position.to_string(),
        "2Q4k/2P5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 b - - 0 1"
    );
}

#[test]
fn castling_reset() {
    let mut position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    position.make_move(Move::new(Square::A1, Square::A8, None));
    assert_eq!(position.to_string(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
}

#[test]
fn en_passant_capture() {
    let mut position = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    let capture = Move::new(Square::E5, Square::D6, None);
    assert!(position.is_capture(capture));
    assert!(position.is_en_passant(capture));
    position.make_move(capture);
    assert_eq!(position.to_string(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 1");
}

#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

// Position 2.
#[test]
fn perft_kiwipete() {
    let position = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - ");
    assert_eq!(perft(&position, 1), 48);
    assert_eq!(perft(&position, 2), 2039);
}

// Position 3.
#[test]
fn perft_endgame() {
    let position = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&position, 1), 14);
    assert_eq!(perft(&position, 2), 191);
    assert_eq!(perft(&position, 3), 2812);
}

// Position 4.
#[test]
fn perft_complex() {
    let position = setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
    // Mirrored.
    let position = setup("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
}

// Position 5.
#[test]
fn perft_fifth() {
    let position = setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&position, 1), 44);
    assert_eq!(perft(&position, 2), 1486);
}

// Position 6.
#[test]
fn perft_sixth() {
    let position =
        setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    assert_eq!(perft(&position, 1), 46);
    assert_eq!(perft(&position, 2), 2079);
}

// These are expensive in the Debug setting: disable them by default.
#[ignore]
#[test]
fn perft_deep() {
    assert_eq!(perft(&Position::starting(), 4), 197_281);
    assert_eq!(
        perft(
            &setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            3
        ),
        97_862
    );
    assert_eq!(
        perft(&setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"), 4),
        43_238
    );
    assert_eq!(
        perft(
            &setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1"),
            3
        ),
        9_467
    );
    assert_eq!(
        perft(
            &setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8"),
            3
        ),
        62_379
    );
    assert_eq!(
        perft(
            &setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10"),
            3
        ),
        89_890
    );
}

fn play_san(game: &mut Game, moves: &[&str]) {
    for san in moves {
        let next_move = game.position().parse_san(san).unwrap();
        game.push(next_move);
    }
}

#[test]
fn san_game() {
    // Opera game (Morphy vs. Duke of Brunswick and Count Isouard, 1858).
    let moves = [
        "e4", "e5", "Nf3", "d6", "d4", "Bg4", "dxe5", "Bxf3", "Qxf3", "dxe5", "Bc4", "Nf6", "Qb3",
        "Qe7", "Nc3", "c6", "Bg5", "b5", "Nxb5", "cxb5", "Bxb5+", "Nbd7", "O-O-O", "Rd8", "Rxd7",
        "Rxd7", "Rd1", "Qe6", "Bxd7+", "Nxd7", "Qb8+", "Nxb8", "Rd8#",
    ];
    let mut game = Game::starting();
    let mut written = Vec::new();
    for san in moves {
        let next_move = game.position().parse_san(san).unwrap();
        written.push(game.position().san(next_move));
        game.push(next_move);
    }
    assert_eq!(written, moves);
    assert_eq!(game.moves().len(), moves.len());
    assert!(game.is_game_over());
    assert_eq!(game.result(), "1-0");
    assert_eq!(
        game.outcome().map(|outcome| outcome.termination),
        Some(Termination::Checkmate)
    );
}

#[test]
fn san_errors() {
    let position = Position::starting();
    assert!(position.parse_san("").is_err());
    assert!(position.parse_san("e9").is_err());
    assert!(position.parse_san("Nf4").is_err());
    assert!(position.parse_san("O-O").is_err());
    let knights = setup("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
    assert!(knights
        .parse_san("Nd2")
        .unwrap_err()
        .to_string()
        .starts_with("ambiguous san: 'Nd2'"));
    assert_eq!(
        knights.parse_san("Nbd2").unwrap(),
        Move::new(Square::B1, Square::D2, None)
    );
}

#[test]
fn stalemate() {
    let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(game.legal_moves().is_empty());
    assert!(!game.position().in_check());
    assert_eq!(game.result(), "1/2-1/2");
    assert_eq!(
        game.outcome().map(|outcome| outcome.termination),
        Some(Termination::Stalemate)
    );
}

#[test]
fn insufficient_material() {
    let game = Game::from_fen("8/8/4k3/8/8/2B5/8/4K3 w - - 0 40").unwrap();
    assert_eq!(
        game.outcome().map(|outcome| outcome.termination),
        Some(Termination::InsufficientMaterial)
    );
    let game = Game::from_fen("8/8/4k3/8/8/2R5/8/4K3 w - - 0 40").unwrap();
    assert!(!game.is_game_over());
    assert_eq!(game.result(), "*");
}

#[test]
fn seventy_five_moves() {
    let game = Game::from_fen("8/8/4k3/8/8/2R5/8/4K3 w - - 149 100").unwrap();
    assert!(!game.is_game_over());
    assert!(game.can_claim_draw());
    let mut game = game;
    play_san(&mut game, &["Rc4"]);
    assert_eq!(game.position().halfmove_clock(), 150);
    assert_eq!(
        game.outcome().map(|outcome| outcome.termination),
        Some(Termination::SeventyFiveMoves)
    );
}

#[test]
fn fivefold_repetition() {
    let mut game = Game::starting();
    for _ in 0..4 {
        play_san(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8"]);
    }
    assert_eq!(
        game.position().to_string(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 16 9"
    );
    assert!(game.is_game_over());
    assert_eq!(game.result(), "1/2-1/2");
    assert_eq!(game.position().side_to_move(), Player::White);
}
