use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "chessworth";

#[test]
fn quit_game() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("q\ny\n")
            .assert()
            .success()
            .stdout(
                contains("Chessworth")
                    .and(contains("Legal moves: ["))
                    .and(contains("White to move ('q' to quit): "))
                    .and(contains("Game aborted.")),
            ),
    );
}

#[test]
fn mutual_destruction_from_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args([
        "--fen",
        "rnb1kbnr/pppp1ppp/4p3/6q1/4N3/8/PPPPPPPP/R1BQKBNR w KQkq - 2 3",
    ]);

    drop(
        cmd.write_stdin("Nxg5\n")
            .assert()
            .success()
            .stdout(
                contains("Move history: Nxg5 (✖ mutual destruction)")
                    .and(contains("Black to move")),
            ),
    );
}

#[test]
fn checkmate() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("f3\ne5\ng4\nQh4#\n")
            .assert()
            .success()
            .stdout(contains("Game over!\nResult: 0-1")),
    );
}

#[test]
fn invalid_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--fen", "8/8/8/8/8/8/8/8 w - - 0 1"]);

    drop(
        cmd.assert()
            .failure()
            .stderr(contains("expected 1 white king, got 0")),
    );
}

#[test]
fn logs_to_file() {
    let log_file = std::env::temp_dir().join(format!("chessworth-{}.log", std::process::id()));
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--log-level", "debug", "--log-file"]).arg(&log_file);

    drop(cmd.write_stdin("e4\nq\ny\n").assert().success());
    let log = std::fs::read_to_string(&log_file).expect("log file should be written");
    assert!(log.contains("e4 (e2e4): normal"), "{log}");
    drop(std::fs::remove_file(log_file));
}
