//! Interactive game between two players sharing one terminal. Moves are read
//! in SAN, one per line, and played with the mutual destruction rules.

use std::io::{BufRead, Write};

use itertools::Itertools;
use log::{debug, info};

use crate::chess::core::Player;
use crate::chess::game::Game;
use crate::variant::{MoveApplier, MoveOutcome, Rules};

/// Inputs that end the game early (after a confirmation).
const QUIT_COMMANDS: [&str; 4] = ["quit", "exit", "abort", "q"];

/// How the session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The game is over.
    Finished {
        /// Result in PGN notation.
        result: String,
    },
    /// A player quit and confirmed it.
    Aborted,
    /// The input ended before the game did.
    InputClosed,
}

/// Reads moves from `input`, plays them and reports the game state to
/// `output` until the game is over.
pub struct Session<R, W> {
    game: Game,
    applier: MoveApplier,
    /// Played moves as they were typed, mutual destructions are marked.
    history: Vec<String>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    #[must_use]
    #[allow(missing_docs)]
    pub fn new(game: Game, input: R, output: W) -> Self {
        Self {
            game,
            applier: MoveApplier::default(),
            history: Vec::new(),
            input,
            output,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Moves played in this session in the order they were entered.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Consumes the session and returns the output handle.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the game loop.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors. Invalid moves are reported to the players
    /// and the loop continues.
    pub fn run(&mut self) -> anyhow::Result<SessionEnd> {
        info!("Starting session from {}", self.game.position());
        let rules = *self.applier.rules();
        while !rules.is_game_over(&self.game) {
            self.print_state()?;
            let player = match rules.side_to_move(&self.game) {
                Player::White => "White",
                Player::Black => "Black",
            };
            let Some(input) = self.prompt(&format!("{player} to move ('q' to quit): "))? else {
                return Ok(SessionEnd::InputClosed);
            };
            if QUIT_COMMANDS.contains(&input.to_lowercase().as_str()) {
                let Some(answer) =
                    self.prompt("Are you sure you want to quit the game? (y/n): ")?
                else {
                    return Ok(SessionEnd::InputClosed);
                };
                if answer.eq_ignore_ascii_case("y") {
                    writeln!(self.output, "Game aborted.")?;
                    info!("Game aborted");
                    return Ok(SessionEnd::Aborted);
                }
                continue;
            }
            match self.play(&input) {
                Ok(MoveOutcome::Normal) => self.history.push(input),
                Ok(MoveOutcome::MutualDestruction) => {
                    self.history.push(format!("{input} (✖ mutual destruction)"));
                },
                Err(e) => writeln!(self.output, "Invalid move: {e}")?,
            }
        }
        let result = rules.result(&self.game);
        writeln!(self.output, "{:?}", self.game.position().board())?;
        writeln!(self.output, "Game over!")?;
        writeln!(self.output, "Result: {result}")?;
        info!("Game over: {result}");
        Ok(SessionEnd::Finished { result })
    }

    /// Parses the move in SAN and applies it to the game.
    fn play(&mut self, input: &str) -> anyhow::Result<MoveOutcome> {
        let next_move = self.applier.rules().parse_notation(&self.game, input)?;
        let outcome = self.applier.apply(&mut self.game, next_move)?;
        debug!("{input} ({next_move}): {outcome}");
        Ok(outcome)
    }

    fn print_state(&mut self) -> anyhow::Result<()> {
        let rules = self.applier.rules();
        let legal_moves = rules
            .legal_moves(&self.game)
            .into_iter()
            .map(|next_move| rules.format_notation(&self.game, next_move))
            .join(", ");
        writeln!(self.output, "{:?}", self.game.position().board())?;
        writeln!(self.output)?;
        writeln!(self.output, "Move history: {}", self.history.join(" "))?;
        writeln!(self.output, "Legal moves: [{legal_moves}]")?;
        Ok(())
    }

    /// Prints the prompt and reads the trimmed answer. Returns [`None`] at the
    /// end of input.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
