//! Line-oriented terminal presentation and keyboard input.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tile_merge_core::Input;
use tile_merge_rendering::{
    BoardFrame, Color, Key, RenderingBackend, TerminalChoice, TerminalNotifier,
};

const CELL_WIDTH: usize = 6;

/// What the player typed on one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Line {
    /// Inputs in the order they were typed.
    Inputs(Vec<Input>),
    /// The player asked to leave or the input stream ended.
    Quit,
}

/// Terminal that reads keys line by line and prints the board as text.
#[derive(Debug)]
pub(crate) struct Terminal<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub(crate) fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    /// Prompts for and reads the next line of moves.
    pub(crate) fn read_line(&mut self) -> Result<Line> {
        write!(self.output, "move [wasd/hjkl/arrows, q to quit]> ")
            .context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let Some(line) = self.next_line()? else {
            return Ok(Line::Quit);
        };
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            return Ok(Line::Quit);
        }
        Ok(Line::Inputs(
            parse_keys(trimmed).into_iter().map(Key::to_input).collect(),
        ))
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from terminal")?;
        Ok((read > 0).then_some(line))
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }

    fn paint(&self, text: &str, background: Color, foreground: Color) -> String {
        if !self.color {
            return text.to_owned();
        }
        let (br, bg, bb) = background.to_rgb_u8();
        let (fr, fg, fb) = foreground.to_rgb_u8();
        format!("\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m{text}\x1b[0m")
    }
}

impl<R: BufRead, W: Write> RenderingBackend for Terminal<R, W> {
    fn present(&mut self, frame: &BoardFrame) -> Result<()> {
        let border = format!("+{}+", vec!["-".repeat(CELL_WIDTH); frame.rows.len()].join("+"));
        let mut text = String::new();
        text.push('\n');
        text.push_str(&border);
        text.push('\n');
        for row in &frame.rows {
            text.push('|');
            for cell in row {
                match cell {
                    Some(tile) => {
                        let label = format!("{:^width$}", tile.value.get(), width = CELL_WIDTH);
                        text.push_str(&self.paint(&label, tile.style.background, tile.style.text));
                    }
                    None => text.push_str(&" ".repeat(CELL_WIDTH)),
                }
                text.push('|');
            }
            text.push('\n');
            text.push_str(&border);
            text.push('\n');
        }

        self.output
            .write_all(text.as_bytes())
            .context("failed to draw board")?;
        self.output.flush().context("failed to flush board")
    }
}

impl<R: BufRead, W: Write> TerminalNotifier for Terminal<R, W> {
    fn game_over(&mut self, frame: &BoardFrame) -> Result<TerminalChoice> {
        if let Some(best) = frame.highest_value() {
            writeln!(self.output, "Highest tile: {}", best.get())
                .context("failed to write summary")?;
        }
        write!(self.output, "You lose! Would you like to play again? [y/N] ")
            .context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let answer = self.next_line()?.unwrap_or_default();
        let choice = match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => TerminalChoice::Restart,
            _ => TerminalChoice::Quit,
        };
        Ok(choice)
    }
}

/// Splits a line into keys, recognising ANSI arrow escape sequences.
fn parse_keys(line: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut characters = line.chars().peekable();
    while let Some(character) = characters.next() {
        match character {
            '\u{1b}' => {
                if characters.next_if_eq(&'[').is_none() {
                    keys.push(Key::Other);
                    continue;
                }
                let key = match characters.next() {
                    Some('A') => Key::ArrowUp,
                    Some('B') => Key::ArrowDown,
                    Some('C') => Key::ArrowRight,
                    Some('D') => Key::ArrowLeft,
                    _ => Key::Other,
                };
                keys.push(key);
            }
            character if character.is_whitespace() || character == ',' => {}
            character => keys.push(Key::Char(character)),
        }
    }
    keys
}
