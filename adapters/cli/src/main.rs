#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tile Merge in the terminal.

mod args;
mod session;
mod settings;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    thread,
};

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_merge_rendering::{RenderingBackend, TerminalChoice, TerminalNotifier};
use tile_merge_system_turn::InputOutcome;

use crate::{
    args::Args,
    session::Session,
    settings::Settings,
    terminal::{Line, Terminal},
};

/// Entry point for the Tile Merge command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let settings = Settings::resolve(&args)?;
    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout(), settings.color);
    play(&settings, &mut terminal)
}

/// Runs games until the player quits, seeding each from a master generator.
fn play<R: BufRead, W: Write>(settings: &Settings, terminal: &mut Terminal<R, W>) -> Result<()> {
    let mut seeds = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    loop {
        let seed: u64 = seeds.gen();
        info!("starting game on a {}x{} grid", settings.size.get(), settings.size.get());
        debug!("game seed {seed}");

        let mut session = Session::new(settings, seed);
        settle(&mut session, settings, terminal)?;

        while !session.is_over() {
            let inputs = match terminal.read_line()? {
                Line::Quit => return Ok(()),
                Line::Inputs(inputs) => inputs,
            };
            for input in inputs {
                match session.submit(input) {
                    InputOutcome::Dispatched => debug!("dispatched {input:?}"),
                    InputOutcome::Ignored => debug!("ignored {input:?}"),
                    InputOutcome::Dropped => debug!("dropped {input:?} while a turn resolves"),
                }
            }
            settle(&mut session, settings, terminal)?;
        }

        let frame = session.frame();
        info!(
            "game over, highest tile {}",
            frame.highest_value().map_or(0, |value| value.get())
        );
        match terminal.game_over(&frame)? {
            TerminalChoice::Restart => continue,
            TerminalChoice::Quit => return Ok(()),
        }
    }
}

/// Runs transitions to completion, drawing intermediate frames when animating.
fn settle<R: BufRead, W: Write>(
    session: &mut Session,
    settings: &Settings,
    terminal: &mut Terminal<R, W>,
) -> Result<()> {
    if settings.animate {
        while let Some(dt) = session.next_completion() {
            thread::sleep(dt);
            session.advance(dt);
            terminal.present(&session.frame())?;
        }
        return Ok(());
    }

    session.finish_transitions();
    terminal.present(&session.frame())
}
