//! BitMasher, a text adventure game where you act as an antivirus attempting
//! to rid a computer of a ransomware attack.
//!
//! Main entry point: command-line options, the title-screen loop, and
//! process exit.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bm_core::{GameConfig, GameRng};
use bm_tui::config_file;
use bm_tui::game;
use bm_tui::menus::{self, MenuChoice};
use bm_tui::screen::Screen;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "bitmasher", version, about = "An antivirus hunts down a RANSOMWARE")]
struct Args {
    /// Seed for the session RNG; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a JSON tuning file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable the slow-scroll pacing.
    #[arg(long)]
    fast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match config_file::load_config(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("ERROR: {error}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let screen = Screen::new(!args.fast);

    // Exiting a running game returns to the title screen; only the title
    // screen's exit leaves the process.
    loop {
        match menus::run_start_menu(&screen) {
            MenuChoice::Play => {
                let rng = match args.seed {
                    Some(seed) => GameRng::new(seed),
                    None => GameRng::from_entropy(),
                };
                eprintln!("INFO: session seed {}", rng.seed());
                game::run_game(&config, rng, &screen);
            }
            MenuChoice::Exit => {
                menus::run_exit_sequence(&screen);
                return ExitCode::SUCCESS;
            }
        }
    }
}
