//! bm-tui: Terminal front end for BitMasher
//!
//! Line-oriented rendering with the slow-scroll pacing of the old machines
//! this game pretends to run on, plus the blocking menus and the drivers
//! that turn core events into narration.

pub mod config_file;
pub mod game;
pub mod menus;
pub mod prompt;
pub mod screen;
