//! Paced line output.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};

use crate::prompt;

/// Delay after each printed line; the slow scroll effect.
pub const SCROLL_DELAY: Duration = Duration::from_millis(110);

/// Terminal width assumed when the real one cannot be queried.
const FALLBACK_WIDTH: usize = 80;

/// Line-oriented output with optional pacing and centering.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    paced: bool,
}

impl Screen {
    pub fn new(paced: bool) -> Self {
        Self { paced }
    }

    pub fn paced(&self) -> bool {
        self.paced
    }

    /// Sleeps only when pacing is on.
    pub fn sleep(&self, duration: Duration) {
        if self.paced {
            thread::sleep(duration);
        }
    }

    fn width(&self) -> usize {
        terminal::size()
            .map(|(width, _)| width as usize)
            .unwrap_or(FALLBACK_WIDTH)
    }

    /// Prints one line, then applies the scroll delay.
    pub fn line(&self, text: &str) {
        println!("{text}");
        let _ = io::stdout().flush();
        self.sleep(SCROLL_DELAY);
    }

    /// Prints one line centered against the terminal width. Text wider than
    /// the terminal is printed as-is.
    pub fn center(&self, text: &str) {
        let width = self.width();
        if text.len() >= width {
            self.line(text);
            return;
        }
        let padding = (width - text.len()) / 2;
        self.line(&format!("{:padding$}{text}", ""));
    }

    pub fn blank(&self) {
        self.line("");
    }

    /// Clears the terminal and homes the cursor.
    pub fn clear(&self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    /// Tells the player to press ENTER and blocks until they do.
    pub fn await_player(&self, center: bool) {
        let message = "Press ENTER to continue";
        if center {
            self.center(message);
        } else {
            self.line(message);
        }
        prompt::read_line_or_exit();
    }
}
