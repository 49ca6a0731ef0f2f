//! The title screen and its static sub-menus.

use std::io::{self, Write};

use crate::prompt::Selector;
use crate::screen::{SCROLL_DELAY, Screen};

const LOGO: [&str; 8] = [
    r" ______  __________________ _______  _______  _______           _______  _______ ",
    r"(  ___ \ \__   __/\__   __/(       )(  ___  )(  ____ \|\     /|(  ____ \(  ____ )",
    r"| (   ) )   ) (      ) (   | () () || (   ) || (    \/| )   ( || (    \/| (    )|",
    r"| (__/ /    | |      | |   | || || || (___) || (_____ | (___) || (__    | (____)|",
    r"|  __ (     | |      | |   | |(_)| ||  ___  |(_____  )|  ___  ||  __)   |     __)",
    r"| (  \ \    | |      | |   | |   | || (   ) |      ) || (   ) || (      | (\ (   ",
    r"| )___) )___) (___   | |   | )   ( || )   ( |/\____) || )   ( || (____/\| ) \ \__",
    r"|/ \___/ \_______/   )_(   |/     \||/     \|\_______)|/     \|(_______/|/   \__/",
];

// Meaningless version number.
const VERSION: &str = "V6.327438247";

/// What the title screen resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Exit,
}

/// Shows the title screen until the player either starts a game or quits.
/// The informational sub-menus loop back here.
pub fn run_start_menu(screen: &Screen) -> MenuChoice {
    let mut menu = Selector::new();
    for code in ['p', 'i', 'a', 'l', 'e'] {
        menu.add_option(code);
    }

    loop {
        screen.clear();
        for line in LOGO {
            screen.center(line);
        }
        screen.blank();
        screen.center(VERSION);
        screen.blank();
        screen.center("Type and enter the character in parenthesis to select an option.");
        screen.blank();

        screen.center("(P)LAY");
        screen.center("(I)NSTRUCTIONS");
        screen.center("(A)BOUT");
        screen.center("(L)ICENSE");
        screen.center("(E)XIT");

        match menu.get_selection(screen) {
            'p' => return MenuChoice::Play,
            'i' => show_instructions(screen),
            'a' => show_about(screen),
            'l' => show_license(screen),
            'e' => return MenuChoice::Exit,
            _ => {}
        }
    }
}

fn show_instructions(screen: &Screen) {
    screen.clear();
    screen.center("INSTRUCTIONS");
    screen.blank();
    screen.center(
        "You are an antivirus trying to rid a computer of a RANSOMWARE before it takes over \
         the system. There is a finite amount of time before the system is fully infected",
    );
    screen.blank();
    screen.center(
        "In order to defeat it, you must find all items before you find the RANSOMWARE. If \
         you do not, you will not be able to EXTRACT it and you will lose.",
    );
    screen.blank();
    screen.center(
        "Each system (room) contains an item, which you can move to; UP, DOWN, LEFT, AND \
         RIGHT. Keep in mind that the map is NOT 2D; moving RIGHT, UP, LEFT, and DOWN will \
         lead to a different room than the one you started in. The map is 'spiky' \
         so-to-speak.",
    );
    screen.blank();
    screen.center(
        "You have a SCANner to aid in figuring out which rooms contain items and which have \
         the RANSOMWARE. Using the SCANner will reveal what the surrounding rooms contain, \
         and the room you are currently in will be automatically SCANned for you. But \
         beware: SCANning takes time. Also, occasionally a SCAN will fail and need to be \
         repeated.",
    );
    screen.blank();
    screen.center("Good luck");
    screen.blank();
    screen.await_player(true);
}

fn show_about(screen: &Screen) {
    screen.clear();
    screen.center("ABOUT");
    screen.blank();
    screen.center(
        "A text-based adventure game where you visit various rooms to gather items. If you \
         get all the items before you meet the boss, you win, else, you lose.",
    );
    screen.blank();
    screen.center(
        "The premise is as old as the genre; the fun is in massively overcomplicating it. \
         Anything worth making is worth overdoing.",
    );
    screen.blank();
    screen.center("Anyways, have fun");
    screen.blank();
    screen.await_player(true);
}

fn show_license(screen: &Screen) {
    screen.clear();
    screen.center("LICENSE");
    screen.blank();
    screen.center(
        "This program is free software distributed under the MIT license: use, copy, \
         modify, and redistribute it freely, as long as the license text and copyright \
         notice stay with every copy.",
    );
    screen.blank();
    screen.center(
        "It is provided 'as is', without warranty of any kind, express or implied. See the \
         full MIT license text for the exact terms.",
    );
    screen.blank();
    screen.await_player(true);
}

/// The paced goodbye shown when quitting from the title screen.
pub fn run_exit_sequence(screen: &Screen) {
    print!("EXITing");
    let _ = io::stdout().flush();
    for _ in 0..3 {
        screen.sleep(SCROLL_DELAY);
        print!(".");
        let _ = io::stdout().flush();
    }
    println!();
}
