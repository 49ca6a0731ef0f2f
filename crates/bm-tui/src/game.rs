//! Interactive session driver.
//!
//! Runs one game: the exploring loop, the inventory view, and the
//! RANSOMWARE fight, translating the core's typed events into the game's
//! narration. All pacing (scan time, combat move delays, the lose-screen
//! spam) lives here, not in the core.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use bm_core::battle::Fighter;
use bm_core::map::GenerationReport;
use bm_core::{
    BattleAction, BattleEvent, BattleState, Direction, ExploreCommand, GameConfig, GameRng,
    GameSession, PollOutcome, ScanResult,
};

use crate::prompt::Selector;
use crate::screen::Screen;

/// Time the scanner spends on the neighboring systems.
const SCAN_TIME: Duration = Duration::from_millis(800);

/// Delay between combat moves.
const BATTLE_MOVE_DELAY: Duration = Duration::from_millis(700);

/// Runs one full session from generation to one of its endings.
pub fn run_game(config: &GameConfig, rng: GameRng, screen: &Screen) {
    let mut session = GameSession::new(config.clone(), rng, Instant::now());
    // Cosmetic randomness for the ending screens, separate from the session
    // RNG so replaying a seed replays the same game.
    let mut effects = GameRng::from_entropy();

    let report = *session.report();
    eprintln!("INFO: map generator statistics:");
    eprintln!("      total walk steps - {}", report.steps_taken);
    eprintln!("      systems generated - {}", report.systems_generated);

    if report.degraded() {
        warn_degraded(screen, &report);
    }

    loop {
        match session.poll(Instant::now()) {
            PollOutcome::TimedOut => {
                play_lose_sequence(screen, &mut effects, false);
                return;
            }
            PollOutcome::Battle => {
                run_battle(&mut session, screen, &mut effects);
                return;
            }
            PollOutcome::Explore => {}
        }
        if explore_turn(&mut session, screen) {
            return;
        }
    }
}

/// One exploring iteration: render the room, prompt, execute. Returns true
/// when the player exits the session.
fn explore_turn(session: &mut GameSession, screen: &Screen) -> bool {
    screen.clear();
    let current = session.current_system();
    screen.center(&scan_labeled(
        current.kind().to_string(),
        current.scan_result(),
    ));
    screen.center(&format!(
        "Time left: {:.1} second(s)",
        session.time_left(Instant::now()).as_secs_f64()
    ));
    screen.blank();

    let mut menu = Selector::new();
    let mut entries: Vec<(char, ExploreCommand)> = Vec::new();
    for command in session.available_commands() {
        let code = match command {
            ExploreCommand::Move(direction) => {
                let Some(neighbor) = session.neighbor_system(direction) else {
                    continue;
                };
                screen.line(&scan_labeled(
                    direction_line(&neighbor.kind().to_string(), direction),
                    neighbor.scan_result(),
                ));
                direction_code(direction)
            }
            ExploreCommand::Take => {
                screen.line(&format!(
                    "There is a [{}]. (T)AKE it?",
                    session.current_system().item()
                ));
                't'
            }
            ExploreCommand::Scan => {
                screen.blank();
                screen.line("(S)CAN the neighboring systems");
                's'
            }
            ExploreCommand::OpenInventory => {
                screen.line("Open the (I)NVENTORY");
                'i'
            }
            ExploreCommand::Exit => {
                screen.line("(E)XIT game");
                'e'
            }
        };
        menu.add_option(code);
        entries.push((code, command));
    }

    let choice = menu.get_selection(screen);
    let Some(&(_, command)) = entries.iter().find(|(code, _)| *code == choice) else {
        return false;
    };

    match command {
        ExploreCommand::Scan => {
            screen.blank();
            screen.line("SCANning...");
            screen.sleep(SCAN_TIME);
            session.execute(command);
        }
        ExploreCommand::OpenInventory => {
            session.execute(command);
            show_inventory(session, screen);
            session.close_inventory();
        }
        ExploreCommand::Exit => {
            session.execute(command);
            return true;
        }
        _ => session.execute(command),
    }
    false
}

/// The inventory view: what has been collected, what is still out there.
fn show_inventory(session: &GameSession, screen: &Screen) {
    screen.clear();
    screen.center("INVENTORY:");
    screen.blank();
    if session.inventory().is_empty() {
        screen.center("Empty...");
    } else {
        for (item, count) in session.inventory().iter() {
            screen.center(&format!("- {item}: {count}"));
        }
    }

    screen.blank();
    screen.center("Remaining Items:");
    screen.blank();
    if session.required_items().is_empty() {
        screen.center("Everything needed has been found...");
    } else {
        for (item, count) in session.required_items().iter() {
            screen.center(&format!("- {item}: {count}"));
        }
    }

    screen.blank();
    screen.await_player(true);
}

/// Drives the encounter to one of its endings, then folds the result into
/// the session.
fn run_battle(session: &mut GameSession, screen: &Screen, effects: &mut GameRng) {
    screen.clear();
    screen.center("The RANSOMWARE");
    screen.blank();
    screen.center("You have located the RANSOMWARE infecting the computer");
    screen.center("EXTRACT it from the system as soon as possible");
    screen.center("There is no other option");
    screen.blank();
    screen.await_player(true);

    let Some(battle) = session.battle_mut() else {
        return;
    };
    battle.begin();

    loop {
        if let Some(event) = battle.poll_deadline(Instant::now()) {
            narrate_battle_event(event, screen, effects);
            break;
        }

        screen.clear();
        screen.center("The RANSOMWARE");
        if battle.timer_active() {
            screen.center(&format!(
                "Time left: {:.1} second(s)",
                battle.time_left(Instant::now()).as_secs_f64()
            ));
        }
        screen.blank();
        screen.line(&status_line(battle.player()));
        screen.line(&status_line(battle.ransomware()));
        screen.blank();

        let action = prompt_battle_action(screen);
        for event in battle.resolve(action) {
            narrate_battle_event(event, screen, effects);
        }

        match battle.state() {
            BattleState::PlayerTurn => {
                move_delay(screen);
                screen.await_player(false);
            }
            BattleState::Won | BattleState::Lost | BattleState::Aborted => break,
            BattleState::Intro | BattleState::Resolving => {}
        }
    }

    session.finish_battle();
}

fn prompt_battle_action(screen: &Screen) -> BattleAction {
    let mut menu = Selector::new();
    screen.line("E(X)TRACT");
    menu.add_option('x');
    screen.line("Do (N)OTHING");
    menu.add_option('n');
    screen.line("Do a funny (D)ANCE");
    menu.add_option('d');
    screen.blank();
    screen.line("(E)XIT game");
    menu.add_option('e');

    match menu.get_selection(screen) {
        'x' => BattleAction::Extract,
        'n' => BattleAction::DoNothing,
        'd' => BattleAction::FunnyDance,
        _ => BattleAction::Exit,
    }
}

fn narrate_battle_event(event: BattleEvent, screen: &Screen, effects: &mut GameRng) {
    match event {
        BattleEvent::ExtractAttempted => {
            move_delay(screen);
            screen.line("You attempt to EXTRACT the RANSOMWARE...");
            move_delay(screen);
        }
        BattleEvent::ExtractNoDereferencer => {
            screen.line("Unable to locate relevant memory to alter; you lack the capabilities");
        }
        BattleEvent::ExtractNoMemoryAccess => {
            screen.line("Unable to alter relevant memory; you lack the capabilities");
        }
        BattleEvent::ExtractNoAdmin => {
            screen.line("Memory alteration denied; you lack sufficient privileges");
        }
        BattleEvent::ExtractHit { damage, remaining } => {
            screen.line(&format!(
                "You complete partial code EXTRACTion, dealing {damage} dmg ({remaining} hp remaining)"
            ));
        }
        BattleEvent::Extracted => {
            move_delay(screen);
            play_win_sequence(screen);
        }
        BattleEvent::Idled => {
            move_delay(screen);
            screen.line("You do absolutely NOTHING...");
        }
        BattleEvent::DanceAttempted => {
            move_delay(screen);
            screen.line("You attempt a funny DANCE...");
            move_delay(screen);
        }
        BattleEvent::DanceBackfired { damage, remaining } => {
            screen.line("You are an antivirus, you have no means to DANCE");
            move_delay(screen);
            screen.line(&format!(
                "In the process you corrupted your own data, dealing {damage} dmg ({remaining} hp remaining)"
            ));
        }
        BattleEvent::SelfCorrupted => {
            move_delay(screen);
            play_lose_sequence(screen, effects, true);
        }
        BattleEvent::PayloadHit { damage, remaining } => {
            move_delay(screen);
            screen.line("The RANSOMWARE attempts to deliver a payload...");
            move_delay(screen);
            screen.line(&format!(
                "You were hit with a viral payload, dealing {damage} dmg ({remaining} hp remaining)"
            ));
        }
        BattleEvent::Destroyed => {
            move_delay(screen);
            play_lose_sequence(screen, effects, false);
        }
        BattleEvent::TimedOut => {
            play_lose_sequence(screen, effects, false);
        }
        BattleEvent::Exited => {}
    }
}

/// Short breather printed before every combat move.
fn move_delay(screen: &Screen) {
    screen.sleep(BATTLE_MOVE_DELAY);
    screen.blank();
}

fn status_line(fighter: &Fighter) -> String {
    format!(
        "{}: {} hp, {} dmg",
        fighter.name(),
        fighter.health(),
        fighter.damage()
    )
}

fn play_win_sequence(screen: &Screen) {
    screen.clear();
    screen.center("Congratulations");
    screen.blank();
    screen.center("You have successfully EXTRACTed the RANSOMWARE");
    screen.blank();
    screen.await_player(true);
}

/// The game-over spectacle. `funny` picks the winking variant for the
/// self-inflicted ending.
fn play_lose_sequence(screen: &Screen, effects: &mut GameRng, funny: bool) {
    screen.clear();
    if screen.paced() {
        for _ in 0..15 {
            let mut frame = String::new();
            for _ in 0..1000 {
                if funny {
                    frame.push_str(";)");
                } else {
                    frame.push(random_character(effects));
                }
            }
            print!("{frame}");
            let _ = io::stdout().flush();
            screen.sleep(Duration::from_millis(100));
        }
    }

    screen.clear();
    for _ in 0..effects.rnd(6) + 4 {
        screen.center(&garble(effects, "GAME OVER GAME OVER GAME OVER"));
    }
    screen.blank();
    screen.center(&annoying_case(effects, "All your systems are belong to us"));
    screen.blank();
    let mut tail = String::new();
    for _ in 0..effects.rn2(21) + 20 {
        tail.push_str(";;;;;;;;)))))");
    }
    screen.line(&tail);
    screen.blank();
    screen.await_player(true);
}

/// The degradation warning, shown once before a short-handed map is played.
fn warn_degraded(screen: &Screen, report: &GenerationReport) {
    screen.clear();
    screen.center("WARNING: Unable to generate enough systems!");
    screen.center(&format!(
        "Could only place {} items from a pool of {}",
        report.placed, report.requested
    ));
    screen.center(&format!(
        "There are only {} systems available in total for generation",
        report.systems_generated
    ));
    screen.blank();
    screen.center("The game should still run fine, so feel free to continue PLAYing");
    screen.blank();
    screen.await_player(true);
}

fn direction_code(direction: Direction) -> char {
    match direction {
        Direction::Up => 'u',
        Direction::Down => 'd',
        Direction::Left => 'l',
        Direction::Right => 'r',
    }
}

fn direction_line(name: &str, direction: Direction) -> String {
    match direction {
        Direction::Up => format!("[{name}] is (U)P above"),
        Direction::Down => format!("[{name}] is (D)OWN below"),
        Direction::Left => format!("[{name}] is to the (L)EFT"),
        Direction::Right => format!("[{name}] is to the (R)IGHT"),
    }
}

/// Appends the cached scan result to a room label, if the room was ever
/// scanned.
fn scan_labeled(label: String, result: ScanResult) -> String {
    let suffix = match result {
        ScanResult::None => return label,
        ScanResult::Empty => "Empty",
        ScanResult::Abnormal => "Abnormal",
        ScanResult::Suspicious => "Abnormal. Suspicious activity",
        ScanResult::Error => "[ERROR]",
    };
    format!("{label} (scan: {suffix})")
}

fn random_character(effects: &mut GameRng) -> char {
    // Any printable ASCII character.
    char::from(0x21 + effects.rn2(0x5E) as u8)
}

/// Randomly replaces characters within a string.
fn garble(effects: &mut GameRng, text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let replacements = effects.rn2(chars.len() as u32 + 1);
    for _ in 0..replacements {
        let index = effects.rn2(chars.len() as u32) as usize;
        chars[index] = random_character(effects);
    }
    chars.into_iter().collect()
}

/// Randomly flips the case of every letter.
fn annoying_case(effects: &mut GameRng, text: &str) -> String {
    text.chars()
        .map(|c| {
            if effects.rn2(2) == 1 {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
