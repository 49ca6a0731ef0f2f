//! One game session.
//!
//! Owns the map, both inventories, the countdown and the RNG for the whole
//! session, and walks the exploring / scanning / battling / inventory-view
//! state machine. All mutation happens in place on the single call stack;
//! the front end drives it one blocking command at a time.

use std::time::{Duration, Instant};

use strum::IntoEnumIterator;

use crate::battle::{Battle, BattleOutcome};
use crate::config::GameConfig;
use crate::inventory::{Inventory, ItemType};
use crate::map::{
    Direction, GenerationReport, System, SystemId, SystemMap, SystemType, generate_map,
};
use crate::rng::GameRng;

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The countdown expired.
    TimedOut,
    /// The RANSOMWARE was extracted.
    Extracted,
    /// The RANSOMWARE destroyed the player.
    Destroyed,
    /// The player corrupted their own data.
    SelfCorrupted,
    /// The player left the session.
    Exited,
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Exploring,
    Scanning,
    Battling,
    InventoryView,
    Ended(SessionOutcome),
}

/// A player command available while exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreCommand {
    Move(Direction),
    Take,
    Scan,
    OpenInventory,
    Exit,
}

/// What the per-iteration poll decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Keep exploring; the current room's scan cache has been refreshed.
    Explore,
    /// The current room holds the RANSOMWARE; the battle has been set up.
    Battle,
    /// The countdown expired.
    TimedOut,
}

/// Rolls the set of items that must be collected before the encounter is
/// winnable without penalty.
pub fn generate_required_items(config: &GameConfig, rng: &mut GameRng) -> Inventory {
    let mut required = Inventory::new();
    required.add_item(ItemType::FullMemoryReadAccess, 1);
    required.add_item(ItemType::FullMemoryWriteAccess, 1);
    required.add_item(ItemType::PointerDereferencer, 1);
    required.add_item(ItemType::OsOverrideCapability, 1);
    required.add_item(ItemType::Sandboxer, 1);
    required.add_item(ItemType::RansomwareCodeFragment, rng.rnd(config.max_duplicate_items));
    required.add_item(ItemType::Vulnerability, rng.rnd(config.max_duplicate_items));
    required
}

/// A running game.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    rng: GameRng,
    map: SystemMap,
    current: SystemId,
    inventory: Inventory,
    required_items: Inventory,
    report: GenerationReport,
    deadline: Instant,
    state: SessionState,
    battle: Option<Battle>,
}

impl GameSession {
    /// Rolls the required items, generates the map and arms the countdown.
    /// The countdown is sized from the post-degradation item count.
    pub fn new(config: GameConfig, mut rng: GameRng, now: Instant) -> Self {
        let mut required_items = generate_required_items(&config, &mut rng);
        let generated = generate_map(
            &mut required_items,
            SystemType::generation_pool(),
            &config,
            &mut rng,
        );
        let deadline = now
            + Duration::from_secs(
                u64::from(required_items.count_items()) * config.seconds_per_system,
            );

        Self {
            config,
            rng,
            map: generated.map,
            current: generated.start,
            inventory: Inventory::new(),
            required_items,
            report: generated.report,
            deadline,
            state: SessionState::Exploring,
            battle: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn map(&self) -> &SystemMap {
        &self.map
    }

    pub fn current(&self) -> SystemId {
        self.current
    }

    pub fn current_system(&self) -> &System {
        self.map.system(self.current)
    }

    /// The system one step away from the current one, if linked.
    pub fn neighbor_system(&self, direction: Direction) -> Option<&System> {
        self.map
            .neighbor(self.current, direction)
            .map(|id| self.map.system(id))
    }

    /// What the player has collected so far.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// What still has to be found.
    pub fn required_items(&self) -> &Inventory {
        &self.required_items
    }

    /// Countdown remaining, zero once the deadline has passed.
    pub fn time_left(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Poll run at the top of every exploring iteration: the countdown
    /// first, then the encounter check, then a non-failing refresh of the
    /// current room's scan cache.
    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        debug_assert_eq!(self.state, SessionState::Exploring);
        if now >= self.deadline {
            self.state = SessionState::Ended(SessionOutcome::TimedOut);
            return PollOutcome::TimedOut;
        }
        if self.current_system().item() == ItemType::Ransomware {
            self.battle = Some(Battle::new(&self.config, &self.required_items, self.deadline));
            self.state = SessionState::Battling;
            return PollOutcome::Battle;
        }
        let fail_chance = self.config.scan_fail_chance;
        self.map
            .system_mut(self.current)
            .scan(&mut self.rng, fail_chance, false);
        PollOutcome::Explore
    }

    /// The commands currently on offer: one move per linked direction, take
    /// only when a collectible item is present, and the three standing
    /// actions.
    pub fn available_commands(&self) -> Vec<ExploreCommand> {
        let mut commands = Vec::new();
        for direction in Direction::iter() {
            if self.map.neighbor(self.current, direction).is_some() {
                commands.push(ExploreCommand::Move(direction));
            }
        }
        if self.current_system().item().is_collectible() {
            commands.push(ExploreCommand::Take);
        }
        commands.push(ExploreCommand::Scan);
        commands.push(ExploreCommand::OpenInventory);
        commands.push(ExploreCommand::Exit);
        commands
    }

    /// Executes one exploring command.
    pub fn execute(&mut self, command: ExploreCommand) {
        debug_assert_eq!(self.state, SessionState::Exploring);
        match command {
            ExploreCommand::Move(direction) => {
                if let Some(next) = self.map.neighbor(self.current, direction) {
                    self.current = next;
                }
            }
            ExploreCommand::Take => self.take_item(),
            ExploreCommand::Scan => self.scan_neighbors(),
            ExploreCommand::OpenInventory => self.state = SessionState::InventoryView,
            ExploreCommand::Exit => self.state = SessionState::Ended(SessionOutcome::Exited),
        }
    }

    /// Leaves the inventory view.
    pub fn close_inventory(&mut self) {
        debug_assert_eq!(self.state, SessionState::InventoryView);
        self.state = SessionState::Exploring;
    }

    /// The running encounter, while one is up.
    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    /// Folds the battle's terminal state into the session. The encounter
    /// ends the session whatever its result.
    pub fn finish_battle(&mut self) {
        debug_assert_eq!(self.state, SessionState::Battling);
        let outcome = match self.battle.as_ref().and_then(Battle::outcome) {
            Some(BattleOutcome::Extracted) => SessionOutcome::Extracted,
            Some(BattleOutcome::TimedOut) => SessionOutcome::TimedOut,
            Some(BattleOutcome::Destroyed) => SessionOutcome::Destroyed,
            Some(BattleOutcome::SelfCorrupted) => SessionOutcome::SelfCorrupted,
            Some(BattleOutcome::Aborted) | None => SessionOutcome::Exited,
        };
        self.battle = None;
        self.state = SessionState::Ended(outcome);
    }

    /// Moves one unit of the room's item from the required set to the
    /// player's inventory and empties the slot.
    fn take_item(&mut self) {
        let item = self.current_system().item();
        if !item.is_collectible() {
            return;
        }
        self.inventory.add_item(item, 1);
        // Succeeds by construction: every item on the map came out of the
        // required set.
        let removed = self.required_items.try_remove_item(item, 1);
        debug_assert!(removed);
        self.map.system_mut(self.current).clear_item();
    }

    /// The fallible scan over every currently linked neighbor.
    fn scan_neighbors(&mut self) {
        self.state = SessionState::Scanning;
        let fail_chance = self.config.scan_fail_chance;
        for direction in Direction::iter() {
            if let Some(id) = self.map.neighbor(self.current, direction) {
                self.map.system_mut(id).scan(&mut self.rng, fail_chance, true);
            }
        }
        self.state = SessionState::Exploring;
    }
}
