//! The RANSOMWARE encounter.
//!
//! A timed, turn-based fight. What the player can actually do is gated by
//! the capabilities still missing from the required set when the encounter
//! starts; the resolver reports every step of a round as a typed event for
//! the front end to narrate.

use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::config::GameConfig;
use crate::inventory::{Inventory, ItemType};

bitflags! {
    /// Capabilities the player is missing, derived from the required items
    /// left uncollected when the encounter starts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CapabilityGaps: u8 {
        /// Read or write access to memory is missing.
        const MEMORY_ACCESS = 1 << 0;
        /// The OS override capability is missing.
        const ADMIN = 1 << 1;
        /// The pointer dereferencer is missing.
        const DEREFERENCER = 1 << 2;
        /// The sandboxer is missing, so the countdown keeps running.
        const TIMER_IMMUNITY = 1 << 3;
    }
}

impl CapabilityGaps {
    /// Derives the gaps from the not-yet-collected required items.
    pub fn from_missing(required_left: &Inventory) -> Self {
        let mut gaps = CapabilityGaps::empty();
        if required_left.contains(ItemType::FullMemoryReadAccess)
            || required_left.contains(ItemType::FullMemoryWriteAccess)
        {
            gaps |= CapabilityGaps::MEMORY_ACCESS;
        }
        if required_left.contains(ItemType::OsOverrideCapability) {
            gaps |= CapabilityGaps::ADMIN;
        }
        if required_left.contains(ItemType::PointerDereferencer) {
            gaps |= CapabilityGaps::DEREFERENCER;
        }
        if required_left.contains(ItemType::Sandboxer) {
            gaps |= CapabilityGaps::TIMER_IMMUNITY;
        }
        gaps
    }
}

/// An actor in the encounter.
///
/// Health is never clamped; only the `<= 0` check matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    name: String,
    health: i32,
    damage: i32,
}

impl Fighter {
    fn new(name: &str, health: i32, damage: i32) -> Self {
        Self {
            name: name.to_string(),
            health,
            damage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    fn take_hit(&mut self, damage: i32) {
        self.health -= damage;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Where the encounter currently stands. `Won`, `Lost` and `Aborted` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Intro,
    PlayerTurn,
    Resolving,
    Won,
    Lost,
    Aborted,
}

/// What the player does with their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleAction {
    Extract,
    DoNothing,
    FunnyDance,
    Exit,
}

/// Terminal result of the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The RANSOMWARE was extracted.
    Extracted,
    /// The countdown expired mid-fight.
    TimedOut,
    /// The RANSOMWARE destroyed the player.
    Destroyed,
    /// The player corrupted their own data dancing.
    SelfCorrupted,
    /// The player left the fight.
    Aborted,
}

/// One step of a resolved round, in narration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleEvent {
    ExtractAttempted,
    /// Extraction blocked: no pointer dereferencer.
    ExtractNoDereferencer,
    /// Extraction blocked: no memory access.
    ExtractNoMemoryAccess,
    /// Extraction blocked: no admin privileges.
    ExtractNoAdmin,
    ExtractHit { damage: i32, remaining: i32 },
    Extracted,
    Idled,
    DanceAttempted,
    DanceBackfired { damage: i32, remaining: i32 },
    SelfCorrupted,
    PayloadHit { damage: i32, remaining: i32 },
    Destroyed,
    TimedOut,
    Exited,
}

/// The encounter state machine.
#[derive(Debug, Clone)]
pub struct Battle {
    state: BattleState,
    outcome: Option<BattleOutcome>,
    gaps: CapabilityGaps,
    player: Fighter,
    ransomware: Fighter,
    deadline: Instant,
}

impl Battle {
    /// Sets up the fight from the still-missing required items. Missing code
    /// fragments feed the RANSOMWARE's health, missing vulnerabilities its
    /// damage.
    pub fn new(config: &GameConfig, required_left: &Inventory, deadline: Instant) -> Self {
        let gaps = CapabilityGaps::from_missing(required_left);
        let player = Fighter::new(
            "You",
            config.base_health,
            config.base_damage + config.player_damage_boost,
        );
        let missing_fragments = required_left.count_item(ItemType::RansomwareCodeFragment) as i32;
        let missing_vulnerabilities = required_left.count_item(ItemType::Vulnerability) as i32;
        let ransomware = Fighter::new(
            "The RANSOMWARE",
            config.base_health + config.code_fragment_health_boost * missing_fragments,
            config.base_damage + config.vulnerability_damage_boost * missing_vulnerabilities,
        );

        Self {
            state: BattleState::Intro,
            outcome: None,
            gaps,
            player,
            ransomware,
            deadline,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// The terminal result, once one of the terminal states is reached.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn ransomware(&self) -> &Fighter {
        &self.ransomware
    }

    pub fn gaps(&self) -> CapabilityGaps {
        self.gaps
    }

    /// Whether the countdown still applies (no Sandboxer collected).
    pub fn timer_active(&self) -> bool {
        self.gaps.contains(CapabilityGaps::TIMER_IMMUNITY)
    }

    /// Countdown remaining, zero once the deadline has passed.
    pub fn time_left(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Leaves the intro. The intro is shown once and leads straight to the
    /// player's turn.
    pub fn begin(&mut self) {
        debug_assert_eq!(self.state, BattleState::Intro);
        self.state = BattleState::PlayerTurn;
    }

    /// Deadline check run before choices are presented. Without timer
    /// immunity an expired countdown loses the fight on the spot.
    pub fn poll_deadline(&mut self, now: Instant) -> Option<BattleEvent> {
        if self.state == BattleState::PlayerTurn && self.timer_active() && now >= self.deadline {
            self.lose(BattleOutcome::TimedOut);
            return Some(BattleEvent::TimedOut);
        }
        None
    }

    /// Resolves one full round: the player's action, its capability gates,
    /// and the RANSOMWARE's retaliation if the round stays non-terminal.
    /// Returns the events in narration order.
    pub fn resolve(&mut self, action: BattleAction) -> Vec<BattleEvent> {
        if self.state != BattleState::PlayerTurn {
            return Vec::new();
        }
        self.state = BattleState::Resolving;
        let mut events = Vec::new();

        match action {
            BattleAction::Extract => {
                events.push(BattleEvent::ExtractAttempted);
                if self.gaps.contains(CapabilityGaps::DEREFERENCER) {
                    events.push(BattleEvent::ExtractNoDereferencer);
                } else if self.gaps.contains(CapabilityGaps::MEMORY_ACCESS) {
                    events.push(BattleEvent::ExtractNoMemoryAccess);
                } else if self.gaps.contains(CapabilityGaps::ADMIN) {
                    events.push(BattleEvent::ExtractNoAdmin);
                } else {
                    let damage = self.player.damage;
                    self.ransomware.take_hit(damage);
                    events.push(BattleEvent::ExtractHit {
                        damage,
                        remaining: self.ransomware.health,
                    });
                    if self.ransomware.is_dead() {
                        self.state = BattleState::Won;
                        self.outcome = Some(BattleOutcome::Extracted);
                        events.push(BattleEvent::Extracted);
                        return events;
                    }
                }
            }
            BattleAction::DoNothing => {
                events.push(BattleEvent::Idled);
            }
            BattleAction::FunnyDance => {
                events.push(BattleEvent::DanceAttempted);
                let damage = self.player.damage;
                self.player.take_hit(damage);
                events.push(BattleEvent::DanceBackfired {
                    damage,
                    remaining: self.player.health,
                });
                if self.player.is_dead() {
                    self.lose(BattleOutcome::SelfCorrupted);
                    events.push(BattleEvent::SelfCorrupted);
                    return events;
                }
            }
            BattleAction::Exit => {
                self.state = BattleState::Aborted;
                self.outcome = Some(BattleOutcome::Aborted);
                events.push(BattleEvent::Exited);
                return events;
            }
        }

        // Retaliation closes every round the player survives.
        let damage = self.ransomware.damage;
        self.player.take_hit(damage);
        events.push(BattleEvent::PayloadHit {
            damage,
            remaining: self.player.health,
        });
        if self.player.is_dead() {
            self.lose(BattleOutcome::Destroyed);
            events.push(BattleEvent::Destroyed);
        } else {
            self.state = BattleState::PlayerTurn;
        }
        events
    }

    fn lose(&mut self, outcome: BattleOutcome) {
        self.state = BattleState::Lost;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    fn full_set() -> Inventory {
        let mut required = Inventory::new();
        required.add_item(ItemType::FullMemoryReadAccess, 1);
        required.add_item(ItemType::FullMemoryWriteAccess, 1);
        required.add_item(ItemType::PointerDereferencer, 1);
        required.add_item(ItemType::OsOverrideCapability, 1);
        required.add_item(ItemType::Sandboxer, 1);
        required
    }

    #[test]
    fn test_gaps_follow_the_missing_items() {
        let everything_missing = full_set();
        let gaps = CapabilityGaps::from_missing(&everything_missing);
        assert_eq!(gaps, CapabilityGaps::all());

        let nothing_missing = Inventory::new();
        assert_eq!(
            CapabilityGaps::from_missing(&nothing_missing),
            CapabilityGaps::empty()
        );

        // Either memory item alone keeps the memory gap open.
        let mut only_write_missing = Inventory::new();
        only_write_missing.add_item(ItemType::FullMemoryWriteAccess, 1);
        assert!(
            CapabilityGaps::from_missing(&only_write_missing)
                .contains(CapabilityGaps::MEMORY_ACCESS)
        );
    }

    #[test]
    fn test_ransomware_scales_with_missing_items() {
        let config = GameConfig::default();
        let mut missing = Inventory::new();
        missing.add_item(ItemType::RansomwareCodeFragment, 2);
        missing.add_item(ItemType::Vulnerability, 1);

        let battle = Battle::new(&config, &missing, far_deadline());
        // base 50 + 25 per missing fragment.
        assert_eq!(battle.ransomware().health(), 100);
        // base 10 + 10 per missing vulnerability.
        assert_eq!(battle.ransomware().damage(), 20);
        // The player gets the flat boost regardless.
        assert_eq!(battle.player().health(), 50);
        assert_eq!(battle.player().damage(), 15);
    }

    #[test]
    fn test_intro_leads_to_the_player_turn() {
        let config = GameConfig::default();
        let mut battle = Battle::new(&config, &Inventory::new(), far_deadline());
        assert_eq!(battle.state(), BattleState::Intro);
        battle.begin();
        assert_eq!(battle.state(), BattleState::PlayerTurn);
    }

    #[test]
    fn test_extract_is_gated_without_the_dereferencer() {
        let config = GameConfig::default();
        let mut missing = Inventory::new();
        missing.add_item(ItemType::PointerDereferencer, 1);

        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();
        let start_health = battle.ransomware().health();

        for _ in 0..5 {
            if battle.state() != BattleState::PlayerTurn {
                break;
            }
            let events = battle.resolve(BattleAction::Extract);
            assert!(events.contains(&BattleEvent::ExtractNoDereferencer));
            assert_eq!(battle.ransomware().health(), start_health);
        }
    }

    #[test]
    fn test_gate_order_is_dereferencer_memory_admin() {
        let config = GameConfig::default();
        let mut missing = full_set();

        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();
        assert!(
            battle
                .resolve(BattleAction::Extract)
                .contains(&BattleEvent::ExtractNoDereferencer)
        );

        missing.try_remove_item(ItemType::PointerDereferencer, 1);
        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();
        assert!(
            battle
                .resolve(BattleAction::Extract)
                .contains(&BattleEvent::ExtractNoMemoryAccess)
        );

        missing.try_remove_item(ItemType::FullMemoryReadAccess, 1);
        missing.try_remove_item(ItemType::FullMemoryWriteAccess, 1);
        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();
        assert!(
            battle
                .resolve(BattleAction::Extract)
                .contains(&BattleEvent::ExtractNoAdmin)
        );
    }

    #[test]
    fn test_fully_equipped_extraction_wins() {
        let config = GameConfig::default();
        let mut battle = Battle::new(&config, &Inventory::new(), far_deadline());
        battle.begin();

        let player_damage = battle.player().damage();
        let mut expected = battle.ransomware().health();
        loop {
            let events = battle.resolve(BattleAction::Extract);
            expected -= player_damage;
            assert!(events.contains(&BattleEvent::ExtractHit {
                damage: player_damage,
                remaining: expected,
            }));
            if battle.state() == BattleState::Won {
                break;
            }
            assert_eq!(battle.state(), BattleState::PlayerTurn);
        }
        assert_eq!(battle.outcome(), Some(BattleOutcome::Extracted));
        assert!(battle.ransomware().is_dead());
    }

    #[test]
    fn test_blocked_extraction_still_draws_retaliation() {
        let config = GameConfig::default();
        let mut missing = Inventory::new();
        missing.add_item(ItemType::PointerDereferencer, 1);

        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();
        let before = battle.player().health();
        let events = battle.resolve(BattleAction::Extract);

        let ransomware_damage = battle.ransomware().damage();
        assert!(events.contains(&BattleEvent::PayloadHit {
            damage: ransomware_damage,
            remaining: before - ransomware_damage,
        }));
    }

    #[test]
    fn test_doing_nothing_only_hurts_the_player() {
        let config = GameConfig::default();
        let mut battle = Battle::new(&config, &Inventory::new(), far_deadline());
        battle.begin();

        let ransomware_before = battle.ransomware().health();
        let player_before = battle.player().health();
        let events = battle.resolve(BattleAction::DoNothing);

        assert_eq!(events[0], BattleEvent::Idled);
        assert_eq!(battle.ransomware().health(), ransomware_before);
        assert_eq!(
            battle.player().health(),
            player_before - battle.ransomware().damage()
        );
    }

    #[test]
    fn test_dancing_to_death_is_its_own_ending() {
        // 15 hp against 15 self-damage: one dance is enough.
        let mut config = GameConfig::default();
        config.base_health = 15;

        let mut battle = Battle::new(&config, &Inventory::new(), far_deadline());
        battle.begin();
        let events = battle.resolve(BattleAction::FunnyDance);

        assert_eq!(battle.state(), BattleState::Lost);
        assert_eq!(battle.outcome(), Some(BattleOutcome::SelfCorrupted));
        assert_eq!(events.last(), Some(&BattleEvent::SelfCorrupted));
        // The self-inflicted ending skips the retaliation.
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, BattleEvent::PayloadHit { .. }))
        );
    }

    #[test]
    fn test_retaliation_can_destroy_the_player() {
        let mut config = GameConfig::default();
        config.base_damage = 60;

        let mut missing = Inventory::new();
        missing.add_item(ItemType::PointerDereferencer, 1);
        let mut battle = Battle::new(&config, &missing, far_deadline());
        battle.begin();

        let events = battle.resolve(BattleAction::DoNothing);
        assert_eq!(battle.state(), BattleState::Lost);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Destroyed));
        assert_eq!(events.last(), Some(&BattleEvent::Destroyed));
    }

    #[test]
    fn test_exit_aborts_without_retaliation() {
        let config = GameConfig::default();
        let mut battle = Battle::new(&config, &Inventory::new(), far_deadline());
        battle.begin();

        let before = battle.player().health();
        let events = battle.resolve(BattleAction::Exit);
        assert_eq!(events, vec![BattleEvent::Exited]);
        assert_eq!(battle.state(), BattleState::Aborted);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Aborted));
        assert_eq!(battle.player().health(), before);
    }

    #[test]
    fn test_deadline_only_bites_without_timer_immunity() {
        let config = GameConfig::default();
        let deadline = Instant::now();
        let later = deadline + Duration::from_secs(1);

        // Sandboxer still missing: the countdown applies.
        let mut missing = Inventory::new();
        missing.add_item(ItemType::Sandboxer, 1);
        let mut battle = Battle::new(&config, &missing, deadline);
        battle.begin();
        assert_eq!(battle.poll_deadline(later), Some(BattleEvent::TimedOut));
        assert_eq!(battle.state(), BattleState::Lost);
        assert_eq!(battle.outcome(), Some(BattleOutcome::TimedOut));

        // Sandboxer collected: immune, the fight goes on.
        let mut battle = Battle::new(&config, &Inventory::new(), deadline);
        battle.begin();
        assert_eq!(battle.poll_deadline(later), None);
        assert_eq!(battle.state(), BattleState::PlayerTurn);
    }
}
