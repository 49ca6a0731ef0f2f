//! bm-core: Core game logic for BitMasher
//!
//! This crate contains all game logic with no I/O dependencies. Everything is
//! pure and synchronous: the front end supplies the RNG seed, the tuning
//! configuration, and the current instant, and the core hands back typed
//! states and events for it to narrate.

pub mod battle;
pub mod config;
pub mod inventory;
pub mod map;
pub mod session;

mod consts;
mod rng;

pub use battle::{Battle, BattleAction, BattleEvent, BattleOutcome, BattleState, CapabilityGaps};
pub use config::{ConfigError, GameConfig};
pub use consts::*;
pub use inventory::{Inventory, ItemType};
pub use map::{Direction, ScanResult, SystemMap, SystemType};
pub use rng::GameRng;
pub use session::{
    ExploreCommand, GameSession, PollOutcome, SessionOutcome, SessionState,
    generate_required_items,
};
