//! Systems (rooms) and the map arena.
//!
//! Links are bidirectional, so rooms form a cyclic structure. The arena owns
//! every room and neighbor fields store arena indices, which sidesteps any
//! ownership cycle.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::Direction;
use crate::inventory::ItemType;
use crate::rng::GameRng;

/// The systems a map can be built from.
///
/// `Bootloader` is reserved for the start room and never drawn from the
/// generation pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum SystemType {
    #[strum(serialize = "The Bootloader")]
    Bootloader,
    #[strum(serialize = "The Registry")]
    Registry,
    #[strum(serialize = "The Network interfaces")]
    NetworkInterfaces,
    #[strum(serialize = "The Kernel")]
    Kernel,
    #[strum(serialize = "The Hard drive")]
    HardDrive,
    #[strum(serialize = "WebSurfer")]
    WebSurfer,
    #[strum(serialize = "PainterEX")]
    PainterEx,
    #[strum(serialize = "BitMasher")]
    BitMasher,
    #[strum(serialize = "The ilo li sina Interpreter")]
    IloLiSinaInterpreter,
    #[strum(serialize = "FreeWriter")]
    FreeWriter,
    #[strum(serialize = "PIMG")]
    Pimg,
    #[strum(serialize = "The Espresso Runtime Environment")]
    EspressoRuntimeEnvironment,
    #[strum(serialize = "SuperCAD")]
    SuperCad,
    #[strum(serialize = "MacroDoi")]
    MacroDoi,
    #[strum(serialize = "Conway's Ivory Tower")]
    ConwaysIvoryTower,
    #[strum(serialize = "Random-Information-Generator")]
    RandomInformationGenerator,
}

impl SystemType {
    /// The pool of types the generator may draw from.
    pub fn generation_pool() -> Vec<SystemType> {
        SystemType::iter()
            .filter(|kind| *kind != SystemType::Bootloader)
            .collect()
    }
}

/// Result of scanning a system to find what is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanResult {
    /// Never scanned.
    None,
    Empty,
    /// An item is present.
    Abnormal,
    /// The RANSOMWARE is present.
    Suspicious,
    /// The scan failed and must be repeated.
    Error,
}

/// Handle to a system inside a [`SystemMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemId(usize);

/// A system (room) on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    kind: SystemType,
    item: ItemType,
    scan_result: ScanResult,
    // Indexed by Direction declaration order.
    adjacent: [Option<SystemId>; 4],
}

impl System {
    fn new(kind: SystemType, item: ItemType) -> Self {
        Self {
            kind,
            item,
            scan_result: ScanResult::None,
            adjacent: [None; 4],
        }
    }

    pub fn kind(&self) -> SystemType {
        self.kind
    }

    /// The item occupying this room, `ItemType::None` when the slot is empty.
    pub fn item(&self) -> ItemType {
        self.item
    }

    pub(crate) fn clear_item(&mut self) {
        self.item = ItemType::None;
    }

    /// The cached result of the last scan.
    pub fn scan_result(&self) -> ScanResult {
        self.scan_result
    }

    /// Scans the system, overwriting the previous cached result.
    ///
    /// With `can_fail` the scan errors out with probability `fail_chance`;
    /// the failure is an expected outcome, not an error path.
    pub fn scan(&mut self, rng: &mut GameRng, fail_chance: f64, can_fail: bool) -> ScanResult {
        let result = if can_fail && rng.chance(fail_chance) {
            ScanResult::Error
        } else {
            match self.item {
                ItemType::Ransomware => ScanResult::Suspicious,
                ItemType::None => ScanResult::Empty,
                _ => ScanResult::Abnormal,
            }
        };
        self.scan_result = result;
        result
    }

    /// The neighboring system in the given direction, if one is linked.
    pub fn neighbor(&self, direction: Direction) -> Option<SystemId> {
        self.adjacent[direction.index()]
    }

    /// Iterates all four directions in canonical order with the neighbor
    /// linked there, if any.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, Option<SystemId>)> + '_ {
        Direction::iter().map(|direction| (direction, self.neighbor(direction)))
    }
}

/// Arena of systems. The first inserted system is the map's root; rooms never
/// detach once linked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMap {
    systems: Vec<System>,
}

impl SystemMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked system and returns its handle.
    pub fn insert(&mut self, kind: SystemType, item: ItemType) -> SystemId {
        let id = SystemId(self.systems.len());
        self.systems.push(System::new(kind, item));
        id
    }

    pub fn system(&self, id: SystemId) -> &System {
        &self.systems[id.0]
    }

    pub fn system_mut(&mut self, id: SystemId) -> &mut System {
        &mut self.systems[id.0]
    }

    /// Links two systems so that `b` lies in `direction` from `a`, updating
    /// both sides in one call. Callers only link free directions; links are
    /// never removed or independently mutated afterwards.
    pub fn link(&mut self, a: SystemId, direction: Direction, b: SystemId) {
        debug_assert!(self.systems[a.0].adjacent[direction.index()].is_none());
        debug_assert!(
            self.systems[b.0].adjacent[direction.opposite().index()].is_none()
        );
        self.systems[a.0].adjacent[direction.index()] = Some(b);
        self.systems[b.0].adjacent[direction.opposite().index()] = Some(a);
    }

    /// The neighbor of `id` in `direction`, if one is linked.
    pub fn neighbor(&self, id: SystemId, direction: Direction) -> Option<SystemId> {
        self.system(id).neighbor(direction)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Iterates every system with its handle, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemId, &System)> + '_ {
        self.systems
            .iter()
            .enumerate()
            .map(|(index, system)| (SystemId(index), system))
    }
}
