//! Map generation.
//!
//! The map is grown by repeated bounded random walks from the start room,
//! each placing a single item (or, last of all, the RANSOMWARE). The walk's
//! move/branch bias and capped step budget bound generation time while
//! producing spiky, tree-like topologies; connectivity beyond the single path
//! each walk traces is deliberately not guaranteed.

use strum::IntoEnumIterator;

use super::{Direction, SystemId, SystemMap, SystemType};
use crate::config::GameConfig;
use crate::inventory::{Inventory, ItemType};
use crate::rng::GameRng;

/// Statistics from one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Items the session asked for.
    pub requested: u32,
    /// Items that made it onto the map.
    pub placed: u32,
    /// Rooms created, not counting the start room.
    pub systems_generated: u32,
    /// Walk steps spent, counting restored ones.
    pub steps_taken: u64,
}

impl GenerationReport {
    /// True when at least one required item had to be dropped.
    pub fn degraded(&self) -> bool {
        self.placed < self.requested
    }
}

/// A generated map plus its entry point.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub map: SystemMap,
    pub start: SystemId,
    pub report: GenerationReport,
}

/// Generates a new game map populated with the required items and the
/// RANSOMWARE, rooted at a Bootloader start room.
///
/// Every required item the map could host keeps its entry in
/// `required_items`; items that could not be placed are removed from it, and
/// the report carries the counts so the caller can warn the player once. The
/// map is returned and playable either way.
pub fn generate_map(
    required_items: &mut Inventory,
    mut pool: Vec<SystemType>,
    config: &GameConfig,
    rng: &mut GameRng,
) -> GeneratedMap {
    debug_assert!(pool.len() > 1);

    let mut map = SystemMap::new();
    let start = map.insert(SystemType::Bootloader, ItemType::None);

    let requested = required_items.count_items();
    let mut item_pool = required_items.to_item_list();
    rng.shuffle(&mut item_pool);
    // The RANSOMWARE goes in after the shuffle: generated last, its own path
    // cannot wall off an item placed earlier.
    item_pool.push(ItemType::Ransomware);
    rng.shuffle(&mut pool);

    let mut report = GenerationReport {
        requested,
        placed: 0,
        systems_generated: 0,
        steps_taken: 0,
    };

    let mut item_index = 0;
    let mut system_index = 0;
    let mut first_skipped = None;

    // Every required item needs a room, but not every room an item, so the
    // walk runs once per item instance.
    while item_index < item_pool.len() {
        // Out of room slots: remember where we stopped and spend the one
        // remaining slot on the RANSOMWARE at the end of the pool.
        if first_skipped.is_none() && system_index + 1 >= pool.len() {
            first_skipped = Some(item_index);
            item_index = item_pool.len() - 1;
        }

        let item = item_pool[item_index];
        let placed = if item == ItemType::Ransomware {
            // The encounter room must always exist. A walk-built tree always
            // keeps a free direction somewhere reachable, so retrying
            // terminates.
            while !place_item(&mut map, start, pool[system_index], item, config, rng, &mut report)
            {
            }
            true
        } else {
            place_item(&mut map, start, pool[system_index], item, config, rng, &mut report)
        };

        if placed {
            system_index += 1;
        } else {
            // The walk gave up; drop the item but keep the room slot for the
            // next one.
            required_items.try_remove_item(item, 1);
        }
        item_index += 1;
    }

    // Strip the items that never got a walk at all.
    if let Some(first_skipped) = first_skipped {
        for &item in &item_pool[first_skipped..item_pool.len() - 1] {
            required_items.try_remove_item(item, 1);
        }
    }

    report.placed = required_items.count_items();
    GeneratedMap { map, start, report }
}

/// One bounded walk from the start room. Returns true once a room carrying
/// the item has been created and linked, false if the step budget ran out.
fn place_item(
    map: &mut SystemMap,
    start: SystemId,
    kind: SystemType,
    item: ItemType,
    config: &GameConfig,
    rng: &mut GameRng,
    report: &mut GenerationReport,
) -> bool {
    let mut traverser = start;
    let mut forbidden: Option<Direction> = None;
    let mut steps_left = i64::from(config.max_steps);

    while steps_left >= 0 {
        steps_left -= 1;
        report.steps_taken += 1;

        if rng.chance(config.move_chance) {
            // Move along an existing link, but never straight back.
            let candidates: Vec<(Direction, SystemId)> = Direction::iter()
                .filter(|direction| forbidden != Some(*direction))
                .filter_map(|direction| {
                    map.neighbor(traverser, direction)
                        .map(|id| (direction, id))
                })
                .collect();
            if let Some(&(direction, next)) = rng.choose(&candidates) {
                forbidden = Some(direction.opposite());
                traverser = next;
                continue;
            }
            // Nowhere to move; try to branch instead.
        }

        // Branch a new room off a free direction.
        let free: Vec<Direction> = Direction::iter()
            .filter(|direction| map.neighbor(traverser, *direction).is_none())
            .collect();
        let Some(&direction) = rng.choose(&free) else {
            // Neither a move nor a branch was possible; the budget only
            // pays for productive steps.
            steps_left += 1;
            continue;
        };
        let room = map.insert(kind, item);
        map.link(traverser, direction, room);
        report.systems_generated += 1;
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_set(fragments: u32, vulnerabilities: u32) -> Inventory {
        let mut required = Inventory::new();
        required.add_item(ItemType::FullMemoryReadAccess, 1);
        required.add_item(ItemType::FullMemoryWriteAccess, 1);
        required.add_item(ItemType::PointerDereferencer, 1);
        required.add_item(ItemType::OsOverrideCapability, 1);
        required.add_item(ItemType::Sandboxer, 1);
        required.add_item(ItemType::RansomwareCodeFragment, fragments);
        required.add_item(ItemType::Vulnerability, vulnerabilities);
        required
    }

    /// Ids reachable from the start over linked edges.
    fn reachable(map: &SystemMap, start: SystemId) -> Vec<SystemId> {
        let mut seen = vec![start];
        let mut queue = vec![start];
        while let Some(id) = queue.pop() {
            for (_, neighbor) in map.system(id).neighbors() {
                if let Some(neighbor) = neighbor {
                    if !seen.contains(&neighbor) {
                        seen.push(neighbor);
                        queue.push(neighbor);
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_generation_with_a_sufficient_pool() {
        let mut rng = GameRng::new(12345);
        let config = GameConfig::default();
        let mut required = required_set(2, 2);
        let requested = required.count_items();

        let generated = generate_map(
            &mut required,
            SystemType::generation_pool(),
            &config,
            &mut rng,
        );

        assert!(!generated.report.degraded());
        assert_eq!(required.count_items(), requested);
        assert_eq!(generated.report.placed, requested);

        let item_rooms = generated
            .map
            .iter()
            .filter(|(_, system)| system.item().is_collectible())
            .count() as u32;
        let nests = generated
            .map
            .iter()
            .filter(|(_, system)| system.item() == ItemType::Ransomware)
            .count();
        assert_eq!(item_rooms, requested);
        assert_eq!(nests, 1);

        // Every room, not just every item, hangs off the start room.
        assert_eq!(
            reachable(&generated.map, generated.start).len(),
            generated.map.len()
        );
    }

    #[test]
    fn test_start_room_is_the_bootloader_and_empty() {
        let mut rng = GameRng::new(9);
        let config = GameConfig::default();
        let mut required = required_set(1, 1);

        let generated = generate_map(
            &mut required,
            SystemType::generation_pool(),
            &config,
            &mut rng,
        );
        let start = generated.map.system(generated.start);
        assert_eq!(start.kind(), SystemType::Bootloader);
        assert_eq!(start.item(), ItemType::None);
    }

    #[test]
    fn test_generation_shortfall_degrades_but_keeps_the_ransomware() {
        let config = GameConfig::default();
        // 3 room slots for 9 items: at most 2 real items fit, the last slot
        // is reserved for the RANSOMWARE.
        let pool = vec![
            SystemType::Registry,
            SystemType::Kernel,
            SystemType::HardDrive,
        ];

        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let mut required = required_set(2, 2);

            let generated = generate_map(&mut required, pool.clone(), &config, &mut rng);

            assert!(generated.report.degraded());
            assert!(required.count_items() <= pool.len() as u32 - 1);
            assert_eq!(required.count_items(), generated.report.placed);

            let nests = generated
                .map
                .iter()
                .filter(|(_, system)| system.item() == ItemType::Ransomware)
                .count();
            assert_eq!(nests, 1);
        }
    }

    #[test]
    fn test_placed_items_match_the_required_inventory() {
        let mut rng = GameRng::new(777);
        let config = GameConfig::default();
        let mut required = required_set(3, 1);

        let generated = generate_map(
            &mut required,
            SystemType::generation_pool(),
            &config,
            &mut rng,
        );

        // The inventory left in `required` is exactly the multiset sitting in
        // rooms on the map.
        let mut on_map = Inventory::new();
        for (_, system) in generated.map.iter() {
            if system.item().is_collectible() {
                on_map.add_item(system.item(), 1);
            }
        }
        for (item, count) in required.iter() {
            assert_eq!(on_map.count_item(item), count);
        }
        assert_eq!(on_map.count_items(), required.count_items());
    }

    #[test]
    fn test_same_seed_same_map() {
        let config = GameConfig::default();

        let mut build = || {
            let mut rng = GameRng::new(4242);
            let mut required = required_set(2, 3);
            generate_map(
                &mut required,
                SystemType::generation_pool(),
                &config,
                &mut rng,
            )
        };
        let first = build();
        let second = build();

        assert_eq!(first.map.len(), second.map.len());
        assert_eq!(first.report, second.report);
        for ((_, a), (_, b)) in first.map.iter().zip(second.map.iter()) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.item(), b.item());
        }
    }

    #[test]
    fn test_rooms_never_exceed_four_links() {
        let mut rng = GameRng::new(31337);
        let config = GameConfig::default();
        let mut required = required_set(3, 3);

        let generated = generate_map(
            &mut required,
            SystemType::generation_pool(),
            &config,
            &mut rng,
        );
        for (_, system) in generated.map.iter() {
            assert!(system.neighbors().filter(|(_, n)| n.is_some()).count() <= 4);
        }
    }
}
