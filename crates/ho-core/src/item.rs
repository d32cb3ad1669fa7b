use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Every item identifier the game knows about.
pub const ITEM_IDS: &[&str] = &[
    "core",
    "flesh",
    "teeth",
    "zombie_essence",
    "zombie_core",
    "magic_essence",
    "elemental_potion",
    "transformation_syringe",
    "fire_core",
    "mutation_serum_fire",
    "fireball_spell",
    "fire_orb_skill",
    "phoenix_revival_skill",
    "baseball_bat",
    "medkit",
    "wood",
    "bow",
    "arrow",
    "scrap_metal",
    "duct_tape",
    "nails",
    "plastic_fragments",
    "wood_planks",
    "steel_plates",
    "hammer",
    "crowbar",
    "axe",
    "reinforced_axe",
    "wood_barricade",
];

/// Items a container can hold; one is drawn uniformly when it is opened.
pub const CONTAINER_LOOT: &[&str] = &["scrap_metal", "duct_tape", "nails", "medkit"];

/// Items a searched shelf can yield.
pub const CRAFTING_MATERIALS: &[&str] = &[
    "scrap_metal",
    "duct_tape",
    "nails",
    "plastic_fragments",
    "wood_planks",
    "steel_plates",
];

/// Probability that a searched shelf yields anything at all.
pub const SHELF_LOOT_CHANCE: f64 = 0.2;

/// Health restored by one medkit.
pub const MEDKIT_HEAL: u32 = 3;

/// Return `true` if the identifier is part of the item catalog.
pub fn is_known_item(id: &str) -> bool {
    ITEM_IDS.contains(&id)
}

/// Draw one item uniformly from the container loot table.
pub fn roll_container_loot<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    CONTAINER_LOOT.choose(rng).map(|s| (*s).to_string())
}

/// Roll the shelf table: nothing most of the time, otherwise a uniform material.
pub fn roll_shelf_loot<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    if rng.random_bool(SHELF_LOOT_CHANCE) {
        CRAFTING_MATERIALS.choose(rng).map(|s| (*s).to_string())
    } else {
        None
    }
}

/// What happens when an item is used from the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    /// Restore health up to the player's maximum.
    Heal(u32),
    /// Add one point to the fire mutation counter.
    FireMutation,
    /// Anything else is equipped as the active weapon.
    Equip,
}

impl ItemEffect {
    /// Classify an item by what using it does.
    pub fn of(id: &str) -> Self {
        match id {
            "medkit" => Self::Heal(MEDKIT_HEAL),
            "mutation_serum_fire" => Self::FireMutation,
            _ => Self::Equip,
        }
    }
}

/// Item counts held by a player. Entries are removed when they reach zero,
/// so every stored count is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units held of the given item (0 when absent).
    pub fn count(&self, id: &str) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    /// Return `true` if at least `qty` units are held.
    pub fn has(&self, id: &str, qty: u32) -> bool {
        self.count(id) >= qty
    }

    /// Add units of an item.
    pub fn add(&mut self, id: impl Into<String>, qty: u32) {
        if qty == 0 {
            return;
        }
        *self.items.entry(id.into()).or_insert(0) += qty;
    }

    /// Remove units of an item. Fails without touching anything if fewer
    /// than `qty` are held; drops the entry when the count reaches zero.
    pub fn remove(&mut self, id: &str, qty: u32) -> bool {
        let Some(held) = self.items.get_mut(id) else {
            return qty == 0;
        };
        if *held < qty {
            return false;
        }
        *held -= qty;
        if *held == 0 {
            self.items.remove(id);
        }
        true
    }

    /// Return `true` if the inventory holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(item, count)` pairs in item order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut inv = Self::new();
        for (id, qty) in iter {
            inv.add(id, qty);
        }
        inv
    }
}
