//! Crafting recipes.

use crate::error::{CoreError, CoreResult};
use crate::item::{Inventory, is_known_item};

/// A single crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Identifier the recipe is requested by.
    pub id: &'static str,
    /// Required `(item, count)` pairs, all consumed on success.
    pub ingredients: &'static [(&'static str, u32)],
    /// Item awarded on success.
    pub output: &'static str,
    /// Units of `output` awarded on success.
    pub quantity: u32,
}

impl Recipe {
    /// A recipe whose output is the item it is named after, in a quantity of one.
    pub const fn simple(id: &'static str, ingredients: &'static [(&'static str, u32)]) -> Self {
        Self {
            id,
            ingredients,
            output: id,
            quantity: 1,
        }
    }

    /// Return `true` if the inventory holds every ingredient in full.
    pub fn is_satisfied_by(&self, inventory: &Inventory) -> bool {
        self.ingredients
            .iter()
            .all(|(item, qty)| inventory.has(item, *qty))
    }

    /// Consume the ingredients and credit the output. All-or-nothing:
    /// returns `false` and leaves the inventory untouched if anything is short.
    pub fn craft(&self, inventory: &mut Inventory) -> bool {
        if !self.is_satisfied_by(inventory) {
            return false;
        }
        for (item, qty) in self.ingredients {
            inventory.remove(item, *qty);
        }
        inventory.add(self.output, self.quantity);
        true
    }
}

const RECIPES: &[Recipe] = &[
    Recipe::simple("zombie_essence", &[("flesh", 1), ("teeth", 1)]),
    Recipe::simple(
        "elemental_potion",
        &[("zombie_essence", 1), ("magic_essence", 1)],
    ),
    Recipe::simple(
        "transformation_syringe",
        &[("zombie_core", 1), ("elemental_potion", 1)],
    ),
    Recipe::simple("mutation_serum_fire", &[("fire_core", 3)]),
    Recipe::simple("bow", &[("wood_planks", 3), ("nails", 2)]),
    Recipe {
        id: "arrow",
        ingredients: &[("wood_planks", 1), ("nails", 1)],
        output: "arrow",
        quantity: 5,
    },
    Recipe::simple("hammer", &[("scrap_metal", 2), ("duct_tape", 1)]),
    Recipe::simple("crowbar", &[("scrap_metal", 3), ("duct_tape", 1)]),
    Recipe::simple("axe", &[("scrap_metal", 4), ("duct_tape", 2)]),
    Recipe::simple("baseball_bat", &[("wood_planks", 2), ("duct_tape", 1)]),
    Recipe::simple("reinforced_axe", &[("steel_plates", 3), ("wood_planks", 2)]),
    Recipe::simple("wood_barricade", &[("wood_planks", 2), ("nails", 4)]),
];

/// Lookup table of crafting recipes.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecipeBook {
    /// The built-in recipe set.
    pub fn standard() -> Self {
        Self::from_recipes(RECIPES.to_vec())
    }

    /// Build a book from an explicit list of recipes.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Find a recipe by identifier.
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Number of recipes in the book.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Return `true` if the book has no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Check that every recipe only mentions catalogued items.
    pub fn validate(&self) -> CoreResult<()> {
        for recipe in &self.recipes {
            if !is_known_item(recipe.output) {
                return Err(CoreError::UnknownItem {
                    recipe: recipe.id.to_string(),
                    item: recipe.output.to_string(),
                });
            }
            if let Some((item, _)) = recipe.ingredients.iter().find(|(i, _)| !is_known_item(i)) {
                return Err(CoreError::UnknownItem {
                    recipe: recipe.id.to_string(),
                    item: (*item).to_string(),
                });
            }
        }
        Ok(())
    }
}
