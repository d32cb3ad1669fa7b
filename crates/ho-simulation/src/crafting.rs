//! Crafting and item use.
//!
//! Both operations are all-or-nothing: on failure the player is untouched.

use ho_core::entity::PLAYER_MAX_HEALTH;
use ho_core::{ItemEffect, Player, RecipeBook};

/// Craft `recipe_id` from the player's inventory. Returns `false` if the
/// recipe is unknown or any ingredient is short.
pub fn craft_item(player: &mut Player, recipes: &RecipeBook, recipe_id: &str) -> bool {
    recipes
        .get(recipe_id)
        .is_some_and(|recipe| recipe.craft(&mut player.inventory))
}

/// Use one unit of `item`: consumables apply their effect, anything else is
/// equipped. Returns `false` if the player holds none.
pub fn use_item(player: &mut Player, item: &str) -> bool {
    if !player.inventory.remove(item, 1) {
        return false;
    }
    match ItemEffect::of(item) {
        ItemEffect::Heal(amount) => {
            player.health = (player.health + amount).min(PLAYER_MAX_HEALTH);
        }
        ItemEffect::FireMutation => player.fire_mutation_points += 1,
        ItemEffect::Equip => player.weapon = Some(item.to_string()),
    }
    true
}
