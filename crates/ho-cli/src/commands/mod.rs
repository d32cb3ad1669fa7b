pub mod generate;
pub mod simulate;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ho_core::{WallMaterial, World, ZombieVariant};

/// Print the layout summary shared by `generate` and `simulate`.
fn print_layout(world: &World) {
    let count = |m: WallMaterial| world.walls.iter().filter(|w| w.material == m).count();
    let fire = world
        .zombies
        .iter()
        .filter(|z| z.variant == ZombieVariant::Fire)
        .count();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Feature", "Count", "Details"]);
    table.add_row(vec![
        "Walls".to_string(),
        world.walls.len().to_string(),
        WallMaterial::ALL
            .iter()
            .map(|m| format!("{m}: {}", count(*m)))
            .collect::<Vec<_>>()
            .join(", "),
    ]);
    table.add_row(vec![
        "Zombies".to_string(),
        world.zombies.len().to_string(),
        format!("{fire} fire"),
    ]);
    table.add_row(vec![
        "Containers".to_string(),
        world.containers.len().to_string(),
        world
            .containers
            .iter()
            .map(|c| format!("{} ({:.0}, {:.0})", c.id, c.x, c.y))
            .collect::<Vec<_>>()
            .join(", "),
    ]);
    table.add_row(vec![
        "Door".to_string(),
        usize::from(world.door.is_some()).to_string(),
        world
            .door
            .map(|d| format!("({:.0}, {:.0})", d.x, d.y))
            .unwrap_or_else(|| "--".to_string()),
    ]);

    println!("  {}", "Layout".bold().underline());
    println!();
    println!("{table}");
    println!();
}
