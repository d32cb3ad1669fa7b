use std::path::Path;

use colored::Colorize;

use ho_simulation::{SimConfig, Simulation};
use tracing::info;

pub struct Options {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub zombies: usize,
    pub json: bool,
}

pub fn run(opts: &Options, output: Option<&Path>) -> Result<(), String> {
    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_size(opts.width, opts.height)
        .with_wave_size(opts.zombies);
    let sim = Simulation::generate(config).map_err(|e| format!("generation failed: {e}"))?;
    let world = sim.world();

    if opts.json || output.is_some() {
        let content = serde_json::to_string_pretty(world)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        if let Some(path) = output {
            std::fs::write(path, &content)
                .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
            info!(path = %path.display(), bytes = content.len(), "world written");
            println!("  Wrote world to {}", path.display());
        } else {
            println!("{content}");
        }
        return Ok(());
    }

    let grid = world.grid();
    println!(
        "  {} {}",
        "World".bold(),
        format!(
            "({}x{} units, {}x{} cells, seed={})",
            world.width, world.height, grid.width, grid.height, opts.seed
        )
        .dimmed()
    );
    println!();
    super::print_layout(world);
    Ok(())
}
