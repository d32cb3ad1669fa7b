use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ho_core::{Player, PlayerId};
use ho_simulation::{Command, SimConfig, SimEventKind, Simulation};
use tracing::{debug, info};

pub struct Options {
    pub ticks: u64,
    pub seed: u64,
    pub players: usize,
    pub width: u32,
    pub height: u32,
    pub loot_ticks: u32,
    pub script: Option<PathBuf>,
    pub verbose: bool,
    pub json: bool,
}

/// One line of a command script.
struct ScriptedCommand {
    tick: u64,
    player: usize,
    command: Command,
}

pub fn run(opts: &Options) -> Result<(), String> {
    let script = match &opts.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_size(opts.width, opts.height)
        .with_loot_ticks(opts.loot_ticks);
    let mut sim = Simulation::generate(config).map_err(|e| format!("generation failed: {e}"))?;
    sim.init()
        .map_err(|e| format!("simulation init failed: {e}"))?;

    let players: Vec<PlayerId> = (0..opts.players).map(|_| sim.join()).collect();

    let mut by_tick: BTreeMap<u64, Vec<&ScriptedCommand>> = BTreeMap::new();
    for cmd in &script {
        if cmd.player >= players.len() {
            return Err(format!(
                "script refers to player {} but only {} joined",
                cmd.player,
                players.len()
            ));
        }
        by_tick.entry(cmd.tick).or_default().push(cmd);
    }
    info!(
        ticks = opts.ticks,
        players = players.len(),
        scripted = script.len(),
        "running simulation"
    );

    for tick in 0..opts.ticks {
        if let Some(cmds) = by_tick.get(&tick) {
            for cmd in cmds {
                debug!(tick, player = cmd.player, "applying scripted command");
                sim.apply(players[cmd.player], cmd.command.clone());
            }
        }
        sim.tick().map_err(|e| format!("simulation error: {e}"))?;
    }

    if opts.json {
        let content = serde_json::to_string_pretty(&sim.snapshot())
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{content}");
        return Ok(());
    }

    // Header
    println!(
        "  {} {}",
        "Session".bold(),
        format!(
            "({} ticks, {:.1}s simulated, seed={})",
            opts.ticks,
            sim.clock().elapsed_seconds(),
            opts.seed
        )
        .dimmed()
    );
    println!(
        "  {} players, {} zombies, {} events logged",
        sim.world().player_count(),
        sim.world().zombies.len(),
        sim.events().len()
    );
    println!();

    super::print_layout(sim.world());

    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let downed: Vec<_> = sim
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::PlayerDowned { .. }))
            .collect();
        if !downed.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in &downed {
                println!("  {}  {}", "DOWN".red().bold(), event.description);
            }
            println!();
        }
    }

    println!("  {}", "Player Status".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Player", "Position", "Health", "Weapon", "Inventory"]);
    for (id, player) in sim.world().players() {
        table.add_row(player_row(id, player));
    }
    println!("{table}");
    println!();

    Ok(())
}

fn player_row(id: PlayerId, player: &Player) -> Vec<String> {
    let inventory = if player.inventory.is_empty() {
        "--".to_string()
    } else {
        player
            .inventory
            .iter()
            .map(|(item, qty)| format!("{item} x{qty}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    vec![
        id.to_string(),
        format!("({:.1}, {:.1})", player.x, player.y),
        format_health(player.health),
        player.weapon.clone().unwrap_or_else(|| "--".to_string()),
        inventory,
    ]
}

/// Parse a JSON-lines script. Blank lines and lines starting with `#` are skipped.
fn load_script(path: &Path) -> Result<Vec<ScriptedCommand>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    let mut commands = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let at = |msg: String| format!("{}:{}: {msg}", path.display(), lineno + 1);

        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| at(format!("invalid JSON: {e}")))?;
        let tick = value["tick"]
            .as_u64()
            .ok_or_else(|| at("missing \"tick\"".to_string()))?;
        let player = value["player"].as_u64().unwrap_or(0) as usize;
        let command: Command =
            serde_json::from_value(value).map_err(|e| at(format!("invalid command: {e}")))?;
        commands.push(ScriptedCommand {
            tick,
            player,
            command,
        });
    }
    Ok(commands)
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::PlayerDowned { .. } => description.red().bold(),
        SimEventKind::PlayerHit { .. } => description.red(),
        SimEventKind::LootCompleted { .. } | SimEventKind::ItemCrafted { .. } => {
            description.green()
        }
        SimEventKind::LootAborted { .. } | SimEventKind::LootCancelled { .. } => {
            description.yellow()
        }
        SimEventKind::LootStarted { .. } | SimEventKind::ItemUsed { .. } => description.cyan(),
        SimEventKind::PlayerJoined { .. } | SimEventKind::PlayerLeft { .. } => {
            description.blue()
        }
    }
}

fn format_health(health: u32) -> String {
    let max = ho_core::entity::PLAYER_MAX_HEALTH;
    let bar = format!(
        "{}{}",
        "#".repeat(health as usize),
        "-".repeat(max.saturating_sub(health) as usize)
    );
    if health == 0 {
        format!("[{}] {health:>2}", bar.red())
    } else if health <= max / 3 {
        format!("[{}] {health:>2}", bar.yellow())
    } else {
        format!("[{}] {health:>2}", bar.green())
    }
}
