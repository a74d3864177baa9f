use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use idle_core::combat_log::LogKind;
use idle_core::{Attribute, CombatEvent, Config, Game, Generator, Item, Rarity, SaveGame};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Headless driver for the idle combat simulation
#[derive(Parser)]
#[command(name = "idle")]
#[command(about = "Run idle combat sessions and roll loot", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the game data
    #[arg(long, global = true, default_value = "config")]
    config: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a session with auto attack on
    Run(RunArgs),
    /// Roll items and print them
    Loot(LootArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Simulated seconds
    #[arg(long, default_value_t = 300.0)]
    seconds: f64,

    /// Ticks per simulated second
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Zone to fight in
    #[arg(long)]
    zone: Option<usize>,

    /// Spend every new attribute point on this attribute
    #[arg(long, value_enum)]
    auto_allocate: Option<AttributeArg>,

    /// Equip drops that beat the current gear
    #[arg(long)]
    auto_equip: bool,

    /// Resume from a save file
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a save file at the end
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct LootArgs {
    /// Number of items to roll
    #[arg(short = 'n', long, default_value_t = 5)]
    count: u32,

    /// Enemy level the drops come from
    #[arg(long, default_value_t = 1)]
    level: u32,

    #[arg(long, default_value_t = 0)]
    luck: u32,

    /// Force a rarity instead of rolling one
    #[arg(long, value_enum)]
    rarity: Option<RarityArg>,

    #[arg(long)]
    seed: Option<u64>,

    /// Print items as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AttributeArg {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Luck,
}

impl From<AttributeArg> for Attribute {
    fn from(arg: AttributeArg) -> Self {
        match arg {
            AttributeArg::Strength => Attribute::Strength,
            AttributeArg::Dexterity => Attribute::Dexterity,
            AttributeArg::Intelligence => Attribute::Intelligence,
            AttributeArg::Vitality => Attribute::Vitality,
            AttributeArg::Luck => Attribute::Luck,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RarityArg {
    Common,
    Magic,
    Rare,
    Unique,
}

impl From<RarityArg> for Rarity {
    fn from(arg: RarityArg) -> Self {
        match arg {
            RarityArg::Common => Rarity::Common,
            RarityArg::Magic => Rarity::Magic,
            RarityArg::Rare => Rarity::Rare,
            RarityArg::Unique => Rarity::Unique,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_file.as_deref())?;

    let config = Config::load_from_dir(&cli.config).map_err(|e| {
        anyhow::anyhow!("{}\n{}", e, e.location_description())
    })?;

    match cli.command {
        Command::Run(args) => run(config, args),
        Command::Loot(args) => loot(config, args),
    }
}

fn init_logging(level: LevelFilter, file: Option<&Path>) -> Result<()> {
    let config = simplelog::Config::default();
    match file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            WriteLogger::init(level, config, file)?;
        }
        None => TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

fn run(config: Config, args: RunArgs) -> Result<()> {
    if args.tick_rate == 0 {
        bail!("--tick-rate must be positive");
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Running {}s with seed {}", args.seconds, seed);

    let mut game = match args.load {
        Some(ref path) => {
            let save = SaveGame::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Game::from_snapshot(config, save, seed)?
        }
        None => Game::new(config, seed),
    };
    if let Some(zone) = args.zone {
        game.change_zone(zone)?;
    }
    game.set_auto_attack(true);

    let step = 1.0 / args.tick_rate as f64;
    let ticks = (args.seconds * args.tick_rate as f64).round() as u64;
    for _ in 0..ticks {
        let events = game.tick(step);

        for event in &events {
            match event {
                CombatEvent::PlayerRespawned { .. } => {
                    game.set_auto_attack(true);
                }
                CombatEvent::ItemDropped { index, .. } if args.auto_equip => {
                    try_upgrade(&mut game, *index);
                }
                _ => {}
            }
        }

        if let Some(attribute) = args.auto_allocate {
            while game.character.available_points > 0 {
                game.allocate_point(attribute.into())?;
            }
        }
    }

    if let Some(ref path) = args.save {
        game.snapshot()
            .save_to_file(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    } else {
        print_summary(&game);
    }
    Ok(())
}

/// Equip a fresh drop when its slot is empty or it outranks what is worn
fn try_upgrade(game: &mut Game, index: usize) {
    let Some(item) = game.inventory.get(index) else {
        return;
    };
    if item.requirements.level > game.character.level {
        return;
    }
    let better = item.slot.equip_slots().iter().any(|slot| {
        game.inventory
            .equipment
            .get(*slot)
            .map_or(true, |worn| item.rarity > worn.rarity || item.level > worn.level + 2)
    });
    if better {
        if let Err(e) = game.equip(index) {
            log::warn!("Could not equip drop: {}", e);
        }
    }
}

fn print_summary(game: &Game) {
    let c = &game.character;
    let stats = game.derived_stats();
    let zone = game
        .config()
        .zones
        .get(game.zone())
        .map_or("nowhere", |z| z.name.as_str());

    println!("{} - level {} in {}", c.name, c.level, zone);
    println!(
        "  Experience {}/{}  Gold {}  Health {}/{}",
        c.experience,
        c.experience_to_next(&game.config().settings.progression),
        c.gold,
        c.health,
        stats.max_health
    );
    println!(
        "  Str {}  Dex {}  Int {}  Vit {}  Luck {}  (unspent {})",
        stats.attributes.strength,
        stats.attributes.dexterity,
        stats.attributes.intelligence,
        stats.attributes.vitality,
        stats.attributes.luck,
        c.available_points
    );
    println!(
        "  Damage {}-{}  Crit {:.0}% x{}%  Defense {}  Speed {:.2}",
        stats.damage_min,
        stats.damage_max,
        stats.crit_chance,
        stats.crit_multiplier,
        stats.defense,
        stats.attack_speed
    );

    let counters = &game.counters;
    println!(
        "\nKilled {} enemies, collected {} gold and {} items in {:.0}s",
        counters.enemies_killed, counters.gold_collected, counters.items_found, counters.time_played
    );

    println!("\nEquipment:");
    for (slot, item) in game.inventory.equipment.iter() {
        println!("  {:?}: {} ({:?})", slot, item.name, item.rarity);
    }

    println!(
        "\nInventory ({}/{}):",
        game.inventory.len(),
        game.inventory.capacity()
    );
    for (index, item) in game.inventory.iter() {
        println!("  [{}] {} ({:?}, ilvl {})", index, item.name, item.rarity, item.level);
    }

    if !c.currencies.is_empty() {
        println!("\nCurrency:");
        for (id, count) in &c.currencies {
            println!("  {} x{}", id, count);
        }
    }

    println!("\nRecent log:");
    for entry in game.log.entries().take(10) {
        let marker = match entry.kind {
            LogKind::Combat => "*",
            LogKind::Loot => "$",
            LogKind::Progress => "+",
            LogKind::System => "-",
        };
        println!("  {:>7.1}s {} {}", entry.time, marker, entry.text);
    }
}

fn loot(config: Config, args: LootArgs) -> Result<()> {
    let generator = Generator::new(config);
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = Generator::make_rng(seed);

    let mut items: Vec<Item> = Vec::new();
    for _ in 0..args.count {
        let item = match args.rarity {
            Some(rarity) => {
                let level = generator.item_level_for(args.level, &mut rng);
                generator.generate_with_rarity(level, rarity.into(), &mut rng)?
            }
            None => generator.generate(args.level, args.luck, &mut rng)?,
        };
        items.push(item);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            println!("{}", item.to_markdown());
        }
    }
    Ok(())
}
