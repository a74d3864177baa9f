use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete game configuration loaded from TOML files
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: GameSettings,
    pub base_types: BTreeMap<String, BaseTypeConfig>,
    pub affixes: BTreeMap<String, AffixConfig>,
    /// Rarity table, ordered from Common to Unique
    pub rarities: Vec<RarityConfig>,
    pub enemies: BTreeMap<String, EnemyTemplate>,
    /// Enemy ids in the order their files and entries were read
    pub enemy_order: Vec<String>,
    /// Zones ordered by index
    pub zones: Vec<ZoneConfig>,
    pub currencies: BTreeMap<String, CurrencyConfig>,
    pub uniques: BTreeMap<String, UniqueConfig>,
}

impl Config {
    /// Load configuration from a directory containing subdirectories for each config type
    /// Expected structure:
    ///   config/
    ///     game.toml      - balance constants (optional, every field defaulted)
    ///     base_types/    - .toml files containing [[base_types]] arrays
    ///     affixes/       - .toml files containing [[affixes]] arrays
    ///     rarities/      - .toml files containing [[rarities]] arrays
    ///     enemies/       - .toml files containing [[enemies]] arrays
    ///     zones/         - .toml files containing [[zones]] arrays
    ///     currencies/    - .toml files containing [[currencies]] arrays
    ///     uniques/       - .toml files each containing a single [unique]
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let settings_path = dir.join("game.toml");
        let settings = if settings_path.exists() {
            let content = Self::read_file_with_context(&settings_path)?;
            Self::parse_toml_with_context(&content, &settings_path)?
        } else {
            GameSettings::default()
        };

        let base_types = Self::load_dir::<BaseTypesWrapper>(&dir.join("base_types"))?
            .into_iter()
            .flat_map(|w| w.base_types)
            .map(|bt| (bt.id.clone(), bt))
            .collect();

        let affixes = Self::load_dir::<AffixesWrapper>(&dir.join("affixes"))?
            .into_iter()
            .flat_map(|w| w.affixes)
            .map(|a| (a.id.clone(), a))
            .collect();

        let mut rarities: Vec<RarityConfig> = Self::load_dir::<RaritiesWrapper>(&dir.join("rarities"))?
            .into_iter()
            .flat_map(|w| w.rarities)
            .collect();
        if rarities.is_empty() {
            rarities = RarityConfig::default_table();
        }
        rarities.sort_by_key(|r| r.rarity);

        let mut enemies = BTreeMap::new();
        let mut enemy_order = Vec::new();
        for enemy in Self::load_dir::<EnemiesWrapper>(&dir.join("enemies"))?
            .into_iter()
            .flat_map(|w| w.enemies)
        {
            if !enemy_order.contains(&enemy.id) {
                enemy_order.push(enemy.id.clone());
            }
            enemies.insert(enemy.id.clone(), enemy);
        }

        let mut zones: Vec<ZoneConfig> = Self::load_dir::<ZonesWrapper>(&dir.join("zones"))?
            .into_iter()
            .flat_map(|w| w.zones)
            .collect();
        zones.sort_by_key(|z| z.index);

        let currencies = Self::load_dir::<CurrenciesWrapper>(&dir.join("currencies"))?
            .into_iter()
            .flat_map(|w| w.currencies)
            .map(|c| (c.id.clone(), c))
            .collect();

        let uniques = Self::load_dir::<UniqueFileConfig>(&dir.join("uniques"))?
            .into_iter()
            .map(|f| (f.unique.id.clone(), f.unique))
            .collect();

        let config = Config {
            settings,
            base_types,
            affixes,
            rarities,
            enemies,
            enemy_order,
            zones,
            currencies,
            uniques,
        };
        config.validate()?;

        log::info!(
            "Loaded config from {}: {} base types, {} affixes, {} enemies, {} zones",
            dir.display(),
            config.base_types.len(),
            config.affixes.len(),
            config.enemies.len(),
            config.zones.len()
        );

        Ok(config)
    }

    /// Parse every .toml file in a directory. A missing directory yields nothing.
    fn load_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>, ConfigError> {
        let mut result = Vec::new();

        if !dir.exists() {
            return Ok(result);
        }

        let mut paths = Vec::new();
        for entry in Self::read_dir_with_context(dir)? {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent; later files win on duplicate ids
        paths.sort();

        for path in paths {
            let content = Self::read_file_with_context(&path)?;
            result.push(Self::parse_toml_with_context(&content, &path)?);
        }

        Ok(result)
    }

    /// Check cross references and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rarities.is_empty() {
            return Err(ConfigError::Invalid("rarity table is empty".to_string()));
        }

        for (position, zone) in self.zones.iter().enumerate() {
            if zone.index != position {
                return Err(ConfigError::Invalid(format!(
                    "zone '{}' has index {} but zones must be numbered 0..{}",
                    zone.name,
                    zone.index,
                    self.zones.len()
                )));
            }
            if zone.min_level > zone.max_level {
                return Err(ConfigError::Invalid(format!(
                    "zone '{}' has min_level {} above max_level {}",
                    zone.name, zone.min_level, zone.max_level
                )));
            }
            if zone.enemies.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "zone '{}' lists no enemies",
                    zone.name
                )));
            }
            if let Some(missing) = zone.enemies.iter().find(|id| !self.enemies.contains_key(*id)) {
                return Err(ConfigError::Invalid(format!(
                    "zone '{}' references unknown enemy '{}'",
                    zone.name, missing
                )));
            }
        }

        let loot = &self.settings.loot;
        check_chance("loot.gold_chance", Some(loot.gold_chance))?;
        check_chance("loot.item_chance", Some(loot.item_chance))?;
        check_chance("loot.currency_chance", Some(loot.currency_chance))?;

        for enemy in self.enemies.values() {
            let drops = &enemy.drops;
            check_chance(&format!("enemy '{}' gold_chance", enemy.id), drops.gold_chance)?;
            check_chance(&format!("enemy '{}' item_chance", enemy.id), drops.item_chance)?;
            check_chance(
                &format!("enemy '{}' currency_chance", enemy.id),
                drops.currency_chance,
            )?;
            if enemy.damage.min > enemy.damage.max {
                return Err(ConfigError::Invalid(format!(
                    "enemy '{}' has an inverted damage range",
                    enemy.id
                )));
            }
            if enemy.attack_cooldown <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "enemy '{}' must have a positive attack_cooldown",
                    enemy.id
                )));
            }
        }

        for affix in self.affixes.values() {
            if affix.tiers.is_empty() {
                return Err(ConfigError::Invalid(format!("affix '{}' has no tiers", affix.id)));
            }
            if let Some(tier) = affix.tiers.iter().find(|t| t.min > t.max) {
                return Err(ConfigError::Invalid(format!(
                    "affix '{}' tier {} has min above max",
                    affix.id, tier.tier
                )));
            }
        }

        for base in self.base_types.values() {
            if let Some(ref dmg) = base.damage {
                if dmg.min > dmg.max {
                    return Err(ConfigError::Invalid(format!(
                        "base type '{}' has an inverted damage range",
                        base.id
                    )));
                }
            }
        }

        if let Some(currency) = self.currencies.values().find(|c| c.stack_size == Some(0)) {
            return Err(ConfigError::Invalid(format!(
                "currency '{}' has a stack_size of 0",
                currency.id
            )));
        }

        for unique in self.uniques.values() {
            if !self.base_types.contains_key(&unique.base_type) {
                return Err(ConfigError::Invalid(format!(
                    "unique '{}' references unknown base type '{}'",
                    unique.id, unique.base_type
                )));
            }
        }

        Ok(())
    }

    /// Look up a rarity's table entry
    pub fn rarity(&self, rarity: Rarity) -> Option<&RarityConfig> {
        self.rarities.iter().find(|r| r.rarity == rarity)
    }

    /// Template used when a zone has nothing spawnable: the first one loaded
    pub fn fallback_enemy(&self) -> Option<&EnemyTemplate> {
        self.enemy_order
            .iter()
            .find_map(|id| self.enemies.get(id))
            .or_else(|| self.enemies.values().next())
    }

    /// Stat multiplier for a rarity (1.0 when the table has no entry)
    pub fn rarity_multiplier(&self, rarity: Rarity) -> f64 {
        self.rarity(rarity).map_or(1.0, |r| r.stat_multiplier)
    }

    // Helper functions for error context

    fn read_dir_with_context(dir: &Path) -> Result<std::fs::ReadDir, ConfigError> {
        std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })
    }

    fn read_file_with_context(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })
    }

    fn parse_toml_with_context<T: serde::de::DeserializeOwned>(
        content: &str,
        path: &Path,
    ) -> Result<T, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.to_path_buf(),
        })
    }
}

/// Drop chances are probabilities in 0.0..=1.0
fn check_chance(what: &str, chance: Option<f64>) -> Result<(), ConfigError> {
    match chance {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(ConfigError::Invalid(format!(
            "{} must be between 0 and 1, got {}",
            what, c
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error with optional file path
    #[error("IO error{}: {error}", in_path(.path))]
    Io {
        #[source]
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    /// TOML parse error with file path and location details
    #[error("Parse error in '{}': {error}", .path.display())]
    Parse {
        #[source]
        error: toml::de::Error,
        path: PathBuf,
    },
    /// Well-formed TOML that references missing records or holds impossible values
    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn in_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in '{}'", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    /// Get the file path associated with this error, if any
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => path.as_deref(),
            ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Invalid(_) => None,
        }
    }

    /// Get a user-friendly description of where the error occurred
    pub fn location_description(&self) -> String {
        match self {
            ConfigError::Io { path: Some(p), .. } => format!("File: {}", p.display()),
            ConfigError::Io { path: None, .. } | ConfigError::Invalid(_) => {
                "Unknown location".to_string()
            }
            ConfigError::Parse { error, path } => {
                let mut desc = format!("File: {}", path.display());
                if let Some(span) = error.span() {
                    desc.push_str(&format!("\nPosition: bytes {}..{}", span.start, span.end));
                }
                desc
            }
        }
    }
}

// Wrapper types for TOML parsing

#[derive(Deserialize)]
struct BaseTypesWrapper {
    #[serde(default)]
    base_types: Vec<BaseTypeConfig>,
}

#[derive(Deserialize)]
struct AffixesWrapper {
    #[serde(default)]
    affixes: Vec<AffixConfig>,
}

#[derive(Deserialize)]
struct RaritiesWrapper {
    #[serde(default)]
    rarities: Vec<RarityConfig>,
}

#[derive(Deserialize)]
struct EnemiesWrapper {
    #[serde(default)]
    enemies: Vec<EnemyTemplate>,
}

#[derive(Deserialize)]
struct ZonesWrapper {
    #[serde(default)]
    zones: Vec<ZoneConfig>,
}

#[derive(Deserialize)]
struct CurrenciesWrapper {
    #[serde(default)]
    currencies: Vec<CurrencyConfig>,
}

/// Config structure for individual unique files
#[derive(Deserialize)]
struct UniqueFileConfig {
    unique: UniqueConfig,
}

/// Balance constants from `game.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub character: CharacterSettings,
    pub progression: ProgressionSettings,
    pub stats: StatSettings,
    pub combat: CombatSettings,
    pub enemy_scaling: EnemyScaling,
    pub loot: LootSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub name: String,
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub luck: u32,
    pub points_per_level: u32,
    pub inventory_size: usize,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        CharacterSettings {
            name: "Hero".to_string(),
            strength: 5,
            dexterity: 5,
            intelligence: 5,
            vitality: 5,
            luck: 3,
            points_per_level: 3,
            inventory_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Experience needed to go from level 1 to 2
    pub xp_base: f64,
    /// Growth of the requirement per level
    pub xp_growth: f64,
    /// Fraction of current experience lost on death
    pub death_experience_penalty: f64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        ProgressionSettings {
            xp_base: 100.0,
            xp_growth: 1.1,
            death_experience_penalty: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatSettings {
    pub base_damage_min: f64,
    pub damage_min_per_strength: f64,
    pub base_damage_max: f64,
    pub damage_max_per_strength: f64,
    pub base_crit_chance: f64,
    pub crit_chance_per_luck: f64,
    pub base_crit_multiplier: u32,
    pub crit_multiplier_per_luck: u32,
    pub base_health: u32,
    pub health_per_vitality: u32,
    pub unarmed_attack_speed: f64,
}

impl Default for StatSettings {
    fn default() -> Self {
        StatSettings {
            base_damage_min: 1.0,
            damage_min_per_strength: 0.5,
            base_damage_max: 3.0,
            damage_max_per_strength: 1.0,
            base_crit_chance: 5.0,
            crit_chance_per_luck: 0.5,
            base_crit_multiplier: 150,
            crit_multiplier_per_luck: 2,
            base_health: 50,
            health_per_vitality: 10,
            unarmed_attack_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Player cooldown in seconds at attack speed 1.0
    pub base_attack_cooldown: f64,
    /// Seconds between a kill and the next spawn
    pub enemy_respawn_delay: f64,
    /// Seconds between player death and revival
    pub player_respawn_delay: f64,
    /// Fraction of max health restored on revival
    pub respawn_health_fraction: f64,
    pub max_log_entries: usize,
}

impl Default for CombatSettings {
    fn default() -> Self {
        CombatSettings {
            base_attack_cooldown: 2.0,
            enemy_respawn_delay: 1.5,
            player_respawn_delay: 3.0,
            respawn_health_fraction: 0.5,
            max_log_entries: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyScaling {
    pub health_per_level: f64,
    pub health_per_zone: f64,
    pub experience_per_zone: f64,
    pub experience_per_level: f64,
    pub damage_per_level: f64,
}

impl Default for EnemyScaling {
    fn default() -> Self {
        EnemyScaling {
            health_per_level: 0.5,
            health_per_zone: 0.3,
            experience_per_zone: 0.2,
            experience_per_level: 0.1,
            damage_per_level: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootSettings {
    pub gold_chance: f64,
    pub gold_min_per_level: u32,
    pub gold_max_per_level: u32,
    pub item_chance: f64,
    pub currency_chance: f64,
    /// Item level is the enemy level plus or minus this much
    pub item_level_variance: u32,
    /// Per-level growth of base item stats
    pub level_scaling: f64,
    /// Extra affix spawn weight per tag shared with the item
    pub tag_weight_bonus: f64,
}

impl Default for LootSettings {
    fn default() -> Self {
        LootSettings {
            gold_chance: 0.5,
            gold_min_per_level: 2,
            gold_max_per_level: 5,
            item_chance: 0.2,
            currency_chance: 0.05,
            item_level_variance: 2,
            level_scaling: 1.1,
            tag_weight_bonus: 0.5,
        }
    }
}

/// Base item type configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseTypeConfig {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub slot: ItemSlot,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default = "default_weight")]
    pub drop_weight: u32,
    #[serde(default)]
    pub implicit: Option<ImplicitConfig>,
    /// Defense roll for armour pieces and shields
    #[serde(default)]
    pub defense: Option<RollRange>,
    #[serde(default)]
    pub damage: Option<DamageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplicitConfig {
    pub stat: StatType,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConfig {
    pub min: i32,
    pub max: i32,
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f64,
    #[serde(default)]
    pub critical_chance: f64,
}

fn default_attack_speed() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRange {
    pub min: i32,
    pub max: i32,
}

/// Affix configuration with tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffixConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub affix_type: AffixType,
    pub stat: StatType,
    /// The affix only spawns on items sharing at least one tag (untagged affixes spawn anywhere)
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub allowed_kinds: Vec<ItemKind>,
    pub tiers: Vec<AffixTierConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffixTierConfig {
    pub tier: u32,
    pub weight: u32,
    pub min: i32,
    pub max: i32,
    /// Minimum item level required for this tier to roll
    #[serde(default)]
    pub min_ilvl: u32,
}

/// One row of the rarity drop table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityConfig {
    pub rarity: Rarity,
    pub weight: u32,
    /// Weight change per point of luck (may be negative)
    #[serde(default)]
    pub luck_weight: i32,
    #[serde(default)]
    pub min_weight: u32,
    #[serde(default = "default_max_weight")]
    pub max_weight: u32,
    #[serde(default = "default_multiplier")]
    pub stat_multiplier: f64,
    /// How many affixes an item of this rarity rolls
    #[serde(default)]
    pub affixes: AffixCount,
}

fn default_max_weight() -> u32 {
    u32::MAX
}

fn default_multiplier() -> f64 {
    1.0
}

impl RarityConfig {
    /// Drop weight adjusted for the player's luck and clamped to the row's bounds
    pub fn weight_for_luck(&self, luck: u32) -> u32 {
        let shifted = self.weight as i64 + self.luck_weight as i64 * luck as i64;
        shifted.clamp(self.min_weight as i64, self.max_weight.max(self.min_weight) as i64) as u32
    }

    /// The table used when no rarity files are present
    pub fn default_table() -> Vec<RarityConfig> {
        vec![
            RarityConfig {
                rarity: Rarity::Common,
                weight: 700,
                luck_weight: -10,
                min_weight: 400,
                max_weight: u32::MAX,
                stat_multiplier: 1.0,
                affixes: AffixCount { min: 0, max: 0 },
            },
            RarityConfig {
                rarity: Rarity::Magic,
                weight: 200,
                luck_weight: 5,
                min_weight: 0,
                max_weight: 400,
                stat_multiplier: 1.2,
                affixes: AffixCount { min: 1, max: 2 },
            },
            RarityConfig {
                rarity: Rarity::Rare,
                weight: 80,
                luck_weight: 3,
                min_weight: 0,
                max_weight: 150,
                stat_multiplier: 1.5,
                affixes: AffixCount { min: 2, max: 3 },
            },
            RarityConfig {
                rarity: Rarity::Unique,
                weight: 20,
                luck_weight: 2,
                min_weight: 0,
                max_weight: 50,
                stat_multiplier: 2.0,
                affixes: AffixCount { min: 0, max: 0 },
            },
        ]
    }
}

/// Specifies how many affixes to add
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixCount {
    pub min: u32,
    pub max: u32,
}

/// Enemy template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub base_health: u32,
    pub base_experience: u32,
    pub damage: RollRange,
    /// Seconds between attacks
    pub attack_cooldown: f64,
    #[serde(default)]
    pub drops: DropOverrides,
}

/// Per-enemy replacements for the global drop chances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DropOverrides {
    #[serde(default)]
    pub gold_chance: Option<f64>,
    #[serde(default)]
    pub item_chance: Option<f64>,
    #[serde(default)]
    pub currency_chance: Option<f64>,
}

/// A level-banded area and the enemies that live there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub index: usize,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub enemies: Vec<String>,
}

/// Currency configuration - generic and data-driven
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_weight")]
    pub drop_weight: u32,
    /// Most the stash holds; unlimited when absent
    #[serde(default)]
    pub stack_size: Option<u32>,
    #[serde(default)]
    pub requires: CurrencyRequirements,
    #[serde(default)]
    pub effects: CurrencyEffects,
}

/// Requirements for using a currency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyRequirements {
    /// Item must be one of these rarities
    #[serde(default)]
    pub rarities: Vec<Rarity>,
    /// Item must have at least one affix
    #[serde(default)]
    pub has_affix: bool,
}

/// Effects when a currency is applied, in field order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyEffects {
    #[serde(default)]
    pub set_rarity: Option<Rarity>,
    #[serde(default)]
    pub clear_affixes: bool,
    #[serde(default)]
    pub add_affixes: Option<AffixCount>,
    /// Reroll every affix value within its current tier
    #[serde(default)]
    pub reroll_values: bool,
}

/// Unique item template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueConfig {
    pub id: String,
    pub name: String,
    pub base_type: String,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default = "default_weight")]
    pub drop_weight: u32,
    pub mods: Vec<UniqueModConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueModConfig {
    pub stat: StatType,
    pub min: i32,
    pub max: i32,
}

fn default_weight() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_dir_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert!(config.base_types.is_empty());
        assert_eq!(config.rarities.len(), 4);
        assert_eq!(config.settings.character.inventory_size, 20);
        assert_eq!(config.settings.combat.max_log_entries, 50);
    }

    #[test]
    fn partial_game_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "game.toml", "[combat]\nbase_attack_cooldown = 1.0\n");
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.settings.combat.base_attack_cooldown, 1.0);
        assert_eq!(config.settings.combat.enemy_respawn_delay, 1.5);
        assert_eq!(config.settings.progression.xp_base, 100.0);
    }

    #[test]
    fn parse_error_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "affixes/broken.toml", "[[affixes]]\nid = ");
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.file_path().unwrap().ends_with("broken.toml"));
        assert!(err.location_description().contains("broken.toml"));
    }

    #[test]
    fn zone_with_unknown_enemy_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "zones/zones.toml",
            r#"
[[zones]]
index = 0
name = "Forest Edge"
min_level = 1
max_level = 5
enemies = ["dragon"]
"#,
        );
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("dragon")));
    }

    #[test]
    fn zone_without_enemies_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "zones/zones.toml",
            r#"
[[zones]]
index = 0
name = "Empty Field"
min_level = 1
max_level = 5
enemies = []
"#,
        );
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("Empty Field")));
    }

    #[test]
    fn enemy_order_follows_files() {
        let dir = tempfile::tempdir().unwrap();
        let enemy = |id: &str| {
            format!(
                "[[enemies]]\nid = \"{id}\"\nname = \"{id}\"\nbase_health = 10\nbase_experience = 5\ndamage = {{ min = 1, max = 2 }}\nattack_cooldown = 2.0\n"
            )
        };
        write(dir.path(), "enemies/1_first.toml", &enemy("zombie"));
        write(dir.path(), "enemies/2_second.toml", &enemy("bat"));

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.enemy_order, vec!["zombie", "bat"]);
        assert_eq!(config.fallback_enemy().unwrap().id, "zombie");
    }

    #[test]
    fn non_finite_drop_chances_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "game.toml", "[loot]\nitem_chance = nan\n");
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("item_chance")));

        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "enemies/rats.toml",
            "[[enemies]]\nid = \"rat\"\nname = \"Rat\"\nbase_health = 10\nbase_experience = 5\ndamage = { min = 1, max = 2 }\nattack_cooldown = 2.0\ndrops = { gold_chance = inf }\n",
        );
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("'rat' gold_chance")));
    }

    #[test]
    fn rarities_are_sorted_regardless_of_file_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "rarities/table.toml",
            r#"
[[rarities]]
rarity = "rare"
weight = 10

[[rarities]]
rarity = "common"
weight = 90
"#,
        );
        let config = Config::load_from_dir(dir.path()).unwrap();
        let order: Vec<Rarity> = config.rarities.iter().map(|r| r.rarity).collect();
        assert_eq!(order, vec![Rarity::Common, Rarity::Rare]);
        assert_eq!(config.rarity_multiplier(Rarity::Magic), 1.0);
    }

    #[test]
    fn luck_weight_is_clamped() {
        let table = RarityConfig::default_table();
        let common = &table[0];
        let unique = &table[3];
        assert_eq!(common.weight_for_luck(0), 700);
        assert_eq!(common.weight_for_luck(10), 600);
        assert_eq!(common.weight_for_luck(1000), 400);
        assert_eq!(unique.weight_for_luck(5), 30);
        assert_eq!(unique.weight_for_luck(1000), 50);
    }
}
