use crate::character::{Character, CharacterError};
use crate::combat::{roll_damage, Combat, CombatEvent};
use crate::combat_log::CombatLog;
use crate::config::Config;
use crate::currency::{apply_currency_by_id, CurrencyError};
use crate::enemy::{spawn_enemy, Enemy};
use crate::filter::FilterSet;
use crate::generator::Generator;
use crate::inventory::{Inventory, InventoryError};
use crate::stats::DerivedStats;
use crate::storage::{SaveGame, SAVE_VERSION};
use crate::types::{Attribute, EquipSlot};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Unknown zone {0}")]
    UnknownZone(usize),
    #[error("Zone {zone} requires level {required}")]
    ZoneLocked { zone: usize, required: u32 },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Character(#[from] CharacterError),
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// Lifetime statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameCounters {
    pub enemies_killed: u64,
    pub gold_collected: u64,
    pub items_found: u64,
    /// Simulated seconds
    pub time_played: f64,
}

/// A running session: one character fighting in one zone
pub struct Game {
    generator: Generator,
    pub character: Character,
    pub inventory: Inventory,
    zone: usize,
    enemy: Option<Enemy>,
    combat: Combat,
    pub log: CombatLog,
    pub filters: FilterSet,
    pub counters: GameCounters,
    rng: ChaCha8Rng,
}

impl Game {
    /// Fresh level 1 character in the first zone
    pub fn new(config: Config, seed: u64) -> Self {
        let character = Character::new(&config.settings);
        let inventory = Inventory::new(config.settings.character.inventory_size);
        Self::assemble(config, seed, character, inventory, 0, GameCounters::default())
    }

    /// Resume from a snapshot. The RNG is reseeded rather than restored.
    pub fn from_snapshot(config: Config, save: SaveGame, seed: u64) -> Result<Self, GameError> {
        if save.zone >= config.zones.len() && !config.zones.is_empty() {
            return Err(GameError::UnknownZone(save.zone));
        }
        let mut game = Self::assemble(
            config,
            seed,
            save.character,
            save.inventory,
            save.zone,
            save.counters,
        );
        game.clamp_health();
        // Saved mid-revive; the revive timer is not persisted
        if !game.character.is_alive() {
            game.character.health = game.revive_health();
        }
        Ok(game)
    }

    fn assemble(
        config: Config,
        seed: u64,
        character: Character,
        inventory: Inventory,
        zone: usize,
        counters: GameCounters,
    ) -> Self {
        let log = CombatLog::new(config.settings.combat.max_log_entries);
        Game {
            generator: Generator::new(config),
            character,
            inventory,
            zone,
            enemy: None,
            combat: Combat::new(),
            log,
            filters: FilterSet::with_presets(),
            counters,
            rng: Generator::make_rng(seed),
        }
    }

    pub fn snapshot(&self) -> SaveGame {
        SaveGame {
            version: SAVE_VERSION,
            character: self.character.clone(),
            inventory: self.inventory.clone(),
            zone: self.zone,
            counters: self.counters.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        self.generator.config()
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn zone(&self) -> usize {
        self.zone
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn auto_attack(&self) -> bool {
        self.combat.auto_attack
    }

    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats::calculate(
            &self.character,
            &self.inventory.equipment,
            &self.config().settings.stats,
        )
    }

    /// Advance the simulation by `delta` seconds
    pub fn tick(&mut self, delta: f64) -> Vec<CombatEvent> {
        let delta = delta.max(0.0);
        let mut events = Vec::new();
        self.counters.time_played += delta;
        self.combat.advance(delta);

        if self.combat.take_due_revive() {
            self.revive(&mut events);
        }
        if self.combat.take_due_enemy_respawn() && self.character.is_alive() {
            self.spawn(&mut events);
        }

        if self.combat.auto_attack
            && self.character.is_alive()
            && self.combat.player_ready()
            && self.enemy.is_none()
            && !self.combat.enemy_respawn_pending()
            && !self.combat.revive_pending()
        {
            self.spawn(&mut events);
        }

        // A long tick can cover several swings; resolve them in the order they came due
        loop {
            let fighting =
                self.character.is_alive() && self.enemy.as_ref().is_some_and(|e| e.is_alive());
            let player_swings = fighting && self.combat.auto_attack && self.combat.player_ready();
            let enemy_swings = fighting && self.combat.enemy_ready();

            match (player_swings, enemy_swings) {
                (false, false) => break,
                (true, true) if self.combat.player_due_first() => self.player_attack(&mut events),
                (true, false) => self.player_attack(&mut events),
                _ => self.enemy_attack(&mut events),
            }
        }
        self.combat.settle();

        self.record(&events);
        events
    }

    /// Manual attack
    pub fn attack(&mut self) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if !self.character.is_alive() {
            log::debug!("Ignoring attack while defeated");
            return events;
        }

        if !self.combat.player_ready() {
            events.push(CombatEvent::TooSoon {
                remaining: self.combat.player_cooldown_remaining(),
            });
        } else if self.enemy.as_ref().is_some_and(|e| e.is_alive()) {
            self.player_attack(&mut events);
        } else {
            events.push(CombatEvent::NoTarget);
            self.combat.cancel_enemy_respawn();
            self.spawn(&mut events);
        }

        self.record(&events);
        events
    }

    pub fn set_auto_attack(&mut self, enabled: bool) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if self.combat.auto_attack != enabled {
            self.combat.auto_attack = enabled;
            events.push(CombatEvent::AutoAttackToggled { enabled });
        }
        self.record(&events);
        events
    }

    pub fn toggle_auto_attack(&mut self) -> Vec<CombatEvent> {
        self.set_auto_attack(!self.combat.auto_attack)
    }

    /// Move to another zone; the current enemy is dropped and a new one spawns
    pub fn change_zone(&mut self, index: usize) -> Result<Vec<CombatEvent>, GameError> {
        let zone = self
            .config()
            .zones
            .get(index)
            .ok_or(GameError::UnknownZone(index))?;
        if self.character.level < zone.min_level {
            return Err(GameError::ZoneLocked {
                zone: index,
                required: zone.min_level,
            });
        }

        log::info!("Entering {}", zone.name);
        self.zone = index;
        self.enemy = None;
        self.combat.cancel_enemy_respawn();

        let mut events = Vec::new();
        if self.character.is_alive() {
            self.spawn(&mut events);
        }
        self.record(&events);
        Ok(events)
    }

    pub fn allocate_point(&mut self, attribute: Attribute) -> Result<(), GameError> {
        let old_max = self.derived_stats().max_health;
        self.character.allocate_point(attribute)?;

        if attribute == Attribute::Vitality {
            let new_max = self.derived_stats().max_health;
            let ratio = self.character.health as f64 / old_max as f64;
            self.character.health = (ratio * new_max as f64).floor() as u32;
        }
        self.clamp_health();
        Ok(())
    }

    pub fn equip(&mut self, index: usize) -> Result<EquipSlot, GameError> {
        let slot = self.inventory.equip(index, self.character.level)?;
        self.clamp_health();
        Ok(slot)
    }

    pub fn equip_to(&mut self, index: usize, slot: EquipSlot) -> Result<(), GameError> {
        self.inventory.equip_to(index, slot, self.character.level)?;
        self.clamp_health();
        Ok(())
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<usize, GameError> {
        let index = self.inventory.unequip(slot)?;
        self.clamp_health();
        Ok(index)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), GameError> {
        Ok(self.inventory.move_item(from, to)?)
    }

    pub fn discard_item(&mut self, index: usize) -> Result<(), GameError> {
        let item = self.inventory.remove_item(index)?;
        log::info!("Discarded {}", item.name);
        Ok(())
    }

    /// Spend one currency from the stash on an inventory item
    pub fn use_currency(&mut self, currency_id: &str, index: usize) -> Result<(), GameError> {
        if !self.config().currencies.contains_key(currency_id) {
            return Err(CurrencyError::UnknownCurrency(currency_id.to_string()).into());
        }
        if self.character.currency_count(currency_id) == 0 {
            return Err(CurrencyError::NoneInStash(currency_id.to_string()).into());
        }

        let item = self.inventory.get_mut(index)?;
        apply_currency_by_id(&self.generator, item, currency_id, &mut self.rng)?;
        self.character.take_currency(currency_id);
        Ok(())
    }

    fn clamp_health(&mut self) {
        let max = self.derived_stats().max_health;
        self.character.health = self.character.health.min(max);
    }

    fn record(&mut self, events: &[CombatEvent]) {
        let time = self.counters.time_played;
        for event in events {
            self.log.record(event, time);
        }
    }

    fn spawn(&mut self, events: &mut Vec<CombatEvent>) {
        let config = self.generator.config();
        let Some(zone) = config.zones.get(self.zone) else {
            log::warn!("No zone {} configured, nothing to fight", self.zone);
            return;
        };
        let Some(enemy) = spawn_enemy(config, zone, self.character.level, &mut self.rng) else {
            log::warn!("No enemy templates configured");
            return;
        };

        self.combat.start_enemy_cooldown(enemy.attack_cooldown);
        events.push(CombatEvent::EnemySpawned {
            name: enemy.name.clone(),
            level: enemy.level,
            health: enemy.health,
        });
        self.enemy = Some(enemy);
    }

    fn player_attack(&mut self, events: &mut Vec<CombatEvent>) {
        let stats = self.derived_stats();
        let Some(enemy) = self.enemy.as_mut() else {
            return;
        };

        let roll = roll_damage(&stats.attack_profile(), 0, &mut self.rng);
        let killed = enemy.take_damage(roll.mitigated);
        events.push(CombatEvent::PlayerHit {
            enemy: enemy.name.clone(),
            damage: roll.mitigated,
            critical: roll.critical,
            enemy_health: enemy.health,
        });

        let base_cooldown = self.generator.config().settings.combat.base_attack_cooldown;
        self.combat
            .start_player_cooldown(base_cooldown, stats.attack_speed);

        if killed {
            self.enemy_defeated(events);
        }
    }

    fn enemy_attack(&mut self, events: &mut Vec<CombatEvent>) {
        let defense = self.derived_stats().defense;
        let Some(enemy) = self.enemy.as_ref() else {
            return;
        };

        let roll = roll_damage(&enemy.attack_profile(), defense, &mut self.rng);
        self.character.health = self.character.health.saturating_sub(roll.mitigated);
        events.push(CombatEvent::EnemyHit {
            enemy: enemy.name.clone(),
            damage: roll.mitigated,
            player_health: self.character.health,
        });
        self.combat.continue_enemy_cooldown(enemy.attack_cooldown);

        if !self.character.is_alive() {
            self.player_defeated(events);
        }
    }

    fn enemy_defeated(&mut self, events: &mut Vec<CombatEvent>) {
        let Some(enemy) = self.enemy.take() else {
            return;
        };
        log::info!("Defeated {} (level {})", enemy.name, enemy.level);
        events.push(CombatEvent::EnemyDefeated {
            name: enemy.name.clone(),
            level: enemy.level,
        });
        self.counters.enemies_killed += 1;

        let old_max = self.derived_stats().max_health;
        let levels = self
            .character
            .award_experience(enemy.experience, &self.generator.config().settings);
        events.push(CombatEvent::ExperienceGained {
            amount: enemy.experience,
        });
        if !levels.is_empty() {
            let new_max = self.derived_stats().max_health;
            self.character.health += new_max.saturating_sub(old_max);
            self.clamp_health();
        }
        events.extend(levels.into_iter().map(|level| CombatEvent::LevelUp { level }));

        let luck = self.derived_stats().loot_luck;
        let drops = self
            .generator
            .roll_drops(enemy.level, &enemy.drops, luck, &mut self.rng);

        if drops.gold > 0 {
            self.character.gold += drops.gold as u64;
            self.counters.gold_collected += drops.gold as u64;
            events.push(CombatEvent::GoldFound { amount: drops.gold });
        }

        if let Some(item) = drops.item {
            let name = item.name.clone();
            let rarity = item.rarity;
            match self.inventory.add_item(item) {
                Ok(index) => {
                    log::info!("Looted {:?} {}", rarity, name);
                    self.counters.items_found += 1;
                    events.push(CombatEvent::ItemDropped {
                        name,
                        rarity,
                        index,
                    });
                }
                Err((err, _)) => {
                    log::info!("{}, dropped {}", err, name);
                    events.push(CombatEvent::InventoryFull { name });
                }
            }
        }

        if let Some(id) = drops.currency {
            let currency = self.generator.config().currencies.get(&id);
            let name = currency.map_or_else(|| id.clone(), |c| c.name.clone());
            let stack_size = currency.and_then(|c| c.stack_size);
            if self.character.add_currency(&id, stack_size) {
                events.push(CombatEvent::CurrencyFound { id, name });
            } else {
                log::info!("Stack of {} is full, dropped one", name);
                events.push(CombatEvent::CurrencyStackFull { id, name });
            }
        }

        let delay = self.generator.config().settings.combat.enemy_respawn_delay;
        self.combat.schedule_enemy_respawn(delay);
    }

    fn player_defeated(&mut self, events: &mut Vec<CombatEvent>) {
        let combat = &self.generator.config().settings.combat;
        let penalty = self
            .generator
            .config()
            .settings
            .progression
            .death_experience_penalty;
        let revive_delay = combat.player_respawn_delay;

        let lost = self.character.apply_death_penalty(penalty);
        log::info!("{} was defeated, lost {} experience", self.character.name, lost);
        events.push(CombatEvent::PlayerDefeated {
            experience_lost: lost,
        });
        if self.combat.auto_attack {
            self.combat.auto_attack = false;
            events.push(CombatEvent::AutoAttackToggled { enabled: false });
        }

        self.enemy = None;
        self.combat.cancel_enemy_respawn();
        self.combat.schedule_revive(revive_delay);
    }

    fn revive_health(&self) -> u32 {
        let fraction = self.config().settings.combat.respawn_health_fraction;
        let max = self.derived_stats().max_health;
        ((max as f64 * fraction).floor() as u32).clamp(1, max)
    }

    fn revive(&mut self, events: &mut Vec<CombatEvent>) {
        self.character.health = self.revive_health();
        events.push(CombatEvent::PlayerRespawned {
            health: self.character.health,
        });
        self.spawn(events);
    }
}
