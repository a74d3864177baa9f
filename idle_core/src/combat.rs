use crate::types::Rarity;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Numbers an attacker brings to a single swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub min: i32,
    pub max: i32,
    /// Percent chance, clamped to 0..=100 when rolled
    pub crit_chance: f64,
    /// Percent of base damage on a crit, never below 100
    pub crit_multiplier: u32,
}

/// Result of one damage roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub base: i32,
    pub raw: i32,
    pub critical: bool,
    /// Damage after defense, at least 1
    pub mitigated: u32,
}

pub fn roll_damage<R: Rng + ?Sized>(attacker: &AttackProfile, defense: i32, rng: &mut R) -> DamageRoll {
    let (lo, hi) = if attacker.min <= attacker.max {
        (attacker.min, attacker.max)
    } else {
        (attacker.max, attacker.min)
    };
    let base = rng.gen_range(lo..=hi);

    let chance = attacker.crit_chance.clamp(0.0, 100.0);
    let critical = rng.gen_range(0.0..100.0) < chance;

    let raw = if critical {
        let multiplier = attacker.crit_multiplier.max(100) as f64;
        (base as f64 * multiplier / 100.0).floor() as i32
    } else {
        base
    };

    let mitigated = (raw as i64 - defense as i64).max(1) as u32;

    DamageRoll {
        base,
        raw,
        critical,
        mitigated,
    }
}

/// Lower bound on any swing cooldown
const MIN_COOLDOWN: f64 = 0.05;

/// Cooldowns, the auto-attack flag and pending respawns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    pub auto_attack: bool,
    player_cooldown: f64,
    enemy_cooldown: f64,
    enemy_respawn_in: Option<f64>,
    player_revive_in: Option<f64>,
}

impl Combat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every timer down by `delta` seconds. Attack cooldowns may go negative;
    /// the overshoot is carried into the next cooldown until `settle` drops it.
    pub fn advance(&mut self, delta: f64) {
        let delta = delta.max(0.0);
        self.player_cooldown -= delta;
        self.enemy_cooldown -= delta;
        for timer in [&mut self.enemy_respawn_in, &mut self.player_revive_in]
            .into_iter()
            .flatten()
        {
            *timer = (*timer - delta).max(0.0);
        }
    }

    /// Drop overshoot that no swing used up
    pub fn settle(&mut self) {
        self.player_cooldown = self.player_cooldown.max(0.0);
        self.enemy_cooldown = self.enemy_cooldown.max(0.0);
    }

    pub fn player_ready(&self) -> bool {
        self.player_cooldown <= 0.0
    }

    pub fn player_cooldown_remaining(&self) -> f64 {
        self.player_cooldown.max(0.0)
    }

    pub fn enemy_ready(&self) -> bool {
        self.enemy_cooldown <= 0.0
    }

    /// True when the player's pending swing came due no later than the enemy's
    pub fn player_due_first(&self) -> bool {
        self.player_cooldown <= self.enemy_cooldown
    }

    /// Cooldown after a player swing: `base / attack_speed`, minus any overshoot
    pub fn start_player_cooldown(&mut self, base_cooldown: f64, attack_speed: f64) {
        let cooldown = (base_cooldown / attack_speed.max(0.01)).max(MIN_COOLDOWN);
        self.player_cooldown = self.player_cooldown.min(0.0) + cooldown;
    }

    /// Fresh enemy cooldown, used on spawn
    pub fn start_enemy_cooldown(&mut self, cooldown: f64) {
        self.enemy_cooldown = cooldown.max(0.0);
    }

    /// Cooldown after an enemy swing, minus any overshoot
    pub fn continue_enemy_cooldown(&mut self, cooldown: f64) {
        self.enemy_cooldown = self.enemy_cooldown.min(0.0) + cooldown.max(MIN_COOLDOWN);
    }

    pub fn schedule_enemy_respawn(&mut self, delay: f64) {
        self.enemy_respawn_in = Some(delay.max(0.0));
    }

    pub fn cancel_enemy_respawn(&mut self) {
        self.enemy_respawn_in = None;
    }

    pub fn enemy_respawn_pending(&self) -> bool {
        self.enemy_respawn_in.is_some()
    }

    pub fn schedule_revive(&mut self, delay: f64) {
        self.player_revive_in = Some(delay.max(0.0));
    }

    pub fn revive_pending(&self) -> bool {
        self.player_revive_in.is_some()
    }

    /// Clears and returns true once the enemy respawn timer has elapsed
    pub fn take_due_enemy_respawn(&mut self) -> bool {
        take_due(&mut self.enemy_respawn_in)
    }

    /// Clears and returns true once the revive timer has elapsed
    pub fn take_due_revive(&mut self) -> bool {
        take_due(&mut self.player_revive_in)
    }
}

fn take_due(timer: &mut Option<f64>) -> bool {
    if timer.is_some_and(|t| t <= 0.0) {
        *timer = None;
        true
    } else {
        false
    }
}

/// Everything observable that happens during combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    PlayerHit {
        enemy: String,
        damage: u32,
        critical: bool,
        enemy_health: u32,
    },
    EnemyHit {
        enemy: String,
        damage: u32,
        player_health: u32,
    },
    TooSoon {
        remaining: f64,
    },
    NoTarget,
    EnemySpawned {
        name: String,
        level: u32,
        health: u32,
    },
    EnemyDefeated {
        name: String,
        level: u32,
    },
    ExperienceGained {
        amount: u64,
    },
    LevelUp {
        level: u32,
    },
    GoldFound {
        amount: u32,
    },
    ItemDropped {
        name: String,
        rarity: Rarity,
        index: usize,
    },
    InventoryFull {
        name: String,
    },
    CurrencyFound {
        id: String,
        name: String,
    },
    /// Currency dropped while its stash stack was already full
    CurrencyStackFull {
        id: String,
        name: String,
    },
    PlayerDefeated {
        experience_lost: u64,
    },
    PlayerRespawned {
        health: u32,
    },
    AutoAttackToggled {
        enabled: bool,
    },
}

impl CombatEvent {
    pub fn describe(&self) -> String {
        match self {
            CombatEvent::PlayerHit {
                enemy,
                damage,
                critical,
                enemy_health,
            } => {
                let crit = if *critical { " Critical!" } else { "" };
                format!("You hit {} for {}.{} ({} hp left)", enemy, damage, crit, enemy_health)
            }
            CombatEvent::EnemyHit {
                enemy,
                damage,
                player_health,
            } => format!("{} hits you for {} ({} hp left)", enemy, damage, player_health),
            CombatEvent::TooSoon { remaining } => {
                format!("Not ready yet ({:.1}s)", remaining)
            }
            CombatEvent::NoTarget => "No target, looking for an enemy".to_string(),
            CombatEvent::EnemySpawned {
                name,
                level,
                health,
            } => format!("A level {} {} appears ({} hp)", level, name, health),
            CombatEvent::EnemyDefeated { name, level } => {
                format!("Defeated level {} {}", level, name)
            }
            CombatEvent::ExperienceGained { amount } => format!("Gained {} experience", amount),
            CombatEvent::LevelUp { level } => format!("Level up! Now level {}", level),
            CombatEvent::GoldFound { amount } => format!("Found {} gold", amount),
            CombatEvent::ItemDropped { name, rarity, .. } => {
                format!("Found {:?} item: {}", rarity, name)
            }
            CombatEvent::InventoryFull { name } => {
                format!("Inventory full, {} was left behind", name)
            }
            CombatEvent::CurrencyFound { name, .. } => format!("Found {}", name),
            CombatEvent::CurrencyStackFull { name, .. } => {
                format!("Stack of {} is full, the drop was left behind", name)
            }
            CombatEvent::PlayerDefeated { experience_lost } => {
                format!("You were defeated and lost {} experience", experience_lost)
            }
            CombatEvent::PlayerRespawned { health } => {
                format!("You return to the fight with {} hp", health)
            }
            CombatEvent::AutoAttackToggled { enabled } => {
                format!("Auto attack {}", if *enabled { "on" } else { "off" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn profile(min: i32, max: i32, crit_chance: f64, crit_multiplier: u32) -> AttackProfile {
        AttackProfile {
            min,
            max,
            crit_chance,
            crit_multiplier,
        }
    }

    #[test]
    fn guaranteed_crit_applies_multiplier() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roll = roll_damage(&profile(10, 10, 100.0, 150), 3, &mut rng);
        assert!(roll.critical);
        assert_eq!(roll.raw, 15);
        assert_eq!(roll.mitigated, 12);
    }

    #[test]
    fn crit_multiplier_below_100_is_lifted() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let roll = roll_damage(&profile(7, 7, 500.0, 50), 0, &mut rng);
        assert!(roll.critical);
        assert_eq!(roll.raw, 7);
    }

    #[test]
    fn negative_crit_chance_never_crits() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(!roll_damage(&profile(1, 5, -20.0, 200), 0, &mut rng).critical);
        }
    }

    #[test]
    fn inverted_range_is_normalised() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..200 {
            let roll = roll_damage(&profile(9, 3, 0.0, 150), 0, &mut rng);
            assert!((3..=9).contains(&roll.base));
        }
    }

    #[test]
    fn overwhelming_defense_still_deals_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(roll_damage(&profile(1, 2, 0.0, 150), 1000, &mut rng).mitigated, 1);
    }

    #[test]
    fn timers_fire_once() {
        let mut combat = Combat::new();
        combat.schedule_enemy_respawn(1.5);
        combat.advance(1.0);
        assert!(!combat.take_due_enemy_respawn());
        combat.advance(0.5);
        assert!(combat.take_due_enemy_respawn());
        assert!(!combat.take_due_enemy_respawn());
        assert!(!combat.enemy_respawn_pending());
    }

    #[test]
    fn player_cooldown_scales_with_attack_speed() {
        let mut combat = Combat::new();
        combat.start_player_cooldown(2.0, 2.0);
        assert_eq!(combat.player_cooldown_remaining(), 1.0);
        combat.advance(0.6);
        assert!(!combat.player_ready());
        combat.advance(0.6);
        assert!(combat.player_ready());
        assert_eq!(combat.player_cooldown_remaining(), 0.0);
    }

    #[test]
    fn overshoot_carries_into_next_cooldown() {
        let mut combat = Combat::new();
        combat.start_player_cooldown(2.0, 1.0);
        combat.advance(2.5);
        assert!(combat.player_ready());

        combat.start_player_cooldown(2.0, 1.0);
        assert!((combat.player_cooldown_remaining() - 1.5).abs() < 1e-9);

        combat.advance(3.0);
        combat.settle();
        combat.start_player_cooldown(2.0, 1.0);
        assert_eq!(combat.player_cooldown_remaining(), 2.0);
    }

    #[test]
    fn earlier_due_swing_goes_first() {
        let mut combat = Combat::new();
        combat.start_player_cooldown(1.0, 1.0);
        combat.start_enemy_cooldown(1.5);
        combat.advance(2.0);
        assert!(combat.player_due_first());
        combat.start_player_cooldown(1.0, 1.0);
        assert!(!combat.player_due_first());
        combat.continue_enemy_cooldown(1.5);
        assert!(!combat.enemy_ready());
        assert!(combat.player_due_first());
    }

    proptest! {
        #[test]
        fn mitigated_damage_is_at_least_one(
            min in -50i32..200,
            max in -50i32..200,
            crit in -10.0f64..150.0,
            mult in 0u32..400,
            defense in -50i32..500,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let roll = roll_damage(&profile(min, max, crit, mult), defense, &mut rng);
            prop_assert!(roll.mitigated >= 1);
        }

        #[test]
        fn critical_never_lowers_damage(
            min in 0i32..200,
            spread in 0i32..100,
            mult in 0u32..400,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let roll = roll_damage(&profile(min, min + spread, 100.0, mult), 0, &mut rng);
            prop_assert!(roll.critical);
            prop_assert!(roll.raw >= roll.base);
        }
    }
}
