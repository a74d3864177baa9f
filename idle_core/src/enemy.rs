use crate::combat::AttackProfile;
use crate::config::{Config, DropOverrides, EnemyTemplate, ZoneConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A live enemy instance scaled for its zone and level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub template_id: String,
    pub name: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub damage_min: i32,
    pub damage_max: i32,
    /// Seconds between attacks
    pub attack_cooldown: f64,
    pub experience: u64,
    pub zone: usize,
    #[serde(default)]
    pub drops: DropOverrides,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, returns true if this killed the enemy
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Enemies never crit
    pub fn attack_profile(&self) -> AttackProfile {
        AttackProfile {
            min: self.damage_min,
            max: self.damage_max,
            crit_chance: 0.0,
            crit_multiplier: 100,
        }
    }
}

/// Build an enemy from a template at a given level and zone
pub fn scale_enemy(template: &EnemyTemplate, level: u32, zone: usize, config: &Config) -> Enemy {
    let scaling = &config.settings.enemy_scaling;
    let level_f = level as f64;
    let zone_f = zone as f64;

    let health = (template.base_health as f64
        * (1.0 + level_f * scaling.health_per_level + zone_f * scaling.health_per_zone))
        .floor()
        .max(1.0) as u32;

    let experience = (template.base_experience as f64
        * (1.0 + zone_f * scaling.experience_per_zone)
        * (1.0 + (level_f - 1.0) * scaling.experience_per_level))
        .floor()
        .max(1.0) as u64;

    let bonus = (level_f * scaling.damage_per_level).floor() as i32;

    Enemy {
        template_id: template.id.clone(),
        name: template.name.clone(),
        level,
        health,
        max_health: health,
        damage_min: template.damage.min + bonus,
        damage_max: template.damage.max + bonus,
        attack_cooldown: template.attack_cooldown,
        experience,
        zone,
        drops: template.drops.clone(),
    }
}

/// Spawn a random enemy for the zone at the character's level, clamped to the zone band.
/// Returns None only when the config has no enemies at all.
pub fn spawn_enemy<R: Rng + ?Sized>(
    config: &Config,
    zone: &ZoneConfig,
    character_level: u32,
    rng: &mut R,
) -> Option<Enemy> {
    let candidates: Vec<&EnemyTemplate> = zone
        .enemies
        .iter()
        .filter_map(|id| config.enemies.get(id))
        .collect();

    let template = if candidates.is_empty() {
        log::warn!("Zone '{}' has no spawnable enemies, using fallback", zone.name);
        config.fallback_enemy()?
    } else {
        candidates[rng.gen_range(0..candidates.len())]
    };

    let level = character_level.clamp(zone.min_level, zone.max_level.max(zone.min_level));
    let enemy = scale_enemy(template, level, zone.index, config);
    log::info!(
        "Spawned {} (level {}, {} hp) in {}",
        enemy.name,
        enemy.level,
        enemy.health,
        zone.name
    );
    Some(enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollRange;
    use crate::test_support::test_config;
    use crate::Generator;

    fn template() -> EnemyTemplate {
        EnemyTemplate {
            id: "rat".to_string(),
            name: "Rat".to_string(),
            base_health: 20,
            base_experience: 10,
            damage: RollRange { min: 1, max: 3 },
            attack_cooldown: 2.0,
            drops: DropOverrides::default(),
        }
    }

    #[test]
    fn scaling_formulas() {
        let config = Config::default();
        let enemy = scale_enemy(&template(), 2, 2, &config);

        // 20 * (1 + 1.0 + 0.6) = 52
        assert_eq!(enemy.max_health, 52);
        // 10 * 1.4 * 1.1 = 15.4
        assert_eq!(enemy.experience, 15);
        // floor(2 * 0.5) = 1
        assert_eq!((enemy.damage_min, enemy.damage_max), (2, 4));

        let higher = scale_enemy(&template(), 5, 0, &config);
        // floor(2.5) = 2
        assert_eq!((higher.damage_min, higher.damage_max), (3, 5));
    }

    #[test]
    fn zero_base_values_floor_to_one() {
        let mut t = template();
        t.base_health = 0;
        t.base_experience = 0;
        let enemy = scale_enemy(&t, 1, 0, &Config::default());
        assert_eq!(enemy.health, 1);
        assert_eq!(enemy.experience, 1);
    }

    #[test]
    fn take_damage_reports_kill_once() {
        let mut enemy = scale_enemy(&template(), 1, 0, &Config::default());
        assert!(!enemy.take_damage(5));
        assert!(enemy.take_damage(1000));
        assert_eq!(enemy.health, 0);
        assert!(!enemy.take_damage(1));
    }

    #[test]
    fn level_is_clamped_to_zone_band() {
        let config = test_config();
        let mut rng = Generator::make_rng(1);
        let cave = &config.zones[1];

        let low = spawn_enemy(&config, cave, 1, &mut rng).unwrap();
        assert_eq!(low.level, cave.min_level);
        let high = spawn_enemy(&config, cave, 99, &mut rng).unwrap();
        assert_eq!(high.level, cave.max_level);
        assert!(cave.enemies.contains(&high.template_id));
    }

    #[test]
    fn empty_zone_falls_back_to_first_template() {
        let config = test_config();
        let mut rng = Generator::make_rng(2);
        let mut zone = config.zones[0].clone();
        zone.enemies = vec!["missing".to_string()];

        let enemy = spawn_enemy(&config, &zone, 1, &mut rng).unwrap();
        assert_eq!(enemy.template_id, config.enemy_order[0]);
        assert_eq!(enemy.template_id, "rat");

        assert!(spawn_enemy(&Config::default(), &zone, 1, &mut rng).is_none());
    }
}
