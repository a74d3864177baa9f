use crate::character::{Attributes, Character};
use crate::combat::AttackProfile;
use crate::config::StatSettings;
use crate::inventory::Equipment;
use crate::types::{Attribute, StatType};
use serde::{Deserialize, Serialize};

/// Character numbers after equipment is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub attributes: Attributes,
    pub damage_min: i32,
    pub damage_max: i32,
    /// Percent chance to crit
    pub crit_chance: f64,
    /// Percent of base damage dealt on a crit
    pub crit_multiplier: u32,
    pub defense: i32,
    pub max_health: u32,
    /// Attacks per base cooldown
    pub attack_speed: f64,
    /// Luck used for rarity rolls
    pub loot_luck: u32,
}

impl DerivedStats {
    pub fn calculate(character: &Character, equipment: &Equipment, settings: &StatSettings) -> Self {
        let total = |stat: StatType| -> i32 { equipment.items().map(|i| i.stat_total(stat)).sum() };
        let add = |base: u32, bonus: i32| (base as i64 + bonus as i64).max(0) as u32;

        let mut attributes = character.attributes;
        for attribute in Attribute::ALL {
            let value = add(character.attributes.get(attribute), total(attribute.stat()));
            *attributes.get_mut(attribute) = value;
        }
        let strength = attributes.strength as f64;
        let luck = attributes.luck;

        let weapon = equipment.weapon().and_then(|w| w.damage.as_ref());
        let flat_damage = total(StatType::Damage);

        let damage_min = (settings.base_damage_min + strength * settings.damage_min_per_strength)
            .floor() as i32
            + weapon.map_or(0, |w| w.min)
            + flat_damage;
        let damage_max = (settings.base_damage_max + strength * settings.damage_max_per_strength)
            .floor() as i32
            + weapon.map_or(0, |w| w.max)
            + flat_damage;

        let crit_chance = settings.base_crit_chance
            + (luck as f64 * settings.crit_chance_per_luck).floor()
            + weapon.map_or(0.0, |w| w.critical_chance)
            + total(StatType::CriticalChance) as f64;

        let crit_multiplier = add(
            settings.base_crit_multiplier + settings.crit_multiplier_per_luck * luck,
            total(StatType::CriticalMultiplier),
        );

        let armor: i32 = equipment.items().filter_map(|i| i.defense).sum();
        let defense = (armor + total(StatType::Defense)).max(0);

        let max_health = add(
            settings.base_health + settings.health_per_vitality * attributes.vitality,
            total(StatType::Life),
        )
        .max(1);

        let base_speed = weapon.map_or(settings.unarmed_attack_speed, |w| w.attack_speed);
        let attack_speed =
            (base_speed * (1.0 + total(StatType::AttackSpeed) as f64 / 100.0)).max(0.01);

        DerivedStats {
            attributes,
            damage_min: damage_min.max(0),
            damage_max: damage_max.max(damage_min).max(0),
            crit_chance,
            crit_multiplier,
            defense,
            max_health,
            attack_speed,
            loot_luck: add(luck, total(StatType::ItemRarity)),
        }
    }

    pub fn attack_profile(&self) -> AttackProfile {
        AttackProfile {
            min: self.damage_min,
            max: self.damage_max,
            crit_chance: self.crit_chance,
            crit_multiplier: self.crit_multiplier,
        }
    }
}
