use crate::config::{GameSettings, ProgressionSettings};
use crate::types::Attribute;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("No attribute points available")]
    NoPointsAvailable,
}

/// One value per attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub luck: u32,
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
            Attribute::Vitality => self.vitality,
            Attribute::Luck => self.luck,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut u32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Vitality => &mut self.vitality,
            Attribute::Luck => &mut self.luck,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub level: u32,
    /// Experience into the current level
    pub experience: u64,
    /// Base attributes including allocated points
    pub attributes: Attributes,
    /// Points allocated per attribute
    pub spent: Attributes,
    pub available_points: u32,
    pub health: u32,
    pub gold: u64,
    /// Currency id to count
    #[serde(default)]
    pub currencies: BTreeMap<String, u32>,
}

/// Experience required to go from `level` to `level + 1`
pub fn experience_for_level(level: u32, progression: &ProgressionSettings) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (progression.xp_base * progression.xp_growth.powi(exponent)).floor() as u64
}

impl Character {
    /// A level 1 character at full health
    pub fn new(settings: &GameSettings) -> Self {
        let c = &settings.character;
        let attributes = Attributes {
            strength: c.strength,
            dexterity: c.dexterity,
            intelligence: c.intelligence,
            vitality: c.vitality,
            luck: c.luck,
        };
        let health = settings.stats.base_health + settings.stats.health_per_vitality * c.vitality;

        Character {
            name: c.name.clone(),
            level: 1,
            experience: 0,
            attributes,
            spent: Attributes::default(),
            available_points: 0,
            health,
            gold: 0,
            currencies: BTreeMap::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn experience_to_next(&self, progression: &ProgressionSettings) -> u64 {
        experience_for_level(self.level, progression)
    }

    /// Add experience and level up as many times as it covers. Returns the levels reached.
    pub fn award_experience(&mut self, amount: u64, settings: &GameSettings) -> Vec<u32> {
        self.experience += amount;

        let mut reached = Vec::new();
        loop {
            let needed = self.experience_to_next(&settings.progression);
            // A zero requirement would never terminate
            if needed == 0 || self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            self.available_points += settings.character.points_per_level;
            reached.push(self.level);
            log::info!("{} reached level {}", self.name, self.level);
        }
        reached
    }

    pub fn allocate_point(&mut self, attribute: Attribute) -> Result<(), CharacterError> {
        if self.available_points == 0 {
            return Err(CharacterError::NoPointsAvailable);
        }
        self.available_points -= 1;
        *self.attributes.get_mut(attribute) += 1;
        *self.spent.get_mut(attribute) += 1;
        Ok(())
    }

    /// Lose a fraction of current experience. Returns the amount lost.
    pub fn apply_death_penalty(&mut self, fraction: f64) -> u64 {
        let lost = (self.experience as f64 * fraction.clamp(0.0, 1.0)).floor() as u64;
        self.experience = self.experience.saturating_sub(lost);
        lost
    }

    /// Add one currency to the stash. Returns false when the stack is already at `stack_size`.
    pub fn add_currency(&mut self, id: &str, stack_size: Option<u32>) -> bool {
        let count = self.currencies.entry(id.to_string()).or_insert(0);
        if stack_size.is_some_and(|limit| *count >= limit) {
            return false;
        }
        *count += 1;
        true
    }

    pub fn currency_count(&self, id: &str) -> u32 {
        self.currencies.get(id).copied().unwrap_or(0)
    }

    /// Remove one currency from the stash, false if there was none
    pub fn take_currency(&mut self, id: &str) -> bool {
        match self.currencies.get_mut(id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.currencies.remove(id);
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_character_starts_at_full_health() {
        let character = Character::new(&GameSettings::default());
        assert_eq!(character.level, 1);
        assert_eq!(character.health, 100);
        assert_eq!(character.attributes.luck, 3);
    }

    #[test]
    fn experience_curve() {
        let progression = ProgressionSettings::default();
        assert_eq!(experience_for_level(1, &progression), 100);
        assert_eq!(experience_for_level(2, &progression), 110);
        assert_eq!(experience_for_level(3, &progression), 121);
        assert_eq!(experience_for_level(4, &progression), 133);
    }

    #[test]
    fn large_award_levels_up_repeatedly() {
        let settings = GameSettings::default();
        let mut character = Character::new(&settings);

        let reached = character.award_experience(100 + 110 + 5, &settings);

        assert_eq!(reached, vec![2, 3]);
        assert_eq!(character.level, 3);
        assert_eq!(character.experience, 5);
        assert_eq!(character.available_points, 6);
    }

    #[test]
    fn allocate_requires_points() {
        let settings = GameSettings::default();
        let mut character = Character::new(&settings);
        assert_eq!(
            character.allocate_point(Attribute::Strength),
            Err(CharacterError::NoPointsAvailable)
        );

        character.award_experience(100, &settings);
        character.allocate_point(Attribute::Strength).unwrap();
        assert_eq!(character.attributes.strength, 6);
        assert_eq!(character.spent.strength, 1);
        assert_eq!(character.available_points, 2);
    }

    #[test]
    fn death_penalty_floors() {
        let mut character = Character::new(&GameSettings::default());
        character.experience = 55;
        assert_eq!(character.apply_death_penalty(0.1), 5);
        assert_eq!(character.experience, 50);

        character.experience = 0;
        assert_eq!(character.apply_death_penalty(0.1), 0);
    }

    #[test]
    fn currency_stash_counts() {
        let mut character = Character::new(&GameSettings::default());
        assert!(!character.take_currency("enhancement"));
        assert!(character.add_currency("enhancement", None));
        assert!(character.add_currency("enhancement", None));
        assert_eq!(character.currency_count("enhancement"), 2);
        assert!(character.take_currency("enhancement"));
        assert!(character.take_currency("enhancement"));
        assert_eq!(character.currency_count("enhancement"), 0);
        assert!(character.currencies.is_empty());
    }

    #[test]
    fn currency_stacks_are_capped() {
        let mut character = Character::new(&GameSettings::default());
        for _ in 0..3 {
            assert!(character.add_currency("reforging", Some(3)));
        }
        assert!(!character.add_currency("reforging", Some(3)));
        assert_eq!(character.currency_count("reforging"), 3);

        assert!(character.take_currency("reforging"));
        assert!(character.add_currency("reforging", Some(3)));
    }
}
