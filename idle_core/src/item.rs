use crate::config::{AffixConfig, AffixTierConfig, BaseTypeConfig};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// A fully realized item with all stats computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance id
    pub id: u64,
    /// Reference to the base type ID
    pub base_type_id: String,
    /// Display name (for rares and uniques, the generated or fixed name)
    pub name: String,
    /// Base type display name
    pub base_name: String,
    pub kind: ItemKind,
    pub slot: ItemSlot,
    pub rarity: Rarity,
    /// Item level, drives scaling and affix tiers
    pub level: u32,
    /// Tags inherited from base type
    pub tags: Vec<Tag>,
    /// Requirements to equip
    pub requirements: Requirements,
    /// Implicit modifier (if any), already scaled
    pub implicit: Option<Modifier>,
    /// Rolled prefix modifiers
    pub prefixes: Vec<Modifier>,
    /// Rolled suffix modifiers
    pub suffixes: Vec<Modifier>,
    /// Fixed mods of a unique item
    #[serde(default)]
    pub unique_mods: Vec<Modifier>,
    /// Scaled weapon damage
    pub damage: Option<WeaponDamage>,
    /// Scaled armour defense
    pub defense: Option<i32>,
    /// Unscaled base rolls, kept so rarity changes can rescale the item
    pub base_rolls: BaseRolls,
    #[serde(default)]
    pub flavor: Option<String>,
}

impl Item {
    /// Create a new common item from a base type; numbers are filled in by the generator
    pub fn new_common(id: u64, base: &BaseTypeConfig, level: u32) -> Self {
        let damage = base.damage.as_ref().map(|d| WeaponDamage {
            min: d.min,
            max: d.max,
            attack_speed: d.attack_speed,
            critical_chance: d.critical_chance,
        });

        Item {
            id,
            base_type_id: base.id.clone(),
            name: base.name.clone(),
            base_name: base.name.clone(),
            kind: base.kind,
            slot: base.slot,
            rarity: Rarity::Common,
            level,
            tags: base.tags.clone(),
            requirements: base.requirements.clone(),
            implicit: None,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            unique_mods: Vec::new(),
            damage,
            defense: None,
            base_rolls: BaseRolls {
                damage: base.damage.as_ref().map(|d| (d.min, d.max)),
                defense: None,
                implicit: None,
            },
            flavor: None,
        }
    }

    /// Count total affixes
    pub fn affix_count(&self) -> usize {
        self.prefixes.len() + self.suffixes.len()
    }

    /// Check if item can have more prefixes
    pub fn can_add_prefix(&self) -> bool {
        self.prefixes.len() < self.rarity.max_prefixes()
    }

    /// Check if item can have more suffixes
    pub fn can_add_suffix(&self) -> bool {
        self.suffixes.len() < self.rarity.max_suffixes()
    }

    pub fn can_add(&self, affix_type: AffixType) -> bool {
        match affix_type {
            AffixType::Prefix => self.can_add_prefix(),
            AffixType::Suffix => self.can_add_suffix(),
        }
    }

    /// IDs of the affixes already rolled on the item
    pub fn affix_ids(&self) -> Vec<String> {
        self.prefixes
            .iter()
            .chain(self.suffixes.iter())
            .map(|m| m.affix_id.clone())
            .collect()
    }

    /// Every modifier on the item: implicit, unique mods and affixes
    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.implicit
            .iter()
            .chain(self.unique_mods.iter())
            .chain(self.prefixes.iter())
            .chain(self.suffixes.iter())
    }

    /// Sum of a stat across all modifiers; AllAttributes counts toward each attribute
    pub fn stat_total(&self, stat: StatType) -> i32 {
        let counts_all = matches!(
            stat,
            StatType::Strength
                | StatType::Dexterity
                | StatType::Intelligence
                | StatType::Vitality
                | StatType::Luck
        );

        self.modifiers()
            .filter(|m| m.stat == stat || (counts_all && m.stat == StatType::AllAttributes))
            .map(|m| m.value)
            .sum()
    }

    /// Export item to markdown format
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n", self.name));
        md.push_str(&format!(
            "**{}** ({:?}, item level {})\n\n",
            self.base_name, self.rarity, self.level
        ));

        if let Some(ref dmg) = self.damage {
            md.push_str("### Damage\n");
            md.push_str(&format!("- Physical: {}-{}\n", dmg.min, dmg.max));
            md.push_str(&format!("- Attack Speed: {:.2}\n", dmg.attack_speed));
            if dmg.critical_chance > 0.0 {
                md.push_str(&format!("- Critical Chance: {:.1}%\n", dmg.critical_chance));
            }
            md.push('\n');
        }

        if let Some(defense) = self.defense {
            md.push_str(&format!("### Defense\n- {}\n\n", defense));
        }

        if let Some(ref imp) = self.implicit {
            md.push_str("### Implicit\n");
            md.push_str(&format!("- {}\n\n", imp.display()));
        }

        if !self.unique_mods.is_empty() {
            md.push_str("### Unique\n");
            for m in &self.unique_mods {
                md.push_str(&format!("- {}\n", m.display()));
            }
            md.push('\n');
        }

        if !self.prefixes.is_empty() || !self.suffixes.is_empty() {
            md.push_str("### Modifiers\n");
            for prefix in &self.prefixes {
                md.push_str(&format!("- {} (P{})\n", prefix.display(), prefix.tier));
            }
            for suffix in &self.suffixes {
                md.push_str(&format!("- {} (S{})\n", suffix.display(), suffix.tier));
            }
            md.push('\n');
        }

        if let Some(ref flavor) = self.flavor {
            md.push_str(&format!("> {}\n\n", flavor));
        }

        if self.requirements.level > 0 {
            md.push_str(&format!("*Requires: Level {}*\n", self.requirements.level));
        }

        md
    }
}

/// Unscaled numbers rolled from the base type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseRolls {
    pub damage: Option<(i32, i32)>,
    pub defense: Option<i32>,
    pub implicit: Option<i32>,
}

/// Weapon damage values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDamage {
    pub min: i32,
    pub max: i32,
    pub attack_speed: f64,
    pub critical_chance: f64,
}

/// A rolled modifier instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Reference to the affix ID ("implicit" or "unique_<id>" for non-affix mods)
    pub affix_id: String,
    /// Display name of the affix
    pub name: String,
    pub stat: StatType,
    /// The rolled tier (0 for implicits and unique mods)
    pub tier: u32,
    pub value: i32,
    pub tier_min: i32,
    pub tier_max: i32,
}

impl Modifier {
    /// Create a modifier from an affix config and rolled value
    pub fn from_affix(affix: &AffixConfig, tier: &AffixTierConfig, value: i32) -> Self {
        Modifier {
            affix_id: affix.id.clone(),
            name: affix.name.clone(),
            stat: affix.stat,
            tier: tier.tier,
            value,
            tier_min: tier.min,
            tier_max: tier.max,
        }
    }

    /// Display the modifier as a human-readable string
    pub fn display(&self) -> String {
        if self.stat.is_percent() {
            format!("+{}% {}", self.value, self.stat.label())
        } else {
            format!("+{} {}", self.value, self.stat.label())
        }
    }
}
