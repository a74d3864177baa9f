use serde::{Deserialize, Serialize};

/// Core character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Luck,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Intelligence,
        Attribute::Vitality,
        Attribute::Luck,
    ];

    /// The flat item stat that raises this attribute
    pub fn stat(&self) -> StatType {
        match self {
            Attribute::Strength => StatType::Strength,
            Attribute::Dexterity => StatType::Dexterity,
            Attribute::Intelligence => StatType::Intelligence,
            Attribute::Vitality => StatType::Vitality,
            Attribute::Luck => StatType::Luck,
        }
    }
}

/// Item rarity levels, ordered from worst to best
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Magic, Rarity::Rare, Rarity::Unique];

    pub fn max_prefixes(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Magic => 1,
            Rarity::Rare => 3,
            Rarity::Unique => 0, // Uniques have fixed mods
        }
    }

    pub fn max_suffixes(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Magic => 1,
            Rarity::Rare => 3,
            Rarity::Unique => 0,
        }
    }
}

/// Broad item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Accessory,
}

/// The body location an item is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Boots,
    Gloves,
    Belt,
    Amulet,
    Ring,
}

impl ItemSlot {
    /// Equipment slots an item of this kind may occupy, in preference order
    pub fn equip_slots(&self) -> &'static [EquipSlot] {
        match self {
            ItemSlot::MainHand => &[EquipSlot::MainHand],
            ItemSlot::OffHand => &[EquipSlot::OffHand],
            ItemSlot::Head => &[EquipSlot::Head],
            ItemSlot::Chest => &[EquipSlot::Chest],
            ItemSlot::Legs => &[EquipSlot::Legs],
            ItemSlot::Boots => &[EquipSlot::Boots],
            ItemSlot::Gloves => &[EquipSlot::Gloves],
            ItemSlot::Belt => &[EquipSlot::Belt],
            ItemSlot::Amulet => &[EquipSlot::Amulet],
            ItemSlot::Ring => &[EquipSlot::RingLeft, EquipSlot::RingRight],
        }
    }

    pub fn fits(&self, slot: EquipSlot) -> bool {
        self.equip_slots().contains(&slot)
    }
}

/// A concrete equipment position on the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Boots,
    Gloves,
    Belt,
    Amulet,
    RingLeft,
    RingRight,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 11] = [
        EquipSlot::MainHand,
        EquipSlot::OffHand,
        EquipSlot::Head,
        EquipSlot::Chest,
        EquipSlot::Legs,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Belt,
        EquipSlot::Amulet,
        EquipSlot::RingLeft,
        EquipSlot::RingRight,
    ];
}

/// Affix type: prefix or suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixType {
    Prefix,
    Suffix,
}

impl AffixType {
    pub fn other(&self) -> AffixType {
        match self {
            AffixType::Prefix => AffixType::Suffix,
            AffixType::Suffix => AffixType::Prefix,
        }
    }
}

/// Stat modifier types that implicits, affixes and unique mods can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    // Attributes
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Luck,
    AllAttributes,
    // Offense
    Damage,
    CriticalChance,
    CriticalMultiplier,
    AttackSpeed,
    // Defense and life
    Defense,
    Life,
    // Utility
    ItemRarity,
}

impl StatType {
    /// Whether the value reads as a percentage
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            StatType::CriticalChance
                | StatType::CriticalMultiplier
                | StatType::AttackSpeed
                | StatType::ItemRarity
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatType::Strength => "Strength",
            StatType::Dexterity => "Dexterity",
            StatType::Intelligence => "Intelligence",
            StatType::Vitality => "Vitality",
            StatType::Luck => "Luck",
            StatType::AllAttributes => "All Attributes",
            StatType::Damage => "Damage",
            StatType::CriticalChance => "Critical Chance",
            StatType::CriticalMultiplier => "Critical Multiplier",
            StatType::AttackSpeed => "Attack Speed",
            StatType::Defense => "Defense",
            StatType::Life => "Life",
            StatType::ItemRarity => "Item Rarity",
        }
    }
}

/// Requirements for equipping an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub level: u32,
}

/// A tag used for affix filtering and spawn weighting
pub type Tag = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rings_fit_both_ring_slots() {
        assert!(ItemSlot::Ring.fits(EquipSlot::RingLeft));
        assert!(ItemSlot::Ring.fits(EquipSlot::RingRight));
        assert!(!ItemSlot::Ring.fits(EquipSlot::Amulet));
    }

    #[test]
    fn every_equip_slot_is_reachable() {
        let all_items = [
            ItemSlot::MainHand,
            ItemSlot::OffHand,
            ItemSlot::Head,
            ItemSlot::Chest,
            ItemSlot::Legs,
            ItemSlot::Boots,
            ItemSlot::Gloves,
            ItemSlot::Belt,
            ItemSlot::Amulet,
            ItemSlot::Ring,
        ];
        for slot in EquipSlot::ALL {
            assert!(all_items.iter().any(|i| i.fits(slot)), "{slot:?} unreachable");
        }
    }

    #[test]
    fn rarity_ordering_matches_tiers() {
        assert!(Rarity::Common < Rarity::Magic);
        assert!(Rarity::Magic < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Unique);
        assert_eq!(Rarity::Rare.max_prefixes(), 3);
        assert_eq!(Rarity::Unique.max_suffixes(), 0);
    }
}
