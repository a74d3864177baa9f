use crate::inventory::Inventory;
use crate::item::Item;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    MinRarity(Rarity),
    /// Item kind is one of these
    Kinds(Vec<ItemKind>),
    /// Item slot is one of these
    Slots(Vec<ItemSlot>),
    MinLevel(u32),
    HasTag(Tag),
}

impl FilterCondition {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            FilterCondition::MinRarity(rarity) => item.rarity >= *rarity,
            FilterCondition::Kinds(kinds) => kinds.contains(&item.kind),
            FilterCondition::Slots(slots) => slots.contains(&item.slot),
            FilterCondition::MinLevel(level) => item.level >= *level,
            FilterCondition::HasTag(tag) => item.tags.contains(tag),
        }
    }
}

/// A named set of conditions; an item passes when every condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub name: String,
    pub active: bool,
    pub conditions: Vec<FilterCondition>,
}

impl ItemFilter {
    pub fn new(name: impl Into<String>, conditions: Vec<FilterCondition>) -> Self {
        ItemFilter {
            name: name.into(),
            active: true,
            conditions,
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|c| c.matches(item))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub filters: Vec<ItemFilter>,
}

impl FilterSet {
    /// Built-in filters, all inactive
    pub fn with_presets() -> Self {
        let mut magic = ItemFilter::new(
            "Magic & Better",
            vec![FilterCondition::MinRarity(Rarity::Magic)],
        );
        magic.active = false;
        let mut weapons = ItemFilter::new(
            "Weapons",
            vec![FilterCondition::Kinds(vec![ItemKind::Weapon])],
        );
        weapons.active = false;

        FilterSet {
            filters: vec![magic, weapons],
        }
    }

    pub fn add(&mut self, filter: ItemFilter) {
        self.filters.push(filter);
    }

    /// Flip a filter on or off by name. Returns the new state, or None if unknown.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let filter = self.filters.iter_mut().find(|f| f.name == name)?;
        filter.active = !filter.active;
        Some(filter.active)
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.filters
            .iter()
            .filter(|f| f.active)
            .all(|f| f.matches(item))
    }

    /// Inventory indices passing every active filter
    pub fn matching_indices(&self, inventory: &Inventory) -> Vec<usize> {
        inventory
            .iter()
            .filter(|(_, item)| self.matches(item))
            .map(|(index, _)| index)
            .collect()
    }
}
