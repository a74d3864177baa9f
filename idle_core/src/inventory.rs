use crate::item::Item;
use crate::types::{EquipSlot, ItemSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Inventory is full")]
    Full,
    #[error("Slot {0} is out of range")]
    InvalidIndex(usize),
    #[error("Slot {0} is empty")]
    EmptySlot(usize),
    #[error("{item:?} item does not fit the {slot:?} slot")]
    WrongSlot { item: ItemSlot, slot: EquipSlot },
    #[error("Requires level {required}, character is level {level}")]
    LevelTooLow { required: u32, level: u32 },
    #[error("Nothing equipped in {0:?}")]
    NothingEquipped(EquipSlot),
}

/// Items currently worn, one per equipment slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.values()
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.get(EquipSlot::MainHand)
    }

    fn insert(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    fn remove(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }
}

/// Fixed-size bag plus the equipped items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<Item>>,
    pub equipment: Equipment,
}

impl Inventory {
    pub fn new(size: usize) -> Self {
        Inventory {
            slots: vec![None; size],
            equipment: Equipment::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Item, InventoryError> {
        self.slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidIndex(index))?
            .as_mut()
            .ok_or(InventoryError::EmptySlot(index))
    }

    /// Occupied slots with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|item| (i, item)))
    }

    fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    /// Put an item into the first empty slot. A full bag hands the item back
    /// alongside `InventoryError::Full`.
    pub fn add_item(&mut self, item: Item) -> Result<usize, (InventoryError, Item)> {
        match self.first_empty() {
            Some(index) => {
                self.slots[index] = Some(item);
                Ok(index)
            }
            None => Err((InventoryError::Full, item)),
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, InventoryError> {
        self.slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidIndex(index))?
            .take()
            .ok_or(InventoryError::EmptySlot(index))
    }

    /// Swap two slots; the destination may be empty
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), InventoryError> {
        let len = self.slots.len();
        if from >= len {
            return Err(InventoryError::InvalidIndex(from));
        }
        if to >= len {
            return Err(InventoryError::InvalidIndex(to));
        }
        if self.slots[from].is_none() {
            return Err(InventoryError::EmptySlot(from));
        }
        self.slots.swap(from, to);
        Ok(())
    }

    /// Equip into the first empty compatible slot, or replace the first compatible one
    pub fn equip(&mut self, index: usize, character_level: u32) -> Result<EquipSlot, InventoryError> {
        let item = self.get(index).ok_or_else(|| self.index_error(index))?;
        let candidates = item.slot.equip_slots();
        let target = candidates
            .iter()
            .copied()
            .find(|slot| self.equipment.is_empty(*slot))
            .unwrap_or(candidates[0]);

        self.equip_to(index, target, character_level)?;
        Ok(target)
    }

    /// Equip into a specific slot. A displaced item takes the freed bag slot.
    pub fn equip_to(
        &mut self,
        index: usize,
        slot: EquipSlot,
        character_level: u32,
    ) -> Result<(), InventoryError> {
        let item = self.get(index).ok_or_else(|| self.index_error(index))?;
        if !item.slot.fits(slot) {
            return Err(InventoryError::WrongSlot {
                item: item.slot,
                slot,
            });
        }
        if item.requirements.level > character_level {
            return Err(InventoryError::LevelTooLow {
                required: item.requirements.level,
                level: character_level,
            });
        }

        let item = self.remove_item(index)?;
        log::debug!("Equipped {} in {:?}", item.name, slot);
        self.slots[index] = self.equipment.insert(slot, item);
        Ok(())
    }

    /// Move an equipped item back to the bag. Returns the bag index it landed in.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<usize, InventoryError> {
        if self.equipment.is_empty(slot) {
            return Err(InventoryError::NothingEquipped(slot));
        }
        let index = self.first_empty().ok_or(InventoryError::Full)?;
        self.slots[index] = self.equipment.remove(slot);
        Ok(index)
    }

    fn index_error(&self, index: usize) -> InventoryError {
        if index >= self.slots.len() {
            InventoryError::InvalidIndex(index)
        } else {
            InventoryError::EmptySlot(index)
        }
    }
}
