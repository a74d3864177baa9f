pub mod character;
pub mod combat;
pub mod combat_log;
pub mod config;
pub mod currency;
pub mod enemy;
pub mod filter;
pub mod game;
pub mod generator;
pub mod inventory;
pub mod item;
pub mod stats;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use character::Character;
pub use combat::{CombatEvent, DamageRoll};
pub use config::Config;
pub use game::{Game, GameError};
pub use generator::Generator;
pub use inventory::Inventory;
pub use item::Item;
pub use stats::DerivedStats;
pub use storage::SaveGame;
pub use types::*;
