use crate::combat::CombatEvent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Combat,
    Loot,
    Progress,
    System,
}

impl LogKind {
    pub fn of(event: &CombatEvent) -> Self {
        match event {
            CombatEvent::PlayerHit { .. }
            | CombatEvent::EnemyHit { .. }
            | CombatEvent::EnemySpawned { .. }
            | CombatEvent::EnemyDefeated { .. }
            | CombatEvent::PlayerDefeated { .. } => LogKind::Combat,
            CombatEvent::GoldFound { .. }
            | CombatEvent::ItemDropped { .. }
            | CombatEvent::InventoryFull { .. }
            | CombatEvent::CurrencyFound { .. }
            | CombatEvent::CurrencyStackFull { .. } => LogKind::Loot,
            CombatEvent::ExperienceGained { .. } | CombatEvent::LevelUp { .. } => {
                LogKind::Progress
            }
            CombatEvent::TooSoon { .. }
            | CombatEvent::NoTarget
            | CombatEvent::PlayerRespawned { .. }
            | CombatEvent::AutoAttackToggled { .. } => LogKind::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
    /// Simulated seconds since the session started
    pub time: f64,
}

/// Bounded log, newest entry first
#[derive(Debug, Clone, PartialEq)]
pub struct CombatLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        CombatLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>, time: f64) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(LogEntry {
            kind,
            text: text.into(),
            time,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn record(&mut self, event: &CombatEvent, time: f64) {
        self.push(LogKind::of(event), event.describe(), time);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
