use crate::config::{AffixConfig, BaseTypeConfig, Config, DropOverrides, UniqueConfig};
use crate::item::{Item, Modifier};
use crate::types::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LootError {
    #[error("No base type can drop at item level {level}")]
    NoEligibleBase { level: u32 },
    #[error("Unknown unique: {0}")]
    UnknownUnique(String),
    #[error("Unknown base type: {0}")]
    UnknownBaseType(String),
}

/// What an enemy left behind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drops {
    pub gold: u32,
    pub item: Option<Item>,
    /// Currency ID
    pub currency: Option<String>,
}

/// Pick an index by cumulative weight. The roll lands in `[0, total)` and the first
/// entry with `roll < weight` wins, so ties resolve toward earlier entries.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.gen_range(0..total);
    for (index, &weight) in weights.iter().enumerate() {
        let weight = weight as u64;
        if roll < weight {
            return Some(index);
        }
        roll -= weight;
    }
    None
}

/// Loot generator driven entirely by the loaded config
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Generator { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a seeded RNG from a u64 seed
    pub fn make_rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Roll a rarity from the drop table with weights shifted by luck
    pub fn roll_rarity<R: Rng + ?Sized>(&self, luck: u32, rng: &mut R) -> Rarity {
        let weights: Vec<u32> = self
            .config
            .rarities
            .iter()
            .map(|r| r.weight_for_luck(luck))
            .collect();

        match weighted_index(&weights, rng) {
            Some(index) => self.config.rarities[index].rarity,
            None => Rarity::Common,
        }
    }

    /// Item level for a drop from an enemy of the given level
    pub fn item_level_for<R: Rng + ?Sized>(&self, enemy_level: u32, rng: &mut R) -> u32 {
        let variance = self.config.settings.loot.item_level_variance as i64;
        let offset = if variance == 0 {
            0
        } else {
            rng.gen_range(-variance..=variance)
        };
        (enemy_level as i64 + offset).max(1) as u32
    }

    /// Base types whose level requirement allows them to drop at this item level
    pub fn eligible_bases(&self, item_level: u32) -> Vec<&BaseTypeConfig> {
        self.config
            .base_types
            .values()
            .filter(|b| b.requirements.level <= item_level)
            .collect()
    }

    /// Pick a base type weighted by drop weight
    pub fn pick_base<R: Rng + ?Sized>(
        &self,
        item_level: u32,
        rng: &mut R,
    ) -> Result<&BaseTypeConfig, LootError> {
        let bases = self.eligible_bases(item_level);
        let weights: Vec<u32> = bases.iter().map(|b| b.drop_weight).collect();
        weighted_index(&weights, rng)
            .map(|index| bases[index])
            .ok_or(LootError::NoEligibleBase { level: item_level })
    }

    /// Multiplier applied to base numbers: level growth times rarity multiplier
    pub fn scaling_factor(&self, item_level: u32, rarity: Rarity) -> f64 {
        let growth = self.config.settings.loot.level_scaling;
        growth.powi(item_level.saturating_sub(1) as i32) * self.config.rarity_multiplier(rarity)
    }

    /// Recompute damage, defense and implicit from the unscaled base rolls
    pub fn apply_scaling(&self, item: &mut Item) {
        let factor = self.scaling_factor(item.level, item.rarity);
        let scale = |v: i32| (v as f64 * factor).round() as i32;

        if let (Some(dmg), Some((min, max))) = (item.damage.as_mut(), item.base_rolls.damage) {
            dmg.min = scale(min);
            dmg.max = scale(max).max(dmg.min);
        }
        if let Some(defense) = item.base_rolls.defense {
            item.defense = Some(scale(defense));
        }
        // tier_min/tier_max on the implicit stay as the unscaled roll range
        if let (Some(implicit), Some(value)) = (item.implicit.as_mut(), item.base_rolls.implicit) {
            implicit.value = scale(value);
        }
    }

    /// Roll the base numbers of a common item; values are left unscaled
    pub fn roll_base<R: Rng + ?Sized>(
        &self,
        base: &BaseTypeConfig,
        item_level: u32,
        rng: &mut R,
    ) -> Item {
        let mut item = Item::new_common(rng.gen(), base, item_level);

        if let Some(ref implicit_cfg) = base.implicit {
            let (lo, hi) = ordered(implicit_cfg.min, implicit_cfg.max);
            let value = rng.gen_range(lo..=hi);
            item.implicit = Some(Modifier {
                affix_id: "implicit".to_string(),
                name: "Implicit".to_string(),
                stat: implicit_cfg.stat,
                tier: 0,
                value,
                tier_min: lo,
                tier_max: hi,
            });
            item.base_rolls.implicit = Some(value);
        }

        if let Some(range) = base.defense {
            let (lo, hi) = ordered(range.min, range.max);
            item.base_rolls.defense = Some(rng.gen_range(lo..=hi));
        }

        item
    }

    /// Affixes of a type that may still roll on this item
    pub fn get_valid_affixes(&self, item: &Item, affix_type: AffixType) -> Vec<&AffixConfig> {
        let existing = item.affix_ids();
        self.config
            .affixes
            .values()
            .filter(|affix| {
                affix.affix_type == affix_type
                    && (affix.allowed_kinds.is_empty() || affix.allowed_kinds.contains(&item.kind))
                    && Self::has_matching_tag(affix, &item.tags)
                    && !existing.contains(&affix.id)
                    && affix.tiers.iter().any(|t| t.min_ilvl <= item.level)
            })
            .collect()
    }

    fn has_matching_tag(affix: &AffixConfig, item_tags: &[Tag]) -> bool {
        if affix.tags.is_empty() {
            return true;
        }
        affix.tags.iter().any(|tag| item_tags.contains(tag))
    }

    /// Calculate spawn weight for an affix based on tag matching
    fn calculate_weight(&self, affix: &AffixConfig, item_tags: &[Tag], item_level: u32) -> u32 {
        let base_weight: u32 = affix
            .tiers
            .iter()
            .filter(|t| t.min_ilvl <= item_level)
            .map(|t| t.weight)
            .sum();

        let matching_tags = affix
            .tags
            .iter()
            .filter(|tag| item_tags.contains(tag))
            .count();

        let multiplier = 1.0 + matching_tags as f64 * self.config.settings.loot.tag_weight_bonus;
        (base_weight as f64 * multiplier) as u32
    }

    /// Roll a random affix of the given type for an item
    pub fn roll_affix<R: Rng + ?Sized>(
        &self,
        item: &Item,
        affix_type: AffixType,
        rng: &mut R,
    ) -> Option<Modifier> {
        let valid_affixes = self.get_valid_affixes(item, affix_type);
        if valid_affixes.is_empty() {
            return None;
        }

        let weights: Vec<u32> = valid_affixes
            .iter()
            .map(|a| self.calculate_weight(a, &item.tags, item.level))
            .collect();
        let affix = valid_affixes[weighted_index(&weights, rng)?];

        let eligible_tiers: Vec<_> = affix
            .tiers
            .iter()
            .filter(|t| t.min_ilvl <= item.level)
            .collect();
        let tier_weights: Vec<u32> = eligible_tiers.iter().map(|t| t.weight).collect();
        let tier = eligible_tiers[weighted_index(&tier_weights, rng)?];

        let value = rng.gen_range(tier.min..=tier.max);
        log::debug!(
            "Rolled {} T{} ({}) on item level {}",
            affix.id,
            tier.tier,
            value,
            item.level
        );

        Some(Modifier::from_affix(affix, tier, value))
    }

    /// Add one random affix, returns false if no valid affix or slot is available
    pub fn add_random_affix<R: Rng + ?Sized>(&self, item: &mut Item, rng: &mut R) -> bool {
        let can_prefix = item.can_add_prefix();
        let can_suffix = item.can_add_suffix();

        let affix_type = match (can_prefix, can_suffix) {
            (true, true) => {
                if rng.gen_bool(0.5) {
                    AffixType::Prefix
                } else {
                    AffixType::Suffix
                }
            }
            (true, false) => AffixType::Prefix,
            (false, true) => AffixType::Suffix,
            (false, false) => return false,
        };

        // Fall back to the other side when the first pool is exhausted
        let rolled = self
            .roll_affix(item, affix_type, rng)
            .map(|m| (affix_type, m))
            .or_else(|| {
                let other = affix_type.other();
                if item.can_add(other) {
                    self.roll_affix(item, other, rng).map(|m| (other, m))
                } else {
                    None
                }
            });

        match rolled {
            Some((AffixType::Prefix, modifier)) => {
                item.prefixes.push(modifier);
                true
            }
            Some((AffixType::Suffix, modifier)) => {
                item.suffixes.push(modifier);
                true
            }
            None => false,
        }
    }

    /// Add up to `count` affixes, stopping early when the pools run dry
    pub fn add_affixes<R: Rng + ?Sized>(&self, item: &mut Item, count: u32, rng: &mut R) -> u32 {
        let mut added = 0;
        for _ in 0..count {
            if !self.add_random_affix(item, rng) {
                break;
            }
            added += 1;
        }
        added
    }

    /// Number of affixes a fresh item of this rarity rolls
    pub fn affix_count_for<R: Rng + ?Sized>(&self, rarity: Rarity, rng: &mut R) -> u32 {
        let Some(count) = self.config.rarity(rarity).map(|r| r.affixes) else {
            return 0;
        };
        if count.max <= count.min {
            count.min
        } else {
            rng.gen_range(count.min..=count.max)
        }
    }

    /// Refresh the display name after affixes change
    pub fn refresh_name<R: Rng + ?Sized>(&self, item: &mut Item, rng: &mut R) {
        match item.rarity {
            Rarity::Common => item.name = item.base_name.clone(),
            Rarity::Magic => {
                let mut name = String::new();
                if let Some(prefix) = item.prefixes.first() {
                    name.push_str(&prefix.name);
                    name.push(' ');
                }
                name.push_str(&item.base_name);
                if let Some(suffix) = item.suffixes.first() {
                    name.push(' ');
                    name.push_str(&suffix.name);
                }
                item.name = name;
            }
            Rarity::Rare => {
                // Keep an existing rare name; replace common and magic style names
                if item.name.contains(&item.base_name) {
                    item.name = self.generate_rare_name(rng);
                }
            }
            Rarity::Unique => {}
        }
    }

    /// Generate a random rare item name
    pub fn generate_rare_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        const PREFIXES: &[&str] = &[
            "Doom", "Wrath", "Storm", "Dread", "Soul", "Death", "Blood", "Shadow", "Grim", "Hate",
            "Plague", "Blight", "Rune", "Spirit", "Mind", "Skull", "Bone", "Venom", "Foe", "Pain",
        ];

        const SUFFIXES: &[&str] = &[
            "Bane", "Edge", "Fang", "Bite", "Roar", "Song", "Call", "Cry", "Grasp", "Touch",
            "Strike", "Blow", "Mark", "Brand", "Scar", "Ward", "Guard", "Veil", "Shroud", "Mantle",
        ];

        let prefix = PREFIXES[rng.gen_range(0..PREFIXES.len())];
        let suffix = SUFFIXES[rng.gen_range(0..SUFFIXES.len())];

        format!("{} {}", prefix, suffix)
    }

    /// Uniques whose base can drop at this item level
    pub fn eligible_uniques(&self, item_level: u32) -> Vec<&UniqueConfig> {
        self.config
            .uniques
            .values()
            .filter(|u| {
                self.config
                    .base_types
                    .get(&u.base_type)
                    .is_some_and(|b| b.requirements.level <= item_level)
            })
            .collect()
    }

    /// Generate a specific unique item
    pub fn generate_unique<R: Rng + ?Sized>(
        &self,
        unique_id: &str,
        item_level: u32,
        rng: &mut R,
    ) -> Result<Item, LootError> {
        let unique = self
            .config
            .uniques
            .get(unique_id)
            .ok_or_else(|| LootError::UnknownUnique(unique_id.to_string()))?;
        let base = self
            .config
            .base_types
            .get(&unique.base_type)
            .ok_or_else(|| LootError::UnknownBaseType(unique.base_type.clone()))?;

        let mut item = self.roll_base(base, item_level, rng);
        item.rarity = Rarity::Unique;
        item.name = unique.name.clone();
        item.flavor = unique.flavor.clone();

        for mod_cfg in &unique.mods {
            let (lo, hi) = ordered(mod_cfg.min, mod_cfg.max);
            item.unique_mods.push(Modifier {
                affix_id: format!("unique_{}", unique.id),
                name: unique.name.clone(),
                stat: mod_cfg.stat,
                tier: 0,
                value: rng.gen_range(lo..=hi),
                tier_min: lo,
                tier_max: hi,
            });
        }

        self.apply_scaling(&mut item);
        Ok(item)
    }

    /// Generate an item of a fixed rarity at a fixed item level
    pub fn generate_with_rarity<R: Rng + ?Sized>(
        &self,
        item_level: u32,
        rarity: Rarity,
        rng: &mut R,
    ) -> Result<Item, LootError> {
        let rarity = if rarity == Rarity::Unique {
            let uniques = self.eligible_uniques(item_level);
            let weights: Vec<u32> = uniques.iter().map(|u| u.drop_weight).collect();
            if let Some(index) = weighted_index(&weights, rng) {
                return self.generate_unique(&uniques[index].id, item_level, rng);
            }
            log::debug!("No unique can drop at item level {}, downgrading to rare", item_level);
            Rarity::Rare
        } else {
            rarity
        };

        let base = self.pick_base(item_level, rng)?;
        let mut item = self.roll_base(base, item_level, rng);
        item.rarity = rarity;

        let count = self.affix_count_for(rarity, rng);
        self.add_affixes(&mut item, count, rng);
        self.refresh_name(&mut item, rng);
        self.apply_scaling(&mut item);

        Ok(item)
    }

    /// Roll a complete item dropped by an enemy of `enemy_level` for a player with `luck`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        enemy_level: u32,
        luck: u32,
        rng: &mut R,
    ) -> Result<Item, LootError> {
        let item_level = self.item_level_for(enemy_level, rng);
        let rarity = self.roll_rarity(luck, rng);
        self.generate_with_rarity(item_level, rarity, rng)
    }

    /// Pick a currency weighted by drop weight
    pub fn pick_currency<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let currencies: Vec<_> = self.config.currencies.values().collect();
        let weights: Vec<u32> = currencies.iter().map(|c| c.drop_weight).collect();
        weighted_index(&weights, rng).map(|index| currencies[index].id.clone())
    }

    /// Roll gold, item and currency drops for a defeated enemy
    pub fn roll_drops<R: Rng + ?Sized>(
        &self,
        enemy_level: u32,
        overrides: &DropOverrides,
        luck: u32,
        rng: &mut R,
    ) -> Drops {
        let loot = &self.config.settings.loot;
        let mut drops = Drops::default();

        let gold_chance = overrides.gold_chance.unwrap_or(loot.gold_chance);
        if rng.gen_bool(probability(gold_chance)) {
            let level = enemy_level.max(1);
            let (lo, hi) = ordered(
                level * loot.gold_min_per_level,
                level * loot.gold_max_per_level,
            );
            drops.gold = rng.gen_range(lo..=hi);
        }

        let item_chance = overrides.item_chance.unwrap_or(loot.item_chance);
        if rng.gen_bool(probability(item_chance)) {
            match self.generate(enemy_level, luck, rng) {
                Ok(item) => drops.item = Some(item),
                Err(e) => log::warn!("Item drop failed: {}", e),
            }
        }

        let currency_chance = overrides.currency_chance.unwrap_or(loot.currency_chance);
        if rng.gen_bool(probability(currency_chance)) {
            drops.currency = self.pick_currency(rng);
        }

        drops
    }

    /// Get a base type by ID
    pub fn get_base_type(&self, id: &str) -> Option<&BaseTypeConfig> {
        self.config.base_types.get(id)
    }
}

/// Clamp a configured chance into `gen_bool` range; NaN counts as never
fn probability(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    fn generator() -> Generator {
        Generator::new(test_config())
    }

    #[test]
    fn weighted_index_ties_go_to_earlier_entry() {
        struct Fixed(u64);
        impl RngCore for Fixed {
            fn next_u32(&mut self) -> u32 {
                self.0 as u32
            }
            fn next_u64(&mut self) -> u64 {
                self.0
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0)
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }

        // A zero-valued RNG rolls the bottom of the range
        assert_eq!(weighted_index(&[5, 5], &mut Fixed(0)), Some(0));
        assert_eq!(weighted_index(&[0, 5], &mut Fixed(0)), Some(1));
        assert_eq!(weighted_index(&[0, 0], &mut Fixed(0)), None);
        assert_eq!(weighted_index(&[], &mut Fixed(0)), None);
    }

    #[test]
    fn empty_rarity_table_rolls_common() {
        let mut config = test_config();
        config.rarities.clear();
        let generator = Generator::new(config);
        let mut rng = Generator::make_rng(1);
        assert_eq!(generator.roll_rarity(50, &mut rng), Rarity::Common);
    }

    #[test]
    fn luck_shifts_rarity_toward_better_tiers() {
        let generator = generator();
        let count_non_common = |luck: u32| {
            let mut rng = Generator::make_rng(99);
            (0..4000)
                .filter(|_| generator.roll_rarity(luck, &mut rng) != Rarity::Common)
                .count()
        };
        assert!(count_non_common(30) > count_non_common(0));
    }

    #[test]
    fn level_requirement_filters_bases() {
        let generator = generator();
        let low: Vec<&str> = generator.eligible_bases(1).iter().map(|b| b.id.as_str()).collect();
        assert!(!low.contains(&"war_axe"));
        let high: Vec<&str> = generator.eligible_bases(10).iter().map(|b| b.id.as_str()).collect();
        assert!(high.contains(&"war_axe"));
    }

    #[test]
    fn no_base_at_level_is_an_error() {
        let mut config = test_config();
        for base in config.base_types.values_mut() {
            base.requirements.level = 50;
        }
        let generator = Generator::new(config);
        let mut rng = Generator::make_rng(3);
        assert_eq!(
            generator.pick_base(1, &mut rng).unwrap_err(),
            LootError::NoEligibleBase { level: 1 }
        );
    }

    #[test]
    fn magic_and_rare_items_respect_affix_limits() {
        let generator = generator();
        let mut rng = Generator::make_rng(11);
        for _ in 0..200 {
            let magic = generator.generate_with_rarity(5, Rarity::Magic, &mut rng).unwrap();
            assert!(magic.prefixes.len() <= 1 && magic.suffixes.len() <= 1);

            let rare = generator.generate_with_rarity(5, Rarity::Rare, &mut rng).unwrap();
            assert!(rare.affix_count() <= 3);

            let common = generator.generate_with_rarity(5, Rarity::Common, &mut rng).unwrap();
            assert_eq!(common.affix_count(), 0);
        }
    }

    #[test]
    fn affixes_are_drawn_without_replacement() {
        let generator = generator();
        let mut rng = Generator::make_rng(12);
        for _ in 0..300 {
            let item = generator.generate_with_rarity(20, Rarity::Rare, &mut rng).unwrap();
            let mut ids = item.affix_ids();
            let before = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), before, "duplicate affix on {:?}", item.name);
        }
    }

    #[test]
    fn affixes_match_item_tags() {
        let generator = generator();
        let mut rng = Generator::make_rng(13);
        for _ in 0..300 {
            let item = generator.generate_with_rarity(10, Rarity::Rare, &mut rng).unwrap();
            for m in item.prefixes.iter().chain(item.suffixes.iter()) {
                let affix = &generator.config().affixes[&m.affix_id];
                assert!(
                    affix.tags.is_empty() || affix.tags.iter().any(|t| item.tags.contains(t)),
                    "{} rolled on {}",
                    affix.id,
                    item.base_type_id
                );
                assert!(m.value >= m.tier_min && m.value <= m.tier_max);
            }
        }
    }

    #[test]
    fn tiers_respect_item_level() {
        let generator = generator();
        let mut rng = Generator::make_rng(14);
        for _ in 0..300 {
            let item = generator.generate_with_rarity(1, Rarity::Rare, &mut rng).unwrap();
            for m in item.prefixes.iter().chain(item.suffixes.iter()) {
                let affix = &generator.config().affixes[&m.affix_id];
                let tier = affix.tiers.iter().find(|t| t.tier == m.tier).unwrap();
                assert!(tier.min_ilvl <= 1);
            }
        }
    }

    #[test]
    fn exhausted_pool_stops_adding() {
        let mut config = test_config();
        config.affixes.clear();
        let generator = Generator::new(config);
        let mut rng = Generator::make_rng(15);
        let item = generator.generate_with_rarity(5, Rarity::Rare, &mut rng).unwrap();
        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.affix_count(), 0);
    }

    #[test]
    fn scaling_is_monotone_in_level_and_rarity() {
        let generator = generator();
        let base = generator.get_base_type("rusty_sword").unwrap();
        let mut rng = Generator::make_rng(16);
        let template = generator.roll_base(base, 1, &mut rng);

        let scaled = |level: u32, rarity: Rarity| {
            let mut item = template.clone();
            item.level = level;
            item.rarity = rarity;
            generator.apply_scaling(&mut item);
            item.damage.unwrap()
        };

        let mut previous = scaled(1, Rarity::Common);
        for level in 2..30 {
            let current = scaled(level, Rarity::Common);
            assert!(current.min >= previous.min && current.max >= previous.max);
            previous = current;
        }
        for level in [1, 5, 12] {
            let common = scaled(level, Rarity::Common);
            let magic = scaled(level, Rarity::Magic);
            let rare = scaled(level, Rarity::Rare);
            assert!(magic.max >= common.max && rare.max >= magic.max);
        }
    }

    #[test]
    fn scaling_rounds_half_away_from_zero() {
        let generator = generator();
        // 5 * 1.5 = 7.5 rounds up
        let base = generator.get_base_type("rusty_sword").unwrap();
        let mut rng = Generator::make_rng(17);
        let mut item = generator.roll_base(base, 1, &mut rng);
        item.base_rolls.damage = Some((5, 5));
        item.rarity = Rarity::Rare;
        generator.apply_scaling(&mut item);
        assert_eq!(item.damage.as_ref().unwrap().min, 8);
    }

    #[test]
    fn unique_roll_without_eligible_unique_downgrades_to_rare() {
        let mut config = test_config();
        config.uniques.clear();
        let generator = Generator::new(config);
        let mut rng = Generator::make_rng(18);
        let item = generator.generate_with_rarity(3, Rarity::Unique, &mut rng).unwrap();
        assert_eq!(item.rarity, Rarity::Rare);
    }

    #[test]
    fn unique_items_carry_fixed_mods() {
        let generator = generator();
        let mut rng = Generator::make_rng(19);
        let item = generator.generate_unique("wanderlust", 3, &mut rng).unwrap();
        assert_eq!(item.rarity, Rarity::Unique);
        assert_eq!(item.name, "Wanderlust");
        assert!(item.affix_count() == 0 && !item.unique_mods.is_empty());
        assert!(item.stat_total(StatType::Life) >= 10);
        assert_eq!(
            generator.generate_unique("nope", 1, &mut rng).unwrap_err(),
            LootError::UnknownUnique("nope".to_string())
        );
    }

    #[test]
    fn item_level_never_drops_below_one() {
        let generator = generator();
        let mut rng = Generator::make_rng(20);
        for _ in 0..500 {
            let level = generator.item_level_for(1, &mut rng);
            assert!((1..=3).contains(&level));
        }
    }

    #[test]
    fn guaranteed_drops_follow_overrides() {
        let generator = generator();
        let mut rng = Generator::make_rng(21);
        let always = DropOverrides {
            gold_chance: Some(1.0),
            item_chance: Some(1.0),
            currency_chance: Some(1.0),
        };
        let drops = generator.roll_drops(4, &always, 0, &mut rng);
        assert!((8..=20).contains(&drops.gold));
        assert!(drops.item.is_some());
        assert!(drops.currency.is_some());

        let never = DropOverrides {
            gold_chance: Some(0.0),
            item_chance: Some(0.0),
            currency_chance: Some(0.0),
        };
        assert_eq!(generator.roll_drops(4, &never, 0, &mut rng), Drops::default());
    }

    #[test]
    fn malformed_chances_never_drop() {
        let generator = generator();
        let mut rng = Generator::make_rng(22);
        let broken = DropOverrides {
            gold_chance: Some(f64::NAN),
            item_chance: Some(f64::NAN),
            currency_chance: Some(-3.0),
        };
        assert_eq!(generator.roll_drops(4, &broken, 0, &mut rng), Drops::default());
    }

    #[test]
    fn same_seed_same_item() {
        let generator = generator();
        let a = generator.generate(7, 5, &mut Generator::make_rng(42)).unwrap();
        let b = generator.generate(7, 5, &mut Generator::make_rng(42)).unwrap();
        assert_eq!(a, b);
    }
}
