use crate::config::CurrencyConfig;
use crate::generator::Generator;
use crate::item::Item;
use crate::types::*;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Invalid rarity: expected {expected:?}, got {got:?}")]
    InvalidRarity { expected: Vec<Rarity>, got: Rarity },
    #[error("Item has no affixes")]
    NoAffixes,
    #[error("No {0} left in the stash")]
    NoneInStash(String),
}

/// Look up a currency by id and apply it
pub fn apply_currency_by_id<R: Rng + ?Sized>(
    generator: &Generator,
    item: &mut Item,
    currency_id: &str,
    rng: &mut R,
) -> Result<(), CurrencyError> {
    let currency = generator
        .config()
        .currencies
        .get(currency_id)
        .ok_or_else(|| CurrencyError::UnknownCurrency(currency_id.to_string()))?;
    apply_currency(generator, item, currency, rng)
}

/// Apply a currency to an item using the config-driven effects
pub fn apply_currency<R: Rng + ?Sized>(
    generator: &Generator,
    item: &mut Item,
    currency: &CurrencyConfig,
    rng: &mut R,
) -> Result<(), CurrencyError> {
    check_requirements(item, currency)?;

    let effects = &currency.effects;

    // 1. Set rarity, rescaling base stats with the new multiplier
    if let Some(new_rarity) = effects.set_rarity {
        if new_rarity != item.rarity {
            item.rarity = new_rarity;
            generator.apply_scaling(item);
        }
    }

    // 2. Clear affixes
    if effects.clear_affixes {
        item.prefixes.clear();
        item.suffixes.clear();
    }

    // 3. Add random affixes
    if let Some(ref affix_count) = effects.add_affixes {
        let count = if affix_count.min >= affix_count.max {
            affix_count.min
        } else {
            rng.gen_range(affix_count.min..=affix_count.max)
        };
        let added = generator.add_affixes(item, count, rng);
        if added < count {
            log::debug!("{} added {} of {} affixes", currency.id, added, count);
        }
    }

    // 4. Reroll values within their tiers
    if effects.reroll_values {
        for modifier in item.prefixes.iter_mut().chain(item.suffixes.iter_mut()) {
            modifier.value = rng.gen_range(modifier.tier_min..=modifier.tier_max);
        }
    }

    generator.refresh_name(item, rng);
    log::info!("Applied {} to {}", currency.name, item.name);

    Ok(())
}

fn check_requirements(item: &Item, currency: &CurrencyConfig) -> Result<(), CurrencyError> {
    let reqs = &currency.requires;

    if !reqs.rarities.is_empty() && !reqs.rarities.contains(&item.rarity) {
        return Err(CurrencyError::InvalidRarity {
            expected: reqs.rarities.clone(),
            got: item.rarity,
        });
    }

    if reqs.has_affix && item.affix_count() == 0 {
        return Err(CurrencyError::NoAffixes);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    fn common_item(generator: &Generator, seed: u64) -> Item {
        let mut rng = Generator::make_rng(seed);
        generator
            .generate_with_rarity(6, Rarity::Common, &mut rng)
            .unwrap()
    }

    #[test]
    fn enhancement_turns_common_into_magic() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(1);
        let mut item = common_item(&generator, 2);

        apply_currency_by_id(&generator, &mut item, "enhancement", &mut rng).unwrap();

        assert_eq!(item.rarity, Rarity::Magic);
        assert!((1..=2).contains(&item.affix_count()));
        assert!(item.prefixes.len() <= 1 && item.suffixes.len() <= 1);
    }

    #[test]
    fn enhancement_rejects_magic_items() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(3);
        let mut item = common_item(&generator, 4);
        item.rarity = Rarity::Magic;

        let err = apply_currency_by_id(&generator, &mut item, "enhancement", &mut rng).unwrap_err();
        assert_eq!(
            err,
            CurrencyError::InvalidRarity {
                expected: vec![Rarity::Common],
                got: Rarity::Magic
            }
        );
    }

    #[test]
    fn ascension_adds_one_affix_and_renames() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(5);
        let mut item = common_item(&generator, 6);
        apply_currency_by_id(&generator, &mut item, "enhancement", &mut rng).unwrap();
        let before = item.affix_count();

        apply_currency_by_id(&generator, &mut item, "ascension", &mut rng).unwrap();

        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.affix_count(), before + 1);
        assert!(!item.name.contains(&item.base_name));
    }

    #[test]
    fn rarity_change_rescales_base_stats() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(7);
        let base = generator.get_base_type("rusty_sword").unwrap();
        let mut item = generator.roll_base(base, 10, &mut rng);
        generator.apply_scaling(&mut item);
        let common_max = item.damage.as_ref().unwrap().max;

        apply_currency_by_id(&generator, &mut item, "enhancement", &mut rng).unwrap();

        assert!(item.damage.as_ref().unwrap().max > common_max);
    }

    #[test]
    fn reforging_keeps_rare_and_rerolls_affixes() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(8);
        let mut item = generator
            .generate_with_rarity(12, Rarity::Rare, &mut rng)
            .unwrap();
        let name = item.name.clone();

        apply_currency_by_id(&generator, &mut item, "reforging", &mut rng).unwrap();

        assert_eq!(item.rarity, Rarity::Rare);
        assert!((2..=3).contains(&item.affix_count()));
        assert_eq!(item.name, name);
    }

    #[test]
    fn polishing_needs_affixes_and_stays_in_tier() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(9);
        let mut item = common_item(&generator, 10);
        item.rarity = Rarity::Magic;
        assert_eq!(
            apply_currency_by_id(&generator, &mut item, "polishing", &mut rng).unwrap_err(),
            CurrencyError::NoAffixes
        );

        let mut rare = generator
            .generate_with_rarity(12, Rarity::Rare, &mut rng)
            .unwrap();
        let ids = rare.affix_ids();
        for _ in 0..20 {
            apply_currency_by_id(&generator, &mut rare, "polishing", &mut rng).unwrap();
            for m in rare.prefixes.iter().chain(rare.suffixes.iter()) {
                assert!(m.value >= m.tier_min && m.value <= m.tier_max);
            }
        }
        assert_eq!(rare.affix_ids(), ids);
    }

    #[test]
    fn unknown_currency_is_reported() {
        let generator = Generator::new(test_config());
        let mut rng = Generator::make_rng(11);
        let mut item = common_item(&generator, 12);
        assert_eq!(
            apply_currency_by_id(&generator, &mut item, "mirror", &mut rng).unwrap_err(),
            CurrencyError::UnknownCurrency("mirror".to_string())
        );
    }
}
