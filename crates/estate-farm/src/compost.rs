//! The compost bin: turns organic resource units into stored boosts.
//!
//! Each tick the bin gains `1 + min(resource_units, 10)` progress. At
//! [`COMPOST_THRESHOLD`] it yields one boost, resets, and uses up one
//! resource unit, so a well-stocked bin slows down as it drains.

use estate_types::{ActorState, COMPOST_THRESHOLD, Compost, ResourceKind};

/// Resource units beyond this count add no extra speed.
pub const MAX_RATE_BONUS: u32 = 10;

/// Advance the bin by one tick. Returns `true` when a boost was produced.
pub fn tick(compost: &mut Compost) -> bool {
    let rate = compost.resource_units.min(MAX_RATE_BONUS).saturating_add(1);
    compost.progress = compost.progress.saturating_add(rate);

    if compost.progress < COMPOST_THRESHOLD {
        return false;
    }
    compost.stored_boost = compost.stored_boost.saturating_add(1);
    compost.progress = 0;
    compost.resource_units = compost.resource_units.saturating_sub(1);
    true
}

/// Add `units` of compostable material. Not capped here.
pub const fn add_resources(compost: &mut Compost, units: u32) {
    compost.resource_units = compost.resource_units.saturating_add(units);
}

/// Spend `amount` stored boosts. Returns `false`, changing nothing, if
/// not enough are stored.
pub const fn use_boost(compost: &mut Compost, amount: u32) -> bool {
    match compost.stored_boost.checked_sub(amount) {
        Some(rest) => {
            compost.stored_boost = rest;
            true
        }
        None => false,
    }
}

/// Whether a resource can be fed to the compost bin.
pub const fn is_compostable(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::Wheat
            | ResourceKind::WheatSeeds
            | ResourceKind::Carrot
            | ResourceKind::Potato
            | ResourceKind::Beetroot
            | ResourceKind::BeetrootSeeds
            | ResourceKind::MelonSlice
            | ResourceKind::MelonSeeds
            | ResourceKind::Pumpkin
            | ResourceKind::PumpkinSeeds
            | ResourceKind::NetherWart
            | ResourceKind::Poppy
    )
}

/// Move up to `max` units of `kind` from the crop output buffer into the
/// bin. Returns the units moved; zero for anything not compostable.
pub fn compost_crops(state: &mut ActorState, kind: ResourceKind, max: u32) -> u32 {
    if !is_compostable(kind) {
        return 0;
    }
    let moved = state.crop_output_buffer.take(kind, max);
    add_resources(&mut state.compost, moved);
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bin_takes_a_hundred_ticks() {
        let mut compost = Compost::default();
        for _ in 0..99 {
            assert!(!tick(&mut compost));
        }
        assert!(tick(&mut compost));
        assert_eq!(compost.stored_boost, 1);
        assert_eq!(compost.progress, 0);
    }

    #[test]
    fn resources_speed_up_and_drain() {
        let mut compost = Compost::default();
        add_resources(&mut compost, 20);
        // Rate 11: 10 ticks reach 110.
        for _ in 0..9 {
            assert!(!tick(&mut compost));
        }
        assert!(tick(&mut compost));
        assert_eq!(compost.resource_units, 19);
    }

    #[test]
    fn rate_bonus_is_capped_at_ten() {
        let mut a = Compost::default();
        let mut b = Compost::default();
        add_resources(&mut a, 10);
        add_resources(&mut b, 500);
        tick(&mut a);
        tick(&mut b);
        assert_eq!(a.progress, b.progress);
        assert_eq!(a.progress, 11);
    }

    #[test]
    fn use_boost_requires_stock() {
        let mut compost = Compost {
            stored_boost: 2,
            ..Compost::default()
        };
        assert!(!use_boost(&mut compost, 3));
        assert_eq!(compost.stored_boost, 2);
        assert!(use_boost(&mut compost, 2));
        assert_eq!(compost.stored_boost, 0);
    }

    #[test]
    fn compost_crops_drains_crop_buffer() {
        let mut state = ActorState::default();
        state.crop_output_buffer.add(ResourceKind::Wheat, 12);
        assert_eq!(compost_crops(&mut state, ResourceKind::Wheat, 100), 12);
        assert_eq!(state.compost.resource_units, 12);
        assert!(state.crop_output_buffer.is_empty());
    }

    #[test]
    fn compost_crops_ignores_non_compostables() {
        let mut state = ActorState::default();
        state.crop_output_buffer.add(ResourceKind::IronIngot, 3);
        assert_eq!(compost_crops(&mut state, ResourceKind::IronIngot, 3), 0);
        assert_eq!(state.crop_output_buffer.count_of(ResourceKind::IronIngot), 3);
    }

    #[test]
    fn only_plant_matter_composts() {
        assert!(is_compostable(ResourceKind::Wheat));
        assert!(is_compostable(ResourceKind::Poppy));
        assert!(!is_compostable(ResourceKind::IronIngot));
        assert!(!is_compostable(ResourceKind::BoneMeal));
    }
}
