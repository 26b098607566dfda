//! Attribute allocation on level-up and the shop exchange.

use thiserror::Error;

use crate::content::ShopEntry;
use crate::entity::{Character, Item};
use crate::types::Attribute;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("costs {price} gold but only {available} is available")]
    InsufficientFunds { price: u32, available: u32 },
    #[error("no shop entry at index {0}")]
    UnknownEntry(usize),
}

/// What a successful purchase did to the character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Purchase {
    WeaponUpgraded { bonus: i32 },
    WeaponEquipped { name: String },
    ArmorEquipped { name: String },
    Stocked { name: String },
}

/// Every attribute +1, the chosen one +1 more, then a full heal.
pub fn level_up(character: &mut Character, chosen: Attribute) {
    for attribute in Attribute::ALL {
        *character.attributes.get_mut(attribute) += 1;
    }
    *character.attributes.get_mut(chosen) += 1;
    character.recompute_derived();
    character.current_hp = character.max_hp;
}

pub fn shop_purchase(
    character: &mut Character,
    catalog: &[ShopEntry],
    index: usize,
    upgrade_bonus: i32,
) -> Result<Purchase, ShopError> {
    let entry = catalog.get(index).ok_or(ShopError::UnknownEntry(index))?;
    let price = entry.price();
    if character.currency < price {
        return Err(ShopError::InsufficientFunds { price, available: character.currency });
    }
    character.currency -= price;

    let purchase = match entry {
        ShopEntry::FlatUpgrade { .. } => {
            character.weapon.min_damage += upgrade_bonus;
            character.weapon.max_damage += upgrade_bonus;
            Purchase::WeaponUpgraded { bonus: upgrade_bonus }
        }
        ShopEntry::Item { item: Item::Weapon(weapon) } => {
            character.weapon = weapon.clone();
            Purchase::WeaponEquipped { name: weapon.name.clone() }
        }
        ShopEntry::Item { item: Item::Armor(armor) } => {
            character.armor = armor.clone();
            character.recompute_derived();
            Purchase::ArmorEquipped { name: armor.name.clone() }
        }
        ShopEntry::Item { item } => {
            character.inventory.push(item.clone());
            Purchase::Stocked { name: item.name().to_string() }
        }
    };
    log::debug!("purchase at index {index} for {price}: {purchase:?}");
    Ok(purchase)
}
