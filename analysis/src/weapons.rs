//! Weapon taxonomy, inventory/active weapon encoding and ammo information.

use crate::error::Result;
use crate::numeric::ratio;
use crate::players::PlayerTick;

/// Items tracked in a player's inventory, in column order.
pub const INVENTORY_WEAPONS: [&str; 42] = [
    // Other
    "C4", "Taser",
    // Pistols
    "USP-S", "P2000", "Glock-18", "Dual Berettas", "P250", "Tec-9", "CZ75 Auto", "Five-SeveN",
    "Desert Eagle", "R8 Revolver",
    // SMGs
    "MAC-10", "MP9", "MP7", "MP5-SD", "UMP-45", "PP-Bizon", "P90",
    // Heavy
    "Nova", "XM1014", "Sawed-Off", "MAG-7", "M249", "Negev",
    // Rifles
    "FAMAS", "Galil AR", "AK-47", "M4A4", "M4A1-S", "SG 553", "AUG", "SSG 08", "AWP", "G3SG1",
    "SCAR-20",
    // Grenades
    "HE Grenade", "Flashbang", "Smoke Grenade", "Incendiary Grenade", "Molotov", "Decoy Grenade",
];

/// Items a player can wield, in column order. Every knife skin is folded into
/// `Knife`.
pub const ACTIVE_WEAPONS: [&str; 43] = [
    // Other
    "C4", "Knife", "Taser",
    // Pistols
    "USP-S", "P2000", "Glock-18", "Dual Berettas", "P250", "Tec-9", "CZ75 Auto", "Five-SeveN",
    "Desert Eagle", "R8 Revolver",
    // SMGs
    "MAC-10", "MP9", "MP7", "MP5-SD", "UMP-45", "PP-Bizon", "P90",
    // Heavy
    "Nova", "XM1014", "Sawed-Off", "MAG-7", "M249", "Negev",
    // Rifles
    "FAMAS", "Galil AR", "AK-47", "M4A4", "M4A1-S", "SG 553", "AUG", "SSG 08", "AWP", "G3SG1",
    "SCAR-20",
    // Grenades
    "HE Grenade", "Flashbang", "Smoke Grenade", "Incendiary Grenade", "Molotov", "Decoy Grenade",
];

pub const KNIFE: &str = "Knife";
pub const C4: &str = "C4";

/// Damage sources counted as utility damage rather than weapon damage.
pub static NADE_DAMAGE_WEAPONS: phf::Set<&'static str> = phf::phf_set! {
    "inferno",
    "molotov",
    "hegrenade",
    "flashbang",
    "smokegrenade",
};

pub fn is_nade_damage(weapon: &str) -> bool {
    NADE_DAMAGE_WEAPONS.contains(weapon)
}

pub fn canonical_weapon_name(raw: Option<&str>) -> String {
    match raw {
        Some(name) if name.to_lowercase().contains("knife") => KNIFE.to_owned(),
        Some(name) => name.to_owned(),
        None => String::new(),
    }
}

pub fn active_weapon_index(name: &str) -> Option<usize> {
    ACTIVE_WEAPONS.iter().position(|w| *w == name)
}

/// Row of the weapon reference table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WeaponInfo {
    pub weapon_name: String,
    #[serde(deserialize_with = "common::de::number")]
    pub magazine_size: f64,
    #[serde(deserialize_with = "common::de::number")]
    pub total_ammo: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponTable {
    weapons: std::collections::HashMap<String, WeaponInfo>,
}

impl WeaponTable {
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = WeaponInfo>,
    {
        let mut weapons = std::collections::HashMap::new();
        for row in rows {
            // First row wins, like a lookup on the raw table would.
            weapons.entry(row.weapon_name.clone()).or_insert(row);
        }
        Self { weapons }
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let rows: Vec<WeaponInfo> = crate::source::read_csv(path)?;
        Ok(Self::new(rows))
    }

    pub fn get(&self, name: &str) -> Option<&WeaponInfo> {
        self.weapons.get(name)
    }

    /// Taxonomy entries the reference table has no row for.
    pub fn missing(&self) -> Vec<&'static str> {
        ACTIVE_WEAPONS
            .iter()
            .copied()
            .filter(|w| !self.weapons.contains_key(*w))
            .collect()
    }
}

/// Encoded weapon state of one player at one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponState {
    /// Bit `i` is set when `INVENTORY_WEAPONS[i]` is held.
    pub inventory: u64,
    /// Bit `i` is set when `ACTIVE_WEAPONS[i]` is wielded.
    pub active: u64,
    pub active_name: String,
    pub magazine_size: f64,
    pub max_ammo: f64,
    pub magazine_ammo_left_pct: f64,
    pub total_ammo_left_pct: f64,
}

impl WeaponState {
    pub fn holds(&self, inventory_idx: usize) -> bool {
        self.inventory & (1 << inventory_idx) != 0
    }

    pub fn wields(&self, active_idx: usize) -> bool {
        self.active & (1 << active_idx) != 0
    }
}

pub fn encode_inventory(items: &[String]) -> u64 {
    INVENTORY_WEAPONS
        .iter()
        .enumerate()
        .filter(|(_, weapon)| items.iter().any(|item| item == *weapon))
        .fold(0, |mask, (idx, _)| mask | (1 << idx))
}

/// Fills the weapon state of every row.
#[tracing::instrument(skip_all)]
pub fn encode(ticks: &mut [PlayerTick], table: &WeaponTable) {
    let missing = table.missing();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Weapons without a reference row, their ammo columns stay 0");
    }

    for tick in ticks.iter_mut() {
        let active_name = canonical_weapon_name(tick.record.active_weapon_name.as_deref());

        let (active, info) = match active_weapon_index(&active_name) {
            Some(idx) => (1 << idx, table.get(&active_name)),
            None => (0, None),
        };
        let magazine_size = info.map(|i| i.magazine_size).unwrap_or(0.0);
        let max_ammo = info.map(|i| i.total_ammo).unwrap_or(0.0);

        tick.weapons = WeaponState {
            inventory: encode_inventory(&tick.record.inventory),
            active,
            magazine_size,
            max_ammo,
            magazine_ammo_left_pct: ratio(
                tick.record.active_weapon_ammo.unwrap_or(0.0),
                magazine_size,
            ),
            total_ammo_left_pct: ratio(tick.record.total_ammo_left.unwrap_or(0.0), max_ammo),
            active_name,
        };
    }
}
