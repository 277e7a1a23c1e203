use crate::de;

/// One (tick, player) observation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickRecord {
    #[serde(deserialize_with = "de::int")]
    pub tick: i64,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub team_clan_name: String,
    #[serde(deserialize_with = "de::text")]
    pub name: String,

    #[serde(rename = "X", default, deserialize_with = "de::number")]
    pub x: f64,
    #[serde(rename = "Y", default, deserialize_with = "de::number")]
    pub y: f64,
    #[serde(rename = "Z", default, deserialize_with = "de::number")]
    pub z: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub pitch: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub yaw: f64,
    #[serde(rename = "velocity_X", default, deserialize_with = "de::number")]
    pub velocity_x: f64,
    #[serde(rename = "velocity_Y", default, deserialize_with = "de::number")]
    pub velocity_y: f64,
    #[serde(rename = "velocity_Z", default, deserialize_with = "de::number")]
    pub velocity_z: f64,

    #[serde(default, deserialize_with = "de::list")]
    pub inventory: Vec<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub health: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub armor_value: f64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub active_weapon_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub active_weapon_ammo: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub total_ammo_left: Option<f64>,

    #[serde(default, deserialize_with = "de::flag")]
    pub is_alive: bool,
    #[serde(default, deserialize_with = "de::opt_flag")]
    pub in_crouch: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_flag")]
    pub ducking: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_flag")]
    pub in_duck_jump: Option<bool>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_walking: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub spotted: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_scoped: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_defusing: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_in_reload: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub in_bomb_zone: bool,
    #[serde(rename = "FIRE", default, deserialize_with = "de::flag")]
    pub fire: bool,

    #[serde(default, deserialize_with = "de::number")]
    pub zoom_lvl: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub flash_duration: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub flash_max_alpha: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub mvps: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub velo_modifier: f64,

    #[serde(default, deserialize_with = "de::number")]
    pub balance: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub current_equip_value: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub round_start_equip_value: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub total_cash_spent: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub cash_spent_this_round: f64,

    #[serde(default, deserialize_with = "de::number")]
    pub ct_losing_streak: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub t_losing_streak: f64,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_bomb_dropped: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KillRecord {
    #[serde(deserialize_with = "de::int")]
    pub tick: i64,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub attacker_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub victim_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub assister_name: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub headshot: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub assistedflash: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DamageRecord {
    #[serde(deserialize_with = "de::int")]
    pub tick: i64,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub attacker_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub attacker_team_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub victim_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub victim_team_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub weapon: String,
    #[serde(default, deserialize_with = "de::number")]
    pub dmg_health_real: f64,
}

/// Round metadata as exported; the winner is kept raw until it is validated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundRecord {
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(deserialize_with = "de::int")]
    pub freeze_end: i64,
    #[serde(deserialize_with = "de::int")]
    pub end: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub official_end: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BombRecord {
    #[serde(deserialize_with = "de::int")]
    pub tick: i64,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(deserialize_with = "de::text")]
    pub event: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub site: Option<String>,
    #[serde(rename = "X", default, deserialize_with = "de::opt_number")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, deserialize_with = "de::opt_number")]
    pub y: Option<f64>,
    #[serde(rename = "Z", default, deserialize_with = "de::opt_number")]
    pub z: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SmokeRecord {
    #[serde(deserialize_with = "de::int")]
    pub start_tick: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub end_tick: Option<i64>,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(rename = "X", default, deserialize_with = "de::number")]
    pub x: f64,
    #[serde(rename = "Y", default, deserialize_with = "de::number")]
    pub y: f64,
    #[serde(rename = "Z", default, deserialize_with = "de::number")]
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InfernoRecord {
    #[serde(deserialize_with = "de::int")]
    pub start_tick: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub end_tick: Option<i64>,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(rename = "X", default, deserialize_with = "de::number")]
    pub x: f64,
    #[serde(rename = "Y", default, deserialize_with = "de::number")]
    pub y: f64,
    #[serde(rename = "Z", default, deserialize_with = "de::number")]
    pub z: f64,
}

/// One sample of a grenade's trajectory.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrenadeRecord {
    #[serde(deserialize_with = "de::int")]
    pub tick: i64,
    #[serde(deserialize_with = "de::int")]
    pub round: i64,
    #[serde(deserialize_with = "de::text")]
    pub grenade_type: String,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub entity_id: Option<i64>,
    #[serde(rename = "X", default, deserialize_with = "de::opt_number")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, deserialize_with = "de::opt_number")]
    pub y: Option<f64>,
    #[serde(rename = "Z", default, deserialize_with = "de::opt_number")]
    pub z: Option<f64>,
}
