use serde::{Deserialize, Serialize};

/// A single statistics entry scraped from the profile page.
///
/// The page mixes plain counters ("1,234"), percentages ("61.7%") and play
/// durations ("123h 45m") inside the same positional lists, so a field holds
/// either a parsed count or the verbatim text. Serializes untagged: counts as
/// JSON numbers, everything else as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    Text(String),
}

impl StatValue {
    pub fn zero() -> Self {
        StatValue::Count(0)
    }

    pub fn zero_percent() -> Self {
        StatValue::Text("0%".to_string())
    }

    pub fn zero_duration() -> Self {
        StatValue::Text("0m".to_string())
    }
}

/// Top-level API response. `data` is present only on success (code 200).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub code: u16,
    pub message: String,
    pub tip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileData>,
}

impl PlayerProfile {
    pub fn success(data: ProfileData) -> Self {
        Self {
            code: 200,
            message: "Success".to_string(),
            tip: "Thanks to Cloudflare, to request the data it may take a long time. Please be patient.".to_string(),
            data: Some(data),
        }
    }

    pub fn not_found() -> Self {
        Self {
            code: 404,
            message: "Player not found".to_string(),
            tip: "The nickname is case sensitive. Please check the nickname and try again."
                .to_string(),
            data: None,
        }
    }

    pub fn internal_error() -> Self {
        Self {
            code: 500,
            message: "Internal Server Error".to_string(),
            tip: "Please try again later.".to_string(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    pub nickname: String,
    pub register_date: String,
    pub player_level: u32,
    pub clan_name: String,
    pub clan_url: String,
    pub avatar: String,
    pub statistics: Statistics,
    pub vehicles_and_rewards: VehiclesAndRewards,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub arcade: ModeStats,
    pub realistic: ModeStats,
    pub simulation: ModeStats,
}

impl Statistics {
    /// Difficulty modes in the page's fixed tab order.
    pub fn mode_mut(&mut self, index: usize) -> Option<&mut ModeStats> {
        match index {
            0 => Some(&mut self.arcade),
            1 => Some(&mut self.realistic),
            2 => Some(&mut self.simulation),
            _ => None,
        }
    }
}

/// General statistics for one difficulty mode plus the three vehicle-class
/// breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeStats {
    pub victories: StatValue,
    pub completed_missions: StatValue,
    pub victories_battles_ratio: StatValue,
    pub deaths: StatValue,
    pub lions_earned: StatValue,
    pub play_time: StatValue,
    pub air_targets_destroyed: StatValue,
    pub ground_targets_destroyed: StatValue,
    pub naval_targets_destroyed: StatValue,
    pub aviation: AviationStats,
    pub ground: GroundStats,
    pub fleet: FleetStats,
}

impl Default for ModeStats {
    fn default() -> Self {
        Self {
            victories: StatValue::zero(),
            completed_missions: StatValue::zero(),
            victories_battles_ratio: StatValue::zero_percent(),
            deaths: StatValue::zero(),
            lions_earned: StatValue::zero(),
            play_time: StatValue::zero_duration(),
            air_targets_destroyed: StatValue::zero(),
            ground_targets_destroyed: StatValue::zero(),
            naval_targets_destroyed: StatValue::zero(),
            aviation: AviationStats::default(),
            ground: GroundStats::default(),
            fleet: FleetStats::default(),
        }
    }
}

impl ModeStats {
    /// The nine general fields in the page's list order. This ordering is the
    /// scraping contract: list item N maps onto slot N-1 (item 0 is a header).
    pub fn general_slots(&mut self) -> Vec<&mut StatValue> {
        vec![
            &mut self.victories,
            &mut self.completed_missions,
            &mut self.victories_battles_ratio,
            &mut self.deaths,
            &mut self.lions_earned,
            &mut self.play_time,
            &mut self.air_targets_destroyed,
            &mut self.ground_targets_destroyed,
            &mut self.naval_targets_destroyed,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AviationStats {
    pub air_battles: StatValue,
    pub air_battles_fighters: StatValue,
    pub air_battles_bombers: StatValue,
    pub air_battles_attackers: StatValue,
    pub time_played_air_battles: StatValue,
    pub time_played_fighter: StatValue,
    pub time_played_bomber: StatValue,
    pub time_played_attackers: StatValue,
    pub total_targets_destroyed: StatValue,
    pub air_targets_destroyed: StatValue,
    pub ground_targets_destroyed: StatValue,
    pub naval_targets_destroyed: StatValue,
}

impl Default for AviationStats {
    fn default() -> Self {
        Self {
            air_battles: StatValue::zero(),
            air_battles_fighters: StatValue::zero(),
            air_battles_bombers: StatValue::zero(),
            air_battles_attackers: StatValue::zero(),
            time_played_air_battles: StatValue::zero_duration(),
            time_played_fighter: StatValue::zero_duration(),
            time_played_bomber: StatValue::zero_duration(),
            time_played_attackers: StatValue::zero_duration(),
            total_targets_destroyed: StatValue::zero(),
            air_targets_destroyed: StatValue::zero(),
            ground_targets_destroyed: StatValue::zero(),
            naval_targets_destroyed: StatValue::zero(),
        }
    }
}

impl AviationStats {
    pub fn slots(&mut self) -> Vec<&mut StatValue> {
        vec![
            &mut self.air_battles,
            &mut self.air_battles_fighters,
            &mut self.air_battles_bombers,
            &mut self.air_battles_attackers,
            &mut self.time_played_air_battles,
            &mut self.time_played_fighter,
            &mut self.time_played_bomber,
            &mut self.time_played_attackers,
            &mut self.total_targets_destroyed,
            &mut self.air_targets_destroyed,
            &mut self.ground_targets_destroyed,
            &mut self.naval_targets_destroyed,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStats {
    pub ground_battles: StatValue,
    pub ground_battles_tanks: StatValue,
    pub ground_battles_spgs: StatValue,
    pub ground_battles_heavy_tanks: StatValue,
    pub ground_battles_spaa: StatValue,
    pub time_played_ground_battles: StatValue,
    pub tank_battle_time: StatValue,
    pub tank_destroyer_battle_time: StatValue,
    pub heavy_tank_battle_time: StatValue,
    pub spaa_battle_time: StatValue,
    pub total_targets_destroyed: StatValue,
    pub air_targets_destroyed: StatValue,
    pub ground_targets_destroyed: StatValue,
    pub naval_targets_destroyed: StatValue,
}

impl Default for GroundStats {
    fn default() -> Self {
        Self {
            ground_battles: StatValue::zero(),
            ground_battles_tanks: StatValue::zero(),
            ground_battles_spgs: StatValue::zero(),
            ground_battles_heavy_tanks: StatValue::zero(),
            ground_battles_spaa: StatValue::zero(),
            time_played_ground_battles: StatValue::zero_duration(),
            tank_battle_time: StatValue::zero_duration(),
            tank_destroyer_battle_time: StatValue::zero_duration(),
            heavy_tank_battle_time: StatValue::zero_duration(),
            spaa_battle_time: StatValue::zero_duration(),
            total_targets_destroyed: StatValue::zero(),
            air_targets_destroyed: StatValue::zero(),
            ground_targets_destroyed: StatValue::zero(),
            naval_targets_destroyed: StatValue::zero(),
        }
    }
}

impl GroundStats {
    pub fn slots(&mut self) -> Vec<&mut StatValue> {
        vec![
            &mut self.ground_battles,
            &mut self.ground_battles_tanks,
            &mut self.ground_battles_spgs,
            &mut self.ground_battles_heavy_tanks,
            &mut self.ground_battles_spaa,
            &mut self.time_played_ground_battles,
            &mut self.tank_battle_time,
            &mut self.tank_destroyer_battle_time,
            &mut self.heavy_tank_battle_time,
            &mut self.spaa_battle_time,
            &mut self.total_targets_destroyed,
            &mut self.air_targets_destroyed,
            &mut self.ground_targets_destroyed,
            &mut self.naval_targets_destroyed,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStats {
    pub naval_battles: StatValue,
    pub ship_battles: StatValue,
    pub motor_torpedo_boat_battles: StatValue,
    pub motor_gun_boat_battles: StatValue,
    pub motor_torpedo_gun_boat_battles: StatValue,
    pub sub_chaser_battles: StatValue,
    pub destroyer_battles: StatValue,
    pub naval_ferry_barge_battles: StatValue,
    pub time_played_naval: StatValue,
    pub time_played_on_ship: StatValue,
    pub time_played_on_motor_torpedo_boat: StatValue,
    pub time_played_on_motor_gun_boat: StatValue,
    pub time_played_on_motor_torpedo_gun_boat: StatValue,
    pub time_played_on_sub_chaser: StatValue,
    pub time_played_on_destroyer: StatValue,
    pub time_played_on_naval_ferry_barge: StatValue,
    pub total_targets_destroyed: StatValue,
    pub air_targets_destroyed: StatValue,
    pub ground_targets_destroyed: StatValue,
    pub naval_targets_destroyed: StatValue,
}

impl Default for FleetStats {
    fn default() -> Self {
        Self {
            naval_battles: StatValue::zero(),
            ship_battles: StatValue::zero(),
            motor_torpedo_boat_battles: StatValue::zero(),
            motor_gun_boat_battles: StatValue::zero(),
            motor_torpedo_gun_boat_battles: StatValue::zero(),
            sub_chaser_battles: StatValue::zero(),
            destroyer_battles: StatValue::zero(),
            naval_ferry_barge_battles: StatValue::zero(),
            time_played_naval: StatValue::zero_duration(),
            time_played_on_ship: StatValue::zero_duration(),
            time_played_on_motor_torpedo_boat: StatValue::zero_duration(),
            time_played_on_motor_gun_boat: StatValue::zero_duration(),
            time_played_on_motor_torpedo_gun_boat: StatValue::zero_duration(),
            time_played_on_sub_chaser: StatValue::zero_duration(),
            time_played_on_destroyer: StatValue::zero_duration(),
            time_played_on_naval_ferry_barge: StatValue::zero_duration(),
            total_targets_destroyed: StatValue::zero(),
            air_targets_destroyed: StatValue::zero(),
            ground_targets_destroyed: StatValue::zero(),
            naval_targets_destroyed: StatValue::zero(),
        }
    }
}

impl FleetStats {
    pub fn slots(&mut self) -> Vec<&mut StatValue> {
        vec![
            &mut self.naval_battles,
            &mut self.ship_battles,
            &mut self.motor_torpedo_boat_battles,
            &mut self.motor_gun_boat_battles,
            &mut self.motor_torpedo_gun_boat_battles,
            &mut self.sub_chaser_battles,
            &mut self.destroyer_battles,
            &mut self.naval_ferry_barge_battles,
            &mut self.time_played_naval,
            &mut self.time_played_on_ship,
            &mut self.time_played_on_motor_torpedo_boat,
            &mut self.time_played_on_motor_gun_boat,
            &mut self.time_played_on_motor_torpedo_gun_boat,
            &mut self.time_played_on_sub_chaser,
            &mut self.time_played_on_destroyer,
            &mut self.time_played_on_naval_ferry_barge,
            &mut self.total_targets_destroyed,
            &mut self.air_targets_destroyed,
            &mut self.ground_targets_destroyed,
            &mut self.naval_targets_destroyed,
        ]
    }
}

/// Per-nation vehicle and medal counters. JSON keys are the nation codes the
/// page (and downstream consumers) use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehiclesAndRewards {
    #[serde(rename = "USA")]
    pub usa: NationRecord,
    #[serde(rename = "USSR")]
    pub ussr: NationRecord,
    #[serde(rename = "GreatBritain")]
    pub great_britain: NationRecord,
    #[serde(rename = "Germany")]
    pub germany: NationRecord,
    #[serde(rename = "Japan")]
    pub japan: NationRecord,
    #[serde(rename = "Italy")]
    pub italy: NationRecord,
    #[serde(rename = "France")]
    pub france: NationRecord,
    #[serde(rename = "China")]
    pub china: NationRecord,
    #[serde(rename = "Sweden")]
    pub sweden: NationRecord,
    #[serde(rename = "Israel")]
    pub israel: NationRecord,
}

impl VehiclesAndRewards {
    /// Nations in the page's fixed column order.
    pub fn nations_mut(&mut self) -> [&mut NationRecord; 10] {
        [
            &mut self.usa,
            &mut self.ussr,
            &mut self.great_britain,
            &mut self.germany,
            &mut self.japan,
            &mut self.italy,
            &mut self.france,
            &mut self.china,
            &mut self.sweden,
            &mut self.israel,
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NationRecord {
    pub owned_vehicles: u64,
    pub elite_vehicles: u64,
    pub medals: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_serializes_without_data() {
        let json = serde_json::to_string(&PlayerProfile::not_found()).unwrap();
        assert_eq!(
            json,
            "{\"code\":404,\"message\":\"Player not found\",\"tip\":\"The nickname is case sensitive. Please check the nickname and try again.\"}"
        );
    }

    #[test]
    fn stat_value_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&StatValue::Count(1234)).unwrap(),
            "1234"
        );
        assert_eq!(
            serde_json::to_string(&StatValue::Text("61.7%".into())).unwrap(),
            "\"61.7%\""
        );
    }

    #[test]
    fn defaults_match_documented_zero_values() {
        let stats = ModeStats::default();
        assert_eq!(stats.victories, StatValue::Count(0));
        assert_eq!(stats.victories_battles_ratio, StatValue::Text("0%".into()));
        assert_eq!(stats.play_time, StatValue::Text("0m".into()));
        assert_eq!(
            stats.fleet.time_played_on_destroyer,
            StatValue::Text("0m".into())
        );

        let data = ProfileData::default();
        assert_eq!(data.clan_name, "");
        assert_eq!(data.player_level, 0);
        assert_eq!(data.vehicles_and_rewards.usa.medals, 0);
    }

    #[test]
    fn slot_counts_match_section_schemas() {
        let mut stats = ModeStats::default();
        assert_eq!(stats.general_slots().len(), 9);
        assert_eq!(stats.aviation.slots().len(), 12);
        assert_eq!(stats.ground.slots().len(), 14);
        assert_eq!(stats.fleet.slots().len(), 20);
    }

    #[test]
    fn nation_json_keys_use_page_codes() {
        let value = serde_json::to_value(VehiclesAndRewards::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 10);
        for code in [
            "USA",
            "USSR",
            "GreatBritain",
            "Germany",
            "Japan",
            "Italy",
            "France",
            "China",
            "Sweden",
            "Israel",
        ] {
            assert!(object.contains_key(code), "missing nation key {code}");
        }
    }
}
