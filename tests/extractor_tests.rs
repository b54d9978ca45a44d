//! Extraction tests against saved profile page fixtures.

use warthunder_player_api::extractor::ProfileExtractor;
use warthunder_player_api::models::{PlayerProfile, StatValue};

const FULL_PROFILE: &str = include_str!("fixtures/profile_full.html");
const NO_CLAN_PROFILE: &str = include_str!("fixtures/profile_no_clan.html");

fn count(value: u64) -> StatValue {
    StatValue::Count(value)
}

fn text(value: &str) -> StatValue {
    StatValue::Text(value.to_string())
}

#[test]
fn full_profile_identity() {
    let profile = ProfileExtractor::new().extract(FULL_PROFILE);
    assert_eq!(profile.code, 200);
    assert_eq!(profile.message, "Success");

    let data = profile.data.expect("success profile carries data");
    assert_eq!(data.nickname, "Ace_Pilot");
    assert_eq!(data.register_date, "01.11.2012");
    assert_eq!(data.player_level, 42);
    assert_eq!(data.clan_name, "Falcons");
    assert_eq!(
        data.clan_url,
        "https://warthunder.com/en/community/claninfo/Falcons"
    );
    assert_eq!(data.avatar, "https://static.example.com/avatars/ace_pilot.png");
}

#[test]
fn full_profile_general_statistics() {
    let data = ProfileExtractor::new()
        .extract(FULL_PROFILE)
        .data
        .expect("success profile carries data");

    let arcade = &data.statistics.arcade;
    assert_eq!(arcade.victories, count(1554));
    assert_eq!(arcade.completed_missions, count(3024));
    assert_eq!(arcade.victories_battles_ratio, text("51.4%"));
    assert_eq!(arcade.deaths, count(2811));
    assert_eq!(arcade.lions_earned, count(12450000));
    assert_eq!(arcade.play_time, text("401h 30m"));
    assert_eq!(arcade.air_targets_destroyed, count(1337));
    assert_eq!(arcade.ground_targets_destroyed, count(2450));
    assert_eq!(arcade.naval_targets_destroyed, count(156));

    let realistic = &data.statistics.realistic;
    assert_eq!(realistic.victories, count(820));
    assert_eq!(realistic.play_time, text("350h 12m"));

    // "N/A" keeps the documented default, an explicit "0" is a real count.
    let simulation = &data.statistics.simulation;
    assert_eq!(simulation.victories, count(12));
    assert_eq!(simulation.air_targets_destroyed, count(0));
    assert_eq!(simulation.ground_targets_destroyed, count(15));
    assert_eq!(simulation.naval_targets_destroyed, count(0));
}

#[test]
fn full_profile_vehicle_class_breakdowns() {
    let data = ProfileExtractor::new()
        .extract(FULL_PROFILE)
        .data
        .expect("success profile carries data");

    let aviation = &data.statistics.arcade.aviation;
    assert_eq!(aviation.air_battles, count(950));
    assert_eq!(aviation.air_battles_attackers, count(150));
    assert_eq!(aviation.time_played_air_battles, text("300h 5m"));
    assert_eq!(aviation.time_played_attackers, text("39h 55m"));
    assert_eq!(aviation.total_targets_destroyed, count(1800));
    assert_eq!(aviation.naval_targets_destroyed, count(100));

    let ground = &data.statistics.arcade.ground;
    assert_eq!(ground.ground_battles, count(1400));
    assert_eq!(ground.spaa_battle_time, text("14h 15m"));
    assert_eq!(ground.total_targets_destroyed, count(2600));

    let fleet = &data.statistics.arcade.fleet;
    assert_eq!(fleet.naval_battles, count(300));
    assert_eq!(fleet.naval_ferry_barge_battles, count(5));
    assert_eq!(fleet.time_played_on_naval_ferry_barge, text("3h 30m"));
    assert_eq!(fleet.naval_targets_destroyed, count(350));

    // Realistic aviation is filled, realistic fleet is all "N/A" on the page
    // so every field keeps its default.
    assert_eq!(data.statistics.realistic.aviation.air_battles, count(420));
    assert_eq!(data.statistics.realistic.fleet.naval_battles, count(0));
    assert_eq!(data.statistics.realistic.fleet.time_played_naval, text("0m"));

    // A short simulation list only fills its leading slots.
    assert_eq!(data.statistics.simulation.ground.ground_battles, count(8));
    assert_eq!(data.statistics.simulation.ground.ground_battles_tanks, count(0));
    assert_eq!(data.statistics.simulation.aviation.air_battles, count(15));
}

#[test]
fn full_profile_vehicles_and_rewards() {
    let data = ProfileExtractor::new()
        .extract(FULL_PROFILE)
        .data
        .expect("success profile carries data");

    let rewards = &data.vehicles_and_rewards;
    assert_eq!(rewards.usa.owned_vehicles, 118);
    assert_eq!(rewards.usa.elite_vehicles, 40);
    assert_eq!(rewards.usa.medals, 1200);
    assert_eq!(rewards.germany.owned_vehicles, 130);
    assert_eq!(rewards.germany.medals, 1500);
    assert_eq!(rewards.great_britain.elite_vehicles, 12);
    assert_eq!(rewards.israel.owned_vehicles, 9);
    assert_eq!(rewards.israel.elite_vehicles, 0);
    assert_eq!(rewards.israel.medals, 5);
}

#[test]
fn extraction_is_idempotent() {
    let extractor = ProfileExtractor::new();
    let first = serde_json::to_string(&extractor.extract(FULL_PROFILE)).unwrap();
    let second = serde_json::to_string(&extractor.extract(FULL_PROFILE)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn profile_without_clan_keeps_empty_clan_fields() {
    let profile = ProfileExtractor::new().extract(NO_CLAN_PROFILE);
    assert_eq!(profile.code, 200);

    let data = profile.data.expect("success profile carries data");
    assert_eq!(data.nickname, "LoneWolf");
    assert_eq!(data.clan_name, "");
    assert_eq!(data.clan_url, "");
    assert_eq!(data.player_level, 7);
    assert_eq!(data.register_date, "15.03.2021");

    // Sparse page: one general tab filled, everything else at defaults.
    assert_eq!(data.statistics.arcade.victories, count(21));
    assert_eq!(data.statistics.arcade.naval_targets_destroyed, count(0));
    assert_eq!(data.statistics.realistic.victories, count(0));
    assert_eq!(data.statistics.arcade.aviation.air_battles, count(0));
    assert_eq!(data.vehicles_and_rewards.usa.owned_vehicles, 12);
    assert_eq!(data.vehicles_and_rewards.ussr.owned_vehicles, 5);
    assert_eq!(data.vehicles_and_rewards.usa.medals, 0);
}

#[test]
fn not_found_page_serializes_to_golden_payload() {
    let html = "<html><body><div class=\"error-page\">No such player</div></body></html>";
    let profile = ProfileExtractor::new().extract(html);
    let json = serde_json::to_string(&profile).unwrap();
    assert_eq!(
        json,
        "{\"code\":404,\"message\":\"Player not found\",\"tip\":\"The nickname is case sensitive. Please check the nickname and try again.\"}"
    );

    // Round-trips through the API type untouched.
    let parsed: PlayerProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.code, 404);
    assert!(parsed.data.is_none());
}
