//! Positional HTML extraction for the player profile page.
//!
//! The profile markup exposes no per-field identifiers, only ordered `<li>`
//! lists under semantically named containers. Extraction therefore maps list
//! indexes onto the fixed field orders defined by the `slots()` methods in
//! `models`. The index tables and the skip-the-header conventions below are
//! the authoritative scraping contract; when the site changes its markup the
//! tables are what need updating, not the algorithm.

use scraper::{ElementRef, Html, Selector};

use crate::models::{NationRecord, PlayerProfile, ProfileData, StatValue};

const NICKNAME_SELECTOR: &str = "li.user-profile__data-nick";
const PROFILE_INFO_SELECTOR: &str = "div.user-profile > ul > li";
const AVATAR_SELECTOR: &str = "div.user-profile > div > img";
const CLASS_ROWS_SELECTOR: &str = "div.user-rate__fightType > div > div.user-stat__list-row";
const CLASS_MODE_LIST_SELECTOR: &str = "ul.user-stat__list";

/// Per-mode tab classes, in the same order as `Statistics::mode_mut`.
const MODE_TABS: [&str; 3] = ["arcadeFightTab", "historyFightTab", "simulationFightTab"];

/// "Registration date:" prefix on the last profile info entry.
const REGISTER_DATE_PREFIX_LEN: usize = 18;
/// "Level " prefix on the second-to-last profile info entry.
const PLAYER_LEVEL_PREFIX_LEN: usize = 6;

const CLAN_URL_BASE: &str = "https://warthunder.com";

#[derive(Debug, thiserror::Error)]
enum ExtractError {
    #[error("invalid selector {0:?}")]
    BadSelector(String),

    #[error("document structure mismatch: {0}")]
    Structure(&'static str),

    #[error("more list items than schema fields in {0}")]
    FieldOverflow(&'static str),

    #[error("unparsable number {0:?} in {1}")]
    BadNumber(String, &'static str),
}

/// Maps a rendered profile document onto [`PlayerProfile`].
///
/// `extract` never fails toward the caller: an absent nickname becomes a 404
/// payload, anything unexpected becomes a 500 payload.
#[derive(Debug, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str) -> PlayerProfile {
        match parse_profile(html) {
            Ok(Some(data)) => PlayerProfile::success(data),
            Ok(None) => PlayerProfile::not_found(),
            Err(e) => {
                // Structure drift is an operator problem, not a user problem.
                log::error!("profile extraction failed: {}", e);
                PlayerProfile::internal_error()
            }
        }
    }
}

fn sel(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::BadSelector(css.to_string()))
}

/// Concatenated element text with each text node trimmed.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Drops the first `count` characters (not bytes; nicknames upstream are
/// UTF-8).
fn skip_chars(text: &str, count: usize) -> String {
    text.chars().skip(count).collect()
}

/// Coercion rule shared by every statistics list: comma-stripped digit runs
/// become counts, `N/A` and empty text leave the default in place, anything
/// else is kept verbatim (ratios, play-time durations).
fn apply_stat(slot: &mut StatValue, raw_text: &str) {
    let text = raw_text.replace(',', "");
    if text.is_empty() || text == "N/A" {
        return;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        // all_digits guarantees parse can only fail on overflow
        if let Ok(value) = text.parse::<u64>() {
            *slot = StatValue::Count(value);
            return;
        }
    }
    *slot = StatValue::Text(text);
}

/// Positionally fills `slots` from `values`. The page never legally has more
/// items than the schema; if it does the markup has drifted and the whole
/// extraction is abandoned.
fn fill_slots(
    slots: Vec<&mut StatValue>,
    values: &[String],
    section: &'static str,
) -> Result<(), ExtractError> {
    if values.len() > slots.len() {
        return Err(ExtractError::FieldOverflow(section));
    }
    for (slot, value) in slots.into_iter().zip(values) {
        apply_stat(slot, value);
    }
    Ok(())
}

fn item_texts(parent: ElementRef<'_>, item: &Selector) -> Vec<String> {
    parent.select(item).map(text_of).collect()
}

fn parse_profile(html: &str) -> Result<Option<ProfileData>, ExtractError> {
    let document = Html::parse_document(html);

    // Nickname doubles as the existence check: no match means the site served
    // its "player not found" page (or a challenge page we failed to clear).
    let nickname_sel = sel(NICKNAME_SELECTOR)?;
    let nickname = match document.select(&nickname_sel).next() {
        Some(el) => text_of(el),
        None => return Ok(None),
    };

    let mut data = ProfileData {
        nickname,
        ..ProfileData::default()
    };

    extract_identity(&document, &mut data)?;
    extract_general_statistics(&document, &mut data)?;
    extract_class_statistics(&document, &mut data)?;
    extract_vehicles_and_rewards(&document, &mut data)?;

    Ok(Some(data))
}

/// Register date, level, clan and avatar, all read positionally from the
/// profile info sibling list. The clan entry is assumed present exactly when
/// the list has five entries; there is no dedicated clan selector on the
/// page, so an unrelated extra `<li>` would shift everything (known upstream
/// fragility, kept as-is deliberately).
fn extract_identity(document: &Html, data: &mut ProfileData) -> Result<(), ExtractError> {
    let info_sel = sel(PROFILE_INFO_SELECTOR)?;
    let info: Vec<ElementRef<'_>> = document.select(&info_sel).collect();

    let register_entry = info
        .last()
        .ok_or(ExtractError::Structure("profile info list is empty"))?;
    data.register_date = skip_chars(&text_of(*register_entry), REGISTER_DATE_PREFIX_LEN);

    let level_entry = info
        .len()
        .checked_sub(2)
        .and_then(|i| info.get(i))
        .ok_or(ExtractError::Structure("profile info has no level entry"))?;
    let level_text = skip_chars(&text_of(*level_entry), PLAYER_LEVEL_PREFIX_LEN);
    data.player_level = level_text
        .parse()
        .map_err(|_| ExtractError::BadNumber(level_text.clone(), "player level"))?;

    if info.len() == 5 {
        let clan_entry = info[1];
        data.clan_name = text_of(clan_entry);
        let link_sel = sel("a")?;
        let href = clan_entry
            .select(&link_sel)
            .next()
            .ok_or(ExtractError::Structure("clan entry has no link"))?
            .value()
            .attr("href")
            .unwrap_or("");
        data.clan_url = format!("{}{}", CLAN_URL_BASE, href);
    }

    let avatar_sel = sel(AVATAR_SELECTOR)?;
    let avatar = document
        .select(&avatar_sel)
        .next()
        .ok_or(ExtractError::Structure("avatar image not found"))?;
    data.avatar = avatar.value().attr("src").unwrap_or("").to_string();

    Ok(())
}

/// The nine-field general block of each difficulty tab. Item 0 of each list
/// is the section header; an absent tab leaves that mode at its defaults.
fn extract_general_statistics(document: &Html, data: &mut ProfileData) -> Result<(), ExtractError> {
    for (index, tab) in MODE_TABS.iter().enumerate() {
        let list_sel = sel(&format!(
            "div.community__user-rate.user-rate > div.user-profile__stat.user-stat > div > ul.user-stat__list.{} > li",
            tab
        ))?;
        let items: Vec<String> = document.select(&list_sel).map(text_of).collect();
        let values = items.get(1..).unwrap_or_default();

        let mode = data
            .statistics
            .mode_mut(index)
            .ok_or(ExtractError::Structure("mode index out of range"))?;
        fill_slots(mode.general_slots(), values, "general statistics")?;
    }
    Ok(())
}

/// The aviation/ground/fleet breakdown. The fight-type region holds one row
/// per vehicle class, each row holds a header list followed by one list per
/// difficulty mode, and every list's items map onto that class's field order.
fn extract_class_statistics(document: &Html, data: &mut ProfileData) -> Result<(), ExtractError> {
    let rows_sel = sel(CLASS_ROWS_SELECTOR)?;
    let rows: Vec<ElementRef<'_>> = document.select(&rows_sel).collect();

    let list_sel = sel(CLASS_MODE_LIST_SELECTOR)?;
    let item_sel = sel("li")?;

    for (class_index, section) in ["aviation", "ground", "fleet"].iter().enumerate() {
        let row = rows
            .get(class_index)
            .ok_or(ExtractError::Structure("vehicle class row missing"))?;

        // Skip the first list: it holds the row's field captions.
        for (mode_index, mode_list) in row.select(&list_sel).skip(1).enumerate() {
            let values = item_texts(mode_list, &item_sel);
            let mode = data
                .statistics
                .mode_mut(mode_index)
                .ok_or(ExtractError::Structure("extra mode list in class row"))?;
            let slots = match class_index {
                0 => mode.aviation.slots(),
                1 => mode.ground.slots(),
                _ => mode.fleet.slots(),
            };
            fill_slots(slots, &values, section)?;
        }
    }
    Ok(())
}

/// Owned vehicles, elite vehicles and medals per nation. The score block's
/// 2nd/3rd/4th `<ul>` children are the three columns; item 0 of each is the
/// column header, items 1..=10 follow the fixed nation order.
fn extract_vehicles_and_rewards(
    document: &Html,
    data: &mut ProfileData,
) -> Result<(), ExtractError> {
    let columns: [(usize, fn(&mut NationRecord) -> &mut u64, &'static str); 3] = [
        (2, |r| &mut r.owned_vehicles, "owned vehicles"),
        (3, |r| &mut r.elite_vehicles, "elite vehicles"),
        (4, |r| &mut r.medals, "medals"),
    ];

    for (child_index, field, section) in columns {
        let list_sel = sel(&format!(
            "div.user-profile__score.user-score > ul:nth-child({}) > li",
            child_index
        ))?;
        let items: Vec<String> = document.select(&list_sel).map(text_of).collect();

        let mut nations = data.vehicles_and_rewards.nations_mut();
        for (offset, text) in items.iter().skip(1).enumerate() {
            let record = nations
                .get_mut(offset)
                .ok_or(ExtractError::FieldOverflow(section))?;
            let digits = text.replace(',', "");
            let value = digits
                .parse::<u64>()
                .map_err(|_| ExtractError::BadNumber(text.clone(), section))?;
            *field(record) = value;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_stat_parses_separated_number() {
        let mut slot = StatValue::zero();
        apply_stat(&mut slot, "1,234");
        assert_eq!(slot, StatValue::Count(1234));
    }

    #[test]
    fn apply_stat_keeps_default_for_sentinel_and_empty() {
        let mut slot = StatValue::Text("0m".into());
        apply_stat(&mut slot, "N/A");
        assert_eq!(slot, StatValue::Text("0m".into()));
        apply_stat(&mut slot, "");
        assert_eq!(slot, StatValue::Text("0m".into()));
    }

    #[test]
    fn apply_stat_stores_text_verbatim_after_comma_strip() {
        let mut slot = StatValue::zero_percent();
        apply_stat(&mut slot, "61.7%");
        assert_eq!(slot, StatValue::Text("61.7%".into()));

        let mut slot = StatValue::zero_duration();
        apply_stat(&mut slot, "123h 45m");
        assert_eq!(slot, StatValue::Text("123h 45m".into()));
    }

    #[test]
    fn skip_chars_counts_characters_not_bytes() {
        assert_eq!(skip_chars("Level 42", 6), "42");
        assert_eq!(skip_chars("ééé42", 3), "42");
    }

    #[test]
    fn missing_nickname_yields_not_found() {
        let extractor = ProfileExtractor::new();
        let profile = extractor.extract("<html><body><p>nothing here</p></body></html>");
        assert_eq!(profile.code, 404);
        assert!(profile.data.is_none());
    }

    #[test]
    fn nickname_without_surrounding_structure_yields_internal_error() {
        // Nickname present but the rest of the profile body absent: index
        // lookups fail and the whole extraction collapses to a 500.
        let extractor = ProfileExtractor::new();
        let html = "<html><body><ul><li class=\"user-profile__data-nick\">Ace</li></ul></body></html>";
        let profile = extractor.extract(html);
        assert_eq!(profile.code, 500);
        assert!(profile.data.is_none());
    }

    #[test]
    fn overflowing_list_is_rejected() {
        let mut stats = crate::models::ModeStats::default();
        let values: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let result = fill_slots(stats.general_slots(), &values, "general statistics");
        assert!(result.is_err());
    }
}
