use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct DriverTally{
    pub driver_id: i32,
    pub driver_name: Option<String>,
    pub deliveries: i64
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry{
    pub position: usize,
    pub driver_name: Option<String>,
    pub monthly_deliveries: i64,
    pub is_current_user: bool
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ranking{
    pub current_month: String,
    pub entries: Vec<RankingEntry>,
    pub user_position: Option<usize>
}

pub fn month_label(now: DateTime<Utc>) -> String {
    format!("{}-{:02}", now.year(), now.month())
}

// [start, end) of the calendar month containing `now`
pub fn month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    (start, end)
}

// Other drivers stay anonymous, only the caller sees their own name
pub fn build_ranking(mut tallies: Vec<DriverTally>, current_driver: i32, current_month: String) -> Ranking {
    tallies.sort_by(|a, b| b.deliveries.cmp(&a.deliveries).then(a.driver_id.cmp(&b.driver_id)));

    let entries: Vec<RankingEntry> = tallies.into_iter()
        .enumerate()
        .map(|(index, tally)| {
            let is_current_user = tally.driver_id == current_driver;
            RankingEntry{
                position: index + 1,
                driver_name: if is_current_user { tally.driver_name } else { None },
                monthly_deliveries: tally.deliveries,
                is_current_user
            }
        })
        .collect();

    let user_position = entries.iter()
        .find(|e| e.is_current_user)
        .map(|e| e.position);

    Ranking{
        current_month,
        entries,
        user_position
    }
}
