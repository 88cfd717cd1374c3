use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::Serialize;

use super::order_status::OrderStatus;

#[derive(Debug, Clone)]
pub struct OrderSnapshot{
    pub status: String,
    pub total: f64,
    pub created_at: DateTime<Utc>
}

// Window starts used by every dashboard counter
#[derive(Debug, Clone, Copy)]
pub struct StatsWindow{
    pub today_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>
}

impl StatsWindow {
    pub fn at(now: DateTime<Utc>) -> Self {
        let today_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
            .single()
            .unwrap_or(now);
        let month_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(today_start);

        Self{
            today_start,
            week_start: now - Duration::days(7),
            month_start
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats{
    pub today_completed: i64,
    pub week_completed: i64,
    pub month_completed: i64,
    pub total_completed: i64,
    pub total_revenue: f64
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStats{
    pub today_pending: i64,
    pub today_in_progress: i64,
    #[serde(flatten)]
    pub completion: CompletionStats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantStats{
    pub today_pending: i64,
    pub today_prepared: i64,
    #[serde(flatten)]
    pub completion: CompletionStats
}

fn tally_completion(orders: &[OrderSnapshot], window: &StatsWindow) -> CompletionStats {
    let completed = OrderStatus::Completed.as_str();
    orders.iter()
        .filter(|o| o.status == completed)
        .fold(CompletionStats::default(), |mut stats, order| {
            stats.total_completed += 1;
            stats.total_revenue += order.total;
            if order.created_at >= window.week_start { stats.week_completed += 1; }
            if order.created_at >= window.month_start { stats.month_completed += 1; }
            if order.created_at >= window.today_start { stats.today_completed += 1; }
            stats
        })
}

fn count_today(orders: &[OrderSnapshot], window: &StatsWindow, status: OrderStatus) -> i64 {
    orders.iter()
        .filter(|o| o.created_at >= window.today_start && o.status == status.as_str())
        .count() as i64
}

pub fn delivery_stats(orders: &[OrderSnapshot], now: DateTime<Utc>) -> DeliveryStats {
    let window = StatsWindow::at(now);
    DeliveryStats{
        today_pending: count_today(orders, &window, OrderStatus::Confirmed),
        today_in_progress: count_today(orders, &window, OrderStatus::Delivered),
        completion: tally_completion(orders, &window)
    }
}

pub fn restaurant_stats(orders: &[OrderSnapshot], now: DateTime<Utc>) -> RestaurantStats {
    let window = StatsWindow::at(now);
    RestaurantStats{
        today_pending: count_today(orders, &window, OrderStatus::Confirmed),
        today_prepared: count_today(orders, &window, OrderStatus::Prepared),
        completion: tally_completion(orders, &window)
    }
}
