//! Utility functions for randomly generating sales tables

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;

use crate::error::Result;
use crate::frame::{Column, SalesFrame};

/// Generate `n_days` of daily sales records starting at `start`
///
/// The table has the columns `date,price,promotion,sales`, all stored as text exactly like a
/// freshly read CSV file. Sales follow a simple demand model: a base level, a weekend uplift, a
/// yearly seasonal swing, a negative price elasticity and a promotion uplift, plus uniform noise.
/// This gives the calendar features and the price/promotion columns real signal to learn.
pub fn sales(n_days: usize, start: NaiveDate, rng: &mut impl Rng) -> Result<SalesFrame> {
    let mut dates = Vec::with_capacity(n_days);
    let mut prices = Vec::with_capacity(n_days);
    let mut promotions = Vec::with_capacity(n_days);
    let mut sales = Vec::with_capacity(n_days);

    for day in 0..n_days {
        let date = start + Duration::days(day as i64);
        let price: f64 = rng.gen_range(15.0..25.0);
        let price = (price * 100.0).round() / 100.0;
        let promotion = rng.gen_bool(0.25);

        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let season = (2.0 * std::f64::consts::PI * date.month0() as f64 / 12.0).sin();

        let demand = 120.0
            + if weekend { 35.0 } else { 0.0 }
            + 15.0 * season
            - 4.0 * (price - 20.0)
            + if promotion { 25.0 } else { 0.0 }
            + rng.gen_range(-8.0..8.0);

        dates.push(date.format("%Y-%m-%d").to_string());
        prices.push(format!("{:.2}", price));
        promotions.push(if promotion { "1" } else { "0" }.to_string());
        sales.push(format!("{:.0}", demand.max(0.0)));
    }

    SalesFrame::from_columns(vec![
        ("date", Column::Text(dates)),
        ("price", Column::Text(prices)),
        ("promotion", Column::Text(promotions)),
        ("sales", Column::Text(sales)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Cell;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn generates_requested_days() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();

        let frame = sales(5, start, &mut rng).unwrap();

        assert_eq!(frame.height(), 5);
        assert_eq!(
            frame.column_names(),
            &["date", "price", "promotion", "sales"]
        );
        assert_eq!(
            frame.column("date").unwrap().get(2),
            Some(Cell::Text("2024-01-01"))
        );
    }

    #[test]
    fn same_seed_same_table() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let a = sales(30, start, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = sales(30, start, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(a, b);
    }
}
