//! Number and date formatting shared by the comparison table and the detail pages.

use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

pub fn rounded(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Two-decimal rendering without trailing zeros (`3.10` -> `3.1`, `4.00` -> `4`).
pub fn format_number(value: f64) -> String {
    let value = rounded(value, 2);
    // Avoid printing "-0".
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// `min - max`, or a single value when both round to the same number.
pub fn range_string(min: f64, max: f64) -> String {
    let (min, max) = (rounded(min, 2), rounded(max, 2));
    if min == max {
        format_number(min)
    } else {
        format!("{} - {}", format_number(min), format_number(max))
    }
}

pub fn billions_range(min: f64, max: f64) -> String {
    range_string(min / BILLION, max / BILLION)
}

pub fn millions_range(min: f64, max: f64) -> String {
    range_string(min / MILLION, max / MILLION)
}

pub fn to_billions(value: f64) -> f64 {
    rounded(value / BILLION, 2)
}

/// en-US style grouping: `1200000` -> `1,200,000`, fractions kept up to three digits.
pub fn with_commas(value: f64) -> String {
    let negative = value < 0.0;
    let value = rounded(value.abs(), 3);
    let whole = value.trunc() as u64;
    let fraction = format!("{:.3}", value.fract());
    let fraction = fraction
        .trim_start_matches('0')
        .trim_end_matches('0')
        .trim_end_matches('.');

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && (whole > 0 || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{fraction}")
}

pub fn coordinate_string(lat: f64, lng: f64) -> String {
    format!("{}, {}", rounded(lat, 6), rounded(lng, 6))
}

pub fn map_url(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/place/@{lat},{lng},19z")
}

pub fn month_year_caption(date: Date) -> String {
    format!("Month {} - {}", u8::from(date.month()), date.year())
}

pub fn current_month_year() -> String {
    month_year_caption(OffsetDateTime::now_utc().date())
}

/// Renders an RFC 3339 timestamp or a bare `YYYY-MM-DD` date as `dd/mm/yyyy`.
/// Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = OffsetDateTime::parse(raw, &Rfc3339)
        .map(|dt| dt.date())
        .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")));

    match date {
        Ok(date) => date
            .format(format_description!("[day]/[month]/[year]"))
            .unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn ranges_collapse_when_equal() {
        assert_eq!(range_string(3.0, 3.0), "3");
        assert_eq!(range_string(3.1, 3.8), "3.1 - 3.8");
        assert_eq!(range_string(3.001, 3.004), "3");
    }

    #[test]
    fn price_ranges_scale_to_billions_and_millions() {
        assert_eq!(billions_range(3_100_000_000.0, 3_800_000_000.0), "3.1 - 3.8");
        assert_eq!(millions_range(45_500_000.0, 45_500_000.0), "45.5");
        assert_eq!(to_billions(12_345_678_901.0), 12.35);
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(with_commas(0.0), "0");
        assert_eq!(with_commas(999.0), "999");
        assert_eq!(with_commas(1_000.0), "1,000");
        assert_eq!(with_commas(1_200_000.0), "1,200,000");
        assert_eq!(with_commas(1234.5), "1,234.5");
        assert_eq!(with_commas(-45_000.0), "-45,000");
    }

    #[test]
    fn coordinates_and_links() {
        assert_eq!(coordinate_string(10.1234567, 106.7654321), "10.123457, 106.765432");
        assert_eq!(
            map_url(10.5, 106.25),
            "https://www.google.com/maps/place/@10.5,106.25,19z"
        );
    }

    #[test]
    fn dates_render_day_first() {
        assert_eq!(format_date("2025-06-30T00:00:00Z"), "30/06/2025");
        assert_eq!(format_date("2026-01-15"), "15/01/2026");
        assert_eq!(format_date("Q4 2026"), "Q4 2026");
        assert_eq!(month_year_caption(date!(2026 - 10 - 17)), "Month 10 - 2026");
    }
}
