//! Market statistics shown on the dashboard.

use serde::{Deserialize, Serialize};

use super::entities::Project;
use super::format::rounded;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBucket {
    pub price_range: String,
    #[serde(deserialize_with = "count_from_json")]
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaBucket {
    pub area_category: String,
    #[serde(deserialize_with = "count_from_json")]
    pub project_count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DistrictBucket {
    pub district: String,
    #[serde(deserialize_with = "count_from_json")]
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingStatsResponse {
    #[serde(default)]
    pub bike_parking_stats: Vec<BikeParkingBucket>,
    #[serde(default)]
    pub car_parking_stats: Vec<CarParkingBucket>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeParkingBucket {
    pub bike_parking_category: String,
    #[serde(deserialize_with = "count_from_json")]
    pub project_count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarParkingBucket {
    pub car_parking_category: String,
    #[serde(deserialize_with = "count_from_json")]
    pub project_count: u64,
}

/// One parking fee band with bike and car project counts side by side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParkingRow {
    pub price: String,
    pub bike: u64,
    pub car: u64,
}

/// Everything the dashboard renders, fetched together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketStatistics {
    pub prices: Vec<PriceBucket>,
    pub parking: Vec<ParkingRow>,
    pub districts: Vec<DistrictBucket>,
    pub areas: Vec<AreaBucket>,
}

impl MarketStatistics {
    pub fn total_projects(&self) -> u64 {
        self.prices.iter().map(|bucket| bucket.count).sum()
    }

    /// Named districts. The backend closes the list with a catch-all bucket
    /// which is not counted.
    pub fn featured_districts(&self) -> usize {
        self.districts.len().saturating_sub(1)
    }

    pub fn largest_district_count(&self) -> u64 {
        self.districts.iter().map(|d| d.count).max().unwrap_or(0)
    }
}

/// Shortens the backend's fee band labels.
pub fn format_category(category: &str) -> String {
    match category {
        "No Fee" => "0".to_string(),
        "0 - 100,000 VND" => "0 - 100k".to_string(),
        "100,000 - 500,000 VND" => "100k - 500k".to_string(),
        "500,000 - 1 Million VND" => "500k - 1M".to_string(),
        "> 1 Million VND" => "> 1M".to_string(),
        other => other.to_string(),
    }
}

/// Joins bike and car counts over the union of categories, bike categories
/// first. A band missing on one side counts as zero.
pub fn merge_parking(stats: &ParkingStatsResponse) -> Vec<ParkingRow> {
    let mut categories: Vec<&str> = Vec::new();
    let bike = stats.bike_parking_stats.iter().map(|b| b.bike_parking_category.as_str());
    let car = stats.car_parking_stats.iter().map(|c| c.car_parking_category.as_str());
    for category in bike.chain(car) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
        .into_iter()
        .map(|category| ParkingRow {
            price: format_category(category),
            bike: stats
                .bike_parking_stats
                .iter()
                .find(|b| b.bike_parking_category == category)
                .map_or(0, |b| b.project_count),
            car: stats
                .car_parking_stats
                .iter()
                .find(|c| c.car_parking_category == category)
                .map_or(0, |c| c.project_count),
        })
        .collect()
}

/// Mean maximum selling price in billions VND.
pub fn average_price_billions(projects: &[Project]) -> Option<f64> {
    mean(projects, |p| p.max_selling_price).map(|avg| rounded(avg / 1e9, 2))
}

/// Mean maximum unit price in millions VND per m².
pub fn average_unit_price_millions(projects: &[Project]) -> Option<f64> {
    mean(projects, |p| p.max_unit_price).map(|avg| rounded(avg / 1e6, 2))
}

fn mean(projects: &[Project], pick: impl Fn(&Project) -> Option<f64>) -> Option<f64> {
    if projects.is_empty() {
        return None;
    }
    let total: f64 = projects.iter().map(|p| pick(p).unwrap_or(0.0)).sum();
    Some(total / projects.len() as f64)
}

fn count_from_json<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct CountOrString;

    impl<'de> serde::de::Visitor<'de> for CountOrString {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a count as number or string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(value).map_err(|_| E::custom("negative count"))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.is_finite() && value >= 0.0 {
                Ok(value.round() as u64)
            } else {
                Err(E::custom("invalid count"))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(CountOrString)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parking_merge_covers_both_vehicle_kinds() {
        let raw = r#"{
            "bikeParkingStats": [
                {"bikeParkingCategory": "No Fee", "projectCount": 4},
                {"bikeParkingCategory": "0 - 100,000 VND", "projectCount": "12"}
            ],
            "carParkingStats": [
                {"carParkingCategory": "0 - 100,000 VND", "projectCount": 1},
                {"carParkingCategory": "> 1 Million VND", "projectCount": 9}
            ]
        }"#;
        let stats: ParkingStatsResponse = serde_json::from_str(raw).unwrap();
        let rows = merge_parking(&stats);
        assert_eq!(
            rows,
            vec![
                ParkingRow { price: "0".into(), bike: 4, car: 0 },
                ParkingRow { price: "0 - 100k".into(), bike: 12, car: 1 },
                ParkingRow { price: "> 1M".into(), bike: 0, car: 9 },
            ]
        );
    }

    #[test]
    fn unknown_categories_pass_through() {
        assert_eq!(format_category("Free for residents"), "Free for residents");
        assert_eq!(format_category("500,000 - 1 Million VND"), "500k - 1M");
        assert_eq!(format_category("100,000 - 500,000 VND"), "100k - 500k");
    }

    #[test]
    fn dashboard_figures() {
        let stats = MarketStatistics {
            prices: vec![
                PriceBucket { price_range: "< 2".into(), count: 3 },
                PriceBucket { price_range: "2 - 5".into(), count: 7 },
            ],
            districts: vec![
                DistrictBucket { district: "District 7".into(), count: 4 },
                DistrictBucket { district: "Thu Duc".into(), count: 6 },
                DistrictBucket { district: "Others".into(), count: 2 },
            ],
            ..Default::default()
        };
        assert_eq!(stats.total_projects(), 10);
        assert_eq!(stats.featured_districts(), 2);
        assert_eq!(stats.largest_district_count(), 6);
        assert_eq!(MarketStatistics::default().featured_districts(), 0);
    }

    #[test]
    fn averages_treat_missing_as_zero() {
        let projects = vec![
            Project {
                max_selling_price: Some(4e9),
                max_unit_price: Some(60e6),
                ..Default::default()
            },
            Project {
                max_selling_price: Some(3e9),
                ..Default::default()
            },
        ];
        assert_eq!(average_price_billions(&projects), Some(3.5));
        assert_eq!(average_unit_price_millions(&projects), Some(30.0));
        assert_eq!(average_price_billions(&[]), None);
    }

    #[test]
    fn bucket_counts_accept_strings() {
        let bucket: AreaBucket =
            serde_json::from_str(r#"{"areaCategory":"< 1 ha","projectCount":"5"}"#).unwrap();
        assert_eq!(bucket.project_count, 5);
        assert!(serde_json::from_str::<DistrictBucket>(r#"{"district":"X","count":-1}"#).is_err());
    }
}
