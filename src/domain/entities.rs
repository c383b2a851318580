use serde::{Deserialize, Serialize};

/// Identifier for records returned by the backend.
pub type EntityId = String;

/// Records that can live in an [`EntityStore`](super::store::EntityStore).
pub trait HasId {
    fn id(&self) -> &str;
}

/// Residential project as returned by `/projects`.
///
/// `properties`, `places` and `prices` are loaded lazily per project and stay
/// `None` until the detail requests complete.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub developer_name: String,
    #[serde(default)]
    pub master_plan_url: Option<String>,
    #[serde(default)]
    pub infrastructure_map_url: Option<String>,
    #[serde(default)]
    pub construction_start_date_from: Option<String>,
    #[serde(default)]
    pub handover_date: Option<String>,
    /// Market segment label.
    #[serde(default)]
    pub rank: Option<String>,
    /// Hectares.
    #[serde(default)]
    pub total_area: Option<f64>,
    /// Construction density, either a fraction or a percentage.
    #[serde(default)]
    pub ctsn_dens: Option<f64>,
    #[serde(default)]
    pub total_property: Option<f64>,
    #[serde(default)]
    pub min_selling_price: Option<f64>,
    #[serde(default)]
    pub max_selling_price: Option<f64>,
    #[serde(default)]
    pub min_unit_price: Option<f64>,
    #[serde(default)]
    pub max_unit_price: Option<f64>,
    #[serde(default)]
    pub blocks: Option<f64>,
    #[serde(default)]
    pub number_ele: Option<f64>,
    #[serde(default)]
    pub number_living_floor: Option<f64>,
    #[serde(default)]
    pub number_basement: Option<f64>,
    #[serde(default)]
    pub min_prop_per_floor: Option<f64>,
    #[serde(default)]
    pub max_prop_per_floor: Option<f64>,
    #[serde(default)]
    pub bike_parking_monthly: Option<f64>,
    #[serde(default)]
    pub car_parking_monthly: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<Place>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
}

impl Project {
    /// True once every lazily-loaded collection has arrived.
    pub fn has_details(&self) -> bool {
        self.properties.is_some() && self.places.is_some() && self.prices.is_some()
    }

    /// True while none of the detail collections has been requested yet.
    pub fn lacks_details(&self) -> bool {
        self.properties.is_none() && self.places.is_none() && self.prices.is_none()
    }

    pub fn property_with_bedrooms(&self, bedrooms: u8) -> Option<&PropertyType> {
        self.properties
            .as_ref()?
            .iter()
            .find(|property| property.number_of_bedroom == u32::from(bedrooms))
    }

    pub fn places_in(&self, group: PlaceGroup) -> Option<Vec<&Place>> {
        self.places.as_ref().map(|places| {
            places
                .iter()
                .filter(|place| group.contains(place.category))
                .collect()
        })
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some((lat, lng)),
            _ => None,
        }
    }

    /// Case-insensitive match on name or address.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle) || self.address.to_lowercase().contains(&needle)
    }
}

impl HasId for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Point of interest around a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Kilometres from the project.
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub rating: f64,
    pub category: PlaceCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl HasId for Place {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceCategory {
    School,
    Hospital,
    Restaurant,
    Hotel,
    Store,
    Bank,
    Sport,
    Petro,
    #[default]
    #[serde(other)]
    Other,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 9] = [
        PlaceCategory::School,
        PlaceCategory::Hospital,
        PlaceCategory::Restaurant,
        PlaceCategory::Hotel,
        PlaceCategory::Store,
        PlaceCategory::Bank,
        PlaceCategory::Sport,
        PlaceCategory::Petro,
        PlaceCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlaceCategory::School => "School",
            PlaceCategory::Hospital => "Hospital",
            PlaceCategory::Restaurant => "Restaurant",
            PlaceCategory::Hotel => "Hotel",
            PlaceCategory::Store => "Store",
            PlaceCategory::Bank => "Bank",
            PlaceCategory::Sport => "Sports ground",
            PlaceCategory::Petro => "Petrol station",
            PlaceCategory::Other => "Other",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PlaceCategory::School => "SCHOOL",
            PlaceCategory::Hospital => "HOSPITAL",
            PlaceCategory::Restaurant => "RESTAURANT",
            PlaceCategory::Hotel => "HOTEL",
            PlaceCategory::Store => "STORE",
            PlaceCategory::Bank => "BANK",
            PlaceCategory::Sport => "SPORT",
            PlaceCategory::Petro => "PETRO",
            PlaceCategory::Other => "OTHER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// Amenity buckets used by the comparison table. `Other` collects every
/// category that is neither a school nor a hospital.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceGroup {
    Schools,
    Hospitals,
    Other,
}

impl PlaceGroup {
    pub fn contains(&self, category: PlaceCategory) -> bool {
        match self {
            PlaceGroup::Schools => category == PlaceCategory::School,
            PlaceGroup::Hospitals => category == PlaceCategory::Hospital,
            PlaceGroup::Other => {
                !matches!(category, PlaceCategory::School | PlaceCategory::Hospital)
            }
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            PlaceGroup::Schools => "schools",
            PlaceGroup::Hospitals => "hospitals/clinics",
            PlaceGroup::Other => "other amenities",
        }
    }
}

/// Apartment type offered by a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    pub id: EntityId,
    pub number_of_bedroom: u32,
    #[serde(default)]
    pub min_area: f64,
    #[serde(default)]
    pub max_area: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub project_id: Option<EntityId>,
}

impl HasId for PropertyType {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Monthly price observation. `unit` is the month number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub unit: u32,
    pub year: i32,
    pub price: f64,
    /// Change against the previous month, in percent.
    #[serde(default)]
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Only sent on create/update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_deserializes_from_backend_shape() {
        let raw = r#"{
            "id": "p1",
            "code": "VH-01",
            "name": "Vinhomes Grand Park",
            "address": "District 9",
            "developerName": "Vinhomes",
            "masterPlanUrl": "https://example.com/plan.png",
            "totalArea": 271.0,
            "minSellingPrice": 2500000000,
            "maxSellingPrice": 5200000000,
            "numberEle": 6,
            "latitude": 10.84,
            "longitude": 106.83
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.developer_name, "Vinhomes");
        assert_eq!(project.min_selling_price, Some(2_500_000_000.0));
        assert_eq!(project.number_ele, Some(6.0));
        assert!(project.lacks_details());
        assert_eq!(project.coordinates(), Some((10.84, 106.83)));
    }

    #[test]
    fn unknown_place_category_falls_back_to_other() {
        let raw = r#"{"id":"x","name":"Park","category":"PARK","project_id":"p1"}"#;
        let place: Place = serde_json::from_str(raw).unwrap();
        assert_eq!(place.category, PlaceCategory::Other);
        assert_eq!(place.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn other_group_excludes_schools_and_hospitals() {
        assert!(PlaceGroup::Other.contains(PlaceCategory::Bank));
        assert!(!PlaceGroup::Other.contains(PlaceCategory::School));
        assert!(!PlaceGroup::Other.contains(PlaceCategory::Hospital));
        assert!(PlaceGroup::Schools.contains(PlaceCategory::School));
    }

    #[test]
    fn search_matches_name_or_address_case_insensitively() {
        let project = Project {
            id: "p1".into(),
            name: "Masteri Thao Dien".into(),
            address: "Xa Lo Ha Noi, Thu Duc".into(),
            ..Default::default()
        };
        assert!(project.matches_query("masteri"));
        assert!(project.matches_query("THU DUC"));
        assert!(project.matches_query("  "));
        assert!(!project.matches_query("district 7"));
    }

    #[test]
    fn category_codes_round_trip() {
        for category in PlaceCategory::ALL {
            assert_eq!(PlaceCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(PlaceCategory::from_code("unknown"), None);
    }
}
