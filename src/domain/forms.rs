//! Typed payloads for the admin create/edit dialogs.
//!
//! Dialogs collect raw strings keyed by field name; each draft type declares
//! its fields and parses itself out of those strings, reporting the first
//! problem per field.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::entities::{Place, PlaceCategory, Project, PropertyType, User};

pub type FormValues = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    Date,
    Password,
    Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FormField {
    FormField {
        key,
        label,
        kind,
        required,
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotNumber(&'static str),
    #[error("{0} must be a whole number")]
    NotInteger(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("unknown place category `{0}`")]
    UnknownCategory(String),
    #[error("{min} must not exceed {max}")]
    InvertedRange {
        min: &'static str,
        max: &'static str,
    },
}

/// A record that can be edited through a dialog.
pub trait Draft: Sized + Serialize {
    const FIELDS: &'static [FormField];

    fn parse(values: &FormValues) -> Result<Self, Vec<FieldError>>;
}

struct Reader<'a> {
    values: &'a FormValues,
    errors: Vec<FieldError>,
}

impl<'a> Reader<'a> {
    fn new(values: &'a FormValues) -> Self {
        Self {
            values,
            errors: Vec::new(),
        }
    }

    fn raw(&self, key: &str) -> Option<&'a str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn text(&mut self, f: &FormField) -> String {
        match self.raw(f.key) {
            Some(value) => value.to_string(),
            None => {
                if f.required {
                    self.errors.push(FieldError::Required(f.label));
                }
                String::new()
            }
        }
    }

    fn optional_text(&mut self, f: &FormField) -> Option<String> {
        self.raw(f.key).map(str::to_string)
    }

    fn number(&mut self, f: &FormField) -> f64 {
        let Some(raw) = self.raw(f.key) else {
            if f.required {
                self.errors.push(FieldError::Required(f.label));
            }
            return 0.0;
        };
        match raw.replace(',', "").parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.errors.push(FieldError::NotNumber(f.label));
                0.0
            }
        }
    }

    fn non_negative(&mut self, f: &FormField) -> f64 {
        let value = self.number(f);
        if value < 0.0 {
            self.errors.push(FieldError::Negative(f.label));
        }
        value
    }

    fn integer(&mut self, f: &FormField) -> u32 {
        let Some(raw) = self.raw(f.key) else {
            if f.required {
                self.errors.push(FieldError::Required(f.label));
            }
            return 0;
        };
        match raw.parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                self.errors.push(FieldError::NotInteger(f.label));
                0
            }
        }
    }

    fn category(&mut self, f: &FormField) -> PlaceCategory {
        match self.raw(f.key) {
            Some(code) => PlaceCategory::from_code(code).unwrap_or_else(|| {
                self.errors.push(FieldError::UnknownCategory(code.to_string()));
                PlaceCategory::Other
            }),
            None => {
                self.errors.push(FieldError::Required(f.label));
                PlaceCategory::Other
            }
        }
    }

    fn ordered(&mut self, min: (&FormField, f64), max: (&FormField, f64)) {
        if min.1 > max.1 {
            self.errors.push(FieldError::InvertedRange {
                min: min.0.label,
                max: max.0.label,
            });
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub code: String,
    pub name: String,
    pub address: String,
    pub developer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_plan_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure_map_url: Option<String>,
    pub construction_start_date_from: Option<String>,
    pub handover_date: Option<String>,
    pub rank: String,
    pub total_area: f64,
    pub ctsn_dens: f64,
    pub total_property: f64,
    pub min_selling_price: f64,
    pub max_selling_price: f64,
    pub min_unit_price: f64,
    pub max_unit_price: f64,
    pub blocks: f64,
    pub number_ele: f64,
    pub number_living_floor: f64,
    pub number_basement: f64,
    pub min_prop_per_floor: f64,
    pub max_prop_per_floor: f64,
    pub bike_parking_monthly: f64,
    pub car_parking_monthly: f64,
    pub latitude: f64,
    pub longitude: f64,
}

const PROJECT_FIELDS: &[FormField] = &[
    field("code", "Code", FieldKind::Text, true),
    field("name", "Name", FieldKind::Text, true),
    field("address", "Address", FieldKind::Text, true),
    field("developerName", "Developer", FieldKind::Text, true),
    field("latitude", "Latitude", FieldKind::Number, true),
    field("longitude", "Longitude", FieldKind::Number, true),
    field("masterPlanUrl", "Master plan image URL", FieldKind::Text, false),
    field("infrastructureMapUrl", "Infrastructure map URL", FieldKind::Text, false),
    field("constructionStartDateFrom", "Construction start", FieldKind::Date, false),
    field("handoverDate", "Handover date", FieldKind::Date, false),
    field("rank", "Segment", FieldKind::Text, false),
    field("totalArea", "Scale (ha)", FieldKind::Number, false),
    field("ctsnDens", "Construction density", FieldKind::Number, false),
    field("totalProperty", "Total units", FieldKind::Number, false),
    field("minSellingPrice", "Min selling price (VND)", FieldKind::Number, false),
    field("maxSellingPrice", "Max selling price (VND)", FieldKind::Number, false),
    field("minUnitPrice", "Min price per m² (VND)", FieldKind::Number, false),
    field("maxUnitPrice", "Max price per m² (VND)", FieldKind::Number, false),
    field("blocks", "Blocks", FieldKind::Number, false),
    field("numberEle", "Elevators per block", FieldKind::Number, false),
    field("numberLivingFloor", "Living floors", FieldKind::Number, false),
    field("numberBasement", "Basement floors", FieldKind::Number, false),
    field("minPropPerFloor", "Min units per floor", FieldKind::Number, false),
    field("maxPropPerFloor", "Max units per floor", FieldKind::Number, false),
    field("bikeParkingMonthly", "Motorbike parking (VND/month)", FieldKind::Number, false),
    field("carParkingMonthly", "Car parking (VND/month)", FieldKind::Number, false),
];

impl Draft for ProjectDraft {
    const FIELDS: &'static [FormField] = PROJECT_FIELDS;

    fn parse(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let f = PROJECT_FIELDS;
        let mut r = Reader::new(values);
        let draft = ProjectDraft {
            code: r.text(&f[0]),
            name: r.text(&f[1]),
            address: r.text(&f[2]),
            developer_name: r.text(&f[3]),
            latitude: r.number(&f[4]),
            longitude: r.number(&f[5]),
            master_plan_url: r.optional_text(&f[6]),
            infrastructure_map_url: r.optional_text(&f[7]),
            construction_start_date_from: r.optional_text(&f[8]),
            handover_date: r.optional_text(&f[9]),
            rank: r.text(&f[10]),
            total_area: r.non_negative(&f[11]),
            ctsn_dens: r.non_negative(&f[12]),
            total_property: r.non_negative(&f[13]),
            min_selling_price: r.non_negative(&f[14]),
            max_selling_price: r.non_negative(&f[15]),
            min_unit_price: r.non_negative(&f[16]),
            max_unit_price: r.non_negative(&f[17]),
            blocks: r.non_negative(&f[18]),
            number_ele: r.non_negative(&f[19]),
            number_living_floor: r.non_negative(&f[20]),
            number_basement: r.non_negative(&f[21]),
            min_prop_per_floor: r.non_negative(&f[22]),
            max_prop_per_floor: r.non_negative(&f[23]),
            bike_parking_monthly: r.non_negative(&f[24]),
            car_parking_monthly: r.non_negative(&f[25]),
        };
        r.ordered((&f[14], draft.min_selling_price), (&f[15], draft.max_selling_price));
        r.ordered((&f[16], draft.min_unit_price), (&f[17], draft.max_unit_price));
        r.ordered((&f[22], draft.min_prop_per_floor), (&f[23], draft.max_prop_per_floor));
        r.finish(draft)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub rating: f64,
    pub category: PlaceCategory,
}

const PLACE_FIELDS: &[FormField] = &[
    field("name", "Name", FieldKind::Text, true),
    field("category", "Category", FieldKind::Category, true),
    field("latitude", "Latitude", FieldKind::Number, true),
    field("longitude", "Longitude", FieldKind::Number, true),
    field("distance", "Distance (km)", FieldKind::Number, true),
    field("rating", "Rating", FieldKind::Number, true),
];

impl Draft for PlaceDraft {
    const FIELDS: &'static [FormField] = PLACE_FIELDS;

    fn parse(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let f = PLACE_FIELDS;
        let mut r = Reader::new(values);
        let draft = PlaceDraft {
            name: r.text(&f[0]),
            category: r.category(&f[1]),
            latitude: r.number(&f[2]),
            longitude: r.number(&f[3]),
            distance: r.non_negative(&f[4]),
            rating: r.non_negative(&f[5]),
        };
        r.finish(draft)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeDraft {
    pub number_of_bedroom: u32,
    pub min_area: f64,
    pub max_area: f64,
    pub min_price: f64,
    pub max_price: f64,
}

const PROPERTY_TYPE_FIELDS: &[FormField] = &[
    field("numberOfBedroom", "Bedrooms", FieldKind::Integer, true),
    field("minArea", "Min area (m²)", FieldKind::Number, true),
    field("maxArea", "Max area (m²)", FieldKind::Number, true),
    field("minPrice", "Min price (VND)", FieldKind::Number, true),
    field("maxPrice", "Max price (VND)", FieldKind::Number, true),
];

impl Draft for PropertyTypeDraft {
    const FIELDS: &'static [FormField] = PROPERTY_TYPE_FIELDS;

    fn parse(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let f = PROPERTY_TYPE_FIELDS;
        let mut r = Reader::new(values);
        let draft = PropertyTypeDraft {
            number_of_bedroom: r.integer(&f[0]),
            min_area: r.non_negative(&f[1]),
            max_area: r.non_negative(&f[2]),
            min_price: r.non_negative(&f[3]),
            max_price: r.non_negative(&f[4]),
        };
        r.ordered((&f[1], draft.min_area), (&f[2], draft.max_area));
        r.ordered((&f[3], draft.min_price), (&f[4], draft.max_price));
        r.finish(draft)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// Left out on edits when blank so the stored password is kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

const USER_FIELDS: &[FormField] = &[
    field("username", "Username", FieldKind::Text, true),
    field("password", "Password", FieldKind::Password, false),
    field("email", "Email", FieldKind::Text, true),
    field("fullName", "Full name", FieldKind::Text, true),
];

impl Draft for UserDraft {
    const FIELDS: &'static [FormField] = USER_FIELDS;

    fn parse(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let f = USER_FIELDS;
        let mut r = Reader::new(values);
        let draft = UserDraft {
            username: r.text(&f[0]),
            password: r.optional_text(&f[1]),
            email: r.text(&f[2]),
            full_name: r.text(&f[3]),
        };
        r.finish(draft)
    }
}

/// Pre-fills an edit dialog from a stored record.
pub trait FormSource {
    fn form_values(&self) -> FormValues;
}

fn values<const N: usize>(pairs: [(&str, String); N]) -> FormValues {
    pairs
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// `<input type="date">` only accepts `YYYY-MM-DD`; stored values may carry a time.
fn date_part(value: Option<&str>) -> String {
    value
        .map(|v| v.get(..10).unwrap_or(v).to_string())
        .unwrap_or_default()
}

fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl FormSource for Project {
    fn form_values(&self) -> FormValues {
        values([
            ("code", self.code.clone()),
            ("name", self.name.clone()),
            ("address", self.address.clone()),
            ("developerName", self.developer_name.clone()),
            ("latitude", opt_number(self.latitude)),
            ("longitude", opt_number(self.longitude)),
            ("masterPlanUrl", self.master_plan_url.clone().unwrap_or_default()),
            (
                "infrastructureMapUrl",
                self.infrastructure_map_url.clone().unwrap_or_default(),
            ),
            (
                "constructionStartDateFrom",
                date_part(self.construction_start_date_from.as_deref()),
            ),
            ("handoverDate", date_part(self.handover_date.as_deref())),
            ("rank", self.rank.clone().unwrap_or_default()),
            ("totalArea", opt_number(self.total_area)),
            ("ctsnDens", opt_number(self.ctsn_dens)),
            ("totalProperty", opt_number(self.total_property)),
            ("minSellingPrice", opt_number(self.min_selling_price)),
            ("maxSellingPrice", opt_number(self.max_selling_price)),
            ("minUnitPrice", opt_number(self.min_unit_price)),
            ("maxUnitPrice", opt_number(self.max_unit_price)),
            ("blocks", opt_number(self.blocks)),
            ("numberEle", opt_number(self.number_ele)),
            ("numberLivingFloor", opt_number(self.number_living_floor)),
            ("numberBasement", opt_number(self.number_basement)),
            ("minPropPerFloor", opt_number(self.min_prop_per_floor)),
            ("maxPropPerFloor", opt_number(self.max_prop_per_floor)),
            ("bikeParkingMonthly", opt_number(self.bike_parking_monthly)),
            ("carParkingMonthly", opt_number(self.car_parking_monthly)),
        ])
    }
}

impl FormSource for Place {
    fn form_values(&self) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("category", self.category.code().to_string()),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("distance", self.distance.to_string()),
            ("rating", self.rating.to_string()),
        ])
    }
}

impl FormSource for PropertyType {
    fn form_values(&self) -> FormValues {
        values([
            ("numberOfBedroom", self.number_of_bedroom.to_string()),
            ("minArea", self.min_area.to_string()),
            ("maxArea", self.max_area.to_string()),
            ("minPrice", self.min_price.to_string()),
            ("maxPrice", self.max_price.to_string()),
        ])
    }
}

impl FormSource for User {
    fn form_values(&self) -> FormValues {
        values([
            ("username", self.username.clone()),
            ("email", self.email.clone().unwrap_or_default()),
            ("fullName", self.full_name.clone().unwrap_or_default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn place_draft_parses_and_serializes_snake_case() {
        let values = form(&[
            ("name", "Le Quy Don High School"),
            ("category", "school"),
            ("latitude", "10.78"),
            ("longitude", "106.69"),
            ("distance", "1.2"),
            ("rating", "4.5"),
        ]);
        let draft = PlaceDraft::parse(&values).unwrap();
        assert_eq!(draft.category, PlaceCategory::School);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["category"], "SCHOOL");
        assert_eq!(json["distance"], 1.2);
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let errors = PlaceDraft::parse(&form(&[("name", " "), ("category", "CASTLE")])).unwrap_err();
        assert!(errors.contains(&FieldError::Required("Name")));
        assert!(errors.contains(&FieldError::UnknownCategory("CASTLE".into())));
        assert!(errors.contains(&FieldError::Required("Rating")));
    }

    #[test]
    fn property_type_rejects_inverted_ranges() {
        let values = form(&[
            ("numberOfBedroom", "2"),
            ("minArea", "80"),
            ("maxArea", "60"),
            ("minPrice", "3,000,000,000"),
            ("maxPrice", "4000000000"),
        ]);
        let errors = PropertyTypeDraft::parse(&values).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::InvertedRange {
                min: "Min area (m²)",
                max: "Max area (m²)"
            }]
        );
    }

    #[test]
    fn bedroom_count_must_be_whole() {
        let values = form(&[
            ("numberOfBedroom", "1.5"),
            ("minArea", "1"),
            ("maxArea", "2"),
            ("minPrice", "1"),
            ("maxPrice", "2"),
        ]);
        assert_eq!(
            PropertyTypeDraft::parse(&values).unwrap_err(),
            vec![FieldError::NotInteger("Bedrooms")]
        );
    }

    #[test]
    fn project_round_trips_through_form_values() {
        let project = Project {
            id: "p1".into(),
            code: "MTD".into(),
            name: "Masteri".into(),
            address: "Thu Duc".into(),
            developer_name: "Masterise".into(),
            latitude: Some(10.8),
            longitude: Some(106.7),
            min_selling_price: Some(3e9),
            max_selling_price: Some(6e9),
            handover_date: Some("2026-06-30T00:00:00Z".into()),
            ..Default::default()
        };
        let draft = ProjectDraft::parse(&project.form_values()).unwrap();
        assert_eq!(draft.name, "Masteri");
        assert_eq!(draft.max_selling_price, 6e9);
        assert_eq!(draft.blocks, 0.0);
        assert_eq!(draft.handover_date.as_deref(), Some("2026-06-30"));
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["developerName"], "Masterise");
        assert!(json.get("masterPlanUrl").is_none());
    }

    #[test]
    fn blank_password_is_omitted() {
        let user = User {
            id: "u1".into(),
            username: "admin".into(),
            full_name: Some("Site Admin".into()),
            email: Some("admin@example.com".into()),
            role: None,
            password: None,
        };
        let draft = UserDraft::parse(&user.form_values()).unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fullName"], "Site Admin");
    }

    #[test]
    fn field_tables_match_parsers() {
        assert_eq!(ProjectDraft::FIELDS.len(), 26);
        assert!(PlaceDraft::FIELDS.iter().all(|f| f.required));
        assert!(!UserDraft::FIELDS[1].required);
    }
}
