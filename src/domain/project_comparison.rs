//! Project comparison table: how a [`Project`] exposes its attributes to the
//! comparison engine, and the row layout of the compare page.

use std::sync::OnceLock;

use super::{
    comparison::{
        AttributeRow, CellValue, ComparableEntity, ComparisonLayout, ComparisonSection,
        LayoutError, RankOrder,
    },
    entities::{PlaceGroup, Project},
    format::{format_date, format_number, with_commas},
};

/// Bedroom counts shown as separate area rows (studio through five bedrooms).
pub const BEDROOM_ROWS: std::ops::RangeInclusive<u8> = 0..=5;

/// Upper bound of place names listed in an amenity cell.
pub const AMENITY_LIST_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Name,
    Address,
    Developer,
    MasterPlan,
    Handover,
    Segment,
    MinSellingPrice,
    MaxSellingPrice,
    MinUnitPrice,
    MaxUnitPrice,
    BedroomMinArea(u8),
    BedroomMaxArea(u8),
    TotalArea,
    Density,
    BikeParking,
    CarParking,
    Elevators,
    MinUnitsPerFloor,
    MaxUnitsPerFloor,
    Basements,
    Blocks,
    LivingFloors,
    TotalUnits,
    PlaceCount(PlaceGroup),
}

impl ComparableEntity for Project {
    type Field = ProjectField;

    /// Zero counts and prices are how the backend reports "unknown", so they
    /// read as absent.
    fn number(&self, field: ProjectField) -> Option<f64> {
        let raw = match field {
            ProjectField::MinSellingPrice => self.min_selling_price,
            ProjectField::MaxSellingPrice => self.max_selling_price,
            ProjectField::MinUnitPrice => self.min_unit_price,
            ProjectField::MaxUnitPrice => self.max_unit_price,
            ProjectField::BedroomMinArea(bedrooms) => {
                self.property_with_bedrooms(bedrooms).map(|p| p.min_area)
            }
            ProjectField::BedroomMaxArea(bedrooms) => {
                self.property_with_bedrooms(bedrooms).map(|p| p.max_area)
            }
            ProjectField::TotalArea => self.total_area,
            ProjectField::Density => self.ctsn_dens.map(density_percent),
            ProjectField::BikeParking => self.bike_parking_monthly,
            ProjectField::CarParking => self.car_parking_monthly,
            ProjectField::Elevators => self.number_ele,
            ProjectField::MinUnitsPerFloor => self.min_prop_per_floor,
            ProjectField::MaxUnitsPerFloor => self.max_prop_per_floor,
            ProjectField::Basements => self.number_basement,
            ProjectField::Blocks => self.blocks,
            ProjectField::LivingFloors => self.number_living_floor,
            ProjectField::TotalUnits => self.total_property,
            ProjectField::PlaceCount(group) => self.places_in(group).map(|places| places.len() as f64),
            ProjectField::Name
            | ProjectField::Address
            | ProjectField::Developer
            | ProjectField::MasterPlan
            | ProjectField::Handover
            | ProjectField::Segment => None,
        };
        raw.filter(|value| value.is_finite() && *value != 0.0)
    }

    fn text(&self, field: ProjectField) -> Option<String> {
        let raw = match field {
            ProjectField::Name => Some(self.name.clone()),
            ProjectField::Address => Some(self.address.clone()),
            ProjectField::Developer => Some(self.developer_name.clone()),
            ProjectField::MasterPlan => self.master_plan_url.clone(),
            ProjectField::Handover => self.handover_date.as_deref().map(format_date),
            ProjectField::Segment => self.rank.clone(),
            _ => None,
        };
        raw.filter(|value| !value.trim().is_empty())
    }
}

/// Density is stored either as a fraction (`0.35`) or a percentage (`35`).
fn density_percent(value: f64) -> f64 {
    if value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// Layout shared by every compare page. Built and validated once; later
/// calls return the same outcome.
pub fn project_layout() -> Result<&'static ComparisonLayout<Project>, &'static LayoutError> {
    static LAYOUT: OnceLock<Result<ComparisonLayout<Project>, LayoutError>> = OnceLock::new();
    LAYOUT.get_or_init(build_project_layout).as_ref()
}

pub fn build_project_layout() -> Result<ComparisonLayout<Project>, LayoutError> {
    let mut pricing: Vec<AttributeRow<Project>> = vec![
        AttributeRow::direct(
            "Selling price range",
            [ProjectField::MinSellingPrice, ProjectField::MaxSellingPrice],
        )
        .scale(1_000_000_000.0)
        .unit("bn VND")
        .order(RankOrder::Ascending),
        AttributeRow::direct(
            "Price per m²",
            [ProjectField::MinUnitPrice, ProjectField::MaxUnitPrice],
        )
        .scale(1_000_000.0)
        .unit("M VND")
        .order(RankOrder::Ascending),
    ];
    pricing.extend(BEDROOM_ROWS.map(|bedrooms| {
        AttributeRow::direct(
            bedroom_label(bedrooms),
            [
                ProjectField::BedroomMinArea(bedrooms),
                ProjectField::BedroomMaxArea(bedrooms),
            ],
        )
        .unit("m²")
        .order(RankOrder::Descending)
    }));

    let overview: Vec<AttributeRow<Project>> = vec![
        AttributeRow::direct("Address", [ProjectField::Address]),
        AttributeRow::direct("Developer", [ProjectField::Developer]),
        AttributeRow::custom("Master plan", [], master_plan_cell),
        AttributeRow::direct("Handover", [ProjectField::Handover]),
        AttributeRow::direct("Segment", [ProjectField::Segment]),
        AttributeRow::direct("Scale", [ProjectField::TotalArea])
            .unit("ha")
            .order(RankOrder::Descending),
        AttributeRow::direct("Construction density", [ProjectField::Density])
            .unit("%")
            .order(RankOrder::Ascending),
    ];

    let blocks: Vec<AttributeRow<Project>> = vec![
        AttributeRow::custom("Motorbike parking", [ProjectField::BikeParking], bike_parking_cell)
            .unit("VND/month")
            .order(RankOrder::Ascending),
        AttributeRow::custom("Car parking", [ProjectField::CarParking], car_parking_cell)
            .unit("VND/month")
            .order(RankOrder::Ascending),
        AttributeRow::direct("Elevators per block", [ProjectField::Elevators])
            .unit("per block")
            .order(RankOrder::Descending),
        AttributeRow::direct(
            "Units per floor",
            [ProjectField::MinUnitsPerFloor, ProjectField::MaxUnitsPerFloor],
        )
        .unit("units/floor")
        .order(RankOrder::Ascending),
        AttributeRow::direct("Basement floors", [ProjectField::Basements])
            .unit("floors")
            .order(RankOrder::Descending),
        AttributeRow::direct("Blocks", [ProjectField::Blocks])
            .unit("blocks")
            .order(RankOrder::Descending),
        AttributeRow::direct("Living floors", [ProjectField::LivingFloors])
            .unit("floors")
            .order(RankOrder::Descending),
        AttributeRow::direct("Total units", [ProjectField::TotalUnits])
            .unit("units")
            .order(RankOrder::Descending),
    ];

    let amenities: Vec<AttributeRow<Project>> = vec![
        AttributeRow::custom(
            "Schools",
            [ProjectField::PlaceCount(PlaceGroup::Schools)],
            school_cell,
        )
        .order(RankOrder::Descending),
        AttributeRow::custom(
            "Hospitals/Clinics",
            [ProjectField::PlaceCount(PlaceGroup::Hospitals)],
            hospital_cell,
        )
        .order(RankOrder::Descending),
        AttributeRow::custom(
            "Other amenities",
            [ProjectField::PlaceCount(PlaceGroup::Other)],
            other_amenity_cell,
        )
        .order(RankOrder::Descending),
    ];

    ComparisonLayout::new(vec![
        ComparisonSection::new("Pricing by apartment type", pricing),
        ComparisonSection::new("Project overview", overview),
        ComparisonSection::new("Block details", blocks),
        ComparisonSection::new("Amenities", amenities),
    ])
}

fn bedroom_label(bedrooms: u8) -> String {
    match bedrooms {
        0 => "Studio area".to_string(),
        1 => "1-bedroom area".to_string(),
        n => format!("{n}-bedroom area"),
    }
}

fn master_plan_cell(project: &Project) -> Option<CellValue> {
    let url = project.text(ProjectField::MasterPlan)?;
    Some(CellValue::Image {
        url,
        alt: format!("{} master plan", project.name),
    })
}

fn bike_parking_cell(project: &Project) -> Option<CellValue> {
    project
        .number(ProjectField::BikeParking)
        .map(|fee| CellValue::text(with_commas(fee)))
}

fn car_parking_cell(project: &Project) -> Option<CellValue> {
    project
        .number(ProjectField::CarParking)
        .map(|fee| CellValue::text(with_commas(fee)))
}

fn school_cell(project: &Project) -> Option<CellValue> {
    amenity_cell(project, PlaceGroup::Schools)
}

fn hospital_cell(project: &Project) -> Option<CellValue> {
    amenity_cell(project, PlaceGroup::Hospitals)
}

fn other_amenity_cell(project: &Project) -> Option<CellValue> {
    amenity_cell(project, PlaceGroup::Other)
}

fn amenity_cell(project: &Project, group: PlaceGroup) -> Option<CellValue> {
    let places = project.places_in(group)?;
    if places.is_empty() {
        return None;
    }
    Some(CellValue::List {
        summary: format!("{} {}", places.len(), group.noun()),
        items: places
            .iter()
            .take(AMENITY_LIST_LIMIT)
            .map(|place| place.name.clone())
            .collect(),
        truncated: places.len() > AMENITY_LIST_LIMIT,
    })
}

/// Short numeric label used in the detail page overview.
pub fn overview_value(project: &Project, field: ProjectField) -> String {
    project
        .number(field)
        .map(format_number)
        .or_else(|| project.text(field))
        .unwrap_or_else(|| super::comparison::PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        comparison::{compute_comparison, Highlight},
        entities::{Place, PlaceCategory, PropertyType},
    };

    fn layout() -> &'static ComparisonLayout<Project> {
        project_layout().unwrap()
    }

    #[test]
    fn shared_layout_is_built_once() {
        let first = project_layout().unwrap();
        let second = project_layout().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.row_count(), build_project_layout().unwrap().row_count());
    }

    fn project(id: &str, min_price: f64, max_price: f64) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            address: "Thu Duc".to_string(),
            min_selling_price: Some(min_price),
            max_selling_price: Some(max_price),
            ..Default::default()
        }
    }

    fn place(id: usize, category: PlaceCategory) -> Place {
        Place {
            id: format!("pl-{id}"),
            name: format!("Place {id}"),
            latitude: 0.0,
            longitude: 0.0,
            distance: 1.0,
            rating: 4.0,
            category,
            project_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn row<'a>(
        sections: &'a [crate::domain::comparison::RankedSection],
        label: &str,
    ) -> &'a crate::domain::comparison::RankedRow {
        sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .find(|row| row.label == label)
            .unwrap()
    }

    #[test]
    fn layout_is_valid() {
        let layout = build_project_layout().unwrap();
        assert_eq!(layout.sections().len(), 4);
        assert_eq!(layout.row_count(), 8 + 7 + 8 + 3);
    }

    #[test]
    fn cheaper_price_range_wins() {
        let slots = [
            Some(project("a", 3_000_000_000.0, 4_000_000_000.0)),
            Some(project("b", 2_500_000_000.0, 3_500_000_000.0)),
            None,
        ];
        let output = compute_comparison(&slots, layout(), true);
        let price = row(&output, "Selling price range");
        assert_eq!(price.cells[0].value, CellValue::text("3 - 4 bn VND"));
        assert_eq!(price.cells[1].highlight, Highlight::Best);
        assert_eq!(price.cells[0].highlight, Highlight::Middle);
        assert_eq!(price.cells[2].highlight, Highlight::WorstOrMissing);
        assert_eq!(price.cells[2].value, CellValue::Missing);
    }

    #[test]
    fn zero_values_read_as_absent() {
        let mut a = project("a", 1.0, 1.0);
        a.number_ele = Some(0.0);
        let mut b = project("b", 1.0, 1.0);
        b.number_ele = Some(4.0);
        let output = compute_comparison(&[Some(a), Some(b)], layout(), true);
        let elevators = row(&output, "Elevators per block");
        assert_eq!(elevators.cells[0].value, CellValue::Missing);
        assert_eq!(elevators.cells[0].rank, None);
        assert_eq!(elevators.cells[1].value, CellValue::text("4 per block"));
        assert_eq!(elevators.cells[1].rank, Some(1));
    }

    #[test]
    fn fractional_density_is_shown_as_percent() {
        let mut a = project("a", 1.0, 1.0);
        a.ctsn_dens = Some(0.355);
        let mut b = project("b", 1.0, 1.0);
        b.ctsn_dens = Some(40.0);
        let output = compute_comparison(&[Some(a), Some(b)], layout(), true);
        let density = row(&output, "Construction density");
        assert_eq!(density.cells[0].value, CellValue::text("35.5 %"));
        assert_eq!(density.cells[0].rank, Some(1));
        assert_eq!(density.cells[1].rank, Some(2));
    }

    #[test]
    fn bedroom_rows_read_property_types() {
        let mut a = project("a", 1.0, 1.0);
        a.properties = Some(vec![PropertyType {
            id: "pt".into(),
            number_of_bedroom: 2,
            min_area: 65.0,
            max_area: 75.5,
            min_price: 0.0,
            max_price: 0.0,
            project_id: Some("a".into()),
        }]);
        let output = compute_comparison(&[Some(a), None], layout(), true);
        assert_eq!(
            row(&output, "2-bedroom area").cells[0].value,
            CellValue::text("65 - 75.5 m²")
        );
        assert_eq!(row(&output, "Studio area").cells[0].value, CellValue::Missing);
    }

    #[test]
    fn amenity_lists_are_truncated() {
        let mut a = project("a", 1.0, 1.0);
        a.places = Some(
            (0..12)
                .map(|i| place(i, PlaceCategory::School))
                .chain([place(99, PlaceCategory::Bank)])
                .collect(),
        );
        let mut b = project("b", 1.0, 1.0);
        b.places = Some(vec![place(1, PlaceCategory::School)]);

        let output = compute_comparison(&[Some(a), Some(b)], layout(), true);
        let schools = row(&output, "Schools");
        match &schools.cells[0].value {
            CellValue::List {
                summary,
                items,
                truncated,
            } => {
                assert_eq!(summary, "12 schools");
                assert_eq!(items.len(), AMENITY_LIST_LIMIT);
                assert!(truncated);
            }
            other => panic!("unexpected cell {other:?}"),
        }
        assert_eq!(schools.cells[0].rank, Some(1));
        assert_eq!(schools.cells[1].rank, Some(2));

        let others = row(&output, "Other amenities");
        assert_eq!(others.cells[0].rank, Some(1));
        assert_eq!(others.cells[1].value, CellValue::Missing);
    }

    #[test]
    fn parking_fees_use_grouping() {
        let mut a = project("a", 1.0, 1.0);
        a.car_parking_monthly = Some(1_200_000.0);
        let output = compute_comparison(&[Some(a)], layout(), true);
        assert_eq!(
            row(&output, "Car parking").cells[0].value,
            CellValue::text("1,200,000 VND/month")
        );
    }

    #[test]
    fn text_rows_are_never_highlighted() {
        let output = compute_comparison(
            &[Some(project("a", 1.0, 1.0)), None],
            layout(),
            true,
        );
        let address = row(&output, "Address");
        assert!(address.cells.iter().all(|cell| cell.highlight == Highlight::Neutral));
        assert_eq!(address.cells[0].value, CellValue::text("Thu Duc"));
    }

    #[test]
    fn master_plan_renders_as_image() {
        let mut a = project("a", 1.0, 1.0);
        a.master_plan_url = Some("https://example.com/a.png".into());
        let output = compute_comparison(&[Some(a)], layout(), false);
        assert_eq!(
            row(&output, "Master plan").cells[0].value,
            CellValue::Image {
                url: "https://example.com/a.png".into(),
                alt: "Project a master plan".into(),
            }
        );
    }
}
