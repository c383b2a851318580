//! The three compare slots on the home page.

use super::entities::{Place, Price, Project, PropertyType};

/// Number of projects that can be compared at once.
pub const COMPARE_SLOTS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum SlotChange {
    Added(usize),
    AlreadySelected,
    Full,
    Removed,
    NotFound,
}

/// Fixed-size slot list. Filled slots are always packed to the front so the
/// comparison columns line up with what the user picked first.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonSlots {
    slots: [Option<Project>; COMPARE_SLOTS],
}

impl Default for ComparisonSlots {
    fn default() -> Self {
        Self {
            slots: [None, None, None],
        }
    }
}

/// Detail collections fetched for one project.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectDetails {
    pub properties: Vec<PropertyType>,
    pub places: Vec<Place>,
    pub prices: Vec<Price>,
}

impl ComparisonSlots {
    pub fn slots(&self) -> &[Option<Project>] {
        &self.slots
    }

    pub fn filled(&self) -> impl Iterator<Item = &Project> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.filled().any(|project| project.id == project_id)
    }

    pub fn add(&mut self, project: Project) -> SlotChange {
        if self.contains(&project.id) {
            return SlotChange::AlreadySelected;
        }
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return SlotChange::Full;
        };
        self.slots[index] = Some(project);
        self.compact();
        SlotChange::Added(index)
    }

    pub fn remove(&mut self, project_id: &str) -> SlotChange {
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|p| p.id == project_id))
        else {
            return SlotChange::NotFound;
        };
        *slot = None;
        self.compact();
        SlotChange::Removed
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Ids of selected projects whose detail collections were never requested.
    pub fn pending_details(&self) -> Vec<String> {
        self.filled()
            .filter(|project| project.lacks_details())
            .map(|project| project.id.clone())
            .collect()
    }

    /// Merges fetched details into the matching slot. Returns `false` when the
    /// project was removed while the request was in flight.
    pub fn attach_details(&mut self, project_id: &str, details: ProjectDetails) -> bool {
        let Some(project) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|project| project.id == project_id)
        else {
            return false;
        };

        let mut properties = details.properties;
        properties.sort_by_key(|property| property.number_of_bedroom);
        project.properties = Some(properties);
        project.places = Some(details.places);
        project.prices = Some(details.prices);
        true
    }

    fn compact(&mut self) {
        let mut packed: Vec<Project> = self.slots.iter_mut().filter_map(Option::take).collect();
        packed.truncate(COMPARE_SLOTS);
        for (index, project) in packed.into_iter().enumerate() {
            self.slots[index] = Some(project);
        }
    }
}

/// Catalogue entries matching the search box, in catalogue order.
pub fn search_projects<'a>(catalogue: &'a [Project], query: &str) -> Vec<&'a Project> {
    catalogue
        .iter()
        .filter(|project| project.matches_query(query))
        .collect()
}
