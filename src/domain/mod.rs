//! Domain logic for comparing residential projects lives here.

pub mod app_state;
pub mod comparison;
pub mod entities;
pub mod format;
pub mod forms;
pub mod price_history;
pub mod project_comparison;
pub mod selection;
pub mod statistics;
pub mod store;

pub use app_state::{AppState, CacheResource, PersistedState, Settings};
pub use entities::{EntityId, HasId, Place, Price, Project, PropertyType, User};
pub use forms::{Draft, FormSource, FormValues};
pub use selection::{ProjectDetails, SlotChange};
pub use statistics::MarketStatistics;
pub use store::EntityStore;
