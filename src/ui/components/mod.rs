pub mod comparison_table;
pub mod entity_form;
pub mod entity_table;
pub mod kpi_card;
pub mod price_history_table;
pub mod toast;
