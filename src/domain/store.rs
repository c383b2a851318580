use super::entities::HasId;

/// Loaded list of one admin resource plus its request status.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityStore<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: HasId> EntityStore<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_list(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
    }

    pub fn finish_create(&mut self, item: T) {
        self.items.push(item);
        self.loading = false;
    }

    /// Replaces the record with the same id. Unknown ids leave the list as is.
    pub fn finish_update(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|e| e.id() == item.id()) {
            *existing = item;
        }
        self.loading = false;
    }

    pub fn finish_delete(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
        self.loading = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: String,
        name: &'static str,
    }

    impl HasId for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, name: &'static str) -> Row {
        Row { id: id.into(), name }
    }

    #[test]
    fn lifecycle_tracks_loading_and_items() {
        let mut store = EntityStore::default();
        store.begin();
        assert!(store.loading);
        store.finish_list(vec![row("1", "a"), row("2", "b")]);
        assert!(!store.loading);

        store.begin();
        store.finish_create(row("3", "c"));
        store.finish_update(row("1", "renamed"));
        store.finish_delete("2");

        let names: Vec<_> = store.items.iter().map(|r| r.name).collect();
        assert_eq!(names, ["renamed", "c"]);
        assert_eq!(store.get("3").map(|r| r.name), Some("c"));
    }

    #[test]
    fn failures_record_message_and_stop_loading() {
        let mut store: EntityStore<Row> = EntityStore::default();
        store.begin();
        store.fail("timeout");
        assert!(!store.loading);
        assert_eq!(store.error.as_deref(), Some("timeout"));

        store.begin();
        assert_eq!(store.error, None);
    }

    #[test]
    fn update_of_unknown_id_is_ignored() {
        let mut store = EntityStore::default();
        store.finish_list(vec![row("1", "a")]);
        store.finish_update(row("9", "ghost"));
        assert_eq!(store.items, vec![row("1", "a")]);
    }
}
