pub mod assets;
pub mod persistence;
pub mod version;

/// Short unique id for transient UI items such as toasts.
pub fn generate_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &id[..8])
}
