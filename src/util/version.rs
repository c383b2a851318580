pub const APP_NAME: &str = "Estate Compare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Release tag baked in by `build.rs` when building from a tagged checkout.
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    match GIT_TAG {
        Some(tag) => tag.to_string(),
        None => format!("v{APP_VERSION}"),
    }
}

pub fn window_title() -> String {
    format!("{APP_NAME} {}", version_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_prefixed() {
        let label = version_label();
        assert!(label.starts_with('v') || GIT_TAG.is_some());
        assert!(window_title().starts_with(APP_NAME));
    }
}
