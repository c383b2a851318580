use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;
use tracing::error;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();
static PLACEHOLDER_DATA_URI: OnceLock<String> = OnceLock::new();

/// Returns the contents of `assets/main.css` as a static string.
pub fn main_css() -> &'static str {
    MAIN_CSS.get_or_init(|| load_text("main.css")).as_str()
}

pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| svg_data_uri("favicon.svg"))
        .as_str()
}

/// Image shown for empty compare slots and projects without a master plan.
pub fn placeholder_data_uri() -> &'static str {
    PLACEHOLDER_DATA_URI
        .get_or_init(|| svg_data_uri("placeholder.svg"))
        .as_str()
}

fn load_text(path: &str) -> String {
    load_asset(path)
        .and_then(|bytes| String::from_utf8(bytes.into_owned()).ok())
        .unwrap_or_else(|| {
            error!(path, "embedded asset missing or not UTF-8");
            String::new()
        })
}

fn svg_data_uri(path: &str) -> String {
    format!("data:image/svg+xml;charset=utf-8,{}", escape_svg(&load_text(path)))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    EmbeddedAssets::get(path.trim_start_matches('/')).map(|file| file.data)
}

/// Percent-escapes the few characters that break an inline SVG data URI.
fn escape_svg(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    for ch in svg.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '"' => out.push('\''),
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        assert!(main_css().contains(".cell-best"));
    }

    #[test]
    fn svg_uri_is_escaped() {
        let uri = favicon_data_uri();
        assert!(uri.starts_with("data:image/svg+xml;charset=utf-8,%3Csvg"));
        assert!(!uri.contains('#'));
        assert!(!uri.contains('"'));
    }
}
