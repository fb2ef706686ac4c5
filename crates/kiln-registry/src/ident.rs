//! Identifier and storage path derivation

use kiln_core::{AssetFamily, Dimensions};

/// Category segment used when a need carries no category
pub const CATEGORY_PLACEHOLDER: &str = "general";

/// Project segment used for assets not tied to a project
pub const PROJECT_PLACEHOLDER: &str = "shared";

/// Lowercase, replace anything non-alphanumeric with `-`, collapse runs
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "asset".to_string()
    } else {
        out
    }
}

/// Stable identifier: `{family}-{category}-{name}-{w}x{h}`.
///
/// The same inputs always produce the same identifier, which is what makes
/// registration idempotent.
pub fn derive_identifier(
    family: AssetFamily,
    category: Option<&str>,
    name: &str,
    dimensions: Dimensions,
) -> String {
    let category = category
        .map(sanitize_name)
        .unwrap_or_else(|| CATEGORY_PLACEHOLDER.to_string());
    format!(
        "{}-{}-{}-{}",
        family,
        category,
        sanitize_name(name),
        dimensions
    )
}

/// Payload location relative to the registry root.
///
/// The file stem carries the dimensions, so two sizes of the same named asset
/// never share a file.
pub fn storage_path(
    family: AssetFamily,
    category: Option<&str>,
    project: Option<&str>,
    name: &str,
    dimensions: Dimensions,
    extension: &str,
) -> String {
    let category = category
        .map(sanitize_name)
        .unwrap_or_else(|| CATEGORY_PLACEHOLDER.to_string());
    let project = project
        .map(sanitize_name)
        .unwrap_or_else(|| PROJECT_PLACEHOLDER.to_string());
    format!(
        "assets/{}/{}/{}/{}-{}.{}",
        family,
        category,
        project,
        sanitize_name(name),
        dimensions,
        extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_name("Glossy Blue  Button!"), "glossy-blue-button");
        assert_eq!(sanitize_name("--Health_Bar--"), "health-bar");
        assert_eq!(sanitize_name("???"), "asset");
    }

    #[test]
    fn test_identifier_is_stable() {
        let a = derive_identifier(
            AssetFamily::Ui,
            Some("Button"),
            "blue button",
            Dimensions::new(120, 40),
        );
        let b = derive_identifier(
            AssetFamily::Ui,
            Some("button"),
            "Blue Button",
            Dimensions::new(120, 40),
        );
        assert_eq!(a, "ui-button-blue-button-120x40");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identifier_without_category() {
        let id = derive_identifier(AssetFamily::Icon, None, "heart", Dimensions::square(32));
        assert_eq!(id, "icon-general-heart-32x32");
    }

    #[test]
    fn test_storage_path() {
        assert_eq!(
            storage_path(
                AssetFamily::Sprite,
                Some("character"),
                Some("My Game"),
                "knight",
                Dimensions::new(32, 48),
                "png"
            ),
            "assets/sprite/character/my-game/knight-32x48.png"
        );
        assert_eq!(
            storage_path(AssetFamily::Icon, None, None, "heart", Dimensions::square(16), ".svg"),
            "assets/icon/general/shared/heart-16x16.svg"
        );
    }

    #[test]
    fn test_storage_path_differs_by_size() {
        let wide = storage_path(AssetFamily::Ui, Some("bar"), None, "health bar", Dimensions::new(200, 24), "png");
        let narrow = storage_path(AssetFamily::Ui, Some("bar"), None, "health bar", Dimensions::new(100, 12), "png");
        assert_ne!(wide, narrow);
    }
}
