// src/utils.rs
use web_sys::window;

/// Directory bare SVG file names are served from.
pub const SVG_DIR: &str = "public/svg";

/// Get the base URL for the application
/// This handles both local development and GitHub Pages deployment
pub fn get_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(location) = window.location().pathname() {
            if location.starts_with("/svg-viewer/") {
                return "/svg-viewer".to_string();
            }
        }
    }
    String::new()
}

/// Resolves an SVG source against `base`.
///
/// `http(s)://` URLs pass through untouched, `/`-prefixed paths are joined to
/// the base, and anything else is treated as a file under [`SVG_DIR`].
pub fn join_resource_url(base: &str, path: &str) -> String {
    let path = path.trim();
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    match path.strip_prefix('/') {
        Some(rooted) => format!("{}/{}", base, rooted.trim_start_matches('/')),
        None => format!("{}/{}/{}", base, SVG_DIR, path.trim_start_matches("./")),
    }
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    join_resource_url(&get_base_url(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_untouched() {
        assert_eq!(
            join_resource_url("/svg-viewer", "https://cdn.example.org/map.svg"),
            "https://cdn.example.org/map.svg"
        );
        assert_eq!(
            join_resource_url("", "HTTP://example.org/a.svg"),
            "HTTP://example.org/a.svg"
        );
    }

    #[test]
    fn test_rooted_paths_join_base() {
        assert_eq!(join_resource_url("", "/public/svg/a.svg"), "/public/svg/a.svg");
        assert_eq!(
            join_resource_url("/svg-viewer", "/public/svg/a.svg"),
            "/svg-viewer/public/svg/a.svg"
        );
        assert_eq!(join_resource_url("/svg-viewer/", "//x.svg"), "/svg-viewer/x.svg");
    }

    #[test]
    fn test_bare_names_resolve_under_svg_dir() {
        assert_eq!(join_resource_url("", "floorplan.svg"), "/public/svg/floorplan.svg");
        assert_eq!(
            join_resource_url("/svg-viewer", "./maps/city.svg"),
            "/svg-viewer/public/svg/maps/city.svg"
        );
    }
}
