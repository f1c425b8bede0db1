use super::RouteSpec;
use anyhow::Context;
use http::Method;
use serde::Deserialize;
use std::path::Path;

/// On-disk shape of a single route entry.
#[derive(Debug, Deserialize)]
struct RouteEntry {
    method: String,
    path: String,
    handler: String,
}

/// Load route definitions from a YAML or JSON file.
///
/// The file is a list of `{ method, path, handler }` entries:
///
/// ```yaml
/// - method: GET
///   path: /pets/{id}
///   handler: get_pet
/// - method: POST
///   path: /pets
///   handler: create_pet
/// ```
///
/// The extension selects the parser (`.yaml`/`.yml` vs JSON). Entries are
/// returned in file order, which the matcher uses for registration-order
/// tie-breaks.
pub fn load_routes(path: impl AsRef<Path>) -> anyhow::Result<Vec<RouteSpec>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    routes_from_str(&content, yaml)
        .with_context(|| format!("failed to parse route file {}", path.display()))
}

/// Parse route definitions from a string, YAML when `yaml` is true, JSON
/// otherwise.
pub fn routes_from_str(content: &str, yaml: bool) -> anyhow::Result<Vec<RouteSpec>> {
    let entries: Vec<RouteEntry> = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };

    entries
        .into_iter()
        .map(|e| {
            let method: Method = e
                .method
                .to_uppercase()
                .parse()
                .with_context(|| format!("invalid HTTP method {:?}", e.method))?;
            Ok(RouteSpec::new(method, e.path, e.handler))
        })
        .collect()
}
