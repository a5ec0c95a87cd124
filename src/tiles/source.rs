use crate::core::geo::TileAddress;
use crate::MapError;

/// Trait representing anything that can produce tile URLs for a given address.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `address`.
    fn url(&self, address: TileAddress) -> String;
}

/// Resolves tile URLs by substituting `{z}`, `{x}` and `{y}` in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplateSource {
    template: String,
}

impl UrlTemplateSource {
    pub const PLACEHOLDERS: [&'static str; 3] = ["{z}", "{x}", "{y}"];

    pub fn new(template: impl Into<String>) -> Result<Self, MapError> {
        let template = template.into();
        Self::check_template(&template)?;
        Ok(Self { template })
    }

    /// Fails when any of the three placeholders is missing
    pub fn check_template(template: &str) -> Result<(), MapError> {
        let missing: Vec<&str> = Self::PLACEHOLDERS
            .iter()
            .copied()
            .filter(|token| !template.contains(token))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MapError::InvalidTemplate(format!(
                "'{}' is missing {}",
                template,
                missing.join(", ")
            )))
        }
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, address: TileAddress) -> String {
        self.template
            .replace("{z}", &address.z.to_string())
            .replace("{x}", &address.x.to_string())
            .replace("{y}", &address.y.to_string())
    }
}
