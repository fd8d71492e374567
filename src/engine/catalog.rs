use std::{collections::HashSet, path::Path};

use anyhow::Context;

use crate::{
    engine::overlay::CatalogEntry,
    foundation::error::{OverlayzError, OverlayzResult},
};

/// Named group of catalog entries (hats, glasses, ...).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogCategory {
    /// Display name of the group.
    pub name: String,
    /// Entries in display order.
    pub entries: Vec<CatalogEntry>,
}

/// Ordered collection of overlay templates a user can pick from.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverlayCatalog {
    /// Groups in display order.
    pub categories: Vec<CatalogCategory>,
}

impl OverlayCatalog {
    /// Stock catalog; image paths are relative to the asset root.
    pub fn builtin() -> Self {
        fn category(name: &str, entries: &[(&str, &str, &str)]) -> CatalogCategory {
            CatalogCategory {
                name: name.to_string(),
                entries: entries
                    .iter()
                    .map(|(id, label, file)| {
                        CatalogEntry::new(*id, *label, format!("assets/overlays/{name}/{file}"))
                    })
                    .collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    "hats",
                    &[
                        ("hat1", "Party Hat", "party-hat.png"),
                        ("hat2", "Cowboy Hat", "cowboy-hat.png"),
                        ("hat3", "Crown", "crown.png"),
                        ("hat4", "Beanie", "beanie.png"),
                        ("hat5", "Wizard Hat", "wizard-hat.png"),
                        ("hat6", "Cap", "cap.png"),
                    ],
                ),
                category(
                    "glasses",
                    &[
                        ("glass1", "Sunglasses", "sunglasses.png"),
                        ("glass2", "Nerd Glasses", "nerd-glasses.png"),
                        ("glass3", "Cool Shades", "cool-shades.png"),
                        ("glass4", "Heart Glasses", "heart-glasses.png"),
                    ],
                ),
                category(
                    "accessories",
                    &[
                        ("acc1", "Coffee Cup", "coffee-cup.png"),
                        ("acc2", "Microphone", "microphone.png"),
                        ("acc3", "Pipe", "pipe.png"),
                        ("acc4", "Bow Tie", "bow-tie.png"),
                        ("acc5", "Mustache", "mustache.png"),
                    ],
                ),
            ],
        }
    }

    /// Parse and validate a catalog document.
    pub fn from_json_str(s: &str) -> OverlayzResult<Self> {
        let catalog: Self = serde_json::from_str(s)
            .map_err(|e| OverlayzError::validation(format!("overlay catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog document from disk.
    pub fn from_path(path: &Path) -> OverlayzResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay catalog '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Entry ids must be non-empty and unique across all categories.
    pub fn validate(&self) -> OverlayzResult<()> {
        let mut seen = HashSet::new();
        for entry in self.entries() {
            if entry.id.trim().is_empty() {
                return Err(OverlayzError::validation("catalog entry id must be non-empty"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(OverlayzError::validation(format!(
                    "duplicate catalog entry id '{}'",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// All entries across categories, in order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    /// Entry with `id`, if any.
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries().find(|e| e.id == id)
    }

    /// Category named `name`, if any.
    pub fn category(&self, name: &str) -> Option<&CatalogCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/catalog.rs"]
mod tests;
