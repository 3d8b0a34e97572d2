//! Garment part registry and layout configuration.
//!
//! Garment parts are named UV-space regions (front, back, arms) used for
//! two things: hit-testing a pointer click to a part, and supplying the
//! default placement box for newly uploaded artwork. UV layouts differ per
//! 3D model, so parts are configuration data loaded at construction, never
//! constants baked into render code.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use garmentstudio_core::error::{ConfigError, Error, Result};
use garmentstudio_core::geometry::{UvPoint, UvRect};

/// Identifier for a garment part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named UV region of the garment.
///
/// `region` is the area of the UV atlas belonging to this part, used for
/// hit-testing. `placement` is the default box inside that region where new
/// artwork lands. Regions may geometrically overlap (a catch-all body region
/// under specific arm regions); `priority` resolves the overlap
/// deterministically, lower values winning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentPart {
    pub id: PartId,
    pub label: String,
    pub region: UvRect,
    pub placement: UvRect,
    pub priority: u32,
}

/// Serializable set of garment parts for one 3D model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartLayout {
    pub parts: Vec<GarmentPart>,
}

impl PartLayout {
    /// Load a layout from a JSON file, validating it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            reason: format!("Failed to read part layout: {}", e),
        })?;

        let layout: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;

        layout.validate()?;
        Ok(layout)
    }

    /// Save this layout to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| {
            Error::Config(ConfigError::Io {
                reason: format!("Failed to write part layout: {}", e),
            })
        })?;

        Ok(())
    }

    /// Validate the layout: at least one part, unique ids, and every region
    /// and placement rectangle inside the unit square with positive size.
    pub fn validate(&self) -> Result<()> {
        if self.parts.is_empty() {
            return Err(ConfigError::EmptyLayout.into());
        }

        let mut seen = std::collections::HashSet::new();
        for part in &self.parts {
            if !seen.insert(&part.id) {
                return Err(ConfigError::DuplicatePart {
                    id: part.id.to_string(),
                }
                .into());
            }
            part.region
                .validate_placement()
                .map_err(|reason| ConfigError::InvalidPart {
                    id: part.id.to_string(),
                    reason,
                })?;
            part.placement
                .validate_placement()
                .map_err(|reason| ConfigError::InvalidPart {
                    id: part.id.to_string(),
                    reason,
                })?;
        }
        Ok(())
    }
}

impl Default for PartLayout {
    /// Quadrant atlas for a basic two-sleeve garment: front and back panels
    /// on the top row, sleeves on the bottom row. Placement boxes sit in the
    /// print area of each panel.
    fn default() -> Self {
        Self {
            parts: vec![
                GarmentPart {
                    id: PartId::new("front"),
                    label: "Front".to_string(),
                    region: UvRect::new(0.0, 0.0, 0.5, 0.5),
                    placement: UvRect::new(0.25, 0.3, 0.15, 0.2),
                    priority: 10,
                },
                GarmentPart {
                    id: PartId::new("back"),
                    label: "Back".to_string(),
                    region: UvRect::new(0.5, 0.0, 0.5, 0.5),
                    placement: UvRect::new(0.65, 0.3, 0.15, 0.2),
                    priority: 10,
                },
                GarmentPart {
                    id: PartId::new("left-arm"),
                    label: "Left arm".to_string(),
                    region: UvRect::new(0.0, 0.5, 0.5, 0.5),
                    placement: UvRect::new(0.15, 0.6, 0.1, 0.12),
                    priority: 10,
                },
                GarmentPart {
                    id: PartId::new("right-arm"),
                    label: "Right arm".to_string(),
                    region: UvRect::new(0.5, 0.5, 0.5, 0.5),
                    placement: UvRect::new(0.65, 0.6, 0.1, 0.12),
                    priority: 10,
                },
            ],
        }
    }
}

/// Registry of garment parts with deterministic hit-testing.
#[derive(Debug, Clone)]
pub struct PartRegistry {
    parts: Vec<GarmentPart>,
    /// Indices into `parts` in hit-test order.
    scan_order: Vec<usize>,
}

impl PartRegistry {
    /// Build a registry from a validated layout.
    pub fn from_layout(layout: PartLayout) -> Result<Self> {
        layout.validate()?;
        let mut registry = Self {
            parts: layout.parts,
            scan_order: Vec::new(),
        };
        registry.rebuild_scan_order();
        Ok(registry)
    }

    /// Recompute the fixed hit-test order: priority ascending, then region
    /// area ascending (more specific regions win ties), then id for total
    /// determinism.
    fn rebuild_scan_order(&mut self) {
        let mut order: Vec<usize> = (0..self.parts.len()).collect();
        order.sort_by(|&a, &b| {
            let pa = &self.parts[a];
            let pb = &self.parts[b];
            pa.priority
                .cmp(&pb.priority)
                .then(
                    pa.region
                        .area()
                        .partial_cmp(&pb.region.area())
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(pa.id.cmp(&pb.id))
        });
        self.scan_order = order;
    }

    /// Find the part whose region contains the given UV point.
    ///
    /// Regions are scanned in the fixed priority order and the first hit
    /// wins; overlap between regions is resolved here, never reported as an
    /// error.
    pub fn hit_test(&self, uv: UvPoint) -> Option<&GarmentPart> {
        self.scan_order
            .iter()
            .map(|&i| &self.parts[i])
            .find(|part| part.region.contains(uv))
    }

    /// Get a part by id.
    pub fn get(&self, id: &PartId) -> Option<&GarmentPart> {
        self.parts.iter().find(|p| &p.id == id)
    }

    /// Get a part's default placement box.
    pub fn placement(&self, id: &PartId) -> Option<UvRect> {
        self.get(id).map(|p| p.placement)
    }

    /// Overwrite a part's default placement box.
    ///
    /// The rectangle must be finite, positively sized, and inside the unit
    /// square; otherwise the registry is left unchanged.
    pub fn set_placement(&mut self, id: &PartId, rect: UvRect) -> Result<()> {
        rect.validate_placement()?;
        let part = self
            .parts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ConfigError::UnknownPart { id: id.to_string() })?;
        part.placement = rect;
        tracing::debug!("Placement for part {} set to {:?}", id, rect);
        Ok(())
    }

    /// Iterate parts in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &GarmentPart> {
        self.parts.iter()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Snapshot the current configuration for persistence.
    pub fn layout(&self) -> PartLayout {
        PartLayout {
            parts: self.parts.clone(),
        }
    }
}

impl Default for PartRegistry {
    fn default() -> Self {
        let mut registry = Self {
            parts: PartLayout::default().parts,
            scan_order: Vec::new(),
        };
        registry.rebuild_scan_order();
        registry
    }
}
