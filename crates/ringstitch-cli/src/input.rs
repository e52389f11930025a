//! Scene files: rings and poles as JSON.
//!
//! ```json
//! {
//!   "rings": [
//!     { "object_id": "ball", "key": -1.5, "kind": "sphere",
//!       "polylines": [ { "points": [[1, 0, -1.5], [0, 1, -1.5], [-1, 0, -1.5]] } ] }
//!   ],
//!   "poles": [ { "position": [0, 0, -2], "role": "start", "object_id": "ball" } ]
//! }
//! ```
//!
//! The file is converted to core types once, here. Nothing downstream sees
//! the DTOs.

use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::Point3;
use ringstitch::synthetic::RingStack;
use ringstitch::{ObjectKind, Pole, PoleRole, Polyline, Ring};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub rings: Vec<RingDto>,
    #[serde(default)]
    pub poles: Vec<PoleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingDto {
    pub object_id: String,
    pub key: f64,
    #[serde(default)]
    pub kind: ObjectKind,
    pub polylines: Vec<PolylineDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolylineDto {
    pub points: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub chain_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoleDto {
    pub position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<PoleRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

impl SceneFile {
    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene from {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene JSON in {:?}", path))
    }

    /// Write the scene as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        std::fs::write(path, text).with_context(|| format!("Failed to write scene to {:?}", path))
    }

    pub fn from_stack(stack: &RingStack) -> Self {
        Self {
            rings: stack.rings.iter().map(RingDto::from).collect(),
            poles: stack.poles.iter().map(PoleDto::from).collect(),
        }
    }

    /// Convert into core rings and poles.
    pub fn into_core(self) -> (Vec<Ring>, Vec<Pole>) {
        let rings = self.rings.into_iter().map(Ring::from).collect();
        let poles = self.poles.into_iter().map(Pole::from).collect();
        (rings, poles)
    }
}

/// Load a scene file straight into core types.
pub fn load_scene(path: &Path) -> Result<(Vec<Ring>, Vec<Pole>)> {
    Ok(SceneFile::load(path)?.into_core())
}

fn point(p: [f64; 3]) -> Point3<f64> {
    Point3::new(p[0], p[1], p[2])
}

impl From<RingDto> for Ring {
    fn from(dto: RingDto) -> Self {
        Ring {
            polylines: dto
                .polylines
                .into_iter()
                .map(|p| Polyline {
                    points: p.points.into_iter().map(point).collect(),
                    chain_start: p.chain_start,
                })
                .collect(),
            key: dto.key,
            object_id: dto.object_id,
            kind: dto.kind,
            provenance: dto.provenance,
        }
    }
}

impl From<&Ring> for RingDto {
    fn from(ring: &Ring) -> Self {
        RingDto {
            object_id: ring.object_id.clone(),
            key: ring.key,
            kind: ring.kind,
            polylines: ring
                .polylines
                .iter()
                .map(|p| PolylineDto {
                    points: p.points.iter().map(|q| [q.x, q.y, q.z]).collect(),
                    chain_start: p.chain_start,
                })
                .collect(),
            provenance: ring.provenance.clone(),
        }
    }
}

impl From<PoleDto> for Pole {
    fn from(dto: PoleDto) -> Self {
        Pole {
            position: point(dto.position),
            role: dto.role,
            object_id: dto.object_id,
        }
    }
}

impl From<&Pole> for PoleDto {
    fn from(pole: &Pole) -> Self {
        PoleDto {
            position: [pole.position.x, pole.position.y, pole.position.z],
            role: pole.role,
            object_id: pole.object_id.clone(),
        }
    }
}
