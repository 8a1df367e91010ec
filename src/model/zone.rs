use serde::{Deserialize, Serialize};

/// Rectangle a zone covers on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A coloured grouping overlay. Has no structural link to nodes or edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub color: String,
    pub position: ZoneRect,
}

impl Zone {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        position: ZoneRect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            position,
        }
    }
}

/// Partial update for a zone; each given field replaces the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: Option<ZoneRect>,
}

impl ZoneUpdate {
    pub fn apply(self, zone: &mut Zone) {
        if let Some(name) = self.name {
            zone.name = name;
        }
        if let Some(color) = self.color {
            zone.color = color;
        }
        if let Some(position) = self.position {
            zone.position = position;
        }
    }
}
