use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_COORDINATE: f64 = 10_000.0;
pub const MAX_POINTS: usize = 2_000;
pub const MIN_WIDTH: f64 = 1.0;
pub const MAX_WIDTH: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A single pen stroke as drawn by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    /// "#rrggbb"
    pub color: String,
    pub width: f64,
}

/// A stroke once accepted onto the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredStroke {
    pub id: String,
    #[serde(flatten)]
    pub stroke: Stroke,
    pub created_at: DateTime<Utc>,
}

impl Stroke {
    /// Check shape and bounds. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() || self.points.len() > MAX_POINTS {
            return Err(format!("A stroke needs between 1 and {} points", MAX_POINTS));
        }

        let in_bounds = |v: f64| v.is_finite() && (0.0..=MAX_COORDINATE).contains(&v);
        if !self.points.iter().all(|p| in_bounds(p.x) && in_bounds(p.y)) {
            return Err(format!(
                "Point coordinates must be between 0 and {}",
                MAX_COORDINATE
            ));
        }

        if !self.width.is_finite() || !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(format!(
                "Stroke width must be between {} and {}",
                MIN_WIDTH, MAX_WIDTH
            ));
        }

        let hex = self.color.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Color must look like #rrggbb".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> Stroke {
        Stroke {
            points: vec![Point { x: 10.0, y: 20.0 }, Point { x: 15.5, y: 22.0 }],
            color: "#1a2B3c".to_string(),
            width: 3.0,
        }
    }

    #[test]
    fn test_valid_stroke() {
        assert!(stroke().validate().is_ok());
    }

    #[test]
    fn test_invalid_strokes() {
        let mut s = stroke();
        s.points.clear();
        assert!(s.validate().is_err());

        let mut s = stroke();
        s.points.push(Point { x: f64::NAN, y: 0.0 });
        assert!(s.validate().is_err());

        let mut s = stroke();
        s.points.push(Point { x: -1.0, y: 0.0 });
        assert!(s.validate().is_err());

        let mut s = stroke();
        s.width = 0.5;
        assert!(s.validate().is_err());

        for color in ["red", "#12345", "#12345g", "123456"] {
            let mut s = stroke();
            s.color = color.to_string();
            assert!(s.validate().is_err(), "{} should be rejected", color);
        }
    }

    #[test]
    fn test_stored_stroke_is_flat_json() {
        let stored = StoredStroke {
            id: "1".to_string(),
            stroke: stroke(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["color"], "#1a2B3c");
        assert_eq!(value["points"][1]["x"], 15.5);
    }
}
