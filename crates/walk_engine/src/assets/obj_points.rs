//! OBJ vertex-position loader
//!
//! Bounding volumes only need the raw vertex positions of a mesh, so this
//! loader reads `v` records and nothing else; faces, normals, and texture
//! coordinates belong to the renderer's own mesh pipeline.

use crate::foundation::math::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// OBJ loading errors.
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Vertex-position extractor for OBJ files.
pub struct ObjPoints;

impl ObjPoints {
    /// Load all vertex positions from an OBJ file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Point3>, ObjError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut points = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts[0] == "v" && parts.len() >= 4 {
                let x = parse_coord(parts[1], "x")?;
                let y = parse_coord(parts[2], "y")?;
                let z = parse_coord(parts[3], "z")?;
                points.push(Point3::new(x, y, z));
            }
        }
        Ok(points)
    }
}

fn parse_coord(text: &str, axis: &str) -> Result<f32, ObjError> {
    text.parse()
        .map_err(|_| ObjError::ParseError(format!("Invalid vertex {axis}: `{text}`")))
}
