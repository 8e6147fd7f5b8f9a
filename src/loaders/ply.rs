use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::MeshData;
use crate::error::{RenderError, Result};

/// Loads the `vertex` positions and `face` index lists of an ASCII or binary
/// PLY file. Polygons with more than three corners are fan-triangulated.
pub fn load_ply_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| RenderError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let ply = Parser::<DefaultElement>::new()
        .read_ply(&mut reader)
        .map_err(|e| RenderError::parse(path, e))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| RenderError::parse(path, "missing vertex element"))?
        .iter()
        .map(|vertex| {
            let coord = |name: &str| {
                vertex
                    .get(name)
                    .and_then(scalar)
                    .ok_or_else(|| RenderError::parse(path, format!("vertex without scalar {name}")))
            };
            Ok([coord("x")?, coord("y")?, coord("z")?])
        })
        .collect::<Result<Vec<_>>>()?;

    let mut faces = Vec::new();
    for face in ply.payload.get("face").map(Vec::as_slice).unwrap_or_default() {
        let indices = face
            .get("vertex_indices")
            .or_else(|| face.get("vertex_index"))
            .and_then(index_list)
            .ok_or_else(|| RenderError::parse(path, "face without vertex_indices list"))?;

        if let Some(&i) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::parse(
                path,
                format!("face index {i} out of range for {} vertices", vertices.len()),
            ));
        }

        faces.extend(
            indices
                .windows(2)
                .skip(1)
                .map(|pair| [indices[0], pair[0], pair[1]]),
        );
    }

    Ok(MeshData::new(vertices, faces))
}

fn scalar(property: &Property) -> Option<f32> {
    match *property {
        Property::Float(v) => Some(v),
        Property::Double(v) => Some(v as f32),
        Property::Char(v) => Some(v as f32),
        Property::UChar(v) => Some(v as f32),
        Property::Short(v) => Some(v as f32),
        Property::UShort(v) => Some(v as f32),
        Property::Int(v) => Some(v as f32),
        Property::UInt(v) => Some(v as f32),
        _ => None,
    }
}

fn index_list(property: &Property) -> Option<Vec<u32>> {
    fn unsigned<T: TryInto<u32> + Copy>(values: &[T]) -> Option<Vec<u32>> {
        values.iter().map(|&v| v.try_into().ok()).collect()
    }

    match property {
        Property::ListChar(v) => unsigned(v),
        Property::ListUChar(v) => unsigned(v),
        Property::ListShort(v) => unsigned(v),
        Property::ListUShort(v) => unsigned(v),
        Property::ListInt(v) => unsigned(v),
        Property::ListUInt(v) => unsigned(v),
        _ => None,
    }
}
