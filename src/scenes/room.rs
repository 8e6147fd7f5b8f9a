use crate::loaders::MeshData;
use crate::math::AABB;

/// Corner `i` of the room cube: bit 2 selects max x, bit 1 max y, bit 0 max z.
fn corners(bounds: &AABB, scale: f32) -> [[f32; 3]; 8] {
    let center = bounds.center();
    let half = bounds.max_extent() * scale;
    let (lo, hi) = (center - half, center + half);

    std::array::from_fn(|i| {
        [
            if i & 4 != 0 { hi.x } else { lo.x },
            if i & 2 != 0 { hi.y } else { lo.y },
            if i & 1 != 0 { hi.z } else { lo.z },
        ]
    })
}

/// Triangles of the x-min wall, which the room leaves open for the mirror.
const MIRROR_FACES: [[u32; 3]; 2] = [[2, 1, 0], [2, 3, 1]];

/// Remaining five walls, wound so their normals point into the room.
const ROOM_FACES: [[u32; 3]; 10] = [
    [5, 6, 4],
    [7, 6, 5],
    [1, 4, 0],
    [5, 4, 1],
    [6, 3, 2],
    [6, 7, 3],
    [4, 2, 0],
    [4, 6, 2],
    [3, 5, 1],
    [7, 5, 3],
];

/// Cube enclosing `bounds` with half-size `scale * max_extent`, missing the
/// x-min wall.
pub fn room_mesh(bounds: &AABB, scale: f32) -> MeshData {
    MeshData::new(corners(bounds, scale).to_vec(), ROOM_FACES.to_vec())
}

/// The x-min wall of [`room_mesh`] as a separate panel.
pub fn mirror_mesh(bounds: &AABB, scale: f32) -> MeshData {
    let corners = corners(bounds, scale);
    MeshData::new(corners[..4].to_vec(), MIRROR_FACES.to_vec())
}
