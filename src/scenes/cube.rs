use crate::loaders::MeshData;

impl MeshData {
    /// Unit cube spanning `[0, 1]^3`: 8 vertices, 12 outward-facing triangles.
    pub fn cube() -> Self {
        let vertices = (0..8)
            .map(|i| {
                [
                    (i >> 2 & 1) as f32,
                    (i >> 1 & 1) as f32,
                    (i & 1) as f32,
                ]
            })
            .collect();

        let faces = vec![
            // x = 0
            [0, 1, 2],
            [1, 3, 2],
            // x = 1
            [4, 6, 5],
            [5, 6, 7],
            // y = 0
            [0, 4, 1],
            [1, 4, 5],
            // y = 1
            [2, 3, 6],
            [3, 7, 6],
            // z = 0
            [0, 2, 4],
            [2, 6, 4],
            // z = 1
            [1, 5, 3],
            [3, 5, 7],
        ];

        Self::new(vertices, faces)
    }
}
