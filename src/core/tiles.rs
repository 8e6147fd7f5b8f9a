use std::sync::atomic::{AtomicU64, Ordering};

use glam::{UVec2, Vec4};
use rayon::prelude::*;

use crate::error::Result;

/// Rectangle of pixels shaded as one unit of work. Edge tiles are clipped to
/// the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Rays cast by a single tile. Folded into the worker's slot once the tile
/// is done.
#[derive(Debug, Default)]
pub struct RayCounter {
    rays: u64,
}

impl RayCounter {
    #[inline]
    pub fn add(&mut self) {
        self.rays += 1;
    }

    pub fn get(&self) -> u64 {
        self.rays
    }
}

/// Mutable window onto one tile of the pixel buffer: one RGBA span per row.
struct TileView<'a> {
    tile: Tile,
    rows: Vec<&'a mut [f32]>,
}

/// Splits a `width * height * 4` buffer into disjoint tile views.
fn split_tiles(pixels: &mut [f32], size: UVec2, tile_size: UVec2) -> Vec<TileView<'_>> {
    let row_len = size.x as usize * 4;
    let span_len = tile_size.x as usize * 4;
    let columns = size.x.div_ceil(tile_size.x);

    pixels
        .chunks_mut(row_len * tile_size.y as usize)
        .enumerate()
        .flat_map(|(band, band_pixels)| {
            let band_rows = (band_pixels.len() / row_len) as u32;
            let mut views: Vec<TileView> = (0..columns)
                .map(|column| {
                    let x = column * tile_size.x;
                    TileView {
                        tile: Tile {
                            x,
                            y: band as u32 * tile_size.y,
                            width: tile_size.x.min(size.x - x),
                            height: band_rows,
                        },
                        rows: Vec::with_capacity(band_rows as usize),
                    }
                })
                .collect();

            for row in band_pixels.chunks_mut(row_len) {
                for (view, span) in views.iter_mut().zip(row.chunks_mut(span_len)) {
                    view.rows.push(span);
                }
            }

            views
        })
        .collect()
}

/// Runs per-pixel shading over tiles on a dedicated worker pool.
///
/// Every worker owns one ray counter slot. Slots are summed and cleared after
/// the parallel phase completes, so the total never mixes two frames.
pub struct TileScheduler {
    pool: rayon::ThreadPool,
    tile_size: UVec2,
    ray_counts: Vec<AtomicU64>,
}

impl TileScheduler {
    pub fn new(tile_size: UVec2, threads: Option<usize>) -> Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|index| format!("tile-worker-{index}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let workers = pool.current_num_threads();
        log::info!(
            "tile scheduler: {workers} workers, {}x{} tiles",
            tile_size.x,
            tile_size.y
        );

        Ok(Self {
            pool,
            tile_size: tile_size.max(UVec2::ONE),
            ray_counts: (0..workers).map(|_| AtomicU64::new(0)).collect(),
        })
    }

    pub fn workers(&self) -> usize {
        self.ray_counts.len()
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn tile_count(&self, size: UVec2) -> u32 {
        size.x.div_ceil(self.tile_size.x) * size.y.div_ceil(self.tile_size.y)
    }

    /// Shades every pixel of `pixels` (RGBA, `size.x * size.y * 4` floats)
    /// and returns the total number of rays counted by `shade`.
    ///
    /// `shade` is called exactly once per pixel, from any worker, in no
    /// particular order.
    pub fn render<F>(&self, pixels: &mut [f32], size: UVec2, shade: F) -> u64
    where
        F: Fn(u32, u32, &mut RayCounter) -> Vec4 + Sync,
    {
        if size.x == 0 || size.y == 0 {
            return 0;
        }
        debug_assert_eq!(pixels.len(), size.x as usize * size.y as usize * 4);

        let views = split_tiles(pixels, size, self.tile_size);
        let ray_counts = &self.ray_counts;

        self.pool.install(|| {
            views.into_par_iter().for_each(|mut view| {
                let mut counter = RayCounter::default();
                for (dy, row) in view.rows.iter_mut().enumerate() {
                    for (dx, pixel) in row.chunks_exact_mut(4).enumerate() {
                        let color = shade(
                            view.tile.x + dx as u32,
                            view.tile.y + dy as u32,
                            &mut counter,
                        );
                        pixel.copy_from_slice(&color.to_array());
                    }
                }

                let worker = rayon::current_thread_index().unwrap_or(0);
                if let Some(slot) = ray_counts.get(worker) {
                    slot.fetch_add(counter.get(), Ordering::Relaxed);
                }
            });
        });

        ray_counts
            .iter()
            .map(|slot| slot.swap(0, Ordering::Relaxed))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(threads: usize) -> TileScheduler {
        TileScheduler::new(UVec2::splat(8), Some(threads)).unwrap()
    }

    #[test]
    fn edge_tiles_are_clipped() {
        let mut pixels = vec![0.0; 10 * 9 * 4];
        let views = split_tiles(&mut pixels, UVec2::new(10, 9), UVec2::splat(8));
        let tiles: Vec<Tile> = views.iter().map(|v| v.tile).collect();

        assert_eq!(
            tiles,
            vec![
                Tile { x: 0, y: 0, width: 8, height: 8 },
                Tile { x: 8, y: 0, width: 2, height: 8 },
                Tile { x: 0, y: 8, width: 8, height: 1 },
                Tile { x: 8, y: 8, width: 2, height: 1 },
            ]
        );
        for view in &views {
            assert_eq!(view.rows.len(), view.tile.height as usize);
            assert!(view.rows.iter().all(|r| r.len() == view.tile.width as usize * 4));
        }
    }

    #[test]
    fn every_pixel_written_with_own_coordinates() {
        let size = UVec2::new(37, 21);
        let mut pixels = vec![-1.0; (size.x * size.y * 4) as usize];

        scheduler(4).render(&mut pixels, size, |x, y, _| {
            Vec4::new(x as f32, y as f32, 0.0, 1.0)
        });

        for y in 0..size.y {
            for x in 0..size.x {
                let i = ((y * size.x + x) * 4) as usize;
                assert_eq!(&pixels[i..i + 4], &[x as f32, y as f32, 0.0, 1.0]);
            }
        }
    }

    #[test]
    fn ray_counts_are_summed_then_reset() {
        let size = UVec2::new(16, 16);
        let mut pixels = vec![0.0; (size.x * size.y * 4) as usize];
        let scheduler = scheduler(3);

        let shade = |_: u32, _: u32, counter: &mut RayCounter| {
            counter.add();
            counter.add();
            Vec4::ONE
        };

        assert_eq!(scheduler.render(&mut pixels, size, shade), 512);
        assert_eq!(scheduler.render(&mut pixels, size, shade), 512);
        assert_eq!(scheduler.workers(), 3);
    }

    #[test]
    fn empty_image_casts_nothing() {
        let mut pixels = Vec::new();
        let rays = scheduler(2).render(&mut pixels, UVec2::ZERO, |_, _, counter| {
            counter.add();
            Vec4::ONE
        });
        assert_eq!(rays, 0);
    }

    #[test]
    fn tile_count_rounds_up() {
        assert_eq!(scheduler(1).tile_count(UVec2::new(640, 480)), 80 * 60);
        assert_eq!(scheduler(1).tile_count(UVec2::new(9, 1)), 2);
    }
}
