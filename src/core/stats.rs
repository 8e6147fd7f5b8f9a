use glam::UVec2;

const FPS_WINDOW: usize = 10;
const FRAME_SYMBOLS: [char; 8] = ['-', '-', '\\', '\\', '|', '|', '/', '/'];

/// Moving average of instantaneous frame rates over a fixed window.
///
/// The window starts zero-filled, so the average ramps up over the first
/// frames.
#[derive(Debug, Clone)]
pub struct FpsAverage {
    records: [f32; FPS_WINDOW],
    index: usize,
    average: f32,
}

impl FpsAverage {
    pub fn new() -> Self {
        Self {
            records: [0.0; FPS_WINDOW],
            index: 0,
            average: 0.0,
        }
    }

    /// Records a frame that took `delta` seconds. Non-positive deltas are
    /// ignored.
    pub fn record(&mut self, delta: f32) -> f32 {
        if delta > 0.0 {
            self.records[self.index] = 1.0 / delta;
            self.index = (self.index + 1) % FPS_WINDOW;
            self.average = self.records.iter().sum::<f32>() / FPS_WINDOW as f32;
        }
        self.average
    }

    pub fn average(&self) -> f32 {
        self.average
    }
}

impl Default for FpsAverage {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner advanced once per rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameSymbol {
    index: usize,
}

impl FrameSymbol {
    pub fn next(&mut self) -> char {
        let symbol = FRAME_SYMBOLS[self.index];
        self.index = (self.index + 1) % FRAME_SYMBOLS.len();
        symbol
    }
}

/// Status readout for the render loop.
#[derive(Debug, Clone)]
pub struct FrameStats {
    fps: FpsAverage,
    symbol: FrameSymbol,
    last_symbol: char,
    rays_per_second: f64,
    size: UVec2,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            fps: FpsAverage::new(),
            symbol: FrameSymbol::default(),
            last_symbol: FRAME_SYMBOLS[0],
            rays_per_second: 0.0,
            size: UVec2::ZERO,
        }
    }

    pub fn record_frame(&mut self, delta: f32, rays_per_second: f64, size: UVec2) {
        self.fps.record(delta);
        self.last_symbol = self.symbol.next();
        self.rays_per_second = rays_per_second;
        self.size = size;
    }

    pub fn average_fps(&self) -> f32 {
        self.fps.average()
    }

    pub fn fps_text(&self) -> String {
        format!("FPS: {:07.3}", self.fps.average())
    }

    pub fn rays_text(&self) -> String {
        format!("{:07.3} Mrays/s", self.rays_per_second / 1e6)
    }

    pub fn size_text(&self) -> String {
        format!("Size: {:4} X {:4}", self.size.x, self.size.y)
    }

    pub fn frame_text(&self) -> String {
        format!("Frame: {}", self.last_symbol)
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.frame_text(),
            self.fps_text(),
            self.rays_text(),
            self.size_text()
        )
    }
}
