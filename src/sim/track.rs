//! Drivable-surface mask
//!
//! The field is an RGB raster. A point is road when its colour is a
//! near-grey shade; everything else (the grass) is off-track. The default
//! oval is generated procedurally, but any raster drawn by a renderer can
//! be wrapped with [`TrackSurface::from_rgb`].

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, GRAYSCALE_THRESHOLD};

/// Outer edge of the road (min corner, max corner)
const OUTER_MIN: Vec2 = Vec2::new(100.0, 100.0);
const OUTER_MAX: Vec2 = Vec2::new(700.0, 500.0);
/// Inner grass island
const INNER_MIN: Vec2 = Vec2::new(200.0, 200.0);
const INNER_MAX: Vec2 = Vec2::new(600.0, 400.0);
const CORNER_RADIUS: f32 = 50.0;

/// Start/finish line: two columns of checkered boxes across the top straight
const START_LINE_X: f32 = 390.0;
const START_LINE_Y: f32 = 100.0;
const START_LINE_LENGTH: f32 = 100.0;
const START_BOX: f32 = 10.0;

const GRASS_LIGHT: [u8; 3] = [0x34, 0xC7, 0x59];
const GRASS_DARK: [u8; 3] = [0x2C, 0x9D, 0x46];
const ROAD_LIGHT: [u8; 3] = [0x88, 0x88, 0x88];
const ROAD_DARK: [u8; 3] = [0x66, 0x66, 0x66];
const LINE_WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];
const LINE_GREY: [u8; 3] = [0xA9, 0xA9, 0xA9];

/// Immutable RGB raster of the playing field
#[derive(Debug, Clone)]
pub struct TrackSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl TrackSurface {
    /// Wrap an externally rasterised field (row-major, `width * height` pixels)
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// The standard oval: grass field, rounded-rectangle road ring, start line
    pub fn oval() -> Self {
        let (width, height) = (FIELD_WIDTH, FIELD_HEIGHT);
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        let mut pixels = Vec::with_capacity(width as usize * height as usize);

        for py in 0..height {
            for px in 0..width {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);

                let on_road = in_rounded_rect(p, OUTER_MIN, OUTER_MAX, CORNER_RADIUS)
                    && !in_rounded_rect(p, INNER_MIN, INNER_MAX, CORNER_RADIUS);

                let color = if let Some(color) = start_line_color(p) {
                    color
                } else if on_road {
                    lerp_color(ROAD_LIGHT, ROAD_DARK, p.y / height as f32)
                } else {
                    // Radial falloff from r=100 to r=width
                    let t = (p.distance(center) - 100.0) / (width as f32 - 100.0);
                    lerp_color(GRASS_LIGHT, GRASS_DARK, t)
                };
                pixels.push(color);
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Field extent in pixels; opponents spawn and respawn around it
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether a point lies inside the field's pixel rectangle
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width as f32 && y >= 0.0 && y < self.height as f32
    }

    /// Surface colour at a point, `None` outside the field
    pub fn color_at(&self, x: f32, y: f32) -> Option<[u8; 3]> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied()
    }

    /// Road test: near-grey surface inside the field
    pub fn is_drivable(&self, x: f32, y: f32) -> bool {
        self.color_at(x, y).is_some_and(is_grey)
    }

    /// Convenience overload for vectors
    #[inline]
    pub fn is_drivable_at(&self, p: Vec2) -> bool {
        self.is_drivable(p.x, p.y)
    }
}

/// Channel spread below the threshold counts as grey
fn is_grey([r, g, b]: [u8; 3]) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    max - min < GRAYSCALE_THRESHOLD
}

/// Rectangle whose corners are quadratic curves with the control point on
/// the rectangle corner and the end points `radius` along each edge
fn in_rounded_rect(p: Vec2, min: Vec2, max: Vec2, radius: f32) -> bool {
    if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
        return false;
    }
    // Distance in from the nearest vertical and horizontal edge
    let inset = (p - min).min(max - p);
    if inset.x >= radius || inset.y >= radius {
        return true;
    }
    // In corner units the curve is (t^2, (1-t)^2), i.e. sqrt(u) + sqrt(v) = 1
    let uv = inset / radius;
    uv.x.sqrt() + uv.y.sqrt() >= 1.0
}

fn start_line_color(p: Vec2) -> Option<[u8; 3]> {
    let dx = p.x - START_LINE_X;
    let dy = p.y - START_LINE_Y;
    if !(0.0..2.0 * START_BOX).contains(&dx) || !(0.0..START_LINE_LENGTH).contains(&dy) {
        return None;
    }
    let col = (dx / START_BOX) as u32;
    let row = (dy / START_BOX) as u32;
    Some(if row % 2 == col % 2 {
        LINE_WHITE
    } else {
        LINE_GREY
    })
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}
