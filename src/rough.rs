//! Hand-drawn stylization: turns ideal geometry into jittered polylines.
//!
//! Shapes are rendered as if sketched: each segment becomes a slightly bowed
//! bezier with randomized endpoints, and outlines are drawn twice with
//! independent jitter so the strokes overlap like pen passes. All randomness
//! flows from a generator seeded with the element's stored seed, so an
//! element looks identical on every redraw, across undo, and after reload.
//!
//! Output is world-space polylines; the render pass connects the dots with
//! the element's stroke.

#[cfg(test)]
#[path = "rough_test.rs"]
mod rough_test;

use std::f64::consts::PI;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::camera::Point;

/// One stylized stroke: a polyline to draw in order.
pub type Stroke = Vec<Point>;

/// Stylization parameters. `roughness` zero disables jitter entirely and
/// each generator falls back to the ideal outline in a single stroke.
#[derive(Debug, Clone)]
pub struct RoughOptions {
    pub roughness: f64,
    pub bowing: f64,
    pub max_offset: f64,
    pub curve_steps: u32,
}

impl Default for RoughOptions {
    fn default() -> Self {
        Self { roughness: 1.0, bowing: 1.0, max_offset: 2.0, curve_steps: 32 }
    }
}

/// Seeded stroke generator.
pub struct Rough {
    rng: StdRng,
}

impl Rough {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    fn random(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn offset(&mut self, min: f64, max: f64, opts: &RoughOptions, gain: f64) -> f64 {
        opts.roughness * gain * (self.random() * (max - min) + min)
    }

    fn offset_sym(&mut self, x: f64, opts: &RoughOptions, gain: f64) -> f64 {
        self.offset(-x, x, opts, gain)
    }

    /// A single jittered stroke from `start` to `end`.
    #[must_use]
    pub fn line(&mut self, start: Point, end: Point, opts: &RoughOptions) -> Stroke {
        if opts.roughness == 0.0 {
            return vec![start, end];
        }
        let length_sq = (start.x - end.x).powi(2) + (start.y - end.y).powi(2);
        let length = length_sq.sqrt();

        // Long lines get proportionally less jitter or they look scribbled.
        let gain = if length < 200.0 {
            1.0
        } else if length > 500.0 {
            0.4
        } else {
            -0.001_666_8 * length + 1.233_334
        };

        let mut offset = opts.max_offset;
        if offset * offset * 100.0 > length_sq {
            offset = length / 10.0;
        }

        let diverge = 0.2 + self.random() * 0.2;
        let mid_x = opts.bowing * opts.max_offset * (end.y - start.y) / 200.0;
        let mid_y = opts.bowing * opts.max_offset * (start.x - end.x) / 200.0;
        let mid_x = mid_x + self.offset_sym(mid_x, opts, gain);
        let mid_y = mid_y + self.offset_sym(mid_y, opts, gain);

        let p0 = Point {
            x: start.x + self.offset_sym(offset, opts, gain),
            y: start.y + self.offset_sym(offset, opts, gain),
        };
        let cp1 = Point {
            x: mid_x + start.x + (end.x - start.x) * diverge + self.offset_sym(offset, opts, gain),
            y: mid_y + start.y + (end.y - start.y) * diverge + self.offset_sym(offset, opts, gain),
        };
        let cp2 = Point {
            x: mid_x
                + start.x
                + 2.0 * (end.x - start.x) * diverge
                + self.offset_sym(offset, opts, gain),
            y: mid_y
                + start.y
                + 2.0 * (end.y - start.y) * diverge
                + self.offset_sym(offset, opts, gain),
        };
        let p3 = Point {
            x: end.x + self.offset_sym(offset, opts, gain),
            y: end.y + self.offset_sym(offset, opts, gain),
        };

        let mut points = vec![p0];
        points.extend(bezier(p0, cp1, cp2, p3, 10));
        points
    }

    /// Closed polygon as double-stroked jittered edges.
    #[must_use]
    pub fn polygon(&mut self, corners: &[Point], opts: &RoughOptions) -> Vec<Stroke> {
        let mut strokes = Vec::new();
        for i in 0..corners.len() {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            strokes.push(self.line(start, end, opts));
            if opts.roughness > 0.0 {
                strokes.push(self.line(start, end, opts));
            }
        }
        strokes
    }

    /// Rectangle outline.
    #[must_use]
    pub fn rectangle(&mut self, origin: Point, width: f64, height: f64, opts: &RoughOptions) -> Vec<Stroke> {
        self.polygon(
            &[
                origin,
                Point { x: origin.x + width, y: origin.y },
                Point { x: origin.x + width, y: origin.y + height },
                Point { x: origin.x, y: origin.y + height },
            ],
            opts,
        )
    }

    /// Diamond outline: vertices at the edge midpoints of the bounding box.
    #[must_use]
    pub fn diamond(&mut self, origin: Point, width: f64, height: f64, opts: &RoughOptions) -> Vec<Stroke> {
        self.polygon(
            &[
                Point { x: origin.x + width / 2.0, y: origin.y },
                Point { x: origin.x + width, y: origin.y + height / 2.0 },
                Point { x: origin.x + width / 2.0, y: origin.y + height },
                Point { x: origin.x, y: origin.y + height / 2.0 },
            ],
            opts,
        )
    }

    /// Ellipse outline, double-stroked with varied radii per step.
    #[must_use]
    pub fn ellipse(&mut self, center: Point, width: f64, height: f64, opts: &RoughOptions) -> Vec<Stroke> {
        let rx = width / 2.0;
        let ry = height / 2.0;
        if opts.roughness == 0.0 {
            let steps = opts.curve_steps.max(16);
            let pts = (0..=steps)
                .map(|i| {
                    let a = f64::from(i) / f64::from(steps) * PI * 2.0;
                    Point { x: center.x + rx * a.cos(), y: center.y + ry * a.sin() }
                })
                .collect();
            return vec![pts];
        }

        let steps = (opts.curve_steps + (self.random() * 4.0) as u32).clamp(16, 48);
        let increment = PI * 2.0 / f64::from(steps);
        let first = self.ellipse_pass(center, rx, ry, increment, steps, 1.0, opts);
        let softer = RoughOptions { roughness: opts.roughness * 0.8, ..opts.clone() };
        let second = self.ellipse_pass(center, rx, ry, increment, steps, 0.5, &softer);
        vec![first, second]
    }

    fn ellipse_pass(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        increment: f64,
        steps: u32,
        wobble: f64,
        opts: &RoughOptions,
    ) -> Stroke {
        let rad_offset = self.offset_sym(0.1, opts, 1.0) - PI / 2.0;
        let overlap = increment * self.offset(0.05, 0.1, opts, 1.0);
        let end_angle = PI * 2.0 + rad_offset + overlap;

        let mut points = Vec::with_capacity(steps as usize + 2);
        let mut angle = rad_offset;
        while angle < end_angle {
            let point_rx = (rx + self.offset_sym(rx * 0.02, opts, 1.0)).clamp(rx * 0.92, rx * 1.08);
            let point_ry = (ry + self.offset_sym(ry * 0.02, opts, 1.0)).clamp(ry * 0.92, ry * 1.08);
            points.push(Point {
                x: self.offset_sym(wobble * 0.3, opts, 1.0) + center.x + point_rx * angle.cos(),
                y: self.offset_sym(wobble * 0.3, opts, 1.0) + center.y + point_ry * angle.sin(),
            });
            angle += increment * (0.95 + self.random() * 0.1);
        }
        // Close the loop just past where it started.
        let closure = 0.95 + self.random() * 0.1;
        points.push(Point {
            x: center.x + closure * rx * (rad_offset + overlap).cos(),
            y: center.y + closure * ry * (rad_offset + overlap).sin(),
        });
        points
    }

    /// Arrow: double-stroked shaft plus a two-stroke open head at `end`.
    #[must_use]
    pub fn arrow(&mut self, start: Point, end: Point, opts: &RoughOptions) -> Vec<Stroke> {
        let mut strokes = vec![self.line(start, end, opts)];
        if opts.roughness > 0.0 {
            strokes.push(self.line(start, end, opts));
        }

        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return strokes;
        }

        let head_len = f64::min(len * 0.6, (20.0 + self.offset_sym(5.0, opts, 1.0)).max(10.0));
        let head_angle = 0.5 + self.offset_sym(0.1, opts, 1.0);
        let (dir_x, dir_y) = (dx / len, dy / len);
        let (cos_a, sin_a) = (head_angle.cos(), head_angle.sin());

        let left = Point {
            x: end.x - head_len * (dir_x * cos_a - dir_y * sin_a),
            y: end.y - head_len * (dir_y * cos_a + dir_x * sin_a),
        };
        let right = Point {
            x: end.x - head_len * (dir_x * cos_a + dir_y * sin_a),
            y: end.y - head_len * (dir_y * cos_a - dir_x * sin_a),
        };
        strokes.push(self.line(left, end, opts));
        strokes.push(self.line(right, end, opts));
        strokes
    }
}

fn bezier(p0: Point, p1: Point, p2: Point, p3: Point, segments: u32) -> Stroke {
    (1..=segments)
        .map(|i| {
            let t = f64::from(i) / f64::from(segments);
            let u = 1.0 - t;
            let (uu, tt) = (u * u, t * t);
            let (uuu, ttt) = (uu * u, tt * t);
            Point {
                x: uuu * p0.x + 3.0 * uu * t * p1.x + 3.0 * u * tt * p2.x + ttt * p3.x,
                y: uuu * p0.y + 3.0 * uu * t * p1.y + 3.0 * u * tt * p2.y + ttt * p3.y,
            }
        })
        .collect()
}

/// Options derived from an element's style.
#[must_use]
pub fn options_for(roughness: f64) -> RoughOptions {
    RoughOptions { roughness, ..RoughOptions::default() }
}
