//! Soft organic blob: a centre that drifts toward a target on a damped
//! spring, and a ring of boundary points easing toward a noisy circle.
//!
//! All rates are applied per `update` call and are tuned for one call per
//! display frame. Calling at a different cadence changes the feel.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::error::FieldError;
use crate::components::palette::Rgb;
use crate::core::rng::Rng;
use crate::input::pointer::PointerSample;
use crate::renderer::surface::{BlobPath, RadialGradient, Rgba, Surface};

/// Distance (in radii) a blob centre keeps from each surface edge.
pub const PADDING_FACTOR: f32 = 1.5;
/// Pointer influence reach used when the caller has no preference.
pub const DEFAULT_POINTER_RADIUS: f32 = 500.0;
/// Fewer points than this cannot form a closed outline.
pub const MIN_DRAWABLE_POINTS: usize = 3;

const MIN_POINTS: u32 = 10;
const POINT_COUNT_CHOICES: u32 = 5;

const DRIFT_CHANCE: f32 = 0.001;
const DRIFT_STEP: f32 = 0.05;
const ATTRACTION: f32 = 0.00005;
const DAMPING: f32 = 0.95;
const INTEGRATION: f32 = 0.15;
const BOUNCE: f32 = -0.3;

const NOISE_TIME_SCALE: f64 = 0.00005;
const NOISE_AMPLITUDE: f32 = 0.05;
const POINT_EASING: f32 = 0.005;
const POINT_ROTATION: f32 = 0.005;

const GRADIENT_REACH: f32 = 1.8;

const PUSH_STRENGTH: f32 = 0.01;
const PUSH_SCALE: f32 = 0.15;
const SWIRL_SCALE: f32 = 0.07;
const POINT_REACH: f32 = 3.0;
const POINT_PUSH: f32 = 0.025;
const POINTER_ATTRACTION: f32 = 0.0001;

/// One vertex of a blob's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPoint {
    pub position: Vec2,
    /// Angular offset around the blob centre (radians).
    pub angle: f32,
    /// Oscillation rate of this point's noise and rotation.
    pub speed: f32,
    /// Fraction along each segment where this point's bezier handle sits.
    pub curve: f32,
}

/// Quartic distance falloff: 1 at the pointer, 0 at `max_distance` and beyond.
pub fn pointer_falloff(distance: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    (1.0 - (distance / max_distance).min(1.0)).powi(4)
}

/// Clamp `value` into `[padding, extent - padding]`, or the midpoint when
/// that range is empty.
fn clamp_padded(value: f32, padding: f32, extent: f32) -> f32 {
    let max = extent - padding;
    if padding > max {
        extent * 0.5
    } else {
        value.clamp(padding, max)
    }
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub position: Vec2,
    /// Where the blob is drifting toward.
    pub target: Vec2,
    pub velocity: Vec2,
    radius: f32,
    color: Rgb,
    angle_step: f32,
    points: Vec<BoundaryPoint>,
}

impl Blob {
    /// Create a blob at `(x, y)` with a randomized ring of 10 to 14 points.
    pub fn new(x: f32, y: f32, radius: f32, color: Rgb, rng: &mut Rng) -> Self {
        let count = MIN_POINTS + rng.next_int(POINT_COUNT_CHOICES);
        let angle_step = TAU / count as f32;
        let max_point_speed = 0.0005 + rng.next_f32() * 0.001;
        let center = Vec2::new(x, y);

        let points = (0..count)
            .map(|i| {
                let angle = i as f32 * angle_step;
                let point_radius = radius * (0.9 + rng.next_f32() * 0.2);
                BoundaryPoint {
                    position: center + Vec2::from_angle(angle) * point_radius,
                    angle,
                    speed: 0.0001 + rng.next_f32() * max_point_speed,
                    curve: 0.5 + rng.next_f32() * 0.2,
                }
            })
            .collect();

        Self {
            position: center,
            target: center,
            velocity: Vec2::ZERO,
            radius,
            color,
            angle_step,
            points,
        }
    }

    /// Create a blob from an explicit ring of points.
    pub fn with_points(x: f32, y: f32, radius: f32, color: Rgb, points: Vec<BoundaryPoint>) -> Self {
        let angle_step = if points.is_empty() {
            TAU
        } else {
            TAU / points.len() as f32
        };
        let center = Vec2::new(x, y);
        Self {
            position: center,
            target: center,
            velocity: Vec2::ZERO,
            radius,
            color,
            angle_step,
            points,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn angle_step(&self) -> f32 {
        self.angle_step
    }

    /// Boundary points in outline order.
    pub fn points(&self) -> &[BoundaryPoint] {
        &self.points
    }

    /// Advance by `dt` simulated milliseconds.
    ///
    /// `now_ms` drives the outline noise and `bounds` is the surface size used
    /// for edge containment. The caller is responsible for capping `dt`; large
    /// steps overshoot the point easing.
    pub fn update(&mut self, dt: f32, now_ms: f64, bounds: Vec2, rng: &mut Rng) {
        if rng.chance(DRIFT_CHANCE) {
            self.target.x += (rng.next_f32() - 0.5) * DRIFT_STEP;
            self.target.y += (rng.next_f32() - 0.5) * DRIFT_STEP;
        }

        self.velocity += (self.target - self.position) * ATTRACTION * dt;
        self.velocity *= DAMPING;
        self.position += self.velocity * dt * INTEGRATION;

        let shift = self.contain(bounds);

        let time = now_ms * NOISE_TIME_SCALE;
        for point in &mut self.points {
            // Outline follows any containment correction of the centre
            point.position += shift;

            let angle = point.angle as f64;
            let ideal = self.position + Vec2::from_angle(point.angle) * self.radius;
            let noise = (time * point.speed as f64 + angle * 2.0).sin() as f32
                * self.radius
                * NOISE_AMPLITUDE;
            let wobble = Vec2::from_angle((angle * 1.5 + time) as f32);
            let goal = ideal + wobble * noise;

            point.position += (goal - point.position) * POINT_EASING * dt;
            point.angle += point.speed * POINT_ROTATION * dt;
        }
    }

    /// Soft edge bounce. Returns how far the centre was moved.
    fn contain(&mut self, bounds: Vec2) -> Vec2 {
        let padding = self.radius * PADDING_FACTOR;
        let before = self.position;
        for axis in 0..2 {
            let extent = bounds[axis];
            let pos = self.position[axis];
            if pos < padding || pos > extent - padding {
                self.velocity[axis] *= BOUNCE;
                self.position[axis] = clamp_padded(pos, padding, extent);
            }
        }
        self.position - before
    }

    /// Whether the centre lies in the padded region of `bounds`.
    pub fn is_contained(&self, bounds: Vec2) -> bool {
        let padding = self.radius * PADDING_FACTOR;
        (0..2).all(|axis| {
            let extent = bounds[axis];
            let pos = self.position[axis];
            (pos - clamp_padded(pos, padding, extent)).abs() <= 1e-3
        })
    }

    /// Smooth closed outline through the boundary points, or `None` when
    /// there are too few points to enclose anything.
    pub fn outline(&self) -> Option<BlobPath> {
        let n = self.points.len();
        if n < MIN_DRAWABLE_POINTS {
            return None;
        }

        let mut path = BlobPath::with_capacity(n + 2);
        path.move_to(self.points[0].position);
        for (i, current) in self.points.iter().enumerate() {
            let next = &self.points[(i + 1) % n];
            let delta = next.position - current.position;
            path.cubic_to(
                current.position + delta * current.curve,
                next.position - delta * next.curve,
                next.position,
            );
        }
        path.close();
        Some(path)
    }

    /// Radial fill: dense at the centre, transparent at 1.8 radii.
    pub fn paint(&self, alpha: f32) -> RadialGradient {
        RadialGradient::new(self.position, self.radius * GRADIENT_REACH)
            .with_stop(0.0, Rgba::from_rgb(self.color, alpha * 0.9))
            .with_stop(0.4, Rgba::from_rgb(self.color, alpha * 0.4))
            .with_stop(1.0, Rgba::from_rgb(self.color, 0.0))
    }

    /// Fill the outline onto `surface`. Degenerate blobs draw nothing.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, alpha: f32) -> Result<(), FieldError> {
        match self.outline() {
            Some(path) => surface.fill_path(&path, &self.paint(alpha)),
            None => Ok(()),
        }
    }

    /// React to a pointer within `max_distance` of the centre.
    ///
    /// A moving pointer pushes and swirls the blob and dents the nearby
    /// outline. A resting pointer instead pulls the drift target toward it.
    pub fn apply_pointer_influence(&mut self, pointer: &PointerSample, max_distance: f32) {
        let to_pointer = pointer.position - self.position;
        let distance = to_pointer.length();
        if !(distance < max_distance) {
            return;
        }

        let falloff = pointer_falloff(distance, max_distance);
        if pointer.is_moving {
            self.push(pointer, falloff);
        } else {
            self.target += to_pointer * POINTER_ATTRACTION * falloff;
        }
    }

    fn push(&mut self, pointer: &PointerSample, falloff: f32) {
        let strength = PUSH_STRENGTH * falloff;
        self.velocity += pointer.velocity * strength * PUSH_SCALE;

        let perp = pointer.velocity.perp();
        if perp.length_squared() > 0.0 {
            self.velocity += perp.normalize() * strength * SWIRL_SCALE;
        }

        let reach = self.radius * POINT_REACH;
        for point in &mut self.points {
            let d = pointer.position.distance(point.position);
            if d < reach {
                point.position += pointer.velocity * pointer_falloff(d, reach) * POINT_PUSH;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingSurface;
    use crate::renderer::surface::PathCommand;

    const SURFACE: Vec2 = Vec2::new(800.0, 600.0);
    const OPEN_FIELD: Vec2 = Vec2::new(4000.0, 4000.0);

    fn blob_at(x: f32, y: f32, radius: f32, seed: u64) -> (Blob, Rng) {
        let mut rng = Rng::new(seed);
        let blob = Blob::new(x, y, radius, Rgb::RED, &mut rng);
        (blob, rng)
    }

    fn moving(position: Vec2, velocity: Vec2) -> PointerSample {
        PointerSample { position, velocity, is_moving: true }
    }

    fn resting(position: Vec2) -> PointerSample {
        PointerSample { position, velocity: Vec2::ZERO, is_moving: false }
    }

    #[test]
    fn construction_ring() {
        for seed in 1..50 {
            let (blob, _) = blob_at(400.0, 300.0, 150.0, seed);
            let n = blob.points().len();
            assert!((10..=14).contains(&n), "point count {}", n);
            assert_eq!((TAU / blob.angle_step()).round() as usize, n);
            assert_eq!(blob.position, blob.target);
            assert_eq!(blob.velocity, Vec2::ZERO);

            for (i, p) in blob.points().iter().enumerate() {
                assert!((p.angle - i as f32 * blob.angle_step()).abs() < 1e-5);
                let r = p.position.distance(blob.position) / blob.radius();
                assert!((0.9 - 1e-4..=1.1 + 1e-4).contains(&r), "ring radius {}", r);
                assert!((0.5..0.7).contains(&p.curve));
                assert!(p.speed >= 0.0001 && p.speed < 0.0001 + 0.0015);
            }
        }
    }

    #[test]
    fn point_count_never_changes() {
        let (mut blob, mut rng) = blob_at(400.0, 300.0, 120.0, 3);
        let n = blob.points().len();
        let pointer = moving(Vec2::new(420.0, 310.0), Vec2::new(12.0, -4.0));
        for i in 0..500 {
            blob.apply_pointer_influence(&pointer, DEFAULT_POINTER_RADIUS);
            blob.update(2.4, i as f64 * 16.0, SURFACE, &mut rng);
            assert_eq!(blob.points().len(), n);
        }
    }

    #[test]
    fn containment_holds_for_any_capped_dt() {
        for seed in 1..40 {
            let mut rng = Rng::new(seed);
            let radius = rng.range(100.0, 250.0);
            let x = rng.range(0.0, SURFACE.x);
            let y = rng.range(0.0, SURFACE.y);
            let mut blob = Blob::new(x, y, radius, Rgb::BLUE, &mut rng);
            // Knock it hard toward a corner
            blob.velocity = Vec2::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0));

            let mut now = 0.0;
            for _ in 0..300 {
                let dt = rng.range(0.0, 32.0);
                now += dt as f64;
                blob.update(dt, now, SURFACE, &mut rng);
                assert!(blob.is_contained(SURFACE), "escaped at {:?} (r={})", blob.position, radius);
            }
        }
    }

    #[test]
    fn bounce_reverses_and_softens_velocity() {
        let (mut blob, mut rng) = blob_at(400.0, 300.0, 100.0, 5);
        blob.target = blob.position;
        // Far enough that one step lands past the right padding (x > 650)
        blob.velocity = Vec2::new(2000.0, 0.0);
        blob.update(1.0, 0.0, SURFACE, &mut rng);
        assert_eq!(blob.position.x, 650.0);
        assert!(blob.velocity.x < 0.0);
        assert!(blob.velocity.x.abs() < 2000.0 * 0.95 * 0.3 + 1.0);
    }

    #[test]
    fn narrow_axis_holds_midpoint() {
        // 250 * 1.5 * 2 = 750 > 600, so no legal y exists
        let (mut blob, mut rng) = blob_at(400.0, 100.0, 250.0, 9);
        for i in 0..20 {
            blob.update(2.4, i as f64 * 16.0, SURFACE, &mut rng);
            assert_eq!(blob.position.y, 300.0);
            assert!((375.0..=425.0).contains(&blob.position.x));
        }
        assert!(blob.is_contained(SURFACE));
    }

    #[test]
    fn outline_follows_containment_correction() {
        let (mut blob, mut rng) = blob_at(10.0, 300.0, 100.0, 11);
        blob.update(2.4, 0.0, SURFACE, &mut rng);
        assert_eq!(blob.position.x, 150.0);
        for p in blob.points() {
            let d = p.position.distance(blob.position);
            assert!(d < blob.radius() * 1.3, "point left behind: {}", d);
        }
    }

    #[test]
    fn damping_applied_every_call() {
        let (mut blob, mut rng) = blob_at(2000.0, 2000.0, 150.0, 21);
        blob.velocity = Vec2::new(5.0, -3.0);
        blob.update(2.4, 0.0, OPEN_FIELD, &mut rng);
        assert!((blob.velocity.x - 4.75).abs() < 1e-3, "vx = {}", blob.velocity.x);
        assert!((blob.velocity.y + 2.85).abs() < 1e-3, "vy = {}", blob.velocity.y);
    }

    #[test]
    fn velocity_converges_with_fixed_target() {
        let (mut blob, mut rng) = blob_at(2000.0, 2000.0, 150.0, 22);
        blob.velocity = Vec2::new(5.0, -3.0);

        let mut speeds = Vec::with_capacity(10_000);
        for i in 0..10_000 {
            blob.update(2.4, i as f64 * 16.0, OPEN_FIELD, &mut rng);
            speeds.push(blob.velocity.length());
        }

        // While damping dominates the spring, every 10-step window peaks lower
        let windows: Vec<f32> = speeds[..60]
            .chunks(10)
            .map(|w| w.iter().cloned().fold(0.0, f32::max))
            .collect();
        for pair in windows.windows(2) {
            assert!(pair[1] < pair[0], "envelope grew: {:?}", windows);
        }
        assert!(speeds[59] < 0.5);
        assert!(speeds[9_999] < 1e-3, "final speed {}", speeds[9_999]);
    }

    #[test]
    fn degenerate_blobs_draw_nothing() {
        for count in 0..MIN_DRAWABLE_POINTS {
            let points = (0..count)
                .map(|i| BoundaryPoint {
                    position: Vec2::new(i as f32 * 10.0, 0.0),
                    angle: 0.0,
                    speed: 0.001,
                    curve: 0.5,
                })
                .collect();
            let blob = Blob::with_points(0.0, 0.0, 100.0, Rgb::RED, points);
            let mut surface = RecordingSurface::new(800.0, 600.0);
            assert!(blob.draw(&mut surface, 0.3).is_ok());
            assert!(blob.outline().is_none());
            assert_eq!(surface.path_command_count(), 0);
            assert!(surface.commands().is_empty());
        }
    }

    #[test]
    fn outline_is_closed_cubic_ring() {
        let (blob, _) = blob_at(400.0, 300.0, 150.0, 4);
        let path = blob.outline().unwrap();
        let pts = blob.points();
        let n = pts.len();

        assert_eq!(path.len(), n + 2);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(pts[0].position));
        assert_eq!(path.commands()[n + 1], PathCommand::Close);

        // Last segment wraps back to the first point
        match path.commands()[n] {
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let delta = pts[0].position - pts[n - 1].position;
                assert_eq!(to, pts[0].position);
                assert!(ctrl1.distance(pts[n - 1].position + delta * pts[n - 1].curve) < 1e-3);
                assert!(ctrl2.distance(pts[0].position - delta * pts[0].curve) < 1e-3);
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn paint_stops_scale_with_alpha() {
        let (blob, _) = blob_at(400.0, 300.0, 100.0, 4);
        let paint = blob.paint(0.3);
        assert_eq!(paint.center, blob.position);
        assert!((paint.radius - 180.0).abs() < 1e-4);

        let stops = paint.stops();
        assert_eq!(stops.len(), 3);
        assert!((stops[0].color.a - 0.27).abs() < 1e-6);
        assert!((stops[1].offset - 0.4).abs() < 1e-6);
        assert!((stops[1].color.a - 0.12).abs() < 1e-6);
        assert_eq!(stops[2].color.a, 0.0);
        assert_eq!((stops[2].color.r, stops[2].color.g), (255, 0));
    }

    #[test]
    fn falloff_boundaries() {
        assert_eq!(pointer_falloff(0.0, 500.0), 1.0);
        assert_eq!(pointer_falloff(500.0, 500.0), 0.0);
        assert_eq!(pointer_falloff(900.0, 500.0), 0.0);
        assert!((pointer_falloff(250.0, 500.0) - 0.0625).abs() < 1e-6);
        assert_eq!(pointer_falloff(10.0, 0.0), 0.0);
    }

    #[test]
    fn pointer_at_max_distance_has_no_effect() {
        let (mut blob, _) = blob_at(1000.0, 1000.0, 100.0, 6);
        let before = blob.clone();
        blob.apply_pointer_influence(
            &moving(Vec2::new(1500.0, 1000.0), Vec2::new(30.0, 30.0)),
            500.0,
        );
        blob.apply_pointer_influence(&resting(Vec2::new(1000.0, 1500.0)), 500.0);
        assert_eq!(blob.velocity, before.velocity);
        assert_eq!(blob.target, before.target);
        assert_eq!(blob.points(), before.points());
    }

    #[test]
    fn pointer_on_centre_gets_full_push() {
        let (mut blob, _) = blob_at(1000.0, 1000.0, 100.0, 6);
        let velocity = Vec2::new(20.0, 0.0);
        blob.apply_pointer_influence(&moving(blob.position, velocity), 500.0);

        // Push along +x plus a unit swirl along the perpendicular (+y)
        let expected = velocity * 0.01 * 0.15 + Vec2::Y * 0.01 * 0.07;
        assert!(blob.velocity.distance(expected) < 1e-6, "got {:?}", blob.velocity);
        assert_eq!(blob.target, blob.position);
    }

    #[test]
    fn moving_pointer_dents_nearby_points_only() {
        let (mut blob, _) = blob_at(1000.0, 1000.0, 100.0, 8);
        let before: Vec<Vec2> = blob.points().iter().map(|p| p.position).collect();
        let pointer = moving(Vec2::new(1100.0, 1000.0), Vec2::new(0.0, 40.0));
        blob.apply_pointer_influence(&pointer, 500.0);

        for (p, old) in blob.points().iter().zip(&before) {
            let moved = p.position - *old;
            assert!(moved.x.abs() < 1e-4);
            assert!(moved.y >= 0.0);
        }
        // The point facing the pointer (angle 0) moves the most
        let first = blob.points()[0].position.y - before[0].y;
        assert!(first > 0.0);
        assert!(blob.points().iter().zip(&before).all(|(p, o)| p.position.y - o.y <= first + 1e-4));
    }

    #[test]
    fn resting_pointer_attracts_target() {
        let (mut blob, _) = blob_at(1000.0, 1000.0, 100.0, 7);
        let pointer = resting(Vec2::new(1100.0, 1000.0));
        blob.apply_pointer_influence(&pointer, 500.0);

        let falloff = pointer_falloff(100.0, 500.0);
        let expected = 1000.0 + 100.0 * 0.0001 * falloff;
        assert!((blob.target.x - expected).abs() < 1e-4);
        assert_eq!(blob.target.y, 1000.0);
        // Attraction never touches velocity directly
        assert_eq!(blob.velocity, Vec2::ZERO);
    }
}
