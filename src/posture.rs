//! Posture geometry analysis
//!
//! This module converts named 2-D landmark coordinates into angular and
//! alignment metrics and a qualitative posture status. Only numbers leave
//! this module; landmark coordinates are never retained past a call.

use crate::types::{LandmarkSet, Point, PostureMetrics, PostureStatus};

/// Neck angle above which a warning fires (degrees)
pub const NECK_ANGLE_WARNING: f64 = 15.0;
/// Neck angle above which the status is bad (degrees)
pub const NECK_ANGLE_BAD: f64 = 25.0;
/// Back curvature above which a warning fires (degrees)
pub const BACK_CURVATURE_WARNING: f64 = 10.0;
/// Back curvature above which the status is bad (degrees)
pub const BACK_CURVATURE_BAD: f64 = 20.0;
/// Shoulder alignment below which a warning fires (percent)
pub const SHOULDER_ALIGNMENT_WARNING: f64 = 85.0;

/// Pixel-to-centimeter conversion for the forward-head estimate
const PIXELS_TO_CM: f64 = 0.1;

/// Analyzer for landmark frames, with an optional personal baseline.
#[derive(Debug, Clone, Default)]
pub struct PostureAnalyzer {
    baseline: Option<PostureMetrics>,
}

impl PostureAnalyzer {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Analyze one landmark frame into posture metrics.
    ///
    /// Pure per invocation: identical frames yield identical metrics.
    pub fn analyze(&self, landmarks: &LandmarkSet) -> PostureMetrics {
        let neck_angle = neck_angle(landmarks);
        let back_curvature = back_curvature(landmarks);
        let shoulder_alignment = shoulder_alignment(landmarks);
        let head_forward = head_forward(landmarks);

        let (status, alerts) = evaluate(neck_angle, back_curvature, shoulder_alignment);

        PostureMetrics {
            neck_angle: round1(neck_angle),
            back_curvature: round1(back_curvature),
            shoulder_alignment: round1(shoulder_alignment),
            head_forward: round1(head_forward),
            status,
            alerts,
        }
    }

    /// Snapshot the metrics of a reference frame as the personal baseline.
    ///
    /// Only the numeric metrics are stored; the landmark coordinates are
    /// dropped when the call returns.
    pub fn calibrate(&mut self, landmarks: &LandmarkSet) -> PostureMetrics {
        let metrics = self.analyze(landmarks);
        self.baseline = Some(metrics.clone());
        metrics
    }

    /// Current calibration baseline, if any
    pub fn baseline(&self) -> Option<&PostureMetrics> {
        self.baseline.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }
}

fn point_or_origin(point: Option<Point>) -> Point {
    point.unwrap_or_default()
}

/// Arithmetic mean of two points
fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Angle between vertical and the vector from `base` to `tip` (degrees).
///
/// Image-space y grows downward, so dy is base-y minus tip-y. A zero dy means
/// the points overlap vertically and the angle is defined as 0.
fn vertical_deviation(base: Point, tip: Point) -> f64 {
    let dx = tip.x - base.x;
    let dy = base.y - tip.y;

    if dy == 0.0 {
        return 0.0;
    }
    (dx.abs() / dy).atan().to_degrees()
}

/// Forward head tilt: angle of the shoulder-midpoint -> nose vector
fn neck_angle(landmarks: &LandmarkSet) -> f64 {
    let nose = point_or_origin(landmarks.nose);
    let mid_shoulder = midpoint(
        point_or_origin(landmarks.left_shoulder),
        point_or_origin(landmarks.right_shoulder),
    );
    vertical_deviation(mid_shoulder, nose)
}

/// Back lean: angle of the hip-midpoint -> shoulder-midpoint vector
fn back_curvature(landmarks: &LandmarkSet) -> f64 {
    let mid_shoulder = midpoint(
        point_or_origin(landmarks.left_shoulder),
        point_or_origin(landmarks.right_shoulder),
    );
    let mid_hip = midpoint(
        point_or_origin(landmarks.left_hip),
        point_or_origin(landmarks.right_hip),
    );
    vertical_deviation(mid_hip, mid_shoulder)
}

/// Shoulder height balance as a percentage (100 = level shoulders).
///
/// Zero shoulder width means tilt cannot be measured; that degeneracy is
/// treated as neutral (100), not penalized.
fn shoulder_alignment(landmarks: &LandmarkSet) -> f64 {
    let left = point_or_origin(landmarks.left_shoulder);
    let right = point_or_origin(landmarks.right_shoulder);

    let height_diff = (left.y - right.y).abs();
    let shoulder_width = (left.x - right.x).abs();

    if shoulder_width == 0.0 {
        return 100.0;
    }
    (100.0 - (height_diff / shoulder_width * 100.0)).clamp(0.0, 100.0)
}

/// Estimated forward head offset in centimeters.
///
/// Uses the left ear/shoulder when present, falling back to the right side;
/// with no ear visible the estimate is 0.
fn head_forward(landmarks: &LandmarkSet) -> f64 {
    let ear = match landmarks.left_ear.or(landmarks.right_ear) {
        Some(ear) => ear,
        None => return 0.0,
    };
    let shoulder = match landmarks.left_shoulder.or(landmarks.right_shoulder) {
        Some(shoulder) => shoulder,
        None => return 0.0,
    };

    (ear.x - shoulder.x) * PIXELS_TO_CM
}

/// Apply the threshold checks and collect findings.
///
/// Each check contributes at most one alert; the overall status is the worst
/// severity across checks. No findings yields exactly one positive alert.
fn evaluate(
    neck_angle: f64,
    back_curvature: f64,
    shoulder_alignment: f64,
) -> (PostureStatus, Vec<String>) {
    let mut alerts = Vec::new();
    let mut worst = PostureStatus::Good;

    if neck_angle > NECK_ANGLE_BAD {
        alerts.push("Neck is bent too far forward. Lift your head up.".to_string());
        worst = PostureStatus::Bad;
    } else if neck_angle > NECK_ANGLE_WARNING {
        alerts.push("Neck is tilting forward. Raise your screen height.".to_string());
        worst = worst.max(PostureStatus::Warning);
    }

    if back_curvature > BACK_CURVATURE_BAD {
        alerts.push("Back is heavily hunched. Sit up straight.".to_string());
        worst = PostureStatus::Bad;
    } else if back_curvature > BACK_CURVATURE_WARNING {
        alerts.push("Back is slightly curved. Adjust your chair.".to_string());
        worst = worst.max(PostureStatus::Warning);
    }

    if shoulder_alignment < SHOULDER_ALIGNMENT_WARNING {
        alerts.push("Shoulders are uneven. Check your sitting position.".to_string());
        worst = worst.max(PostureStatus::Warning);
    }

    if alerts.is_empty() {
        alerts.push("Good posture. Keep it up.".to_string());
    }

    (worst, alerts)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upright_landmarks() -> LandmarkSet {
        // Hip-mid, shoulder-mid, and nose on a perfect vertical line
        LandmarkSet {
            nose: Some(Point::new(320.0, 100.0)),
            left_ear: Some(Point::new(300.0, 110.0)),
            right_ear: Some(Point::new(340.0, 110.0)),
            left_shoulder: Some(Point::new(250.0, 200.0)),
            right_shoulder: Some(Point::new(390.0, 200.0)),
            left_hip: Some(Point::new(260.0, 400.0)),
            right_hip: Some(Point::new(380.0, 400.0)),
        }
    }

    fn slouched_landmarks() -> LandmarkSet {
        LandmarkSet {
            nose: Some(Point::new(380.0, 120.0)),
            left_ear: Some(Point::new(360.0, 130.0)),
            right_ear: Some(Point::new(400.0, 135.0)),
            left_shoulder: Some(Point::new(250.0, 200.0)),
            right_shoulder: Some(Point::new(390.0, 230.0)),
            left_hip: Some(Point::new(260.0, 400.0)),
            right_hip: Some(Point::new(380.0, 400.0)),
        }
    }

    #[test]
    fn test_vertical_line_yields_zero_angles() {
        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&upright_landmarks());

        assert_eq!(metrics.neck_angle, 0.0);
        assert_eq!(metrics.back_curvature, 0.0);
        assert_eq!(metrics.shoulder_alignment, 100.0);
        assert_eq!(metrics.status, PostureStatus::Good);
        assert_eq!(metrics.alerts, vec!["Good posture. Keep it up.".to_string()]);
    }

    #[test]
    fn test_neck_angle_forward_tilt() {
        // Shoulder midpoint at (320, 200), nose at (370, 100): dx=50, dy=100
        let mut landmarks = upright_landmarks();
        landmarks.nose = Some(Point::new(370.0, 100.0));

        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&landmarks);

        let expected = (50.0_f64 / 100.0).atan().to_degrees();
        assert!((metrics.neck_angle - (expected * 10.0).round() / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_geometry_is_neutral() {
        // All points at the origin: dy and shoulder width are both zero
        let landmarks = LandmarkSet::default();
        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&landmarks);

        assert_eq!(metrics.neck_angle, 0.0);
        assert_eq!(metrics.back_curvature, 0.0);
        assert_eq!(metrics.shoulder_alignment, 100.0);
        assert_eq!(metrics.head_forward, 0.0);
    }

    #[test]
    fn test_uneven_shoulders_fire_warning() {
        let mut landmarks = upright_landmarks();
        // 140 px wide, 30 px height difference: alignment ~78.6%
        landmarks.right_shoulder = Some(Point::new(390.0, 230.0));

        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&landmarks);

        assert!(metrics.shoulder_alignment < SHOULDER_ALIGNMENT_WARNING);
        assert_eq!(metrics.status, PostureStatus::Warning);
        assert!(metrics
            .alerts
            .iter()
            .any(|a| a.contains("Shoulders are uneven")));
    }

    #[test]
    fn test_bad_posture_dominates_warnings() {
        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&slouched_landmarks());

        // Nose far right of shoulder midpoint: neck angle well past 25 degrees
        assert!(metrics.neck_angle > NECK_ANGLE_BAD);
        assert_eq!(metrics.status, PostureStatus::Bad);
        assert!(metrics.alerts.len() >= 2);
    }

    #[test]
    fn test_head_forward_prefers_left_ear() {
        let landmarks = upright_landmarks();
        let analyzer = PostureAnalyzer::new();
        let metrics = analyzer.analyze(&landmarks);

        // left ear x=300, left shoulder x=250: 50 px * 0.1 = 5 cm
        assert_eq!(metrics.head_forward, 5.0);
    }

    #[test]
    fn test_head_forward_without_ears_is_zero() {
        let mut landmarks = upright_landmarks();
        landmarks.left_ear = None;
        landmarks.right_ear = None;

        let analyzer = PostureAnalyzer::new();
        assert_eq!(analyzer.analyze(&landmarks).head_forward, 0.0);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let analyzer = PostureAnalyzer::new();
        let landmarks = slouched_landmarks();

        let first = analyzer.analyze(&landmarks);
        let second = analyzer.analyze(&landmarks);
        assert_eq!(first, second);
    }

    #[test]
    fn test_calibrate_stores_baseline() {
        let mut analyzer = PostureAnalyzer::new();
        assert!(!analyzer.is_calibrated());

        let metrics = analyzer.calibrate(&upright_landmarks());

        assert!(analyzer.is_calibrated());
        assert_eq!(analyzer.baseline(), Some(&metrics));
    }
}
