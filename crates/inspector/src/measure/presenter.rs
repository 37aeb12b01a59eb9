use glam::DVec3;
use shared::MeasurementMode;

use super::session::PickingSession;
use crate::metrics;
use crate::scene::{DrawableId, DrawableSpec, Scene};
use crate::settings::{MarkerSettings, MeasurementStyle};

/// `-0.0` would print as "-0.000000"
fn tidy(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Fixed-layout text for a set of picked points, `None` when there is nothing to show.
///
/// Lengths, deltas and normal components are right-justified to
/// `field_width`; angles to `angle_width`.
pub fn format_measurement(points: &[DVec3], style: &MeasurementStyle) -> Option<String> {
    let prec = style.precision;
    let num = |v: f64| format!("{:>w$.p$}", tidy(v), w = style.field_width, p = prec);
    let ang = |v: f64| {
        format!(
            "{:>w$.p$}",
            tidy(v),
            w = style.angle_width,
            p = style.angle_precision
        )
    };

    match points {
        [a] => Some(format!(
            "Point@Local\nX1:{:.p$}    Y1:{:.p$}    Z1:{:.p$}",
            tidy(a.x),
            tidy(a.y),
            tidy(a.z),
            p = prec
        )),
        [a, b] => {
            let d = metrics::deltas(*a, *b);
            Some(format!(
                "Distance: {}\nΔX:{}   ΔY:{}   ΔZ:{}\nΔXY:{}  ΔXZ:{}  ΔYZ:{}",
                num(d.distance),
                num(d.dx),
                num(d.dy),
                num(d.dz),
                num(d.dxy),
                num(d.dxz),
                num(d.dyz)
            ))
        }
        [a, b, c] => {
            let m = metrics::triangle(*a, *b, *c);
            // An undefined normal is shown as the zero vector
            let n = m.normal.unwrap_or(DVec3::ZERO);
            Some(format!(
                "Area:{}\nAB:{}  BC:{}  CA:{}\nangle.A:{}°  angle.B:{}°  angle.C:{}°\nNx:{}  Ny:{}  Nz:{}",
                num(m.area),
                num(m.ab),
                num(m.bc),
                num(m.ca),
                ang(m.angle_a),
                ang(m.angle_b),
                ang(m.angle_c),
                num(n.x),
                num(n.y),
                num(n.z)
            ))
        }
        _ => None,
    }
}

/// Edges drawn once a measurement is complete
fn edges_for(mode: MeasurementMode, points: &[DVec3]) -> Vec<(DVec3, DVec3)> {
    match (mode, points) {
        (MeasurementMode::Line, [a, b]) => vec![(*a, *b)],
        (MeasurementMode::Triangle, [a, b, c]) => vec![(*a, *b), (*b, *c), (*c, *a)],
        _ => Vec::new(),
    }
}

/// Projects a [`PickingSession`] into scene markers and a text block.
///
/// Holds no state of its own beyond the drawables it created: `sync`
/// rebuilds whatever no longer matches the session.
#[derive(Debug, Default)]
pub struct MeasurementPresenter {
    style: MeasurementStyle,
    marker_style: MarkerSettings,
    /// One sphere per picked point, in pick order
    spheres: Vec<(DVec3, DrawableId)>,
    edges: Vec<(DVec3, DVec3, DrawableId)>,
    text: Option<String>,
}

impl MeasurementPresenter {
    pub fn new(style: MeasurementStyle, marker_style: MarkerSettings) -> Self {
        Self {
            style,
            marker_style,
            ..Default::default()
        }
    }

    /// Current text, `None` while the presenter is hidden
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    /// Sphere and edge drawables owned by the presenter
    pub fn marker_ids(&self) -> Vec<DrawableId> {
        self.spheres
            .iter()
            .map(|(_, id)| *id)
            .chain(self.edges.iter().map(|(_, _, id)| *id))
            .collect()
    }

    /// Bring markers and text in line with the session
    pub fn sync<S: Scene + ?Sized>(&mut self, scene: &mut S, session: &PickingSession) {
        let points = session.points();
        let mut changed = false;

        // Points are only ever appended; anything else means the set was reset
        let prefix_matches = self.spheres.len() <= points.len()
            && self.spheres.iter().zip(points).all(|((p, _), q)| p == q);
        if !prefix_matches {
            self.remove_markers(scene);
            changed = true;
        }

        for p in &points[self.spheres.len()..] {
            let id = scene.create_drawable(DrawableSpec::Marker {
                center: *p,
                radius: self.marker_style.radius,
                color: self.marker_style.color,
            });
            scene.add_drawable(id);
            self.spheres.push((*p, id));
            changed = true;
        }

        let wanted = edges_for(session.mode(), points);
        let edges_match = wanted.len() == self.edges.len()
            && wanted
                .iter()
                .zip(&self.edges)
                .all(|((a, b), (ea, eb, _))| a == ea && b == eb);
        if !edges_match {
            for (_, _, id) in self.edges.drain(..) {
                scene.destroy_drawable(id);
            }
            for (a, b) in wanted {
                let id = scene.create_drawable(DrawableSpec::Segment {
                    from: a,
                    to: b,
                    width: self.marker_style.line_width,
                    color: self.marker_style.color,
                });
                scene.add_drawable(id);
                self.edges.push((a, b, id));
            }
            changed = true;
        }

        self.text = if session.mode() == MeasurementMode::None {
            None
        } else {
            format_measurement(points, &self.style)
        };

        if changed {
            scene.request_redraw();
        }
    }

    /// Remove every marker from the scene and hide the text
    pub fn clear<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.remove_markers(scene);
        self.text = None;
        scene.request_redraw();
    }

    fn remove_markers<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for (_, id) in self.spheres.drain(..) {
            scene.destroy_drawable(id);
        }
        for (_, _, id) in self.edges.drain(..) {
            scene.destroy_drawable(id);
        }
    }
}
