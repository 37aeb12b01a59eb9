use glam::DVec3;
use shared::MeasurementMode;

/// Outcome of feeding a pick into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Mode is `None`; the pick was dropped
    Ignored,
    /// Nothing under the cursor; no point added
    PickMiss,
    PointAdded {
        /// Points held after this pick
        count: usize,
        /// The mode's quota is met: the measurement is complete
        complete: bool,
        /// A previously complete measurement was discarded first
        rolled_over: bool,
    },
}

impl SessionEvent {
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionEvent::PointAdded { complete: true, .. })
    }
}

/// Measurement mode plus the ordered points picked so far.
///
/// Holds `points.len() <= mode.quota()` after every operation.
#[derive(Debug, Clone, Default)]
pub struct PickingSession {
    mode: MeasurementMode,
    points: Vec<DVec3>,
}

impl PickingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn quota(&self) -> usize {
        self.mode.quota()
    }

    pub fn is_complete(&self) -> bool {
        self.mode != MeasurementMode::None && self.points.len() == self.quota()
    }

    /// Switch modes. Selecting `None` or a different mode drops all points;
    /// reselecting the current mode keeps them. Returns whether points were dropped.
    pub fn set_mode(&mut self, mode: MeasurementMode) -> bool {
        if mode == self.mode && mode != MeasurementMode::None {
            return false;
        }
        self.mode = mode;
        let had_points = !self.points.is_empty();
        self.points.clear();
        if had_points {
            tracing::debug!("Measurement mode {} - picked points cleared", mode.display_name());
        }
        had_points
    }

    /// Empty the point set; idempotent
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Feed the result of a pick
    pub fn on_pick_result(&mut self, hit: Option<DVec3>) -> SessionEvent {
        if self.mode == MeasurementMode::None {
            return SessionEvent::Ignored;
        }
        match hit {
            Some(pos) => self.on_pick(pos),
            None => SessionEvent::PickMiss,
        }
    }

    /// Add a picked point, starting over if the previous measurement was complete
    pub fn on_pick(&mut self, pos: DVec3) -> SessionEvent {
        let quota = self.quota();
        if quota == 0 {
            return SessionEvent::Ignored;
        }

        let rolled_over = self.points.len() >= quota;
        if rolled_over {
            tracing::debug!(
                "{} mode - previous {} points cleared",
                self.mode.display_name(),
                self.points.len()
            );
            self.points.clear();
        }

        self.points.push(pos);
        let count = self.points.len();
        SessionEvent::PointAdded {
            count,
            complete: count == quota,
            rolled_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> DVec3 {
        DVec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn test_pick_ignored_in_none_mode() {
        let mut s = PickingSession::new();
        assert_eq!(s.on_pick(p(1.0)), SessionEvent::Ignored);
        assert_eq!(s.on_pick_result(None), SessionEvent::Ignored);
        assert!(s.is_empty());
    }

    #[test]
    fn test_pick_miss_adds_nothing() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Line);
        assert_eq!(s.on_pick_result(None), SessionEvent::PickMiss);
        assert!(s.is_empty());
    }

    #[test]
    fn test_line_rollover_on_third_pick() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Line);
        s.on_pick(p(1.0));
        assert!(s.on_pick(p(2.0)).is_complete());
        let event = s.on_pick(p(3.0));
        assert_eq!(
            event,
            SessionEvent::PointAdded {
                count: 1,
                complete: false,
                rolled_over: true
            }
        );
        assert_eq!(s.points(), &[p(3.0)]);
    }

    #[test]
    fn test_point_mode_completes_every_pick() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Point);
        for i in 0..4 {
            assert!(s.on_pick(p(i as f64)).is_complete());
            assert_eq!(s.len(), 1);
        }
    }

    #[test]
    fn test_triangle_completes_once_on_third_pick() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Triangle);
        let completes: Vec<bool> = (0..3).map(|i| s.on_pick(p(i as f64)).is_complete()).collect();
        assert_eq!(completes, vec![false, false, true]);
    }

    #[test]
    fn test_quota_never_exceeded() {
        for mode in [
            MeasurementMode::None,
            MeasurementMode::Point,
            MeasurementMode::Line,
            MeasurementMode::Triangle,
        ] {
            let mut s = PickingSession::new();
            s.set_mode(mode);
            for i in 0..20 {
                s.on_pick(p(i as f64));
                assert!(s.len() <= mode.quota());
            }
        }
    }

    #[test]
    fn test_mode_switch_resets_points() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Line);
        s.on_pick(p(1.0));
        assert!(!s.set_mode(MeasurementMode::Line));
        assert_eq!(s.len(), 1);
        assert!(s.set_mode(MeasurementMode::Triangle));
        assert!(s.is_empty());
        s.on_pick(p(2.0));
        assert!(s.set_mode(MeasurementMode::None));
        assert!(s.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut s = PickingSession::new();
        s.set_mode(MeasurementMode::Triangle);
        s.on_pick(p(1.0));
        s.clear();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.mode(), MeasurementMode::Triangle);
    }
}
