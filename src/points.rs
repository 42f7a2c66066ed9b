//! Draggable-point model and hit-testing.
//!
//! [`DraggablePoints`] owns the displayed points and the candidate positions a
//! dragged point may snap to. Both sets are replaced wholesale through
//! [`DraggablePoints::set_data`]; the only in-place edit the model makes is
//! committing the dragged point onto its snap target when a drag completes.
//!
//! Points are addressed by index. Hover and drag state are indices into the
//! point list, which enforces a single hovered and a single dragged point.

use crate::geom::{LogicalPoint, ScreenPoint};
use crate::host::{CoordinateSpace, HandleScroll, ScrollControl};

/// A displayed, draggable point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointModel {
    /// Authoritative position in domain units.
    pub point: LogicalPoint,
    /// Projection of `point` under the current view transform.
    pub screen: ScreenPoint,
    /// Whether the pointer currently hovers this point.
    pub is_hovered: bool,
}

/// A position a dragged point is allowed to land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePoint {
    /// Position in domain units.
    pub point: LogicalPoint,
    /// Projection of `point` under the current view transform.
    pub screen: ScreenPoint,
}

/// Emitted when a drag begins on a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    /// Index of the dragged point.
    pub index: usize,
    /// Position of the dragged point.
    pub point: LogicalPoint,
    /// Initial snap target: the dragged point's own position.
    pub candidate: CandidatePoint,
}

/// Emitted on every pointer move during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    /// Index of the dragged point.
    pub index: usize,
    /// Position of the dragged point (unchanged until the drag completes).
    pub point: LogicalPoint,
    /// Nearest candidate, or `None` when there are no candidates.
    pub candidate: Option<CandidatePoint>,
}

/// Emitted when a drag completes.
#[derive(Debug, Clone, PartialEq)]
pub struct DragComplete {
    /// Index of the point that was dragged.
    pub index: usize,
    /// Every point after the commit.
    pub points: Vec<LogicalPoint>,
}

/// Emitted when a drag is cancelled. Carries no point data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragCancel {
    /// Index of the point that was being dragged.
    pub index: usize,
}

/// Point/candidate store with hover and drag state.
#[derive(Debug, Clone)]
pub struct DraggablePoints {
    points: Vec<PointModel>,
    candidates: Vec<CandidatePoint>,
    hovered: Option<usize>,
    dragged: Option<usize>,
    next_possible: Option<CandidatePoint>,
    vicinity_threshold: f32,
}

impl DraggablePoints {
    /// Create an empty model with the given per-axis hit threshold in pixels.
    pub fn new(vicinity_threshold: f32) -> Self {
        Self {
            points: Vec::new(),
            candidates: Vec::new(),
            hovered: None,
            dragged: None,
            next_possible: None,
            vicinity_threshold,
        }
    }

    /// Replace every point and candidate, projecting them through `space`.
    ///
    /// Hover and drag state are reset. Callers cancel an active drag first so
    /// the host's scroll handling is restored.
    pub fn set_data(
        &mut self,
        points: &[LogicalPoint],
        candidates: &[LogicalPoint],
        space: &(impl CoordinateSpace + ?Sized),
    ) {
        self.points = points
            .iter()
            .map(|&point| PointModel {
                point,
                screen: space.project(point),
                is_hovered: false,
            })
            .collect();
        self.candidates = candidates
            .iter()
            .map(|&point| CandidatePoint {
                point,
                screen: space.project(point),
            })
            .collect();
        self.hovered = None;
        self.dragged = None;
        self.next_possible = None;
    }

    /// Re-derive every screen position from the logical one.
    ///
    /// Run once per frame before hit-testing or drawing: the view transform
    /// can change without the data changing.
    pub fn refresh_projection(&mut self, space: &(impl CoordinateSpace + ?Sized)) {
        for model in &mut self.points {
            model.screen = space.project(model.point);
        }
        for candidate in &mut self.candidates {
            candidate.screen = space.project(candidate.point);
        }
        if let Some(next) = self.next_possible.as_mut() {
            next.screen = space.project(next.point);
        }
    }

    /// Update hover from a pointer position. Returns whether a point is hovered.
    ///
    /// The first point in list order within the vicinity square wins.
    pub fn hit_test_hover(&mut self, x: f32, y: f32) -> bool {
        let hit = self.point_in_vicinity(ScreenPoint::new(x, y));
        if let Some(previous) = self.hovered.take() {
            self.points[previous].is_hovered = false;
        }
        if let Some(index) = hit {
            self.points[index].is_hovered = true;
            self.hovered = Some(index);
        }
        hit.is_some()
    }

    /// Index of the first point within the vicinity square of `position`.
    pub fn point_in_vicinity(&self, position: ScreenPoint) -> Option<usize> {
        self.points
            .iter()
            .position(|model| model.screen.within_square(position, self.vicinity_threshold))
    }

    /// Candidate closest to `position` by Euclidean distance.
    ///
    /// Unprojected candidates are ignored; ties keep the earlier candidate.
    pub fn nearest_candidate(&self, position: ScreenPoint) -> Option<CandidatePoint> {
        let mut best: Option<(CandidatePoint, f32)> = None;
        for candidate in &self.candidates {
            if !candidate.screen.is_finite() {
                continue;
            }
            let distance = candidate.screen.distance(position);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((*candidate, distance));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// Begin a drag if `position` is on a point.
    ///
    /// Disables the host's native scrolling so the chart does not pan under
    /// the drag. Returns `None` and touches nothing when no point is hit.
    pub fn on_drag_start(
        &mut self,
        position: ScreenPoint,
        scroll: &mut (impl ScrollControl + ?Sized),
    ) -> Option<DragStart> {
        if self.dragged.is_some() {
            return None;
        }
        let index = self.point_in_vicinity(position)?;
        scroll.apply_scroll_options(HandleScroll::DISABLED);
        let model = self.points[index];
        let candidate = CandidatePoint {
            point: model.point,
            screen: model.screen,
        };
        self.dragged = Some(index);
        self.next_possible = Some(candidate);
        tracing::debug!(index, time = model.point.time, value = model.point.value, "drag started");
        Some(DragStart {
            index,
            point: model.point,
            candidate,
        })
    }

    /// Track the snap target for the pointer at `position`.
    pub fn on_drag(&mut self, position: ScreenPoint) -> Option<DragMove> {
        let index = self.dragged?;
        self.next_possible = self.nearest_candidate(position);
        Some(DragMove {
            index,
            point: self.points[index].point,
            candidate: self.next_possible,
        })
    }

    /// Commit the snap target onto the dragged point and end the drag.
    pub fn on_drag_complete(
        &mut self,
        scroll: &mut (impl ScrollControl + ?Sized),
    ) -> Option<DragComplete> {
        let index = self.dragged.take()?;
        if let Some(next) = self.next_possible.take() {
            let model = &mut self.points[index];
            model.point = next.point;
            model.screen = next.screen;
            model.is_hovered = false;
            if self.hovered == Some(index) {
                self.hovered = None;
            }
        }
        scroll.apply_scroll_options(HandleScroll::ENABLED);
        tracing::debug!(index, point = ?self.points[index].point, "drag completed");
        Some(DragComplete {
            index,
            points: self.logical_points(),
        })
    }

    /// End the drag without moving the point.
    pub fn on_drag_cancel(
        &mut self,
        scroll: &mut (impl ScrollControl + ?Sized),
    ) -> Option<DragCancel> {
        let index = self.dragged.take()?;
        self.next_possible = None;
        scroll.apply_scroll_options(HandleScroll::ENABLED);
        tracing::debug!(index, "drag cancelled");
        Some(DragCancel { index })
    }

    /// Displayed points.
    pub fn points(&self) -> &[PointModel] {
        &self.points
    }

    /// Snap candidates.
    pub fn candidates(&self) -> &[CandidatePoint] {
        &self.candidates
    }

    /// Logical positions of every point.
    pub fn logical_points(&self) -> Vec<LogicalPoint> {
        self.points.iter().map(|model| model.point).collect()
    }

    /// Index of the hovered point.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Index of the dragged point.
    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    /// Live snap target of the current drag.
    pub fn next_possible(&self) -> Option<CandidatePoint> {
        self.next_possible
    }

    /// Check whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// Per-axis hit threshold in pixels.
    pub fn vicinity_threshold(&self) -> f32 {
        self.vicinity_threshold
    }
}

impl Default for DraggablePoints {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Ten pixels per time unit, ten pixels per value unit, value axis up.
    struct Scale;

    impl CoordinateSpace for Scale {
        fn time_to_x(&self, time: i64) -> Option<f32> {
            Some(time as f32 * 10.0)
        }

        fn value_to_y(&self, value: f64) -> Option<f32> {
            Some((100.0 - value * 10.0) as f32)
        }
    }

    #[derive(Debug, Default)]
    struct Scroll(Vec<HandleScroll>);

    impl ScrollControl for Scroll {
        fn apply_scroll_options(&mut self, options: HandleScroll) {
            self.0.push(options);
        }
    }

    fn candidates(value: f64) -> Vec<LogicalPoint> {
        [3, 8, 10, 11]
            .into_iter()
            .map(|time| LogicalPoint::new(time, value))
            .collect()
    }

    fn model() -> DraggablePoints {
        let mut model = DraggablePoints::default();
        model.set_data(&[LogicalPoint::new(10, -5.0)], &candidates(-5.0), &Scale);
        model
    }

    #[test]
    fn set_data_projects_points() {
        let model = model();
        assert_eq!(model.points()[0].screen, ScreenPoint::new(100.0, 150.0));
        assert_eq!(model.candidates().len(), 4);
        assert_eq!(model.candidates()[0].screen, ScreenPoint::new(30.0, 150.0));
    }

    #[test]
    fn hover_moves_between_points() {
        let mut model = DraggablePoints::default();
        let points = [LogicalPoint::new(1, 0.0), LogicalPoint::new(5, 0.0)];
        model.set_data(&points, &[], &Scale);

        assert!(model.hit_test_hover(12.0, 95.0));
        assert_eq!(model.hovered(), Some(0));
        assert!(model.hit_test_hover(50.0, 100.0));
        assert_eq!(model.hovered(), Some(1));
        assert!(!model.points()[0].is_hovered);
        assert!(!model.hit_test_hover(30.0, 100.0));
        assert!(model.points().iter().all(|point| !point.is_hovered));
    }

    #[test]
    fn hover_overlap_prefers_first_point() {
        let mut model = DraggablePoints::default();
        // Second point is closer to the cursor but the first still wins.
        let points = [LogicalPoint::new(1, 0.0), LogicalPoint::new(2, 0.0)];
        model.set_data(&points, &[], &Scale);
        assert!(model.hit_test_hover(18.0, 100.0));
        assert_eq!(model.hovered(), Some(0));
    }

    #[test]
    fn drag_start_off_point_is_noop() {
        let mut model = model();
        let mut scroll = Scroll::default();
        assert!(model.on_drag_start(ScreenPoint::new(100.0, 140.0), &mut scroll).is_none());
        assert!(model.on_drag_start(ScreenPoint::new(110.0, 150.0), &mut scroll).is_none());
        assert!(!model.is_dragging());
        assert!(scroll.0.is_empty());
        assert!(model.on_drag(ScreenPoint::new(0.0, 0.0)).is_none());
        assert!(model.on_drag_complete(&mut scroll).is_none());
        assert!(model.on_drag_cancel(&mut scroll).is_none());
        assert!(scroll.0.is_empty());
    }

    #[test]
    fn drag_snaps_to_nearest_candidate() {
        let mut model = model();
        let mut scroll = Scroll::default();
        let start = model
            .on_drag_start(ScreenPoint::new(104.0, 146.0), &mut scroll)
            .expect("drag starts on the point");
        assert_eq!(start.candidate.point, LogicalPoint::new(10, -5.0));
        assert_eq!(scroll.0, [HandleScroll::DISABLED]);

        // Logical (9.6, -5): nearest candidate is time 10, not 8 or 11.
        let moved = model.on_drag(ScreenPoint::new(96.0, 150.0)).expect("dragging");
        assert_eq!(moved.candidate.map(|c| c.point), Some(LogicalPoint::new(10, -5.0)));

        model.on_drag(ScreenPoint::new(84.0, 150.0));
        let done = model.on_drag_complete(&mut scroll).expect("dragging");
        assert_eq!(done.points, [LogicalPoint::new(8, -5.0)]);
        assert_eq!(model.points()[0].screen, ScreenPoint::new(80.0, 150.0));
        assert_eq!(scroll.0, [HandleScroll::DISABLED, HandleScroll::ENABLED]);
        assert!(model.next_possible().is_none());
        assert!(!model.is_dragging());
    }

    #[test]
    fn complete_without_moves_keeps_position() {
        let mut model = model();
        let mut scroll = Scroll::default();
        model.on_drag_start(ScreenPoint::new(100.0, 150.0), &mut scroll);
        let done = model.on_drag_complete(&mut scroll).expect("dragging");
        assert_eq!(done.points, [LogicalPoint::new(10, -5.0)]);
    }

    #[test]
    fn cancel_restores_scroll_without_commit() {
        let mut model = model();
        let mut scroll = Scroll::default();
        model.on_drag_start(ScreenPoint::new(100.0, 150.0), &mut scroll);
        model.on_drag(ScreenPoint::new(30.0, 150.0));
        assert_eq!(model.on_drag_cancel(&mut scroll), Some(DragCancel { index: 0 }));
        assert_eq!(model.points()[0].point, LogicalPoint::new(10, -5.0));
        assert_eq!(scroll.0, [HandleScroll::DISABLED, HandleScroll::ENABLED]);
        assert!(model.next_possible().is_none());
    }

    #[test]
    fn empty_candidates_mean_no_snap() {
        let mut model = DraggablePoints::default();
        model.set_data(&[LogicalPoint::new(10, -5.0)], &[], &Scale);
        let mut scroll = Scroll::default();
        model.on_drag_start(ScreenPoint::new(100.0, 150.0), &mut scroll);
        let moved = model.on_drag(ScreenPoint::new(30.0, 150.0)).expect("dragging");
        assert!(moved.candidate.is_none());
        let done = model.on_drag_complete(&mut scroll).expect("dragging");
        assert_eq!(done.points, [LogicalPoint::new(10, -5.0)]);
    }

    #[test]
    fn unprojected_candidates_are_skipped() {
        struct Partial;
        impl CoordinateSpace for Partial {
            fn time_to_x(&self, time: i64) -> Option<f32> {
                (time != 3).then_some(time as f32 * 10.0)
            }
            fn value_to_y(&self, _value: f64) -> Option<f32> {
                Some(0.0)
            }
        }
        let mut model = DraggablePoints::default();
        model.set_data(&[], &candidates(0.0), &Partial);
        let nearest = model.nearest_candidate(ScreenPoint::new(30.0, 0.0)).expect("candidate");
        assert_eq!(nearest.point.time, 8);
    }

    #[test]
    fn refresh_follows_view_changes() {
        struct Shifted;
        impl CoordinateSpace for Shifted {
            fn time_to_x(&self, time: i64) -> Option<f32> {
                Some(time as f32 * 10.0 + 5.0)
            }
            fn value_to_y(&self, value: f64) -> Option<f32> {
                Some((100.0 - value * 10.0) as f32)
            }
        }
        let mut model = model();
        model.refresh_projection(&Shifted);
        assert_eq!(model.points()[0].screen.x, 105.0);
        assert_eq!(model.candidates()[3].screen.x, 115.0);
        assert_eq!(model.points()[0].point, LogicalPoint::new(10, -5.0));
    }

    fn screen_position() -> impl Strategy<Value = ScreenPoint> {
        (-50.0f32..250.0, 50.0f32..250.0).prop_map(|(x, y)| ScreenPoint::new(x, y))
    }

    fn logical_points(max: usize) -> impl Strategy<Value = Vec<LogicalPoint>> {
        prop::collection::vec(
            (0i64..20, -10i64..10).prop_map(|(time, value)| LogicalPoint::new(time, value as f64)),
            0..max,
        )
    }

    proptest! {
        #[test]
        fn at_most_one_point_hovered(
            points in logical_points(12),
            cursors in prop::collection::vec(screen_position(), 1..20),
        ) {
            let mut model = DraggablePoints::default();
            model.set_data(&points, &[], &Scale);
            for cursor in cursors {
                let hovered = model.hit_test_hover(cursor.x, cursor.y);
                let flagged = model.points().iter().filter(|p| p.is_hovered).count();
                prop_assert!(flagged <= 1);
                prop_assert_eq!(flagged == 1, hovered);
            }
        }

        #[test]
        fn commit_lands_on_candidate_or_stays(
            points in logical_points(6),
            candidates in logical_points(8),
            start in screen_position(),
            moves in prop::collection::vec(screen_position(), 0..6),
        ) {
            let mut model = DraggablePoints::default();
            model.set_data(&points, &candidates, &Scale);
            let mut scroll = Scroll::default();
            let Some(started) = model.on_drag_start(start, &mut scroll) else {
                return Ok(());
            };
            let before = model.points()[started.index].point;
            for position in &moves {
                model.on_drag(*position);
            }
            let done = model.on_drag_complete(&mut scroll).expect("dragging");
            let after = done.points[started.index];
            if moves.is_empty() || candidates.is_empty() {
                prop_assert_eq!(after, before);
            } else {
                prop_assert!(candidates.contains(&after));
            }
        }

        #[test]
        fn cancel_leaves_point_bit_identical(
            points in logical_points(6),
            candidates in logical_points(8),
            start in screen_position(),
            moves in prop::collection::vec(screen_position(), 0..6),
        ) {
            let mut model = DraggablePoints::default();
            model.set_data(&points, &candidates, &Scale);
            let snapshot = model.logical_points();
            let mut scroll = Scroll::default();
            if model.on_drag_start(start, &mut scroll).is_none() {
                prop_assert!(scroll.0.is_empty());
                return Ok(());
            }
            for position in &moves {
                model.on_drag(*position);
            }
            model.on_drag_cancel(&mut scroll);
            let after = model.logical_points();
            prop_assert_eq!(after.len(), snapshot.len());
            for (a, b) in after.iter().zip(&snapshot) {
                prop_assert_eq!(a.time, b.time);
                prop_assert_eq!(a.value.to_bits(), b.value.to_bits());
            }
            prop_assert_eq!(scroll.0.last().copied(), Some(HandleScroll::ENABLED));
        }
    }
}
