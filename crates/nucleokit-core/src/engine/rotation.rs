use crate::core::assembly::Assembly;
use crate::core::models::ids::ComponentId;
use crate::core::utils::geometry;
use nalgebra::{Point2, Vector2};
use std::collections::HashMap;

/// Geometry of one group member at the moment rotation mode was entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberSnapshot {
    pub position: Point2<f64>,
    pub rotation_deg: f64,
    /// Offset of the member center from the pivot center.
    pub offset: Vector2<f64>,
    /// Polar angle of `offset`, in radians.
    pub polar_angle: f64,
}

/// State of an active rotation: a pivot, the group turning with it, and the snapshot
/// every absolute rotation is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationSession {
    pivot: ComponentId,
    pivot_center: Point2<f64>,
    members: Vec<ComponentId>,
    snapshots: HashMap<ComponentId, MemberSnapshot>,
    is_dragging: bool,
    start_pointer_angle: f64,
    fine_tune: bool,
}

impl RotationSession {
    /// Snapshots the group around `pivot`. Returns `None` if the pivot does not exist.
    pub(crate) fn capture(assembly: &mut Assembly, pivot: ComponentId) -> Option<Self> {
        let pivot_center = assembly.component(pivot)?.position;
        let members = assembly.group_of(pivot);

        let snapshots = members
            .iter()
            .filter_map(|&id| {
                let component = assembly.component(id)?;
                let offset = component.position - pivot_center;
                Some((
                    id,
                    MemberSnapshot {
                        position: component.position,
                        rotation_deg: component.rotation_deg(),
                        offset,
                        polar_angle: offset.y.atan2(offset.x),
                    },
                ))
            })
            .collect();

        Some(Self {
            pivot,
            pivot_center,
            members,
            snapshots,
            is_dragging: false,
            start_pointer_angle: 0.0,
            fine_tune: false,
        })
    }

    pub fn pivot(&self) -> ComponentId {
        self.pivot
    }

    pub fn pivot_center(&self) -> Point2<f64> {
        self.pivot_center
    }

    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    pub fn snapshot(&self, id: ComponentId) -> Option<&MemberSnapshot> {
        self.snapshots.get(&id)
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn start_pointer_angle(&self) -> f64 {
        self.start_pointer_angle
    }

    pub fn is_fine_tune(&self) -> bool {
        self.fine_tune
    }

    pub(crate) fn pointer_down(&mut self, pointer: &Point2<f64>) {
        self.start_pointer_angle = geometry::angle_between(&self.pivot_center, pointer);
        self.is_dragging = true;
    }

    pub(crate) fn pointer_up(&mut self) {
        self.is_dragging = false;
    }

    /// Total rotation in degrees for a pointer now at `pointer_angle` (radians, seen from the pivot).
    pub(crate) fn total_degrees(
        &mut self,
        pointer_angle: f64,
        fine_tune: bool,
        fine_tune_factor: f64,
    ) -> f64 {
        self.fine_tune = fine_tune;
        let delta = geometry::normalize_angle_delta(pointer_angle - self.start_pointer_angle);
        let degrees = delta.to_degrees();
        if fine_tune {
            degrees * fine_tune_factor
        } else {
            degrees
        }
    }

    /// Places every member at its snapshot rotated by `total_degrees` about the pivot.
    ///
    /// The pivot keeps its position and only accumulates rotation.
    pub(crate) fn apply(&self, assembly: &mut Assembly, total_degrees: f64) {
        for &id in &self.members {
            let Some(snapshot) = self.snapshots.get(&id) else {
                continue;
            };
            if !assembly.contains(id) {
                continue;
            }
            if id != self.pivot {
                let offset = geometry::rotate_by_degrees(&snapshot.offset, total_degrees);
                assembly.set_position(id, self.pivot_center + offset);
            }
            assembly.set_rotation(
                id,
                geometry::wrap_degrees(snapshot.rotation_deg + total_degrees),
            );
        }
    }

    /// Forgets a component that was removed while the session was active.
    pub(crate) fn forget(&mut self, id: ComponentId) {
        self.members.retain(|&member| member != id);
        self.snapshots.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::{Moiety, SugarVariant};
    use std::f64::consts::PI;

    fn two_member_group() -> (Assembly, ComponentId, ComponentId) {
        let mut assembly = Assembly::new();
        let p = assembly.add_component_at(Moiety::Phosphate, Point2::new(100.0, 100.0));
        let s = assembly.add_component_at(
            Moiety::Sugar(SugarVariant::Ribose),
            Point2::new(160.0, 100.0),
        );
        assembly.connect(p, s).unwrap();
        (assembly, p, s)
    }

    #[test]
    fn capture_snapshots_offsets_and_polar_angles() {
        let (mut assembly, p, s) = two_member_group();
        let session = RotationSession::capture(&mut assembly, p).unwrap();
        assert_eq!(session.pivot(), p);
        assert_eq!(session.members().len(), 2);

        let snapshot = session.snapshot(s).unwrap();
        assert_eq!(snapshot.offset, Vector2::new(60.0, 0.0));
        assert_eq!(snapshot.polar_angle, 0.0);
        assert!(!session.is_dragging());
    }

    #[test]
    fn pointer_down_records_start_angle() {
        let (mut assembly, p, _) = two_member_group();
        let mut session = RotationSession::capture(&mut assembly, p).unwrap();
        session.pointer_down(&Point2::new(100.0, 150.0));
        assert!(session.is_dragging());
        assert!((session.start_pointer_angle() - PI / 2.0).abs() < 1e-12);
        session.pointer_up();
        assert!(!session.is_dragging());
    }

    #[test]
    fn total_degrees_takes_short_way_and_scales_fine_tune() {
        let (mut assembly, p, _) = two_member_group();
        let mut session = RotationSession::capture(&mut assembly, p).unwrap();
        // Pointer starts just above the negative x axis.
        session.pointer_down(&Point2::new(0.0, 100.0 + 1e-9));
        let crossing = session.total_degrees(-PI + 0.1, false, 0.3);
        assert!(crossing > 0.0 && crossing < 10.0, "got {}", crossing);

        session.start_pointer_angle = 0.0;
        let coarse = session.total_degrees(PI / 2.0, false, 0.3);
        let fine = session.total_degrees(PI / 2.0, true, 0.3);
        assert!((coarse - 90.0).abs() < 1e-9);
        assert!((fine - 27.0).abs() < 1e-9);
        assert!(session.is_fine_tune());
    }

    #[test]
    fn apply_is_absolute_from_snapshot() {
        let (mut assembly, p, s) = two_member_group();
        let session = RotationSession::capture(&mut assembly, p).unwrap();

        session.apply(&mut assembly, 45.0);
        session.apply(&mut assembly, 90.0);

        let sugar = assembly.component(s).unwrap();
        assert!((sugar.position - Point2::new(100.0, 160.0)).norm() < 1e-9);
        assert!((sugar.rotation_deg() - 90.0).abs() < 1e-9);

        let pivot = assembly.component(p).unwrap();
        assert_eq!(pivot.position, Point2::new(100.0, 100.0));
        assert!((pivot.rotation_deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn negative_rotation_wraps_into_range() {
        let (mut assembly, p, s) = two_member_group();
        let session = RotationSession::capture(&mut assembly, p).unwrap();
        session.apply(&mut assembly, -30.0);
        assert!((assembly.component(s).unwrap().rotation_deg() - 330.0).abs() < 1e-9);
    }
}
