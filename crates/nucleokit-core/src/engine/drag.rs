use crate::core::models::component::Component;
use crate::core::models::ids::ComponentId;
use crate::workflows::auto_assembly::FormedLink;
use nalgebra::Point2;

/// A group being dragged by one of its members.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    anchor: ComponentId,
    members: Vec<ComponentId>,
    anchor_origin: Point2<f64>,
}

impl DragSession {
    pub(crate) fn new(anchor: ComponentId, members: Vec<ComponentId>, origin: Point2<f64>) -> Self {
        Self {
            anchor,
            members,
            anchor_origin: origin,
        }
    }

    /// The component the pointer grabbed.
    pub fn anchor(&self) -> ComponentId {
        self.anchor
    }

    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    /// Position of the anchor when the drag began.
    pub fn anchor_origin(&self) -> Point2<f64> {
        self.anchor_origin
    }

    pub(crate) fn forget(&mut self, id: ComponentId) {
        self.members.retain(|&member| member != id);
    }
}

/// What happened when a drag was released.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The anchor was dropped outside the canvas and deleted with all its connections.
    Removed {
        anchor: ComponentId,
        component: Component,
    },
    /// The drop stayed on the canvas; these connections were formed by proximity.
    Assembled { links: Vec<FormedLink> },
}
