use super::config::EngineConfig;
use super::drag::{DragOutcome, DragSession};
use super::error::EngineError;
use super::feedback::{Notice, NoticeBoard, NoticeLevel};
use super::rotation::RotationSession;
use super::state::InteractionState;
use crate::core::assembly::{Assembly, LinkError};
use crate::core::chemistry::rules::{self, Rejection};
use crate::core::models::chain::Chain;
use crate::core::models::component::{Component, Moiety};
use crate::core::models::ids::{ChainId, ComponentId};
use crate::core::models::topology::BondClass;
use crate::core::utils::geometry;
use crate::workflows::{auto_assembly, pairing};
use nalgebra::{Point2, Vector2};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Result of clicking a component while building connections by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The component is now the pending source of a connection.
    Selected(ComponentId),
    /// The pending source was clicked again and deselected.
    Cancelled(ComponentId),
    Connected {
        a: ComponentId,
        b: ComponentId,
        bond: BondClass,
    },
    Rejected {
        a: ComponentId,
        b: ComponentId,
        reason: Rejection,
    },
}

/// One editing session: the assembly graph, the interaction mode, an optional group
/// drag and the notice board.
#[derive(Debug, Clone)]
pub struct AssemblyEngine {
    config: EngineConfig,
    assembly: Assembly,
    state: InteractionState,
    drag: Option<DragSession>,
    notices: NoticeBoard,
}

impl Default for AssemblyEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AssemblyEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            assembly: Assembly::with_policy(config.chain_recompute),
            notices: NoticeBoard::new(config.notice_ttl()),
            state: InteractionState::Idle,
            drag: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the underlying graph.
    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    // --- Construction ---

    pub fn create_component(&mut self, moiety: Moiety) -> ComponentId {
        self.assembly.add_component(moiety)
    }

    /// Drops a new component with its center at `position`.
    pub fn place_component(&mut self, moiety: Moiety, position: Point2<f64>) -> ComponentId {
        self.assembly.add_component_at(moiety, position)
    }

    /// Clears everything: components, chains, mode, drag and notices.
    pub fn reset_all(&mut self) {
        self.state = InteractionState::Idle;
        self.drag = None;
        self.assembly.clear();
        self.notices.clear();
        info!("Assembly reset.");
    }

    // --- Graph mutation ---

    /// Connects two components, posting a notice either way.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> Result<BondClass, EngineError> {
        match self.assembly.connect(a, b) {
            Ok(bond) => {
                self.notify(
                    NoticeLevel::Success,
                    format!("Formed a {}.", bond.description()),
                );
                Ok(bond)
            }
            Err(LinkError::Rejected(reason)) => {
                self.notices.post_invalid_link(
                    a,
                    b,
                    format!("Invalid connection: {}.", reason),
                    Instant::now(),
                );
                Err(reason.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn disconnect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        self.assembly.disconnect(a, b)
    }

    /// Deletes a component; any mode or drag that refers to it lets go of it first.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<Component, EngineError> {
        if !self.assembly.contains(id) {
            return Err(EngineError::ComponentNotFound(id));
        }
        self.release(id);
        self.assembly
            .remove_component(id)
            .ok_or(EngineError::ComponentNotFound(id))
    }

    /// Removes every connection of `id`.
    pub fn detach_all(&mut self, id: ComponentId) -> Result<usize, EngineError> {
        if !self.assembly.contains(id) {
            return Err(EngineError::ComponentNotFound(id));
        }
        let removed = self.assembly.detach_all(id);
        if removed > 0 {
            self.notify(
                NoticeLevel::Info,
                format!("Removed {} connection(s).", removed),
            );
        }
        Ok(removed)
    }

    fn release(&mut self, id: ComponentId) {
        let owns_mode = match &self.state {
            InteractionState::Idle => false,
            InteractionState::Connecting { source } => *source == id,
            InteractionState::Rotating(session) => session.pivot() == id,
        };
        if owns_mode {
            self.state.exit();
        } else if let Some(session) = self.state.rotation_mut() {
            session.forget(id);
        }
        if self.drag.as_ref().is_some_and(|drag| drag.anchor() == id) {
            self.drag = None;
        } else if let Some(drag) = self.drag.as_mut() {
            drag.forget(id);
        }
    }

    // --- Group drag ---

    /// Starts moving `id` together with its chain or connected group.
    pub fn begin_drag(&mut self, id: ComponentId) -> Result<(), EngineError> {
        if !self.state.is_idle() {
            return Err(EngineError::ModeConflict {
                action: "drag",
                mode: self.state.name(),
            });
        }
        let origin = self
            .assembly
            .component(id)
            .map(|component| component.position)
            .ok_or(EngineError::ComponentNotFound(id))?;
        let members = self.assembly.group_of(id);
        debug!(anchor = ?id, members = members.len(), "Drag started.");
        self.drag = Some(DragSession::new(id, members, origin));
        Ok(())
    }

    /// Translates the dragged group by `(dx, dy)` relative to its current position.
    pub fn apply_drag_delta(&mut self, dx: f64, dy: f64) -> Result<(), EngineError> {
        let drag = self.drag.as_ref().ok_or(EngineError::NoActiveDrag)?;
        self.assembly.translate(drag.members(), Vector2::new(dx, dy));
        Ok(())
    }

    /// Finishes the drag: removes the anchor if it left the canvas, otherwise runs the
    /// proximity scan.
    pub fn end_drag(&mut self) -> Result<DragOutcome, EngineError> {
        let drag = self.drag.take().ok_or(EngineError::NoActiveDrag)?;
        let anchor = drag.anchor();
        let position = self
            .assembly
            .component(anchor)
            .map(|component| component.position)
            .ok_or(EngineError::ComponentNotFound(anchor))?;

        if self.config.canvas.is_outside(&position) {
            let component = self
                .assembly
                .remove_component(anchor)
                .ok_or(EngineError::ComponentNotFound(anchor))?;
            self.notify(
                NoticeLevel::Info,
                format!("Removed {}.", component.label),
            );
            return Ok(DragOutcome::Removed { anchor, component });
        }

        let links = auto_assembly::scan(&mut self.assembly, self.config.auto_assembly_threshold);
        for link in &links {
            self.notify(
                NoticeLevel::Success,
                format!("Auto-assembled a {}.", link.bond.description()),
            );
        }
        Ok(DragOutcome::Assembled { links })
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    // --- Rotation mode ---

    /// Enters rotation mode around `pivot`, leaving any other mode.
    pub fn start_rotation(&mut self, pivot: ComponentId) -> Result<(), EngineError> {
        if !self.assembly.contains(pivot) {
            return Err(EngineError::ComponentNotFound(pivot));
        }
        self.enter_mode();
        let session = RotationSession::capture(&mut self.assembly, pivot)
            .ok_or(EngineError::ComponentNotFound(pivot))?;
        debug!(pivot = ?pivot, members = session.members().len(), "Rotation mode entered.");
        self.state = InteractionState::Rotating(session);
        self.notify(
            NoticeLevel::Info,
            "Rotation mode: drag to rotate, hold shift to fine tune.",
        );
        Ok(())
    }

    pub fn rotation_pointer_down(&mut self, pointer: Point2<f64>) -> Result<(), EngineError> {
        let session = self.state.rotation_mut().ok_or(EngineError::NotRotating)?;
        session.pointer_down(&pointer);
        Ok(())
    }

    /// Pointer moved to canvas position `pointer`; rotates if the pointer is held down.
    pub fn rotation_pointer_move(
        &mut self,
        pointer: Point2<f64>,
        fine_tune: bool,
    ) -> Result<Option<f64>, EngineError> {
        let session = self.state.rotation().ok_or(EngineError::NotRotating)?;
        let angle = geometry::angle_between(&session.pivot_center(), &pointer);
        self.update_rotation(angle, fine_tune)
    }

    /// Rotates the group for a pointer at `pointer_angle` radians as seen from the pivot.
    ///
    /// # Return
    ///
    /// The total rotation applied in degrees, or `None` if the pointer is not held down.
    pub fn update_rotation(
        &mut self,
        pointer_angle: f64,
        fine_tune: bool,
    ) -> Result<Option<f64>, EngineError> {
        let factor = self.config.fine_tune_factor;
        let InteractionState::Rotating(session) = &mut self.state else {
            return Err(EngineError::NotRotating);
        };
        if !session.is_dragging() {
            return Ok(None);
        }
        let total = session.total_degrees(pointer_angle, fine_tune, factor);
        session.apply(&mut self.assembly, total);
        Ok(Some(total))
    }

    /// Sets the rotation of the group to `total_degrees` relative to the mode's snapshot.
    pub fn apply_rotation(&mut self, total_degrees: f64) -> Result<(), EngineError> {
        let session = self.state.rotation().ok_or(EngineError::NotRotating)?;
        session.apply(&mut self.assembly, total_degrees);
        Ok(())
    }

    pub fn rotation_pointer_up(&mut self) -> Result<(), EngineError> {
        let session = self.state.rotation_mut().ok_or(EngineError::NotRotating)?;
        session.pointer_up();
        Ok(())
    }

    /// Leaves rotation mode, keeping the current geometry.
    pub fn stop_rotation(&mut self) -> Result<(), EngineError> {
        if !self.state.is_rotating() {
            return Err(EngineError::NotRotating);
        }
        self.state.exit();
        Ok(())
    }

    // --- Connecting mode ---

    /// Handles a click on `id` while building connections by hand.
    ///
    /// With nothing pending the component becomes the source. Clicking the source again
    /// deselects it. Clicking another component attempts the connection, and the engine
    /// returns to idle whatever the result.
    pub fn select_for_connection(
        &mut self,
        id: ComponentId,
    ) -> Result<SelectionOutcome, EngineError> {
        if !self.assembly.contains(id) {
            return Err(EngineError::ComponentNotFound(id));
        }

        match self.state.connecting_source() {
            Some(source) if source == id => {
                self.state.exit();
                Ok(SelectionOutcome::Cancelled(id))
            }
            Some(source) => {
                self.state.exit();
                match self.connect(source, id) {
                    Ok(bond) => Ok(SelectionOutcome::Connected {
                        a: source,
                        b: id,
                        bond,
                    }),
                    Err(EngineError::Link(LinkError::Rejected(reason))) => {
                        Ok(SelectionOutcome::Rejected {
                            a: source,
                            b: id,
                            reason,
                        })
                    }
                    Err(err) => Err(err),
                }
            }
            None => {
                self.enter_mode();
                self.state = InteractionState::Connecting { source: id };
                debug!(source = ?id, "Connecting mode entered.");
                Ok(SelectionOutcome::Selected(id))
            }
        }
    }

    /// Segment from the pending source to the pointer, clamped to the canvas.
    pub fn connection_preview(&self, pointer: Point2<f64>) -> Option<(Point2<f64>, Point2<f64>)> {
        let source = self.state.connecting_source()?;
        let start = self.assembly.component(source)?.position;
        let canvas = &self.config.canvas;
        Some((
            start,
            geometry::clamp_to_bounds(&pointer, canvas.width, canvas.height),
        ))
    }

    /// Escape or secondary click: returns to idle. Returns `false` if already idle.
    pub fn cancel(&mut self) -> bool {
        !self.state.exit().is_idle()
    }

    fn enter_mode(&mut self) {
        self.state.exit();
        if self.drag.take().is_some() {
            debug!("In-flight drag abandoned.");
        }
    }

    // --- Pairing ---

    #[instrument(skip_all)]
    pub fn validate_pairing(&mut self) -> pairing::PairingReport {
        let report = pairing::validate_pairing(&mut self.assembly);
        if report.is_insufficient() {
            self.notify(
                NoticeLevel::Error,
                "At least two complete nucleotide chains are needed for pairing.",
            );
        } else if report.count() > 0 {
            self.notify(
                NoticeLevel::Success,
                format!("Found {} valid chain pairing(s).", report.count()),
            );
        } else {
            self.notify(
                NoticeLevel::Error,
                "No valid pairing found. Bases pair as A-T, A-U and C-G.",
            );
        }
        report
    }

    // --- Queries ---

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.assembly.component(id)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.assembly.components_iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.assembly.chain(id)
    }

    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.assembly.chains_iter()
    }

    pub fn is_chain_complete(&self, id: ChainId) -> bool {
        self.assembly.is_chain_complete(id)
    }

    /// Bond class two components would share, whether or not they may connect.
    pub fn bond_class(&self, a: ComponentId, b: ComponentId) -> Option<BondClass> {
        let first = self.assembly.component(a)?;
        let second = self.assembly.component(b)?;
        Some(rules::classify_bond(&first.moiety, &second.moiety))
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode_label(&self) -> Option<&'static str> {
        self.state.label()
    }

    pub fn notices(&self, now: Instant) -> Vec<&Notice> {
        self.notices.active(now)
    }

    pub fn expire_notices(&mut self, now: Instant) -> usize {
        self.notices.expire(now)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.post(level, message, Instant::now());
    }
}
