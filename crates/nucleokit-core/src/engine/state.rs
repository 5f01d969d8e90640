use super::rotation::RotationSession;
use crate::core::models::ids::ComponentId;

/// The single interaction mode the engine is in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Waiting for a second component to connect `source` to.
    Connecting { source: ComponentId },
    Rotating(RotationSession),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, InteractionState::Connecting { .. })
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, InteractionState::Rotating(_))
    }

    pub fn connecting_source(&self) -> Option<ComponentId> {
        match self {
            InteractionState::Connecting { source } => Some(*source),
            _ => None,
        }
    }

    pub fn rotation(&self) -> Option<&RotationSession> {
        match self {
            InteractionState::Rotating(session) => Some(session),
            _ => None,
        }
    }

    pub(crate) fn rotation_mut(&mut self) -> Option<&mut RotationSession> {
        match self {
            InteractionState::Rotating(session) => Some(session),
            _ => None,
        }
    }

    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Connecting { .. } => "connecting",
            InteractionState::Rotating(_) => "rotating",
        }
    }

    /// Text for the on-screen mode indicator; `None` while idle.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Connecting { .. } => Some("connecting"),
            InteractionState::Rotating(session) if session.is_fine_tune() => {
                Some("rotating (fine)")
            }
            InteractionState::Rotating(_) => Some("rotating"),
        }
    }

    /// Leaves the current mode. Returns the state that was exited.
    pub(crate) fn exit(&mut self) -> InteractionState {
        let previous = std::mem::take(self);
        if !previous.is_idle() {
            tracing::debug!(mode = previous.name(), "Interaction mode exited.");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::Assembly;
    use crate::core::models::component::Moiety;
    use slotmap::KeyData;

    #[test]
    fn default_is_idle_without_label() {
        let state = InteractionState::default();
        assert!(state.is_idle());
        assert_eq!(state.label(), None);
        assert_eq!(state.name(), "idle");
    }

    #[test]
    fn connecting_exposes_source() {
        let source = ComponentId::from(KeyData::from_ffi(5));
        let state = InteractionState::Connecting { source };
        assert!(state.is_connecting());
        assert_eq!(state.connecting_source(), Some(source));
        assert_eq!(state.label(), Some("connecting"));
        assert!(state.rotation().is_none());
    }

    #[test]
    fn rotating_label_reflects_fine_tune() {
        let mut assembly = Assembly::new();
        let pivot = assembly.add_component(Moiety::Phosphate);
        let session = RotationSession::capture(&mut assembly, pivot).unwrap();
        let mut state = InteractionState::Rotating(session);
        assert_eq!(state.label(), Some("rotating"));

        state
            .rotation_mut()
            .unwrap()
            .total_degrees(0.5, true, 0.3);
        assert_eq!(state.label(), Some("rotating (fine)"));
    }

    #[test]
    fn exit_returns_previous_and_resets_to_idle() {
        let source = ComponentId::from(KeyData::from_ffi(9));
        let mut state = InteractionState::Connecting { source };
        let previous = state.exit();
        assert_eq!(previous, InteractionState::Connecting { source });
        assert!(state.is_idle());
    }
}
