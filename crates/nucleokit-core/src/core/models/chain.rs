use super::component::ComponentKind;
use super::ids::ComponentId;

/// Returns `true` when the given kinds include at least one phosphate, one sugar and one base.
pub fn is_complete_composition<I>(kinds: I) -> bool
where
    I: IntoIterator<Item = ComponentKind>,
{
    let (mut phosphate, mut sugar, mut base) = (false, false, false);
    for kind in kinds {
        match kind {
            ComponentKind::Phosphate => phosphate = true,
            ComponentKind::Sugar => sugar = true,
            ComponentKind::Base => base = true,
        }
        if phosphate && sugar && base {
            return true;
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub(crate) members: Vec<ComponentId>, // Ordered by the time each component joined
    pub(crate) is_complete: bool,         // Derived from member kinds on every structural change
}

impl Chain {
    pub(crate) fn new(members: Vec<ComponentId>) -> Self {
        Self {
            members,
            is_complete: false,
        }
    }

    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }
}
