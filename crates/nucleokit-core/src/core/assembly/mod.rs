//! # Assembly Module
//!
//! The graph store behind the simulator: every placed component, the mirrored
//! connections between them, and the chain registry derived from those connections.
//!
//! All structural mutations go through [`Assembly`] so that chain membership,
//! connection mirroring and chain completeness stay consistent after every call.

mod chains;

pub use chains::ChainRecompute;

use crate::core::chemistry::rules::{self, Rejection};
use crate::core::models::chain::Chain;
use crate::core::models::component::{Component, Moiety};
use crate::core::models::ids::{ChainId, ComponentId};
use crate::core::models::topology::BondClass;
use nalgebra::{Point2, Vector2};
use slotmap::SlotMap;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("connection rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("component {0:?} does not exist")]
    ComponentNotFound(ComponentId),
}

/// Component graph plus chain registry for one session.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Primary storage for components.
    components: SlotMap<ComponentId, Component>,
    /// Chains currently alive; a chain always has at least two members.
    chains: SlotMap<ChainId, Chain>,
    /// How a chain is rebuilt after one of its connections disappears.
    policy: ChainRecompute,
    /// Counter used for the next `component-N` label.
    next_label: usize,
}

impl Assembly {
    /// Creates an empty assembly using the default chain recompute policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ChainRecompute) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ChainRecompute {
        self.policy
    }

    /// Adds a component at the canvas origin.
    ///
    /// # Arguments
    ///
    /// * `moiety` - What the component is (kind plus sugar variant or base letter).
    ///
    /// # Return
    ///
    /// The identifier of the new, unchained and unconnected component.
    pub fn add_component(&mut self, moiety: Moiety) -> ComponentId {
        self.add_component_at(moiety, Point2::origin())
    }

    /// Adds a component centered at `position`.
    ///
    /// # Arguments
    ///
    /// * `moiety` - What the component is.
    /// * `position` - Center of the component in canvas coordinates.
    ///
    /// # Return
    ///
    /// The identifier of the new component.
    pub fn add_component_at(&mut self, moiety: Moiety, position: Point2<f64>) -> ComponentId {
        let label = format!("component-{}", self.next_label);
        self.next_label += 1;
        let id = self
            .components
            .insert(Component::new(moiety, label, position));
        debug!(component = ?id, %moiety, "Component added.");
        id
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Returns an iterator over all components in insertion-slot order.
    pub fn components_iter(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components.iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Completeness flag of a chain; unknown chains are never complete.
    pub fn is_chain_complete(&self, id: ChainId) -> bool {
        self.chains.get(id).is_some_and(Chain::is_complete)
    }

    /// Bond class of the existing connection between `a` and `b`, if any.
    pub fn bond_between(&self, a: ComponentId, b: ComponentId) -> Option<BondClass> {
        self.components.get(a)?.bond_to(b)
    }

    /// Every connection exactly once, as `(lower id, higher id, bond)`.
    pub fn edges(&self) -> Vec<(ComponentId, ComponentId, BondClass)> {
        let mut edges = Vec::new();
        for (id, component) in &self.components {
            for link in component.links() {
                if id < link.peer {
                    edges.push((id, link.peer, link.bond));
                }
            }
        }
        edges
    }

    fn moiety_of(&self, id: ComponentId) -> Result<Moiety, LinkError> {
        self.components
            .get(id)
            .map(|component| component.moiety)
            .ok_or(LinkError::ComponentNotFound(id))
    }

    /// Runs the chemistry rules for a prospective connection without mutating anything.
    ///
    /// # Arguments
    ///
    /// * `a` - First endpoint.
    /// * `b` - Second endpoint.
    ///
    /// # Return
    ///
    /// The bond class the connection would carry.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::ComponentNotFound`] for an unknown endpoint and
    /// [`LinkError::Rejected`] when a rule forbids the connection.
    pub fn validate_connection(
        &self,
        a: ComponentId,
        b: ComponentId,
    ) -> Result<BondClass, LinkError> {
        let moiety_a = self.moiety_of(a)?;
        let moiety_b = self.moiety_of(b)?;
        let already_connected = self.bond_between(a, b).is_some();
        Ok(rules::validate(&moiety_a, &moiety_b, already_connected)?)
    }

    /// Validates and, on success, inserts a mirrored connection and updates chains.
    ///
    /// # Arguments
    ///
    /// * `a` - First endpoint.
    /// * `b` - Second endpoint.
    ///
    /// # Return
    ///
    /// The bond class of the new connection.
    ///
    /// # Errors
    ///
    /// Same as [`Assembly::validate_connection`]; a rejected call changes nothing.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> Result<BondClass, LinkError> {
        let bond = self.validate_connection(a, b)?;
        self.insert_link(a, b, bond);
        self.on_connect(a, b);
        debug!(a = ?a, b = ?b, bond = %bond, "Components connected.");
        Ok(bond)
    }

    /// Inserts a hydrogen connection between two bases without any chain bookkeeping.
    ///
    /// Both strands keep their own chains, so the pairing can be cleared again under any
    /// [`ChainRecompute`] policy.
    pub(crate) fn pair_bases(
        &mut self,
        a: ComponentId,
        b: ComponentId,
    ) -> Result<BondClass, LinkError> {
        let bond = self.validate_connection(a, b)?;
        if bond != BondClass::Hydrogen {
            return Err(LinkError::Rejected(Rejection::InvalidBasePair));
        }
        self.insert_link(a, b, bond);
        debug!(a = ?a, b = ?b, "Bases paired.");
        Ok(bond)
    }

    fn insert_link(&mut self, a: ComponentId, b: ComponentId, bond: BondClass) {
        if let Some(component) = self.components.get_mut(a) {
            component.push_link(b, bond);
        }
        if let Some(component) = self.components.get_mut(b) {
            component.push_link(a, bond);
        }
    }

    /// Removes the connection between `a` and `b` from both endpoints.
    ///
    /// # Return
    ///
    /// `true` if a connection existed and was removed.
    pub fn disconnect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        let removed_a = self
            .components
            .get_mut(a)
            .is_some_and(|component| component.drop_link(b));
        let removed_b = self
            .components
            .get_mut(b)
            .is_some_and(|component| component.drop_link(a));
        if !(removed_a || removed_b) {
            return false;
        }
        self.on_disconnect(a, b);
        debug!(a = ?a, b = ?b, "Components disconnected.");
        true
    }

    /// Removes every connection of `id` and takes it out of its chain.
    ///
    /// The component ends up unchained under every policy; the chain it left is recomputed.
    ///
    /// # Return
    ///
    /// The number of connections removed.
    pub fn detach_all(&mut self, id: ComponentId) -> usize {
        let peers: Vec<ComponentId> = match self.components.get(id) {
            Some(component) => component.links().iter().map(|link| link.peer).collect(),
            None => return 0,
        };
        let removed = peers
            .into_iter()
            .filter(|&peer| self.disconnect(id, peer))
            .count();
        self.leave_chain(id);
        removed
    }

    /// Deletes a component after disconnecting all of its edges.
    ///
    /// # Return
    ///
    /// The removed component, or `None` if `id` was unknown.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        if !self.components.contains_key(id) {
            return None;
        }
        self.detach_all(id);
        let removed = self.components.remove(id)?;
        debug!(component = ?id, "Component removed.");
        Some(removed)
    }

    /// Drops every component and chain and restarts label numbering.
    pub fn clear(&mut self) {
        self.components.clear();
        self.chains.clear();
        self.next_label = 0;
    }

    /// Removes connections whose peer no longer exists or does not mirror them.
    ///
    /// # Return
    ///
    /// The number of link entries removed.
    pub fn prune_dangling_links(&mut self) -> usize {
        let mut dangling = Vec::new();
        for (id, component) in &self.components {
            for link in component.links() {
                let mirrored = self
                    .components
                    .get(link.peer)
                    .is_some_and(|peer| peer.bond_to(id) == Some(link.bond));
                if !mirrored {
                    dangling.push((id, link.peer));
                }
            }
        }

        for &(id, peer) in &dangling {
            warn!(component = ?id, peer = ?peer, "Pruning dangling connection.");
            if let Some(component) = self.components.get_mut(id) {
                component.drop_link(peer);
            }
        }
        dangling.len()
    }

    /// Breadth-first walk over connections starting at `start`.
    ///
    /// # Return
    ///
    /// Every component reachable from `start`, `start` first. Empty if `start` is unknown.
    pub fn find_connected(&self, start: ComponentId) -> Vec<ComponentId> {
        if !self.components.contains_key(start) {
            return Vec::new();
        }
        let mut visited = HashSet::from([start]);
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            let Some(component) = self.components.get(current) else {
                continue;
            };
            for link in component.links() {
                if self.components.contains_key(link.peer) && visited.insert(link.peer) {
                    queue.push_back(link.peer);
                }
            }
        }
        order
    }

    /// The set of components that move together with `id`.
    ///
    /// Chain members if `id` is chained, otherwise everything reachable over connections.
    pub fn group_of(&mut self, id: ComponentId) -> Vec<ComponentId> {
        self.prune_dangling_links();
        let chain_members = self
            .components
            .get(id)
            .and_then(|component| component.chain_id)
            .and_then(|chain_id| self.chains.get(chain_id))
            .map(|chain| chain.members().to_vec());

        match chain_members {
            Some(members) => members
                .into_iter()
                .filter(|member| self.components.contains_key(*member))
                .collect(),
            None => self.find_connected(id),
        }
    }

    /// Rigidly translates the given components.
    pub fn translate(&mut self, ids: &[ComponentId], delta: Vector2<f64>) {
        for &id in ids {
            if let Some(component) = self.components.get_mut(id) {
                component.position += delta;
            }
        }
    }

    pub(crate) fn set_position(&mut self, id: ComponentId, position: Point2<f64>) {
        if let Some(component) = self.components.get_mut(id) {
            component.position = position;
        }
    }

    pub(crate) fn set_rotation(&mut self, id: ComponentId, rotation_deg: f64) {
        if let Some(component) = self.components.get_mut(id) {
            component.rotation_deg = rotation_deg;
        }
    }

    /// Checks chain membership, connection mirroring and edge uniqueness.
    pub fn is_consistent(&self) -> bool {
        let links_ok = self.components.iter().all(|(id, component)| {
            let mut seen = HashSet::new();
            component.links().iter().all(|link| {
                seen.insert(link.peer)
                    && self
                        .components
                        .get(link.peer)
                        .is_some_and(|peer| peer.bond_to(id) == Some(link.bond))
            })
        });

        let chain_refs_ok = self.components.iter().all(|(id, component)| {
            component
                .chain_id
                .is_none_or(|chain_id| self.chains.get(chain_id).is_some_and(|c| c.contains(id)))
        });

        let members_ok = self.chains.iter().all(|(chain_id, chain)| {
            chain.len() >= 2
                && chain.members().iter().all(|&member| {
                    self.components
                        .get(member)
                        .is_some_and(|component| component.chain_id == Some(chain_id))
                })
                && chain.is_complete() == self.composition_is_complete(chain.members())
        });

        links_ok && chain_refs_ok && members_ok
    }

    fn composition_is_complete(&self, members: &[ComponentId]) -> bool {
        crate::core::models::chain::is_complete_composition(
            members
                .iter()
                .filter_map(|&member| self.components.get(member))
                .map(Component::kind),
        )
    }
}
