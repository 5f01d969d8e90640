use super::Assembly;
use crate::core::models::chain::{Chain, is_complete_composition};
use crate::core::models::component::Component;
use crate::core::models::ids::{ChainId, ComponentId};
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How a chain is rebuilt after one of its connections is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainRecompute {
    /// Walk the remaining connections and split the chain into its connected parts.
    #[default]
    Traverse,
    /// Keep every remaining member in the chain, connected or not.
    TrustMembership,
}

impl fmt::Display for ChainRecompute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainRecompute::Traverse => write!(f, "traverse"),
            ChainRecompute::TrustMembership => write!(f, "trust-membership"),
        }
    }
}

impl FromStr for ChainRecompute {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traverse" => Ok(ChainRecompute::Traverse),
            "trust-membership" | "trust" => Ok(ChainRecompute::TrustMembership),
            other => Err(format!(
                "unknown chain recompute policy '{}', expected 'traverse' or 'trust-membership'",
                other
            )),
        }
    }
}

impl Assembly {
    /// Chain bookkeeping after a new connection between `a` and `b`.
    pub(crate) fn on_connect(&mut self, a: ComponentId, b: ComponentId) {
        let (Some(chain_a), Some(chain_b)) = (
            self.components.get(a).map(|c| c.chain_id),
            self.components.get(b).map(|c| c.chain_id),
        ) else {
            return;
        };

        let target = match (chain_a, chain_b) {
            (None, None) => {
                let chain_id = self.chains.insert(Chain::new(vec![a, b]));
                self.assign_chain(&[a, b], chain_id);
                debug!(chain = ?chain_id, "Chain created.");
                chain_id
            }
            (Some(chain_id), None) => {
                self.add_member(chain_id, b);
                chain_id
            }
            (None, Some(chain_id)) => {
                self.add_member(chain_id, a);
                chain_id
            }
            (Some(first), Some(second)) if first != second => {
                self.merge_chains(first, second);
                first
            }
            (Some(_), Some(_)) => return,
        };
        self.refresh_completeness(target);
    }

    /// Chain bookkeeping after the connection between `a` and `b` was removed.
    pub(crate) fn on_disconnect(&mut self, a: ComponentId, b: ComponentId) {
        let mut touched: Vec<ChainId> = [a, b]
            .iter()
            .filter_map(|&id| self.components.get(id).and_then(|c| c.chain_id))
            .collect();
        touched.dedup();
        for chain_id in touched {
            self.recompute_chain(chain_id);
        }
    }

    /// Unchains `id` and recomputes the chain it belonged to.
    pub(crate) fn leave_chain(&mut self, id: ComponentId) {
        let Some(chain_id) = self.components.get(id).and_then(|c| c.chain_id) else {
            return;
        };
        self.unchain(&[id]);
        if let Some(chain) = self.chains.get_mut(chain_id) {
            chain.members.retain(|&member| member != id);
        }
        self.recompute_chain(chain_id);
        debug!(component = ?id, chain = ?chain_id, "Component left chain.");
    }

    fn add_member(&mut self, chain_id: ChainId, id: ComponentId) {
        if let Some(chain) = self.chains.get_mut(chain_id) {
            chain.members.push(id);
        }
        self.assign_chain(&[id], chain_id);
    }

    /// Moves every member of `second` into `first` and deletes `second`.
    fn merge_chains(&mut self, first: ChainId, second: ChainId) {
        let Some(absorbed) = self.chains.remove(second) else {
            return;
        };
        self.assign_chain(&absorbed.members, first);
        if let Some(chain) = self.chains.get_mut(first) {
            chain.members.extend(absorbed.members);
        }
        debug!(into = ?first, from = ?second, "Chains merged.");
    }

    fn assign_chain(&mut self, ids: &[ComponentId], chain_id: ChainId) {
        for &id in ids {
            if let Some(component) = self.components.get_mut(id) {
                component.chain_id = Some(chain_id);
            }
        }
    }

    fn unchain(&mut self, ids: &[ComponentId]) {
        for &id in ids {
            if let Some(component) = self.components.get_mut(id) {
                component.chain_id = None;
            }
        }
    }

    /// Rebuilds `chain_id` from the components that still reference it.
    ///
    /// Under [`ChainRecompute::Traverse`] the largest connected part keeps the id (ties go to
    /// the part found first in member order), other parts with two or more members get new
    /// chains and single components are unchained. A chain left with fewer than two members is
    /// deleted.
    pub(crate) fn recompute_chain(&mut self, chain_id: ChainId) {
        self.prune_dangling_links();
        let Some(chain) = self.chains.get(chain_id) else {
            return;
        };

        let members: Vec<ComponentId> = chain
            .members
            .iter()
            .copied()
            .filter(|&id| {
                self.components
                    .get(id)
                    .is_some_and(|component| component.chain_id == Some(chain_id))
            })
            .collect();

        let mut parts = match self.policy {
            ChainRecompute::TrustMembership => vec![members],
            ChainRecompute::Traverse => self.partition(&members),
        };

        let keep_index = parts
            .iter()
            .enumerate()
            .fold(None::<(usize, usize)>, |best, (index, part)| match best {
                Some((_, len)) if len >= part.len() => best,
                _ => Some((index, part.len())),
            })
            .map(|(index, _)| index);
        let kept = match keep_index {
            Some(index) => parts.swap_remove(index),
            None => Vec::new(),
        };

        for part in parts {
            if part.len() >= 2 {
                let new_id = self.chains.insert(Chain::new(part.clone()));
                self.assign_chain(&part, new_id);
                self.refresh_completeness(new_id);
                debug!(from = ?chain_id, chain = ?new_id, size = part.len(), "Chain split off.");
            } else {
                self.unchain(&part);
            }
        }

        if kept.len() < 2 {
            self.unchain(&kept);
            self.chains.remove(chain_id);
            debug!(chain = ?chain_id, "Chain dissolved.");
            return;
        }

        if let Some(chain) = self.chains.get_mut(chain_id) {
            chain.members = kept;
        }
        self.refresh_completeness(chain_id);
    }

    /// Splits `members` into connected parts, following links that stay inside the set.
    fn partition(&self, members: &[ComponentId]) -> Vec<Vec<ComponentId>> {
        let allowed: HashSet<ComponentId> = members.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut parts = Vec::new();

        for &start in members {
            if !seen.insert(start) {
                continue;
            }
            let mut reached = HashSet::from([start]);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                let Some(component) = self.components.get(current) else {
                    continue;
                };
                for link in component.links() {
                    if allowed.contains(&link.peer) && seen.insert(link.peer) {
                        reached.insert(link.peer);
                        queue.push_back(link.peer);
                    }
                }
            }
            // Keep the original join order inside each part.
            parts.push(
                members
                    .iter()
                    .copied()
                    .filter(|id| reached.contains(id))
                    .collect(),
            );
        }
        parts
    }

    pub(crate) fn refresh_completeness(&mut self, chain_id: ChainId) {
        let Some(chain) = self.chains.get(chain_id) else {
            return;
        };
        let complete = is_complete_composition(
            chain
                .members
                .iter()
                .filter_map(|&id| self.components.get(id))
                .map(Component::kind),
        );
        if let Some(chain) = self.chains.get_mut(chain_id) {
            chain.is_complete = complete;
        }
    }
}
