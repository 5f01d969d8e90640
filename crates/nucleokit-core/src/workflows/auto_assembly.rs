use crate::core::assembly::Assembly;
use crate::core::models::ids::ComponentId;
use crate::core::models::topology::BondClass;
use crate::core::utils::geometry;
use tracing::{debug, info, instrument};

/// A connection created by a proximity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormedLink {
    pub a: ComponentId,
    pub b: ComponentId,
    pub bond: BondClass,
}

/// Connects every pair of components whose centers are closer than `threshold`
/// and whose kinds are allowed to bond.
///
/// Pairs are visited in component order; a connection formed early in the scan is
/// already in place when later pairs are checked.
#[instrument(skip_all, name = "auto_assembly_scan", fields(threshold = threshold))]
pub fn scan(assembly: &mut Assembly, threshold: f64) -> Vec<FormedLink> {
    let placed: Vec<_> = assembly
        .components_iter()
        .map(|(id, component)| (id, component.position))
        .collect();

    let mut formed = Vec::new();
    for (i, (a, position_a)) in placed.iter().enumerate() {
        for (b, position_b) in &placed[i + 1..] {
            if geometry::distance(position_a, position_b) >= threshold {
                continue;
            }
            match assembly.connect(*a, *b) {
                Ok(bond) => formed.push(FormedLink {
                    a: *a,
                    b: *b,
                    bond,
                }),
                Err(reason) => debug!(a = ?a, b = ?b, %reason, "Nearby pair not connected."),
            }
        }
    }

    if !formed.is_empty() {
        info!(links = formed.len(), "Auto-assembly formed new connections.");
    }
    formed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::{BaseLetter, Moiety, SugarVariant};
    use nalgebra::Point2;

    #[test]
    fn connects_only_nearby_compatible_pairs() {
        let mut assembly = Assembly::new();
        let p = assembly.add_component_at(Moiety::Phosphate, Point2::new(100.0, 100.0));
        let s = assembly.add_component_at(
            Moiety::Sugar(SugarVariant::Deoxyribose),
            Point2::new(130.0, 100.0),
        );
        let far = assembly.add_component_at(
            Moiety::Sugar(SugarVariant::Ribose),
            Point2::new(400.0, 400.0),
        );
        let other_p = assembly.add_component_at(Moiety::Phosphate, Point2::new(100.0, 130.0));

        let formed = scan(&mut assembly, 50.0);
        assert_eq!(
            formed,
            vec![FormedLink {
                a: p,
                b: s,
                bond: BondClass::Strong
            }, FormedLink {
                a: s,
                b: other_p,
                bond: BondClass::Strong
            }]
        );
        assert!(assembly.component(far).unwrap().links().is_empty());
        assert_eq!(assembly.bond_between(p, other_p), None);
    }

    #[test]
    fn distance_equal_to_threshold_is_not_nearby() {
        let mut assembly = Assembly::new();
        assembly.add_component_at(Moiety::Phosphate, Point2::new(0.0, 0.0));
        assembly.add_component_at(
            Moiety::Sugar(SugarVariant::Ribose),
            Point2::new(50.0, 0.0),
        );
        assert!(scan(&mut assembly, 50.0).is_empty());
    }

    #[test]
    fn existing_connections_are_left_alone() {
        let mut assembly = Assembly::new();
        let s = assembly.add_component_at(
            Moiety::Sugar(SugarVariant::Ribose),
            Point2::new(0.0, 0.0),
        );
        let a = assembly.add_component_at(Moiety::Base(BaseLetter::A), Point2::new(10.0, 0.0));
        assembly.connect(s, a).unwrap();
        assert!(scan(&mut assembly, 50.0).is_empty());
        assert_eq!(assembly.component(s).unwrap().links().len(), 1);
    }
}
