//! Metamour Graph
//!
//! Relationships between partners who share the player. Edges are undirected
//! and stored once with their endpoints in lexicographic order.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use life_events::{clamp_stat, metamour_key, metamour_key_forms};

/// Initial metamour relationship range
pub const INITIAL_RANGE: (i32, i32) = (45, 65);

/// One undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetamourEdge {
    /// Lexicographically smaller endpoint
    pub a: String,
    pub b: String,
    pub relationship: i32,
}

impl MetamourEdge {
    fn new(x: &str, y: &str, relationship: i32) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a: a.to_string(),
            b: b.to_string(),
            relationship: clamp_stat(relationship),
        }
    }

    fn matches(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub fn key(&self) -> String {
        metamour_key(&self.a, &self.b)
    }
}

/// All metamour edges of a session, sorted by endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetamourGraph {
    edges: Vec<MetamourEdge>,
}

impl MetamourGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// One edge for every pair of partners, with a random starting value.
    pub fn generate(partners: &[String], rng: &mut SmallRng) -> Self {
        let mut graph = Self::new();
        for (i, x) in partners.iter().enumerate() {
            for y in &partners[i + 1..] {
                let value = rng.gen_range(INITIAL_RANGE.0..=INITIAL_RANGE.1);
                graph.edges.push(MetamourEdge::new(x, y, value));
            }
        }
        graph.sort();
        graph
    }

    /// Rebuild from persisted `"a|b"` keys.
    ///
    /// Each known pair is looked up under its canonical key, then under the
    /// reversed order older saves used. Keys matching no pair are dropped and
    /// missing pairs are generated fresh.
    pub fn from_keyed(stored: &BTreeMap<String, i32>, partners: &[String], rng: &mut SmallRng) -> Self {
        let mut graph = Self::new();
        let mut used = BTreeSet::new();

        for (i, x) in partners.iter().enumerate() {
            for y in &partners[i + 1..] {
                let found = metamour_key_forms(x, y)
                    .into_iter()
                    .find_map(|key| stored.get(&key).map(|value| (key, *value)));
                let value = match found {
                    Some((key, value)) => {
                        used.insert(key);
                        value
                    }
                    None => {
                        tracing::warn!(a = %x, b = %y, "Backfilling missing metamour edge");
                        rng.gen_range(INITIAL_RANGE.0..=INITIAL_RANGE.1)
                    }
                };
                graph.edges.push(MetamourEdge::new(x, y, value));
            }
        }

        for key in stored.keys().filter(|k| !used.contains(*k)) {
            tracing::warn!(key = %key, "Dropping metamour edge for unknown partners");
        }
        graph.sort();
        graph
    }

    pub fn to_keyed(&self) -> BTreeMap<String, i32> {
        self.edges
            .iter()
            .map(|e| (e.key(), e.relationship))
            .collect()
    }

    fn sort(&mut self) {
        self.edges
            .sort_by(|l, r| (l.a.as_str(), l.b.as_str()).cmp(&(r.a.as_str(), r.b.as_str())));
    }

    /// Relationship between two partners, in either order.
    pub fn get(&self, x: &str, y: &str) -> Option<i32> {
        self.edges
            .iter()
            .find(|e| e.matches(x, y))
            .map(|e| e.relationship)
    }

    pub fn edges(&self) -> &[MetamourEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut MetamourEdge> {
        self.edges.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_one_edge_per_pair() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let graph = MetamourGraph::generate(&names(&["Sam", "Alex", "Riley"]), &mut rng);

        assert_eq!(graph.edges().len(), 3);
        for edge in graph.edges() {
            assert!(edge.a < edge.b);
            assert!((45..=65).contains(&edge.relationship));
        }
        assert_eq!(graph.get("Sam", "Alex"), graph.get("Alex", "Sam"));
        assert_eq!(graph.edges().iter().filter(|e| e.a == "Riley" || e.b == "Riley").count(), 2);
    }

    #[test]
    fn test_single_partner_has_no_edges() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(MetamourGraph::generate(&names(&["Solo"]), &mut rng).is_empty());
    }

    #[test]
    fn test_from_keyed_recanonicalizes_and_backfills() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut stored = BTreeMap::new();
        stored.insert("Riley|Casey".to_string(), 61);
        stored.insert("Casey|Ghost".to_string(), 10);
        stored.insert("garbage".to_string(), 10);

        let partners = names(&["Riley", "Casey", "Sam"]);
        let graph = MetamourGraph::from_keyed(&stored, &partners, &mut rng);

        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.get("Casey", "Riley"), Some(61));
        assert!(graph.to_keyed().contains_key("Casey|Riley"));
        assert!(graph.get("Casey", "Ghost").is_none());
        assert!(graph.get("Sam", "Riley").is_some());
    }

    #[test]
    fn test_new_edge_orders_endpoints() {
        let edge = MetamourEdge::new("Zed", "Amy", 150);
        assert_eq!(edge.a, "Amy");
        assert_eq!(edge.b, "Zed");
        assert_eq!(edge.relationship, 100);
    }

    #[test]
    fn test_separator_in_names_survives_keyed_round_trip() {
        let mut rng = SmallRng::seed_from_u64(9);
        let partners = names(&["A|B", "C", "D"]);
        let graph = MetamourGraph::generate(&partners, &mut rng);

        let mut other_rng = SmallRng::seed_from_u64(10);
        let restored = MetamourGraph::from_keyed(&graph.to_keyed(), &partners, &mut other_rng);
        assert_eq!(restored, graph);
    }
}
