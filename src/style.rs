//! Colour assignment for entity types and relation types.
//!
//! Colours are presentation metadata only. Every distinct key gets one
//! independent, uniformly random 24-bit colour; nothing keeps colours apart
//! visually, and a fresh map is drawn on every render.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::graph::KnowledgeGraph;

/// 24-bit RGB colour, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const MAX: u32 = 0xFF_FFFF;

    /// Build from a packed `0xRRGGBB` value; higher bits are dropped.
    pub fn from_rgb(rgb: u32) -> Self {
        Self(rgb & Self::MAX)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..=Self::MAX))
    }

    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Draw one colour per distinct key. Repeated keys reuse the first draw.
pub fn assign_colors<'k, I, R>(keys: I, rng: &mut R) -> HashMap<String, Color>
where
    I: IntoIterator<Item = &'k str>,
    R: Rng + ?Sized,
{
    let mut colors = HashMap::new();
    for key in keys {
        colors
            .entry(key.to_string())
            .or_insert_with(|| Color::random(&mut *rng));
    }
    colors
}

/// Colour maps for one render of a graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleMap {
    /// entity type -> colour
    pub node_colors: HashMap<String, Color>,
    /// relation type -> colour
    pub edge_colors: HashMap<String, Color>,
}

impl StyleMap {
    /// Colour every entity type and relation type present in `graph`.
    /// Untyped nodes have no key and therefore no colour.
    pub fn for_graph<R: Rng + ?Sized>(graph: &KnowledgeGraph, rng: &mut R) -> Self {
        Self {
            node_colors: assign_colors(graph.entity_types(), &mut *rng),
            edge_colors: assign_colors(graph.relationship_types(), rng),
        }
    }

    pub fn node_color(&self, entity_type: &str) -> Option<Color> {
        self.node_colors.get(entity_type).copied()
    }

    pub fn edge_color(&self, relationship: &str) -> Option<Color> {
        self.edge_colors.get(relationship).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_description;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph::from_description(&parse_description(
            "(Vehicle:Class {}) (Audi:Brand {}) (BMW:Brand {}) (A4:Car {}) \
             (Vehicle)-[:HAS_BRAND]->(Audi) (Vehicle)-[:HAS_BRAND]->(BMW) \
             (Audi)-[:MAKES]->(A4) (A4)-[:USES]->(Battery)",
        ))
    }

    #[test]
    fn test_color_display_format() {
        assert_eq!(Color::from_rgb(0x0a0b0c).to_string(), "#0a0b0c");
        assert_eq!(Color::from_rgb(0).to_string(), "#000000");
        assert_eq!(Color::from_rgb(0xFFFFFF).to_string(), "#ffffff");
    }

    #[test]
    fn test_color_from_rgb_masks_high_bits() {
        assert_eq!(Color::from_rgb(0x1234_5678).rgb(), 0x34_5678);
    }

    #[test]
    fn test_random_color_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(Color::random(&mut rng).rgb() <= Color::MAX);
        }
    }

    #[test]
    fn test_assign_colors_one_per_distinct_key() {
        let mut rng = StdRng::seed_from_u64(1);
        let colors = assign_colors(["a", "b", "a", "c", "b"], &mut rng);
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_style_map_cardinality() {
        let graph = sample_graph();
        let mut rng = rand::thread_rng();
        let style = StyleMap::for_graph(&graph, &mut rng);
        assert_eq!(style.node_colors.len(), graph.entity_types().len());
        assert_eq!(style.node_colors.len(), 3);
        assert_eq!(style.edge_colors.len(), 3);
        for ty in graph.entity_types() {
            assert!(style.node_color(ty).is_some());
        }
    }

    #[test]
    fn test_style_map_untyped_node_uncolored() {
        let graph = sample_graph();
        assert_eq!(graph.node_type("Battery"), None);
        let style = StyleMap::for_graph(&graph, &mut StdRng::seed_from_u64(3));
        assert!(!style.node_colors.contains_key("Battery"));
    }

    #[test]
    fn test_style_map_seeded_is_reproducible() {
        let graph = sample_graph();
        let first = StyleMap::for_graph(&graph, &mut StdRng::seed_from_u64(42));
        let second = StyleMap::for_graph(&graph, &mut StdRng::seed_from_u64(42));
        assert_eq!(first.node_colors, second.node_colors);
        assert_eq!(first.edge_colors, second.edge_colors);
    }

    #[test]
    fn test_style_map_empty_graph() {
        let style = StyleMap::for_graph(&KnowledgeGraph::new(), &mut rand::thread_rng());
        assert!(style.node_colors.is_empty());
        assert!(style.edge_colors.is_empty());
    }
}
