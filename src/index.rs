//! genome length registry and similarity index.
//!
//! Genome ids are interned once into dense u32 handles; edges and adjacency
//! lists store handles so that memory stays proportional to edge count even
//! with long fasta ids.

use fxhash::FxHashMap;

use crate::edges::SimilarityEdge;
use crate::error::CatalogError;

/// dense handle of a genome, the rank at which it entered the registry
pub type GenomeId = u32;


/// id <-> handle interning and genome lengths.
/// Immutable once aggregation is done. Duplicate ids are rejected : a silent
/// merge would corrupt the length sort driving representative selection.
pub struct GenomeRegistry {
    /// ids by handle
    ids: Vec<String>,
    /// lengths by handle
    lengths: Vec<u64>,
    /// id -> handle
    ranks: FxHashMap<String, GenomeId>,
}

impl Default for GenomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GenomeRegistry {
    pub fn new() -> Self {
        GenomeRegistry {
            ids: Vec::new(),
            lengths: Vec::new(),
            ranks: FxHashMap::default(),
        }
    } // end of new

    pub fn with_capacity(capacity: usize) -> Self {
        GenomeRegistry {
            ids: Vec::with_capacity(capacity),
            lengths: Vec::with_capacity(capacity),
            ranks: FxHashMap::default(),
        }
    }

    /// registers a genome, returns its handle.
    /// Rejects duplicate ids and null lengths as fatal ingestion errors.
    pub fn insert(&mut self, id: &str, length: u64) -> Result<GenomeId, CatalogError> {
        if self.ranks.contains_key(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
        if length == 0 {
            return Err(CatalogError::NullLength(id.to_string()));
        }
        let rank = self.ids.len() as GenomeId;
        self.ids.push(id.to_string());
        self.lengths.push(length);
        self.ranks.insert(id.to_string(), rank);
        Ok(rank)
    } // end of insert

    /// handle of an id, None if the registry never saw it
    pub fn rank_of(&self, id: &str) -> Option<GenomeId> {
        self.ranks.get(id).copied()
    }

    /// id of a handle
    pub fn name_of(&self, genome: GenomeId) -> &str {
        &self.ids[genome as usize]
    }

    /// length of a handle
    pub fn length_of(&self, genome: GenomeId) -> u64 {
        self.lengths[genome as usize]
    }

    /// number of genomes registered
    pub fn get_nb_genomes(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
} // end of impl GenomeRegistry


//=====================================================================================

/// adjacency over normalized directional edges, keyed by the edge target :
/// incoming_edges_of(g) returns every edge with to == g, each exposing the
/// candidate (from) and the coverage of g.
///
/// Duplicate (from, to) pairs are collapsed at insertion keeping the highest
/// ANI, first seen winning ties, so downstream iteration is deterministic.
pub struct SimilarityIndex {
    /// incoming[g] = edges with to == g, in collapsed insertion order
    incoming: Vec<Vec<SimilarityEdge>>,
    /// (from, to) -> position in incoming[to]
    positions: FxHashMap<(GenomeId, GenomeId), usize>,
    /// number of raw insertions that hit an already stored pair
    nb_collapsed: usize,
}

impl SimilarityIndex {
    /// an index over nb_genomes genomes with no edge yet. Genomes with no
    /// incoming edge are valid entries (isolated, future singletons).
    pub fn new(nb_genomes: usize) -> Self {
        SimilarityIndex {
            incoming: vec![Vec::new(); nb_genomes],
            positions: FxHashMap::default(),
            nb_collapsed: 0,
        }
    } // end of new

    /// builds the index from a batch of normalized edges
    pub fn from_edges(nb_genomes: usize, edges: Vec<SimilarityEdge>) -> Self {
        let mut index = Self::new(nb_genomes);
        for edge in edges {
            index.insert(edge);
        }
        index
    } // end of from_edges

    /// stores one directional edge, collapsing a duplicate (from, to) pair
    /// to the highest ANI. Strictly higher replaces, equal keeps first seen.
    pub fn insert(&mut self, edge: SimilarityEdge) {
        debug_assert!(edge.from != edge.to);
        let key = (edge.from, edge.to);
        match self.positions.get(&key) {
            Some(&pos) => {
                self.nb_collapsed += 1;
                let stored = &mut self.incoming[edge.to as usize][pos];
                if edge.ani > stored.ani {
                    *stored = edge;
                }
            }
            None => {
                let list = &mut self.incoming[edge.to as usize];
                self.positions.insert(key, list.len());
                list.push(edge);
            }
        }
    } // end of insert

    /// every stored edge targeting genome, in stable insertion order
    pub fn incoming_edges_of(&self, genome: GenomeId) -> &[SimilarityEdge] {
        &self.incoming[genome as usize]
    }

    /// number of directional edges stored after collapse
    pub fn get_nb_edges(&self) -> usize {
        self.positions.len()
    }

    /// number of duplicate pair insertions collapsed
    pub fn get_nb_collapsed(&self) -> usize {
        self.nb_collapsed
    }
} // end of impl SimilarityIndex


//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: GenomeId, to: GenomeId, ani: f32, cov: f32) -> SimilarityEdge {
        SimilarityEdge {
            from,
            to,
            ani,
            coverage_of_to: cov,
        }
    }

    #[test]
    fn test_registry_handles_and_lengths() {
        let mut registry = GenomeRegistry::new();
        let a = registry.insert("genome_a", 10000).unwrap();
        let b = registry.insert("genome_b", 9800).unwrap();
        assert_eq!(registry.get_nb_genomes(), 2);
        assert_eq!(registry.rank_of("genome_a"), Some(a));
        assert_eq!(registry.rank_of("genome_c"), None);
        assert_eq!(registry.name_of(b), "genome_b");
        assert_eq!(registry.length_of(a), 10000);
    }

    #[test]
    fn test_registry_rejects_duplicate_id() {
        let mut registry = GenomeRegistry::new();
        registry.insert("genome_a", 10000).unwrap();
        let res = registry.insert("genome_a", 500);
        assert!(matches!(res, Err(CatalogError::DuplicateId(ref id)) if id == "genome_a"));
    }

    #[test]
    fn test_registry_rejects_null_length() {
        let mut registry = GenomeRegistry::new();
        assert!(matches!(
            registry.insert("genome_a", 0),
            Err(CatalogError::NullLength(_))
        ));
    }

    #[test]
    fn test_duplicate_pair_collapses_to_highest_ani() {
        let mut index = SimilarityIndex::new(2);
        index.insert(edge(1, 0, 96.0, 90.0));
        index.insert(edge(1, 0, 98.0, 88.0));
        let stored = index.incoming_edges_of(0);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].ani, 98.0);
        assert_eq!(stored[0].coverage_of_to, 88.0);
        assert_eq!(index.get_nb_edges(), 1);
        assert_eq!(index.get_nb_collapsed(), 1);
    }

    #[test]
    fn test_duplicate_pair_tie_keeps_first_seen() {
        let mut index = SimilarityIndex::new(2);
        index.insert(edge(1, 0, 96.0, 90.0));
        index.insert(edge(1, 0, 96.0, 50.0));
        let stored = index.incoming_edges_of(0);
        assert_eq!(stored.len(), 1);
        // same ANI : the first record wins, coverage included
        assert_eq!(stored[0].coverage_of_to, 90.0);
    }

    #[test]
    fn test_isolated_genome_has_no_incoming_edge() {
        let index = SimilarityIndex::from_edges(3, vec![edge(1, 0, 96.0, 90.0)]);
        assert!(index.incoming_edges_of(2).is_empty());
    }
} // end of mod tests
