//! greedy star clustering of genomes into vOTUs.
//!
//! The pass is strictly sequential and fully determined by the length sort :
//! the longest unassigned genome seeds a cluster and recruits, one level deep
//! only, every still unassigned genome whose direct edge to the seed passes
//! both thresholds. A genome recruited this way never recruits in turn, so a
//! chain A-B-C with no direct A-C similarity cannot drag C into A's cluster.

use std::cmp::Reverse;

use crate::index::{GenomeId, GenomeRegistry, SimilarityIndex};
use crate::params::ClusterParams;


/// one vOTU : a representative and its members, representative first
pub struct Cluster {
    representative: GenomeId,
    /// members in (length desc, id asc) order, representative included in head position
    members: Vec<GenomeId>,
}

impl Cluster {
    pub fn get_representative(&self) -> GenomeId {
        self.representative
    }

    pub fn get_members(&self) -> &[GenomeId] {
        &self.members
    }

    pub fn get_nb_members(&self) -> usize {
        self.members.len()
    }
} // end of impl Cluster


//=====================================================================================

/// the clustering engine. One instance runs one pass over one registry/index
/// couple; the assignment state lives and dies inside [cluster](Self::cluster).
pub struct ClusterEngine<'a> {
    registry: &'a GenomeRegistry,
    index: &'a SimilarityIndex,
    params: ClusterParams,
}

impl<'a> ClusterEngine<'a> {
    pub fn new(registry: &'a GenomeRegistry, index: &'a SimilarityIndex, params: ClusterParams) -> Self {
        ClusterEngine {
            registry,
            index,
            params,
        }
    } // end of new

    // genome handles sorted by length descending, ties broken by id ascending.
    // This order alone fixes which genomes become representatives.
    fn sorted_by_length(&self) -> Vec<GenomeId> {
        let mut order: Vec<GenomeId> = (0..self.registry.get_nb_genomes() as GenomeId).collect();
        order.sort_unstable_by_key(|&g| (Reverse(self.registry.length_of(g)), self.registry.name_of(g)));
        order
    } // end of sorted_by_length

    /// runs the pass, returning clusters in representative discovery order
    /// (descending representative length). Every genome ends up in exactly
    /// one cluster.
    pub fn cluster(&self) -> Vec<Cluster> {
        let nb_genomes = self.registry.get_nb_genomes();
        let min_ani = self.params.get_min_ani() as f32;
        let min_cov = self.params.get_min_cov() as f32;
        //
        let order = self.sorted_by_length();
        // assignment state, owned by this invocation only
        let mut assigned = vec![false; nb_genomes];
        let mut clusters = Vec::<Cluster>::new();
        //
        for &seed in &order {
            if assigned[seed as usize] {
                continue;
            }
            assigned[seed as usize] = true;
            let mut members = vec![seed];
            // candidates are the sources of edges targeting the seed : the
            // coverage stored on such an edge is the coverage of the seed.
            // Recruitment looks one level deep only.
            for edge in self.index.incoming_edges_of(seed) {
                let candidate = edge.from;
                if assigned[candidate as usize] {
                    continue;
                }
                // both thresholds inclusive, missing edges never reach here
                if edge.ani >= min_ani && edge.coverage_of_to >= min_cov {
                    assigned[candidate as usize] = true;
                    members.push(candidate);
                }
            }
            // recruits in the same global order as seeds
            members[1..].sort_unstable_by_key(|&g| (Reverse(self.registry.length_of(g)), self.registry.name_of(g)));
            clusters.push(Cluster {
                representative: seed,
                members,
            });
        }
        //
        let nb_members: usize = clusters.iter().map(|c| c.get_nb_members()).sum();
        debug_assert_eq!(nb_members, nb_genomes);
        log::info!(
            "clustered {} genomes into {} clusters, thresholds ani >= {} cov >= {}",
            nb_genomes,
            clusters.len(),
            min_ani,
            min_cov
        );
        clusters
    } // end of cluster
} // end of impl ClusterEngine


//=====================================================================================

// end of mod tests
