//! vcatalog : dereplication of a viral genome collection into a catalog of
//! representative sequences (vOTUs).
//!
//! The pipeline aggregates fasta files into one corpus, delegates all versus
//! all ANI to skani, normalizes the resulting records into directional edges
//! and clusters genomes with a greedy star rule : the longest unassigned
//! genome seeds a cluster and recruits only genomes directly similar to it.

pub mod error;
pub mod params;

pub mod files;
pub mod ani;

pub mod edges;
pub mod index;
pub mod cluster;
pub mod report;
pub mod extract;

pub mod slurm;
