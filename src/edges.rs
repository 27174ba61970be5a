//! edge normalization : raw similarity records to directional edges.
//!
//! The external engine (skani triangle -E) emits one row per genome pair :
//! (idA, idB, ani, covA, covB) where covX is the alignment fraction of X.
//! Every valid row becomes two directional edges on the 0-100 scale, each
//! carrying the coverage of its own target, so the clustering engine never
//! has to reason about orientation again.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CatalogError;
use crate::index::{GenomeId, GenomeRegistry};
use crate::params::CoverageScale;


/// a directional similarity edge, all values in [0,100].
/// coverage_of_to is the fraction of to's length spanned by the alignment with from.
#[derive(Copy, Clone, Debug)]
pub struct SimilarityEdge {
    pub from: GenomeId,
    pub to: GenomeId,
    pub ani: f32,
    pub coverage_of_to: f32,
} // end of SimilarityEdge


/// parses raw similarity rows, translating ids to registry handles.
/// Self pairs, short rows, non numeric or out of range values are dropped
/// with a warning and counted. An id the registry never saw is fatal : it
/// means the similarity data and the genome registry do not match.
pub struct EdgeNormalizer<'a> {
    registry: &'a GenomeRegistry,
    scale: CoverageScale,
    /// nb raw records seen (header excluded)
    nb_records: usize,
    /// nb records dropped
    nb_dropped: usize,
}

impl<'a> EdgeNormalizer<'a> {
    pub fn new(registry: &'a GenomeRegistry, scale: CoverageScale) -> Self {
        EdgeNormalizer {
            registry,
            scale,
            nb_records: 0,
            nb_dropped: 0,
        }
    } // end of new

    /// nb raw records seen so far
    pub fn get_nb_records(&self) -> usize {
        self.nb_records
    }

    /// nb records dropped so far
    pub fn get_nb_dropped(&self) -> usize {
        self.nb_dropped
    }

    // parse one percentage field, rescaling coverage when the input is fractional
    fn parse_value(&self, field: &str, rescale: bool) -> Option<f32> {
        let mut value = field.parse::<f32>().ok()?;
        if rescale && self.scale == CoverageScale::Fraction {
            value *= 100.;
        }
        if !value.is_finite() || !(0. ..=100.).contains(&value) {
            return None;
        }
        Some(value)
    } // end of parse_value

    /// normalizes one raw row into its two directional edges.
    /// Ok(None) means the row was dropped (and logged), not an error.
    pub fn normalize_record(
        &mut self,
        line: &str,
    ) -> Result<Option<(SimilarityEdge, SimilarityEdge)>, CatalogError> {
        self.nb_records += 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            log::warn!("dropping short similarity record : {}", line);
            self.nb_dropped += 1;
            return Ok(None);
        }
        let (id_a, id_b) = (fields[0], fields[1]);
        if id_a == id_b {
            log::warn!("dropping self similarity record for id : {}", id_a);
            self.nb_dropped += 1;
            return Ok(None);
        }
        // ani is a percentage in every input scale, only coverage may need rescaling
        let ani = self.parse_value(fields[2], false);
        let cov_a = self.parse_value(fields[3], true);
        let cov_b = self.parse_value(fields[4], true);
        let (ani, cov_a, cov_b) = match (ani, cov_a, cov_b) {
            (Some(ani), Some(cov_a), Some(cov_b)) => (ani, cov_a, cov_b),
            _ => {
                log::warn!("dropping non numeric or out of range similarity record : {}", line);
                self.nb_dropped += 1;
                return Ok(None);
            }
        };
        let rank_a = self
            .registry
            .rank_of(id_a)
            .ok_or_else(|| CatalogError::RegistryMismatch(id_a.to_string()))?;
        let rank_b = self
            .registry
            .rank_of(id_b)
            .ok_or_else(|| CatalogError::RegistryMismatch(id_b.to_string()))?;
        // one edge per direction, each with the coverage of its own target
        let a_to_b = SimilarityEdge {
            from: rank_a,
            to: rank_b,
            ani,
            coverage_of_to: cov_b,
        };
        let b_to_a = SimilarityEdge {
            from: rank_b,
            to: rank_a,
            ani,
            coverage_of_to: cov_a,
        };
        Ok(Some((a_to_b, b_to_a)))
    } // end of normalize_record

    /// normalizes a whole similarity file. The first line is the engine's
    /// header and is skipped.
    pub fn normalize_file(&mut self, path: &Path) -> Result<Vec<SimilarityEdge>, CatalogError> {
        let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut edges = Vec::<SimilarityEdge>::new();
        let mut lines = reader.lines();
        if let Some(header) = lines.next() {
            let header = header.map_err(|e| CatalogError::io(path, e))?;
            log::debug!("skipping similarity header : {}", header);
        }
        for line in lines {
            let line = line.map_err(|e| CatalogError::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some((a_to_b, b_to_a)) = self.normalize_record(&line)? {
                edges.push(a_to_b);
                edges.push(b_to_a);
            }
        }
        log::info!(
            "normalized {} raw records into {} directional edges, dropped {}",
            self.nb_records,
            edges.len(),
            self.nb_dropped
        );
        Ok(edges)
    } // end of normalize_file
} // end of impl EdgeNormalizer


//=====================================================================================

// end of mod tests
