//! extraction of representative sequences from the aggregated corpus.
//!
//! One streaming pass with needletail over the corpus written at aggregation
//! time; records whose id is in the representative list are copied out. Every
//! representative must be found back, a miss means the corpus and the cluster
//! report diverged.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fxhash::FxHashSet;

use crate::error::CatalogError;


/// writes the fasta records of the given ids from corpus_path to catalog_path,
/// in corpus order. Returns the number of records written.
pub fn extract_representatives(
    corpus_path: &Path,
    representatives: &[&str],
    catalog_path: &Path,
) -> Result<usize, CatalogError> {
    let mut wanted: FxHashSet<&str> = representatives.iter().copied().collect();
    log::info!(
        "extracting {} representatives from {:?} into {:?}",
        wanted.len(),
        corpus_path,
        catalog_path
    );
    //
    let catalog = File::create(catalog_path).map_err(|e| CatalogError::io(catalog_path, e))?;
    let mut writer = BufWriter::new(catalog);
    let mut nb_written = 0usize;
    //
    let mut reader = needletail::parse_fastx_file(corpus_path).map_err(|e| CatalogError::Fasta {
        path: corpus_path.to_path_buf(),
        message: e.to_string(),
    })?;
    while let Some(record) = reader.next() {
        let seqrec = record.map_err(|e| CatalogError::Fasta {
            path: corpus_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let id = String::from_utf8_lossy(seqrec.id());
        let strid = match id.split_whitespace().next() {
            Some(token) => token,
            None => continue,
        };
        if wanted.remove(strid) {
            let seq = seqrec.seq();
            writer
                .write_all(b">")
                .and_then(|_| writer.write_all(strid.as_bytes()))
                .and_then(|_| writer.write_all(b"\n"))
                .and_then(|_| writer.write_all(&seq))
                .and_then(|_| writer.write_all(b"\n"))
                .map_err(|e| CatalogError::io(catalog_path, e))?;
            nb_written += 1;
        }
    }
    writer.flush().map_err(|e| CatalogError::io(catalog_path, e))?;
    //
    if let Some(missing) = wanted.iter().next() {
        return Err(CatalogError::MissingRepresentative(missing.to_string()));
    }
    log::info!("extracted {} representative sequences", nb_written);
    Ok(nb_written)
} // end of extract_representatives


//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_exactly_the_representatives() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("all_genomes.fa");
        std::fs::write(
            &corpus,
            ">genome_a\nACGTACGTAC\n>genome_b\nACGT\n>genome_c\nACGTAC\n",
        )
        .unwrap();
        let catalog = dir.path().join("catalog.fasta");
        let nb = extract_representatives(&corpus, &["genome_a", "genome_c"], &catalog).unwrap();
        assert_eq!(nb, 2);
        let content = std::fs::read_to_string(&catalog).unwrap();
        assert_eq!(content, ">genome_a\nACGTACGTAC\n>genome_c\nACGTAC\n");
    }

    #[test]
    fn test_missing_representative_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("all_genomes.fa");
        std::fs::write(&corpus, ">genome_a\nACGTACGTAC\n").unwrap();
        let catalog = dir.path().join("catalog.fasta");
        let res = extract_representatives(&corpus, &["genome_a", "genome_z"], &catalog);
        assert!(matches!(res, Err(CatalogError::MissingRepresentative(ref id)) if id == "genome_z"));
    }
} // end of mod tests
