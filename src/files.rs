//! input directory exploration, fasta aggregation and length registry.
//!
//! All input genomes are concatenated into one corpus file while their
//! lengths are collected, so the downstream steps (similarity engine,
//! clustering, extraction) see a single consistent set of ids.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use crate::index::GenomeRegistry;


/// To keep track of processed files and sequences
pub struct ProcessingState {
    /// nb sequences processed
    nb_seq: usize,
    /// nb files processed
    nb_file: usize,
}

impl ProcessingState {
    pub fn new() -> Self {
        ProcessingState { nb_seq: 0, nb_file: 0 }
    } // end of new

    pub fn get_nb_seq(&self) -> usize {
        self.nb_seq
    }

    pub fn get_nb_file(&self) -> usize {
        self.nb_file
    }
} // end of ProcessingState

impl Default for ProcessingState {
    fn default() -> Self {
        Self::new()
    }
}


// returns true if file is a fasta file (possibly gzipped)
// filenames are of type contigs.fa[sta] or GCA_000091165.1_genomic.fna.gz
pub fn is_fasta_file(path: &Path) -> bool {
    let filename = match path.file_name().and_then(|f| f.to_str()) {
        Some(name) => name,
        None => return false,
    };
    const SUFFIXES: [&str; 6] = [".fa", ".fasta", ".fna", ".fa.gz", ".fasta.gz", ".fna.gz"];
    SUFFIXES.iter().any(|suffix| filename.ends_with(suffix))
} // end of is_fasta_file


// scan directory recursively collecting fasta files, adapted from crate fd_find.
// The list is sorted so aggregation order does not depend on readdir order.
fn collect_fasta_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    for entry in fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))? {
        let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_fasta_files(&path, files)?;
        } else if is_fasta_file(&path) {
            files.push(path);
        }
    }
    Ok(())
} // end of collect_fasta_files


/// aggregates every fasta file found under dir into corpus_path and returns
/// the genome id -> length registry built along the way.
/// Record ids are the first whitespace separated token of the fasta header;
/// the same id in two records is a fatal ingestion error.
pub fn aggregate_dir(dir: &Path, corpus_path: &Path) -> Result<(GenomeRegistry, ProcessingState), CatalogError> {
    let mut fasta_files = Vec::<PathBuf>::new();
    collect_fasta_files(dir, &mut fasta_files)?;
    if fasta_files.is_empty() {
        return Err(CatalogError::NoFastaFile(dir.to_path_buf()));
    }
    fasta_files.sort_unstable();
    log::info!("aggregating {} fasta files from {:?}", fasta_files.len(), dir);
    //
    let corpus = File::create(corpus_path).map_err(|e| CatalogError::io(corpus_path, e))?;
    let mut writer = BufWriter::new(corpus);
    let mut registry = GenomeRegistry::new();
    let mut state = ProcessingState::new();
    //
    for pathb in &fasta_files {
        log::trace!("processing file {:?}", pathb);
        let metadata = fs::metadata(pathb).map_err(|e| CatalogError::io(pathb, e))?;
        if metadata.len() == 0 {
            // a record-less file contributes no genome; only a fully empty
            // registry aborts the run
            log::warn!("skipping empty fasta file {:?}", pathb);
            continue;
        }
        let mut reader = needletail::parse_fastx_file(pathb).map_err(|e| CatalogError::Fasta {
            path: pathb.clone(),
            message: e.to_string(),
        })?;
        while let Some(record) = reader.next() {
            let seqrec = record.map_err(|e| CatalogError::Fasta {
                path: pathb.clone(),
                message: e.to_string(),
            })?;
            // genome id is the first token of the header
            let id = String::from_utf8_lossy(seqrec.id());
            let strid = match id.split_whitespace().next() {
                Some(token) => token.to_string(),
                None => {
                    log::warn!("skipping record with empty id in file {:?}", pathb);
                    continue;
                }
            };
            let seq = seqrec.seq();
            registry.insert(&strid, seq.len() as u64)?;
            writer
                .write_all(b">")
                .and_then(|_| writer.write_all(strid.as_bytes()))
                .and_then(|_| writer.write_all(b"\n"))
                .and_then(|_| writer.write_all(&seq))
                .and_then(|_| writer.write_all(b"\n"))
                .map_err(|e| CatalogError::io(corpus_path, e))?;
            state.nb_seq += 1;
        }
        state.nb_file += 1;
        if state.nb_file % 500 == 0 {
            log::info!("nb file processed : {}, nb sequences processed : {}", state.nb_file, state.nb_seq);
            println!("nb file processed : {}, nb sequences processed : {}", state.nb_file, state.nb_seq);
        }
    }
    writer.flush().map_err(|e| CatalogError::io(corpus_path, e))?;
    //
    if registry.is_empty() {
        return Err(CatalogError::EmptyCorpus(dir.to_path_buf()));
    }
    log::info!(
        "aggregated {} sequences from {} files into {:?}",
        state.nb_seq,
        state.nb_file,
        corpus_path
    );
    Ok((registry, state))
} // end of aggregate_dir


//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fasta(dir: &Path, name: &str, records: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::new();
        for (id, seq) in records {
            content.push('>');
            content.push_str(id);
            content.push_str(" some description\n");
            content.push_str(seq);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("contigs.fa")));
        assert!(is_fasta_file(Path::new("contigs.fasta")));
        assert!(is_fasta_file(Path::new("GCA_000091165.1_genomic.fna.gz")));
        assert!(!is_fasta_file(Path::new("contigs.txt")));
        assert!(!is_fasta_file(Path::new("contigs.fa.bak")));
    }

    #[test]
    fn test_aggregate_builds_registry_and_corpus() {
        let dir = tempfile::tempdir().unwrap();
        write_fasta(dir.path(), "a.fa", &[("genome_a", "ACGTACGTAC"), ("genome_b", "ACGT")]);
        write_fasta(dir.path(), "b.fasta", &[("genome_c", "ACGTAC")]);
        let corpus = dir.path().join("all_genomes.fa");
        let (registry, state) = aggregate_dir(dir.path(), &corpus).unwrap();
        assert_eq!(state.get_nb_file(), 2);
        assert_eq!(state.get_nb_seq(), 3);
        assert_eq!(registry.get_nb_genomes(), 3);
        assert_eq!(registry.length_of(registry.rank_of("genome_a").unwrap()), 10);
        assert_eq!(registry.length_of(registry.rank_of("genome_b").unwrap()), 4);
        // corpus records keep the id token only, file order is sorted by name
        let content = std::fs::read_to_string(&corpus).unwrap();
        assert_eq!(content, ">genome_a\nACGTACGTAC\n>genome_b\nACGT\n>genome_c\nACGTAC\n");
    }

    #[test]
    fn test_duplicate_id_across_files_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fasta(dir.path(), "a.fa", &[("genome_a", "ACGTACGTAC")]);
        write_fasta(dir.path(), "b.fa", &[("genome_a", "ACGT")]);
        let corpus = dir.path().join("all_genomes.fa");
        let res = aggregate_dir(dir.path(), &corpus);
        assert!(matches!(res, Err(CatalogError::DuplicateId(ref id)) if id == "genome_a"));
    }

    #[test]
    fn test_zero_valid_genomes_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fa"), "").unwrap();
        let corpus = dir.path().join("all_genomes.fa");
        let res = aggregate_dir(dir.path(), &corpus);
        assert!(matches!(res, Err(CatalogError::EmptyCorpus(_))));
    }

    #[test]
    fn test_no_fasta_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "nothing").unwrap();
        let corpus = dir.path().join("all_genomes.fa");
        let res = aggregate_dir(dir.path(), &corpus);
        assert!(matches!(res, Err(CatalogError::NoFastaFile(_))));
    }
} // end of mod tests
