//! end to end run of the library pipeline on a small corpus, with a
//! prepared similarity file standing in for the skani subprocess.

use std::path::Path;

use vcatalog::cluster::ClusterEngine;
use vcatalog::edges::EdgeNormalizer;
use vcatalog::extract::extract_representatives;
use vcatalog::files::aggregate_dir;
use vcatalog::index::SimilarityIndex;
use vcatalog::params::{ClusterParams, CoverageScale};
use vcatalog::report::{write_clusters, write_representative_ids};

fn write_inputs(indir: &Path) {
    // genome_a (24) > genome_b (20) > genome_c (8)
    std::fs::write(
        indir.join("sample1.fa"),
        ">genome_a\nACGTACGTACGTACGTACGTACGT\n>genome_b\nACGTACGTACGTACGTACGT\n",
    )
    .unwrap();
    std::fs::write(indir.join("sample2.fasta"), ">genome_c\nACGTACGT\n").unwrap();
}

fn write_similarity(path: &Path) {
    // skani style edge list : chain a-b and b-c, but c barely touches a
    let mut content = String::from("Ref_file\tQuery_file\tANI\tAlign_fraction_ref\tAlign_fraction_query\n");
    content.push_str("genome_a\tgenome_b\t96.0\t0.95\t0.90\n");
    content.push_str("genome_b\tgenome_c\t97.0\t0.92\t0.40\n");
    content.push_str("genome_a\tgenome_c\t60.0\t0.40\t0.10\n");
    std::fs::write(path, content).unwrap();
}

fn run_once(indir: &Path, outdir: &Path) {
    let corpus_path = outdir.join("all_genomes.fa");
    let (registry, _state) = aggregate_dir(indir, &corpus_path).unwrap();

    let similarity_path = outdir.join("skani_results.txt");
    write_similarity(&similarity_path);
    let mut normalizer = EdgeNormalizer::new(&registry, CoverageScale::Fraction);
    let edges = normalizer.normalize_file(&similarity_path).unwrap();
    let index = SimilarityIndex::from_edges(registry.get_nb_genomes(), edges);

    let params = ClusterParams::new(95.0, 85.0).unwrap();
    let clusters = ClusterEngine::new(&registry, &index, params).cluster();

    write_clusters(&outdir.join("catalog_clusters.tsv"), &registry, &clusters).unwrap();
    write_representative_ids(&outdir.join("representative_ids.txt"), &registry, &clusters).unwrap();

    let representatives: Vec<&str> = clusters
        .iter()
        .map(|c| registry.name_of(c.get_representative()))
        .collect();
    extract_representatives(
        &corpus_path,
        &representatives,
        &outdir.join("catalog_vOTU_catalog.fasta"),
    )
    .unwrap();
}

#[test]
fn test_pipeline_star_clusters_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let indir = dir.path().join("input");
    let outdir = dir.path().join("output");
    std::fs::create_dir_all(&indir).unwrap();
    std::fs::create_dir_all(&outdir).unwrap();
    write_inputs(&indir);
    run_once(&indir, &outdir);

    // b joins a directly; c is similar to b only and must stay out of a's cluster
    let clusters = std::fs::read_to_string(outdir.join("catalog_clusters.tsv")).unwrap();
    assert_eq!(
        clusters,
        "representative\tmembers\ngenome_a\tgenome_a,genome_b\ngenome_c\tgenome_c\n"
    );
    let reps = std::fs::read_to_string(outdir.join("representative_ids.txt")).unwrap();
    assert_eq!(reps, "genome_a\ngenome_c\n");
    let catalog = std::fs::read_to_string(outdir.join("catalog_vOTU_catalog.fasta")).unwrap();
    assert_eq!(
        catalog,
        ">genome_a\nACGTACGTACGTACGTACGTACGT\n>genome_c\nACGTACGT\n"
    );
}

#[test]
fn test_pipeline_runs_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let indir = dir.path().join("input");
    std::fs::create_dir_all(&indir).unwrap();
    write_inputs(&indir);

    let out_1 = dir.path().join("run1");
    let out_2 = dir.path().join("run2");
    std::fs::create_dir_all(&out_1).unwrap();
    std::fs::create_dir_all(&out_2).unwrap();
    run_once(&indir, &out_1);
    run_once(&indir, &out_2);

    for artifact in ["catalog_clusters.tsv", "representative_ids.txt", "catalog_vOTU_catalog.fasta"] {
        assert_eq!(
            std::fs::read(out_1.join(artifact)).unwrap(),
            std::fs::read(out_2.join(artifact)).unwrap(),
            "artifact {} differs between runs",
            artifact
        );
    }
}
