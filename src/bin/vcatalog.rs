//! vcatalog --indir [-i] dir --outdir [-o] dir [--threads n] [--min-ani f] [--min-cov f] [--prefix name] [--percent]
//!
//! --indir : directory containing the input fasta files (*.fa, *.fasta, *.fna, possibly gzipped)
//!
//! --outdir : directory receiving all artifacts of the run
//!
//! --threads [-t] : number of threads passed through to skani (default : all logical cores)
//!
//! --min-ani : minimum ANI percentage for recruitment into a cluster (default 95.0)
//!
//! --min-cov : minimum coverage percentage of the representative (default 85.0)
//!
//! --prefix : prefix of output artifact names (default "catalog")
//!
//! --percent : set if the similarity output carries coverage as percentages.
//!             Default expects skani's alignment fractions in [0,1].

use clap::{Arg, ArgAction, Command};

use std::path::Path;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use env_logger::Builder;

use vcatalog::ani::run_skani_triangle;
use vcatalog::cluster::ClusterEngine;
use vcatalog::edges::EdgeNormalizer;
use vcatalog::extract::extract_representatives;
use vcatalog::files::aggregate_dir;
use vcatalog::index::SimilarityIndex;
use vcatalog::params::{ClusterParams, ComputingParams, CoverageScale, ProcessingParams};
use vcatalog::report::{write_clusters, write_representative_ids};


// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}


fn main() -> Result<(), anyhow::Error> {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("vcatalog begins at time : {:#?}", start_t);

    let matches = Command::new("vcatalog")
        .version("0.1.0")
        .about("Dereplicates a viral genome collection into a vOTU catalog by greedy star clustering over skani ANI")
        .arg(
            Arg::new("indir")
                .short('i')
                .long("indir")
                .value_name("DIRECTORY")
                .help("directory containing input fasta files")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("outdir")
                .short('o')
                .long("outdir")
                .value_name("DIRECTORY")
                .help("directory to store all output files")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("THREADS")
                .help("number of threads for the skani subprocess (default : all logical cores)")
                .required(false)
                .value_parser(clap::value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("min_ani")
                .long("min-ani")
                .value_name("PERCENT")
                .help("minimum ANI percentage for clustering (default : 95.0)")
                .required(false)
                .value_parser(clap::value_parser!(f64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("min_cov")
                .long("min-cov")
                .value_name("PERCENT")
                .help("minimum representative coverage percentage for clustering (default : 85.0)")
                .required(false)
                .value_parser(clap::value_parser!(f64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .help("prefix for output file names (default : catalog)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("percent")
                .long("percent")
                .help("similarity output carries coverage as percentages, not fractions")
                .required(false)
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let indir = matches.get_one::<String>("indir").unwrap();
    let outdir = matches.get_one::<String>("outdir").unwrap();
    let nb_threads = matches
        .get_one::<usize>("threads")
        .copied()
        .unwrap_or_else(num_cpus::get);
    let min_ani = matches.get_one::<f64>("min_ani").copied().unwrap_or(95.0);
    let min_cov = matches.get_one::<f64>("min_cov").copied().unwrap_or(85.0);
    let prefix = matches
        .get_one::<String>("prefix")
        .cloned()
        .unwrap_or_else(|| String::from("catalog"));
    let scale = if matches.get_flag("percent") {
        CoverageScale::Percent
    } else {
        CoverageScale::Fraction
    };

    // configuration is rejected before anything runs
    let cluster_params = ClusterParams::new(min_ani, min_cov)?;
    let processing_params = ProcessingParams::new(
        cluster_params,
        scale,
        ComputingParams::new(nb_threads, prefix.clone()),
    );
    log::info!(
        "thresholds : min_ani {}, min_cov {}, threads {}, scale {:?}",
        min_ani,
        min_cov,
        nb_threads,
        scale
    );

    let indir_path = Path::new(indir);
    let outdir_path = Path::new(outdir);
    std::fs::create_dir_all(outdir_path)?;
    processing_params
        .dump_json(outdir_path)
        .map_err(|msg| anyhow::anyhow!(msg))?;

    //
    // step 1 : aggregate fasta files and collect lengths
    //
    println!("\n--- Step 1: Aggregating fasta files ---");
    let corpus_path = outdir_path.join("all_genomes.fa");
    let (registry, state) = aggregate_dir(indir_path, &corpus_path)?;
    println!(
        "combined {} files ({} sequences) into {:?}",
        state.get_nb_file(),
        state.get_nb_seq(),
        corpus_path
    );

    //
    // step 2 : all versus all ANI with skani
    //
    println!("\n--- Step 2: Calculating all-vs-all ANI with skani ---");
    let similarity_path = outdir_path.join("skani_results.txt");
    run_skani_triangle(&corpus_path, &similarity_path, nb_threads)?;
    println!("skani results saved to {:?}", similarity_path);

    //
    // step 3 : normalize raw records into directional edges and build the index
    //
    println!("\n--- Step 3: Building similarity index ---");
    let mut normalizer = EdgeNormalizer::new(&registry, scale);
    let edges = normalizer.normalize_file(&similarity_path)?;
    let index = SimilarityIndex::from_edges(registry.get_nb_genomes(), edges);
    println!(
        "{} raw records kept as {} directional edges, {} dropped, {} duplicate pairs collapsed",
        normalizer.get_nb_records() - normalizer.get_nb_dropped(),
        index.get_nb_edges(),
        normalizer.get_nb_dropped(),
        index.get_nb_collapsed()
    );

    //
    // step 4 : greedy star clustering
    //
    println!("\n--- Step 4: Clustering genomes into vOTUs ---");
    let sys_start = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let engine = ClusterEngine::new(&registry, &index, cluster_params);
    let clusters = engine.cluster();
    let cpu_time = cpu_start.elapsed().as_secs_f64();
    let elapsed = sys_start.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.);
    println!(
        "found {} clusters for {} genomes, sys time(s) {:.2}, cpu time(s) {:.2}",
        clusters.len(),
        registry.get_nb_genomes(),
        elapsed,
        cpu_time
    );
    if let Some(usage) = memory_stats::memory_stats() {
        log::info!("physical memory used : {} Mb", usage.physical_mem / 1_000_000);
    }

    //
    // step 5 : reports, written only now that the whole partition exists
    //
    println!("\n--- Step 5: Writing cluster reports ---");
    let cluster_path = outdir_path.join(format!("{}_clusters.tsv", prefix));
    let rep_ids_path = outdir_path.join("representative_ids.txt");
    write_clusters(&cluster_path, &registry, &clusters)?;
    write_representative_ids(&rep_ids_path, &registry, &clusters)?;
    println!("cluster map saved to {:?}", cluster_path);

    //
    // step 6 : final representative catalog
    //
    println!("\n--- Step 6: Generating final representative catalog ---");
    let catalog_path = outdir_path.join(format!("{}_vOTU_catalog.fasta", prefix));
    let representatives: Vec<&str> = clusters
        .iter()
        .map(|c| registry.name_of(c.get_representative()))
        .collect();
    let nb_extracted = extract_representatives(&corpus_path, &representatives, &catalog_path)?;
    println!(
        "final dereplicated catalog with {} sequences saved to {:?}",
        nb_extracted, catalog_path
    );
    //
    log::info!("vcatalog ends at time : {:#?}", chrono::Local::now());
    Ok(())
} // end of main
