//! driving the external similarity engine.
//!
//! All versus all ANI is delegated to skani triangle run as a subprocess on
//! the aggregated corpus; its edge list output is what the normalizer parses.
//! The thread count is a pass through, it has no effect on the partition.

use std::path::Path;
use std::process::Command;

use crate::error::CatalogError;


// skani triangle options : -i one genome per contig, -E edge list output,
// -m 200 and --slow for small genomes and accurate alignment fraction,
// -s 90 screens pairs below approximate ANI 90
const SKANI_ARGS: [&str; 8] = ["-i", "-m", "200", "--slow", "-E", "--faster-small", "-s", "90"];


// runs program with the triangle argument set. Failing to launch at all and
// exiting non zero are distinct errors : the first usually means the engine
// is not installed.
fn run_triangle(
    program: &str,
    corpus_path: &Path,
    out_path: &Path,
    nb_threads: usize,
) -> Result<(), CatalogError> {
    let mut command = Command::new(program);
    command
        .arg("triangle")
        .arg(corpus_path)
        .arg("-o")
        .arg(out_path)
        .arg("-t")
        .arg(nb_threads.to_string())
        .args(SKANI_ARGS);
    let command_line = format!("{:?}", command);
    log::info!("running : {}", command_line);
    println!("--> Running: {}", command_line);
    //
    let status = command.status().map_err(|e| {
        log::error!("could not launch {}, is it installed and on PATH ? : {}", program, e);
        CatalogError::CommandLaunch {
            command: command_line.clone(),
            source: e,
        }
    })?;
    if !status.success() {
        log::error!("{} exited with {}", program, status);
        return Err(CatalogError::CommandFailed {
            command: command_line,
            status,
        });
    }
    //
    Ok(())
} // end of run_triangle


/// runs skani triangle over the corpus, writing the edge list to out_path
pub fn run_skani_triangle(
    corpus_path: &Path,
    out_path: &Path,
    nb_threads: usize,
) -> Result<(), CatalogError> {
    run_triangle("skani", corpus_path, out_path, nb_threads)
} // end of run_skani_triangle


//=====================================================================================

// end of mod tests
