//! cluster report writing.
//!
//! Two artifacts per run : the tab separated cluster map
//! (representative, comma joined members with the representative first) and
//! the flat representative id list consumed by the extraction step. Both are
//! produced from the finished partition only, so an aborted run leaves no
//! partial report behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cluster::Cluster;
use crate::error::CatalogError;
use crate::index::GenomeRegistry;


/// writes the cluster map as a two column tsv with a header row,
/// one row per cluster in representative discovery order
pub fn write_clusters(
    path: &Path,
    registry: &GenomeRegistry,
    clusters: &[Cluster],
) -> Result<(), CatalogError> {
    log::info!("writing cluster map to {:?}", path);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;
    writer.write_record(["representative", "members"])?;
    for cluster in clusters {
        let members = cluster
            .get_members()
            .iter()
            .map(|&g| registry.name_of(g))
            .collect::<Vec<&str>>()
            .join(",");
        writer.write_record([registry.name_of(cluster.get_representative()), members.as_str()])?;
    }
    writer.flush().map_err(|e| CatalogError::io(path, e))?;
    //
    Ok(())
} // end of write_clusters


/// writes representative ids, one per line, in the same order as the cluster map
pub fn write_representative_ids(
    path: &Path,
    registry: &GenomeRegistry,
    clusters: &[Cluster],
) -> Result<(), CatalogError> {
    log::info!("writing representative ids to {:?}", path);
    let file = File::create(path).map_err(|e| CatalogError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for cluster in clusters {
        writeln!(writer, "{}", registry.name_of(cluster.get_representative()))
            .map_err(|e| CatalogError::io(path, e))?;
    }
    writer.flush().map_err(|e| CatalogError::io(path, e))?;
    //
    Ok(())
} // end of write_representative_ids


//=====================================================================================

// end of mod tests
