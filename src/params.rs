//! structures related to processing parameters


use std::fs::OpenOptions;
use std::path::Path;
use std::io::{BufReader, BufWriter};

use serde::{Deserialize, Serialize};
use serde_json::to_writer;

use crate::error::CatalogError;


/// scale of the coverage fields in raw similarity records.
/// skani emits alignment fractions in [0,1]; some reformatted tables carry percentages already.
/// ANI is a percentage in both cases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageScale {
    /// coverage arrives as a fraction in [0,1], rescaled to [0,100] at normalization
    Fraction,
    /// coverage arrives already in [0,100]
    Percent,
} // end of CoverageScale


//===========================================================

/// thresholds gating recruitment of a candidate into a representative's cluster.
/// Both are percentages, both comparisons are inclusive.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct ClusterParams {
    /// minimum ANI between candidate and representative
    min_ani: f64,
    /// minimum coverage of the representative by the candidate's alignment
    min_cov: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams {
            min_ani: 95.0,
            min_cov: 85.0,
        }
    }
} // end of default for ClusterParams

impl ClusterParams {
    /// checks both thresholds lie in [0,100], rejected otherwise before any run starts
    pub fn new(min_ani: f64, min_cov: f64) -> Result<Self, CatalogError> {
        if !(0.0..=100.0).contains(&min_ani) || !min_ani.is_finite() {
            return Err(CatalogError::BadThreshold {
                name: "min_ani",
                value: min_ani,
            });
        }
        if !(0.0..=100.0).contains(&min_cov) || !min_cov.is_finite() {
            return Err(CatalogError::BadThreshold {
                name: "min_cov",
                value: min_cov,
            });
        }
        Ok(ClusterParams { min_ani, min_cov })
    } // end of new

    /// returns minimum ANI threshold
    pub fn get_min_ani(&self) -> f64 {
        self.min_ani
    }

    /// returns minimum representative coverage threshold
    pub fn get_min_cov(&self) -> f64 {
        self.min_cov
    }
} // end of impl ClusterParams


//======================================================================================

/// Some other parameters without effect on the partition : number of threads passed
/// through to the external similarity engine and output naming.
#[derive(Clone, Serialize, Deserialize)]
pub struct ComputingParams {
    /// threads for the similarity engine subprocess
    nb_threads: usize,
    /// prefix of output artifact names
    prefix: String,
}

impl ComputingParams {
    pub fn new(nb_threads: usize, prefix: String) -> Self {
        ComputingParams { nb_threads, prefix }
    }

    pub fn get_nb_threads(&self) -> usize {
        self.nb_threads
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }
} // end of impl ComputingParams


//=====================================================================================

/// Gathers parameters of one cataloging run.
/// Dumped to parameters.json in the output directory so a run can be audited or redone.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// clustering thresholds
    cluster: ClusterParams,
    /// scale of raw coverage fields
    scale: CoverageScale,
    /// threads and naming
    computing: ComputingParams,
}

impl ProcessingParams {
    pub fn new(cluster: ClusterParams, scale: CoverageScale, computing: ComputingParams) -> Self {
        ProcessingParams {
            cluster,
            scale,
            computing,
        }
    }

    /// get clustering thresholds
    pub fn get_cluster_params(&self) -> &ClusterParams {
        &self.cluster
    }

    /// get scale of raw coverage fields
    pub fn get_scale(&self) -> CoverageScale {
        self.scale
    }

    pub fn get_computing_params(&self) -> &ComputingParams {
        &self.computing
    }

    pub fn dump_json(&self, dirpath: &Path) -> Result<(), String> {
        //
        let filepath = dirpath.join("parameters.json");
        //
        log::info!("dumping ProcessingParams in json file : {:?}", filepath);
        //
        let fileres = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filepath);
        if fileres.is_err() {
            log::error!("ProcessingParams dump : dump could not open file {:?}", filepath.as_os_str());
            println!("ProcessingParams dump: could not open file {:?}", filepath.as_os_str());
            return Err("ProcessingParams dump failed".to_string());
        }
        //
        let mut writer = BufWriter::new(fileres.unwrap());
        if to_writer(&mut writer, &self).is_err() {
            return Err("ProcessingParams dump failed in serialization".to_string());
        }
        //
        Ok(())
    } // end of dump_json

    /// reload from a json dump. Used to check coherence with a previous run of the same directory
    pub fn reload_json(dirpath: &Path) -> Result<Self, String> {
        log::info!("in reload_json");
        //
        let filepath = dirpath.join("parameters.json");
        let fileres = OpenOptions::new().read(true).open(&filepath);
        if fileres.is_err() {
            log::error!("ProcessingParams reload_json : reload could not open file {:?}", filepath.as_os_str());
            println!("ProcessingParams reload_json: could not open file {:?}", filepath.as_os_str());
            return Err("ProcessingParams reload_json could not open file".to_string());
        }
        //
        let loadfile = fileres.unwrap();
        let reader = BufReader::new(loadfile);
        let params: Self = serde_json::from_reader(reader)
            .map_err(|_| "ProcessingParams reload_json deserialization failed".to_string())?;
        //
        log::info!("ProcessingParams reload, min_ani : {}, min_cov : {}", params.cluster.get_min_ani(), params.cluster.get_min_cov());
        //
        Ok(params)
    } // end of reload_json
} // end of impl ProcessingParams


//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let params = ClusterParams::default();
        assert_eq!(params.get_min_ani(), 95.0);
        assert_eq!(params.get_min_cov(), 85.0);
    }

    #[test]
    fn test_threshold_range_check() {
        assert!(ClusterParams::new(95.0, 85.0).is_ok());
        assert!(ClusterParams::new(0.0, 100.0).is_ok());
        assert!(ClusterParams::new(-1.0, 85.0).is_err());
        assert!(ClusterParams::new(95.0, 100.5).is_err());
        assert!(ClusterParams::new(f64::NAN, 85.0).is_err());
    }

    #[test]
    fn test_dump_reload() {
        let dir = tempfile::tempdir().unwrap();
        let params = ProcessingParams::new(
            ClusterParams::new(97.0, 80.0).unwrap(),
            CoverageScale::Fraction,
            ComputingParams::new(4, String::from("catalog")),
        );
        params.dump_json(dir.path()).unwrap();
        let reloaded = ProcessingParams::reload_json(dir.path()).unwrap();
        assert_eq!(reloaded.get_cluster_params().get_min_ani(), 97.0);
        assert_eq!(reloaded.get_cluster_params().get_min_cov(), 80.0);
        assert_eq!(reloaded.get_scale(), CoverageScale::Fraction);
        assert_eq!(reloaded.get_computing_params().get_nb_threads(), 4);
    }
} // end of mod tests
