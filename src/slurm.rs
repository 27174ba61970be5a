//! slurm batch script generation.
//!
//! Builds an sbatch file wrapping one vcatalog invocation so the whole
//! pipeline (skani included) runs inside a single allocation. The
//! cpus-per-task value doubles as the --threads pass through.

use std::fs;
use std::path::Path;

use crate::error::CatalogError;


/// description of one batch job : scheduler directives plus the pipeline
/// arguments forwarded to vcatalog
pub struct SlurmJob {
    /// name of the job
    pub job_name: String,
    /// wall time limit (HH:MM:SS)
    pub time: String,
    /// memory allocation (e.g. 8G, 16000M)
    pub mem: String,
    /// partition to submit to, omitted if absent
    pub partition: Option<String>,
    /// account to charge, omitted if absent
    pub account: Option<String>,
    /// nb cores, also sets --threads of the pipeline
    pub cpus_per_task: usize,
    /// notification address, mail directives omitted if absent
    pub mail_user: Option<String>,
    /// notification events (BEGIN, END, FAIL, ALL)
    pub mail_type: String,
    /// stdout/stderr filename pattern (%x = job name, %j = job id)
    pub log_output: String,
    //
    /// input directory forwarded to vcatalog
    pub indir: String,
    /// output directory forwarded to vcatalog
    pub outdir: String,
    /// minimum ANI forwarded to vcatalog
    pub min_ani: f64,
    /// minimum representative coverage forwarded to vcatalog
    pub min_cov: f64,
    /// output prefix forwarded to vcatalog
    pub prefix: String,
}

impl Default for SlurmJob {
    fn default() -> Self {
        SlurmJob {
            job_name: String::from("vcatalog"),
            time: String::from("01:00:00"),
            mem: String::from("8G"),
            partition: None,
            account: None,
            cpus_per_task: 4,
            mail_user: None,
            mail_type: String::from("FAIL"),
            log_output: String::from("%x_%j.out"),
            indir: String::new(),
            outdir: String::new(),
            min_ani: 95.0,
            min_cov: 85.0,
            prefix: String::from("catalog"),
        }
    }
} // end of default for SlurmJob

impl SlurmJob {
    /// content of the sbatch file
    pub fn generate_sbatch(&self) -> String {
        let mut lines: Vec<String> = vec![String::from("#!/bin/bash"), String::new()];
        //
        lines.push(format!("#SBATCH --job-name={}", self.job_name));
        lines.push(format!("#SBATCH --time={}", self.time));
        lines.push(format!("#SBATCH --mem={}", self.mem));
        lines.push(format!("#SBATCH --cpus-per-task={}", self.cpus_per_task));
        lines.push(format!("#SBATCH --output={}", self.log_output));
        if let Some(partition) = &self.partition {
            lines.push(format!("#SBATCH --partition={}", partition));
        }
        if let Some(account) = &self.account {
            lines.push(format!("#SBATCH --account={}", account));
        }
        if let Some(mail_user) = &self.mail_user {
            lines.push(format!("#SBATCH --mail-user={}", mail_user));
            lines.push(format!("#SBATCH --mail-type={}", self.mail_type));
        }
        //
        lines.push(String::new());
        lines.push(String::from("# Exit on error"));
        lines.push(String::from("set -e"));
        lines.push(String::new());
        lines.push(String::from("echo \"Starting vcatalog job on $(hostname)\""));
        lines.push(String::from("date"));
        lines.push(String::new());
        //
        lines.push(format!(
            "vcatalog --indir \"{}\" --outdir \"{}\" --threads {} --min-ani {} --min-cov {} --prefix \"{}\"",
            self.indir, self.outdir, self.cpus_per_task, self.min_ani, self.min_cov, self.prefix
        ));
        lines.push(String::new());
        lines.push(String::from("echo \"Job complete.\""));
        lines.push(String::from("date"));
        //
        lines.join("\n") + "\n"
    } // end of generate_sbatch

    /// writes the sbatch file
    pub fn dump(&self, path: &Path) -> Result<(), CatalogError> {
        log::info!("writing sbatch script to {:?}", path);
        fs::write(path, self.generate_sbatch()).map_err(|e| CatalogError::io(path, e))?;
        Ok(())
    } // end of dump
} // end of impl SlurmJob


//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbatch_content() {
        let job = SlurmJob {
            job_name: String::from("test_job"),
            time: String::from("02:00:00"),
            cpus_per_task: 16,
            indir: String::from("data/in"),
            outdir: String::from("data/out"),
            ..Default::default()
        };
        let content = job.generate_sbatch();
        assert!(content.starts_with("#!/bin/bash\n"));
        assert!(content.contains("#SBATCH --job-name=test_job"));
        assert!(content.contains("#SBATCH --time=02:00:00"));
        assert!(content.contains("#SBATCH --cpus-per-task=16"));
        assert!(content.contains("--threads 16"));
        assert!(content.contains("--indir \"data/in\""));
        // no partition/account/mail asked for : directives absent
        assert!(!content.contains("--partition"));
        assert!(!content.contains("--mail-user"));
    }

    #[test]
    fn test_optional_directives_emitted_when_set() {
        let job = SlurmJob {
            partition: Some(String::from("long")),
            account: Some(String::from("virome")),
            mail_user: Some(String::from("user@example.org")),
            ..Default::default()
        };
        let content = job.generate_sbatch();
        assert!(content.contains("#SBATCH --partition=long"));
        assert!(content.contains("#SBATCH --account=virome"));
        assert!(content.contains("#SBATCH --mail-user=user@example.org"));
        assert!(content.contains("#SBATCH --mail-type=FAIL"));
    }

    #[test]
    fn test_dump_writes_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submit_cataloger.sbatch");
        let job = SlurmJob {
            indir: String::from("in"),
            outdir: String::from("out"),
            ..Default::default()
        };
        job.dump(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("#SBATCH"));
        assert!(content.contains("--indir \"in\""));
    }
} // end of mod tests
