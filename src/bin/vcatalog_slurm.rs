//! vcatalog-slurm --indir [-i] dir --outdir [-o] dir [slurm options]
//!
//! Generates an sbatch script wrapping one vcatalog invocation.
//!
//! --job-name [-J] : name of the job (default vcatalog)
//!
//! --time : wall time limit HH:MM:SS (default 01:00:00)
//!
//! --mem : memory allocation, e.g. 8G or 16000M (default 8G)
//!
//! --partition [-p], --account [-A] : emitted only when given
//!
//! --cpus-per-task : nb cores, also sets --threads of the pipeline (default 4)
//!
//! --mail-user, --mail-type : notification address and events (default FAIL)
//!
//! --sbatch-file : name of the generated script (default submit_cataloger.sbatch)
//!
//! --log-output : stdout/stderr pattern, %x = job name, %j = job id
//!
//! --min-ani, --min-cov, --prefix : forwarded to vcatalog unchanged

use clap::{Arg, Command};

use std::path::Path;

use env_logger::Builder;

use vcatalog::slurm::SlurmJob;


// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}


fn main() -> Result<(), anyhow::Error> {
    let _ = init_log();

    let matches = Command::new("vcatalog-slurm")
        .version("0.1.0")
        .about("Generates a Slurm batch script running the vcatalog pipeline")
        .arg(
            Arg::new("indir")
                .short('i')
                .long("indir")
                .value_name("DIRECTORY")
                .help("input directory passed to vcatalog")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("outdir")
                .short('o')
                .long("outdir")
                .value_name("DIRECTORY")
                .help("output directory passed to vcatalog")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("job_name")
                .short('J')
                .long("job-name")
                .value_name("NAME")
                .help("name of the job (default : vcatalog)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("time")
                .long("time")
                .value_name("HH:MM:SS")
                .help("wall time limit (default : 01:00:00)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("mem")
                .long("mem")
                .value_name("MEM")
                .help("memory allocation, e.g. 8G or 16000M (default : 8G)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("partition")
                .short('p')
                .long("partition")
                .value_name("PARTITION")
                .help("partition to submit the job to")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("account")
                .short('A')
                .long("account")
                .value_name("ACCOUNT")
                .help("account/project name to charge")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("cpus_per_task")
                .long("cpus-per-task")
                .value_name("CPUS")
                .help("nb cores, also sets --threads for the pipeline (default : 4)")
                .required(false)
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("mail_user")
                .long("mail-user")
                .value_name("EMAIL")
                .help("email address for notifications")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("mail_type")
                .long("mail-type")
                .value_name("TYPE")
                .help("notify on state change, BEGIN, END, FAIL or ALL (default : FAIL)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("sbatch_file")
                .long("sbatch-file")
                .value_name("FILE")
                .help("name of the generated sbatch file (default : submit_cataloger.sbatch)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("log_output")
                .long("log-output")
                .value_name("PATTERN")
                .help("stdout/stderr filename pattern, %x = job name, %j = job id")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("min_ani")
                .long("min-ani")
                .value_name("PERCENT")
                .help("minimum ANI passed to vcatalog (default : 95.0)")
                .required(false)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("min_cov")
                .long("min-cov")
                .value_name("PERCENT")
                .help("minimum representative coverage passed to vcatalog (default : 85.0)")
                .required(false)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .help("output prefix passed to vcatalog (default : catalog)")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        )
        .get_matches();

    let mut job = SlurmJob {
        indir: matches.get_one::<String>("indir").unwrap().clone(),
        outdir: matches.get_one::<String>("outdir").unwrap().clone(),
        ..Default::default()
    };
    if let Some(job_name) = matches.get_one::<String>("job_name") {
        job.job_name = job_name.clone();
    }
    if let Some(time) = matches.get_one::<String>("time") {
        job.time = time.clone();
    }
    if let Some(mem) = matches.get_one::<String>("mem") {
        job.mem = mem.clone();
    }
    job.partition = matches.get_one::<String>("partition").cloned();
    job.account = matches.get_one::<String>("account").cloned();
    if let Some(cpus) = matches.get_one::<usize>("cpus_per_task") {
        job.cpus_per_task = *cpus;
    }
    job.mail_user = matches.get_one::<String>("mail_user").cloned();
    if let Some(mail_type) = matches.get_one::<String>("mail_type") {
        job.mail_type = mail_type.clone();
    }
    if let Some(log_output) = matches.get_one::<String>("log_output") {
        job.log_output = log_output.clone();
    }
    if let Some(min_ani) = matches.get_one::<f64>("min_ani") {
        job.min_ani = *min_ani;
    }
    if let Some(min_cov) = matches.get_one::<f64>("min_cov") {
        job.min_cov = *min_cov;
    }
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        job.prefix = prefix.clone();
    }
    let sbatch_file = matches
        .get_one::<String>("sbatch_file")
        .cloned()
        .unwrap_or_else(|| String::from("submit_cataloger.sbatch"));

    let path = Path::new(&sbatch_file);
    job.dump(path)?;
    println!("generated Slurm script : {:?}", path);
    println!("submit with : sbatch {}", sbatch_file);
    //
    Ok(())
} // end of main
