use crate::strategy::ProcessingPriority;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Encryption profiling and heuristic recovery for arbitrary byte buffers
#[derive(Parser, Debug, Clone)]
#[command(name = "cipher-triage")]
#[command(version = "0.1.0")]
#[command(about = "Profile encrypted files and attempt heuristic recovery", long_about = None)]
pub struct Args {
    /// Input files to analyze
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Attempt recovery after analysis
    #[arg(long = "recover")]
    pub recover: bool,

    /// Processing priority preset, mapped onto strategy tuning
    #[arg(long = "priority", value_enum, default_value = "balanced")]
    pub priority: PriorityArg,

    /// Base recovery timeout in seconds, scaled by the priority preset
    #[arg(long = "timeout-secs", default_value = "30")]
    pub timeout_secs: u64,

    /// Maximum input size in MB
    #[arg(long = "max-size-mb", default_value = "50")]
    pub max_size_mb: u64,

    /// Output directory for recovered buffers
    #[arg(short = 'o', long = "output", default_value = "recovered_output")]
    pub output: PathBuf,

    /// Emit per-file JSON reports instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Number of worker threads (0 = auto)
    #[arg(long = "threads", default_value = "0")]
    pub threads: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityArg {
    Fast,
    Balanced,
    Thorough,
}

impl From<PriorityArg> for ProcessingPriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Fast => ProcessingPriority::Fast,
            PriorityArg::Balanced => ProcessingPriority::Balanced,
            PriorityArg::Thorough => ProcessingPriority::Thorough,
        }
    }
}

impl Args {
    /// Validate the arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one input file is required".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout-secs must be greater than 0".to_string());
        }

        if self.max_size_mb == 0 {
            return Err("max-size-mb must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the size ceiling in bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }

    /// Get the base recovery timeout
    pub fn base_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
