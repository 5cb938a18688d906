// Tue Jan 13 2026 - Alex

use crate::memory::AddressSpace;
use crate::orchestrator::ScanPolicy;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binary: Option<PathBuf>,
    pub signature_files: Vec<PathBuf>,
    /// Sweep every aligned offset instead of only likely function starts.
    pub thorough: bool,
    pub threads: usize,
    pub base_address: u32,
    /// Leading image bytes that precede `base_address`.
    pub header_size: u32,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub show_progress: bool,
    /// Scan with whatever loaded when some signature records were rejected.
    pub allow_partial_database: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: None,
            signature_files: Vec::new(),
            thorough: false,
            threads: num_cpus::get(),
            base_address: AddressSpace::DEFAULT_BASE,
            header_size: 0,
            output_format: OutputFormat::default(),
            output_file: None,
            show_progress: true,
            allow_partial_database: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = Some(binary);
        self
    }

    pub fn with_signature_file(mut self, path: PathBuf) -> Self {
        self.signature_files.push(path);
        self
    }

    pub fn with_thorough(mut self, thorough: bool) -> Self {
        self.thorough = thorough;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_base_address(mut self, base: u32) -> Self {
        self.base_address = base;
        self
    }

    pub fn with_header_size(mut self, header_size: u32) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_output_file(mut self, output: PathBuf) -> Self {
        self.output_file = Some(output);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn address_space(&self) -> AddressSpace {
        AddressSpace::new(self.base_address, self.header_size)
    }

    /// Targeted over `candidates` unless a thorough sweep was asked for.
    pub fn scan_policy(&self, candidates: Option<Vec<usize>>) -> ScanPolicy {
        ScanPolicy::select(candidates, self.thorough)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.binary.is_none() {
            return Err("A binary image must be given".to_string());
        }
        if self.signature_files.is_empty() {
            return Err("At least one signature file must be given".to_string());
        }
        if self.threads == 0 {
            return Err("threads must be greater than 0".to_string());
        }
        if self.header_size % 4 != 0 {
            return Err(format!("header_size {:#x} is not a multiple of 4", self.header_size));
        }
        Ok(())
    }
}
