//! Copy rule configuration.
//!
//! This module defines the base path and the three ordered mapping tables that
//! drive a reorganization run. The built-in tables describe the
//! `Documentation_Pro` layout; a TOML file can replace any of them.
//!
//! # Configuration File Format
//!
//! ```toml
//! base_path = "/srv/docs/Documentation_Pro"
//!
//! [[folders]]
//! from = "10_دليل_المطور"
//! to = "03_دليل_المطور"
//!
//! [[scattered_files]]
//! from = "DEPARTMENT_SETUP.md"
//! to = "04_قواعد_البيانات/05_البيانات_الأساسية/"
//!
//! [[system_folders]]
//! from = "Equipment"
//! to = "04_قواعد_البيانات/02_نظام_المعدات"
//! ```
//!
//! Tables missing from the file keep their built-in contents.

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".docs-reorganizer.toml";

/// Base path used when neither the configuration nor the command line names one.
pub const DEFAULT_BASE_PATH: &str =
    r"F:\_Alsaada_Telegram_Bot\telegram-bot-template-main\Documentation_Pro";

const DEFAULT_FOLDERS: &[(&str, &str)] = &[
    ("10_دليل_المطور", "03_دليل_المطور"),
    ("20_دليل_المستخدم", "02_البدء_السريع"),
    ("30_التشغيل", "98_التشغيل_والنشر"),
    ("40_واجهة_المستخدم", "05_واجهات_المستخدم"),
    ("50_HowTo", "95_أدلة_عملية"),
    ("60_أدلة_التصميم", "06_أدلة_التصميم"),
    ("70_أمثلة_تدفقات", "07_أمثلة_وتدفقات"),
    ("80_وحدات_جاهزة", "08_وحدات_جاهزة"),
    ("11_API_Reference", "09_API_Reference"),
    ("90_تقييم", "99_تقييم_وتحليل"),
];

const DEFAULT_SCATTERED_FILES: &[(&str, &str)] = &[
    ("EMPLOYEE_SCHEMA_FINAL.md", "04_قواعد_البيانات/01_نظام_الموظفين/"),
    ("EMPLOYEE_SCHEMA_PROPOSAL.md", "04_قواعد_البيانات/01_نظام_الموظفين/"),
    ("EMPLOYEE_SCHEMA_SIMPLIFIED.md", "04_قواعد_البيانات/01_نظام_الموظفين/"),
    ("DEPARTMENT_SETUP.md", "04_قواعد_البيانات/05_البيانات_الأساسية/"),
    ("POSITION_SETUP.md", "04_قواعد_البيانات/05_البيانات_الأساسية/"),
    ("GOVERNORATES_DATA.md", "04_قواعد_البيانات/05_البيانات_الأساسية/"),
];

const DEFAULT_SYSTEM_FOLDERS: &[(&str, &str)] = &[
    ("Equipment", "04_قواعد_البيانات/02_نظام_المعدات"),
    ("Warehouse", "04_قواعد_البيانات/03_نظام_المخازن"),
    ("Cost_Calculation", "04_قواعد_البيانات/04_نظام_التكاليف"),
];

/// Errors that can occur while loading or validating the configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A mapping entry cannot be resolved safely under the base path.
    InvalidMapping {
        /// The offending path as written in the table.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidMapping { path, reason } => {
                write!(f, "Invalid mapping path '{}': {}", path, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One (source, destination) pair of a mapping table.
///
/// Both sides are relative to the base path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mapping {
    pub from: String,
    pub to: String,
}

impl Mapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn table(entries: &[(&str, &str)]) -> Vec<Mapping> {
    entries
        .iter()
        .map(|(from, to)| Mapping::new(*from, *to))
        .collect()
}

/// The full set of copy rules for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorganizeConfig {
    /// Root under which every mapping entry is resolved.
    pub base_path: PathBuf,
    /// Phase 1: whole folder contents, old name to new name.
    pub folders: Vec<Mapping>,
    /// Phase 2: single files directly under the base path to a destination folder.
    pub scattered_files: Vec<Mapping>,
    /// Phase 3: direct files of a system folder to a nested destination.
    pub system_folders: Vec<Mapping>,
}

/// On-disk shape of the configuration file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_path: Option<PathBuf>,
    folders: Option<Vec<Mapping>>,
    scattered_files: Option<Vec<Mapping>>,
    system_folders: Option<Vec<Mapping>>,
}

impl Default for ReorganizeConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            folders: table(DEFAULT_FOLDERS),
            scattered_files: table(DEFAULT_SCATTERED_FILES),
            system_folders: table(DEFAULT_SYSTEM_FOLDERS),
        }
    }
}

impl ReorganizeConfig {
    /// Creates a configuration with the given base path and empty tables.
    pub fn empty(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            folders: Vec::new(),
            scattered_files: Vec::new(),
            system_folders: Vec::new(),
        }
    }

    /// Load configuration from a file, with fallback to the built-in tables.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.docs-reorganizer.toml` in the current directory
    /// 3. Fall back to the built-in configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found (or explicitly named)
    /// but cannot be read, parsed or validated.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::InvalidMapping` if a table entry is unsafe.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text, filling missing parts from the built-in tables.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        let defaults = Self::default();
        let config = Self {
            base_path: file.base_path.unwrap_or(defaults.base_path),
            folders: file.folders.unwrap_or(defaults.folders),
            scattered_files: file.scattered_files.unwrap_or(defaults.scattered_files),
            system_folders: file.system_folders.unwrap_or(defaults.system_folders),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the base path, keeping the tables.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Checks that every table entry stays inside the base path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMapping` for empty, absolute or
    /// parent-relative entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.folders
            .iter()
            .chain(&self.scattered_files)
            .chain(&self.system_folders)
            .try_for_each(|mapping| {
                validate_relative(&mapping.from)?;
                validate_relative(&mapping.to)
            })
    }
}

fn validate_relative(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidMapping {
        path: raw.to_string(),
        reason: reason.to_string(),
    };

    if raw.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    for component in Path::new(raw).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("'..' is not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("path must be relative to the base path"));
            }
        }
    }

    Ok(())
}
