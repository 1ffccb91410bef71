use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::report::pipeline::DEFAULT_SERIAL_MARKER;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "testrail-reporter",
    version,
    about = "TestRail plan reporting and result submission for the device test harness"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TestRail base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TestRail account email
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// TestRail password or API key
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Path to config file (default: testrail-reporter.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate a plan's runs, publish the summary tables and close it
    Report {
        /// TestRail project id
        #[arg(long)]
        project_id: Option<u64>,

        /// Test plan id to report on
        #[arg(long)]
        plan_id: Option<u64>,

        /// Substring marking the device-serial line in run descriptions
        #[arg(long)]
        serial_marker: Option<String>,
    },

    /// Submit one case result into the matching run
    Submit {
        /// TestRail project id
        #[arg(long)]
        project_id: Option<u64>,

        /// Suite the case belongs to
        #[arg(long)]
        suite_id: u64,

        /// Case id (automated tests are named after their case)
        #[arg(long)]
        case: String,

        /// Device id used in the run name
        #[arg(long)]
        device_id: u64,

        /// Device serial used in the run name
        #[arg(long)]
        device_serial: String,

        /// Firmware version used in the plan name
        #[arg(long)]
        firmware: String,

        /// Result status: Passed, Blocked, Retest or Failed
        #[arg(long)]
        status: String,

        /// Elapsed test time in seconds
        #[arg(long, default_value_t = 0)]
        elapsed: u64,

        /// Downtime in seconds
        #[arg(long, default_value_t = 0)]
        downtime: u64,

        /// Device-wait time in seconds
        #[arg(long, default_value_t = 0)]
        dev_wait: u64,

        /// Settings-load time in seconds
        #[arg(long, default_value_t = 0)]
        settings_load: u64,

        /// Base-state transition time in seconds
        #[arg(long, default_value_t = 0)]
        base_state: u64,

        /// Free-text comment attached to the result
        #[arg(long, default_value = "")]
        comment: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `testrail-reporter.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub project_id: Option<u64>,

    pub plan_id: Option<u64>,

    #[serde(default = "default_serial_marker")]
    pub serial_marker: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            plan_id: None,
            serial_marker: DEFAULT_SERIAL_MARKER.to_string(),
        }
    }
}

// Serde default helpers
fn default_serial_marker() -> String { DEFAULT_SERIAL_MARKER.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("testrail-reporter.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Credential resolution (CLI > config > env)
// ============================================================================

/// Resolved backend connection settings.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: String,
    pub user: String,
    pub password: String,
}

/// Merge CLI flags, the config file and TESTRAIL_* environment variables.
pub fn resolve_credentials(cli: &Cli, config: &AppConfig) -> Result<Credentials, String> {
    let pick = |flag: &Option<String>, file: &Option<String>, env: &str| -> Option<String> {
        flag.clone()
            .or_else(|| file.clone())
            .or_else(|| std::env::var(env).ok())
    };

    let base_url = pick(&cli.base_url, &config.backend.base_url, "TESTRAIL_URL")
        .ok_or("TestRail base URL missing (use --base-url, the config file or TESTRAIL_URL)")?;
    let user = pick(&cli.user, &config.backend.user, "TESTRAIL_USER")
        .ok_or("TestRail user missing (use --user, the config file or TESTRAIL_USER)")?;
    let password = pick(&cli.password, &config.backend.password, "TESTRAIL_PASSWORD")
        .ok_or("TestRail password missing (use --password, the config file or TESTRAIL_PASSWORD)")?;

    Ok(Credentials { base_url, user, password })
}
