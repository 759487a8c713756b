use anyhow::{anyhow, Result};

use crate::flags::UiFlags;
use crate::navigator::Tolerance;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Backend base URL, without trailing slash.
    pub server_url: String,
    pub request_timeout_ms: u64,
    pub tolerance: Tolerance,
    pub flags: UiFlags,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            tolerance: Tolerance::default(),
            flags: UiFlags::default(),
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

fn parse_slack(raw: &str, name: &str) -> Result<f64> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("{name} must be a number, got '{raw}'"))?;
    validate_in_range(v, 0.0, 1000.0, name)
}

impl Config {
    /// Page configuration from `location.search` and `location.origin`.
    ///
    /// Keys: `ytnav` (flag list), `ytslack` (boundary slack), `ytedge`
    /// (edge slack). Unknown keys are ignored. A key with an invalid value is
    /// skipped with a warning and the rest still apply; only a bad origin is
    /// an error.
    pub fn from_query(query: &str, origin: &str) -> Result<Config> {
        let mut cfg = Config {
            server_url: origin.trim_end_matches('/').to_string(),
            ..Config::default()
        };
        validate_url(&cfg.server_url, "origin")?;

        let qs = query.trim_start_matches('?');
        for kv in qs.split('&').filter(|s| !s.is_empty()) {
            let mut it = kv.splitn(2, '=');
            let k = it.next().unwrap_or_default().trim().to_ascii_lowercase();
            let v = it.next().unwrap_or_default();
            let v = urlencoding::decode(v).unwrap_or_else(|_| v.into()).to_string();
            match k.as_str() {
                "ytnav" => cfg.flags = UiFlags::from_list(&v),
                "ytslack" => match parse_slack(&v, "ytslack") {
                    Ok(slack) => cfg.tolerance.boundary_slack = slack,
                    Err(e) => log::warn!("ignoring page parameter: {e:#}"),
                },
                "ytedge" => match parse_slack(&v, "ytedge") {
                    Ok(slack) => cfg.tolerance.edge_slack = slack,
                    Err(e) => log::warn!("ignoring page parameter: {e:#}"),
                },
                _ => {}
            }
        }
        Ok(cfg)
    }

    /// Join an endpoint path onto the server URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.server_url, path.trim_start_matches('/'))
    }

    pub fn print_summary(&self) {
        log::info!("ytvip configuration:");
        log::info!("  Server: {}", self.server_url);
        log::info!("  Request timeout: {}ms", self.request_timeout_ms);
        log::info!(
            "  Row slack: {} / edge slack: {}",
            self.tolerance.boundary_slack,
            self.tolerance.edge_slack
        );
        log::info!("  Flags: {:?}", self.flags);
    }
}

#[cfg(feature = "native")]
pub use native::{load, ConfigFile, ConnectionArgs, EnvOverrides};

#[cfg(feature = "native")]
mod native {
    use super::*;
    use crate::navigator::{DEFAULT_BOUNDARY_SLACK, DEFAULT_EDGE_SLACK};
    use anyhow::Context;
    use clap::Args;
    use serde::Deserialize;
    use std::env;
    use std::path::{Path, PathBuf};

    /// Connection options shared by every `ytvip` subcommand.
    /// Configuration priority: CLI args > Environment variables > Config file > Defaults
    #[derive(Args, Debug, Clone, Default)]
    pub struct ConnectionArgs {
        /// Backend base URL (e.g. http://127.0.0.1:8000)
        #[arg(long, env = "YTVIP_SERVER_URL", global = true)]
        pub server_url: Option<String>,

        /// HTTP request timeout in milliseconds (100-60000)
        #[arg(long, env = "YTVIP_TIMEOUT_MS", global = true)]
        pub timeout_ms: Option<u64>,

        /// TOML config file
        #[arg(long, env = "YTVIP_CONFIG", global = true)]
        pub config: Option<PathBuf>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct ConfigFile {
        #[serde(default)]
        pub server: ServerSection,
        #[serde(default)]
        pub navigation: NavigationSection,
        /// Flag list, same syntax as the `ytnav` page parameter.
        pub flags: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct ServerSection {
        pub url: Option<String>,
        pub timeout_ms: Option<u64>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct NavigationSection {
        pub edge_slack: Option<f64>,
        pub boundary_slack: Option<f64>,
    }

    /// Values read from `YTVIP_SERVER_URL` / `YTVIP_TIMEOUT_MS`.
    #[derive(Debug, Clone, Default)]
    pub struct EnvOverrides {
        pub server_url: Option<String>,
        pub timeout_ms: Option<u64>,
    }

    impl EnvOverrides {
        pub fn from_env() -> Self {
            EnvOverrides {
                server_url: env::var("YTVIP_SERVER_URL").ok(),
                timeout_ms: env::var("YTVIP_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()),
            }
        }
    }

    impl ConfigFile {
        pub fn parse(contents: &str) -> Result<Self> {
            toml::from_str(contents).context("Failed to parse TOML config")
        }

        fn read(path: &Path) -> Result<Self> {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&contents).with_context(|| format!("in {}", path.display()))
        }
    }

    /// Load configuration from CLI args, environment variables and an optional file
    pub fn load(args: &ConnectionArgs) -> Result<Config> {
        let file = match &args.config {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                ConfigFile::read(path)?
            }
            None => ConfigFile::default(),
        };
        resolve(args, EnvOverrides::from_env(), file)
    }

    pub(super) fn resolve(args: &ConnectionArgs, env: EnvOverrides, file: ConfigFile) -> Result<Config> {
        let server_url = args
            .server_url
            .clone()
            .or(env.server_url)
            .or(file.server.url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = server_url.trim_end_matches('/').to_string();
        validate_url(&server_url, "YTVIP_SERVER_URL")?;

        let request_timeout_ms = args
            .timeout_ms
            .or(env.timeout_ms)
            .or(file.server.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let request_timeout_ms = validate_in_range(request_timeout_ms, 100, 60000, "YTVIP_TIMEOUT_MS")?;

        let edge_slack = validate_in_range(
            file.navigation.edge_slack.unwrap_or(DEFAULT_EDGE_SLACK),
            0.0,
            1000.0,
            "navigation.edge_slack",
        )?;
        let boundary_slack = validate_in_range(
            file.navigation.boundary_slack.unwrap_or(DEFAULT_BOUNDARY_SLACK),
            0.0,
            1000.0,
            "navigation.boundary_slack",
        )?;

        Ok(Config {
            server_url,
            request_timeout_ms,
            tolerance: Tolerance {
                edge_slack,
                boundary_slack,
            },
            flags: file.flags.as_deref().map(UiFlags::from_list).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::DEFAULT_EDGE_SLACK;

    #[test]
    fn test_from_query_defaults() {
        let cfg = Config::from_query("", "http://localhost:8000/").unwrap();
        assert_eq!(cfg.server_url, "http://localhost:8000");
        assert_eq!(cfg.flags, UiFlags::default());
        assert_eq!(cfg.tolerance, Tolerance::default());
    }

    #[test]
    fn test_from_query_overrides() {
        let cfg = Config::from_query("?ytnav=keys%2Cwheel&ytslack=2.5&foo=bar", "https://example.org").unwrap();
        assert!(cfg.flags.keyboard_rows);
        assert!(cfg.flags.wheel_rows);
        assert!(cfg.flags.lazy_previews);
        assert_eq!(cfg.tolerance.boundary_slack, 2.5);
        assert_eq!(cfg.tolerance.edge_slack, DEFAULT_EDGE_SLACK);
    }

    #[test]
    fn test_row_opt_in_keeps_previews() {
        let cfg = Config::from_query("?ytnav=keys,wheel", "http://localhost:8000").unwrap();
        assert!(cfg.flags.keyboard_rows);
        assert!(cfg.flags.wheel_rows);
        assert!(cfg.flags.lazy_previews);
        assert!(cfg.flags.pause_on_blur);

        let cfg = Config::from_query("?ytnav=keys,-previews", "http://localhost:8000").unwrap();
        assert!(!cfg.flags.lazy_previews);
        assert!(cfg.flags.pause_on_blur);
    }

    #[test]
    fn test_from_query_skips_bad_values() {
        let cfg = Config::from_query("ytnav=keys&ytslack=abc&ytedge=-1", "http://localhost").unwrap();
        assert!(cfg.flags.keyboard_rows);
        assert_eq!(cfg.tolerance, Tolerance::default());

        let cfg = Config::from_query("ytslack=abc&ytedge=40", "http://localhost").unwrap();
        assert_eq!(cfg.tolerance.edge_slack, 40.0);
        assert_eq!(cfg.tolerance.boundary_slack, Tolerance::default().boundary_slack);
    }

    #[test]
    fn test_from_query_rejects_bad_origin() {
        assert!(Config::from_query("", "file://").is_err());
        assert!(Config::from_query("ytnav=keys", "").is_err());
    }

    #[test]
    fn test_endpoint_join() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint("/download"), "http://127.0.0.1:8000/download");
        assert_eq!(cfg.endpoint("mpv"), "http://127.0.0.1:8000/mpv");
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_values_apply() {
        let file = ConfigFile::parse(
            r#"
flags = "keys"

[server]
url = "http://10.0.0.2:9000/"
timeout_ms = 2500

[navigation]
boundary_slack = 3.0
"#,
        )
        .unwrap();
        let args = ConnectionArgs {
            timeout_ms: Some(1500),
            ..Default::default()
        };
        let cfg = native::resolve(&args, EnvOverrides::default(), file).unwrap();
        assert_eq!(cfg.server_url, "http://10.0.0.2:9000");
        assert_eq!(cfg.request_timeout_ms, 1500);
        assert_eq!(cfg.tolerance.boundary_slack, 3.0);
        assert_eq!(cfg.tolerance.edge_slack, DEFAULT_EDGE_SLACK);
        assert!(cfg.flags.keyboard_rows);
        assert!(!cfg.flags.wheel_rows);
        assert!(cfg.flags.lazy_previews);
        assert!(cfg.flags.pause_on_blur);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_timeout_out_of_range() {
        let file = ConfigFile::parse("[server]\ntimeout_ms = 5\n").unwrap();
        assert!(native::resolve(&ConnectionArgs::default(), EnvOverrides::default(), file).is_err());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_priority_cli_env_file() {
        let file = || ConfigFile::parse("[server]\nurl = \"http://file:1\"\ntimeout_ms = 2000\n").unwrap();
        let env = EnvOverrides {
            server_url: Some("http://env:2".into()),
            timeout_ms: Some(3000),
        };

        let cfg = native::resolve(&ConnectionArgs::default(), EnvOverrides::default(), file()).unwrap();
        assert_eq!(cfg.server_url, "http://file:1");
        assert_eq!(cfg.request_timeout_ms, 2000);

        let cfg = native::resolve(&ConnectionArgs::default(), env.clone(), file()).unwrap();
        assert_eq!(cfg.server_url, "http://env:2");
        assert_eq!(cfg.request_timeout_ms, 3000);

        let args = ConnectionArgs {
            server_url: Some("http://cli:3".into()),
            ..Default::default()
        };
        let cfg = native::resolve(&args, env, file()).unwrap();
        assert_eq!(cfg.server_url, "http://cli:3");
        assert_eq!(cfg.request_timeout_ms, 3000);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_no_sources_gives_defaults() {
        let cfg = native::resolve(&ConnectionArgs::default(), EnvOverrides::default(), ConfigFile::default()).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
