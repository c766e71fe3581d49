use anyhow::{Context, Result, ensure};
use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

const DEFAULT_COMMAND_URL: &str = "http://raspberrypi.local:5000";

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Where commands and image requests go
    pub device: DeviceConfig,

    /// Optional periodic camera refresh
    pub poll: PollConfig,

    /// Where `snapshot` writes camera frames
    pub snapshot: SnapshotConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Base URL the command endpoint is resolved against
    pub command_url: String,
    /// Replaces the built-in image endpoint when set
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// `None` keeps the camera on manual refresh
    pub image_interval: Option<Duration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotConfig {
    pub dir: PathBuf,
}

impl AppConfig {
    /// Load and cache the configuration
    ///
    /// On first call, it loads and validates all configuration from environment
    /// variables. Subsequent calls return the cached instance.
    pub fn load() -> Result<&'static Self> {
        if let Some(config) = Self::cell().get() {
            return Ok(config);
        }

        let config = Self::load_internal()?;
        Ok(Self::cell().get_or_init(|| config))
    }

    fn cell() -> &'static OnceLock<AppConfig> {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        &APP_CONFIG
    }

    fn load_internal() -> Result<Self> {
        Ok(Self {
            device: DeviceConfig::load()?,
            poll: PollConfig::load()?,
            snapshot: SnapshotConfig::load(),
        })
    }
}

impl DeviceConfig {
    fn load() -> Result<Self> {
        Self::parse(
            env::var("AGRIBOT_COMMAND_URL").ok(),
            env::var("AGRIBOT_IMAGE_URL").ok(),
        )
    }

    pub fn parse(command_url: Option<String>, image_url: Option<String>) -> Result<Self> {
        let command_url = command_url
            .unwrap_or_else(|| DEFAULT_COMMAND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        ensure!(
            command_url.starts_with("http://") || command_url.starts_with("https://"),
            "failed to parse AGRIBOT_COMMAND_URL: expected http(s) url, got {command_url:?}"
        );

        let image_url = image_url.filter(|url| !url.is_empty());
        if let Some(url) = &image_url {
            ensure!(
                url.starts_with("http://") || url.starts_with("https://"),
                "failed to parse AGRIBOT_IMAGE_URL: expected http(s) url, got {url:?}"
            );
        }

        Ok(Self {
            command_url,
            image_url,
        })
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            command_url: DEFAULT_COMMAND_URL.to_string(),
            image_url: None,
        }
    }
}

impl PollConfig {
    fn load() -> Result<Self> {
        Self::parse(env::var("AGRIBOT_IMAGE_POLL_SECS").ok())
    }

    pub fn parse(secs: Option<String>) -> Result<Self> {
        let image_interval = match secs {
            None => None,
            Some(secs) => {
                let secs = secs
                    .trim()
                    .parse::<u64>()
                    .context("failed to parse AGRIBOT_IMAGE_POLL_SECS: invalid format")?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self { image_interval })
    }
}

impl SnapshotConfig {
    fn load() -> Self {
        let dir = env::var("AGRIBOT_SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        Self { dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_defaults_to_raspberry_pi_host() {
        let device = DeviceConfig::parse(None, None).unwrap();
        assert_eq!(device, DeviceConfig::default());
    }

    #[test]
    fn device_strips_trailing_slash() {
        let device = DeviceConfig::parse(Some("http://10.0.0.7:5000/".to_string()), None).unwrap();
        assert_eq!(device.command_url, "http://10.0.0.7:5000");
    }

    #[test]
    fn device_rejects_non_http_urls() {
        let result = DeviceConfig::parse(Some("raspberrypi.local:5000".to_string()), None);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("AGRIBOT_COMMAND_URL")
        );

        let result = DeviceConfig::parse(None, Some("ftp://camera/get-image".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn poll_is_disabled_unless_configured() {
        assert_eq!(PollConfig::parse(None).unwrap().image_interval, None);
        assert_eq!(
            PollConfig::parse(Some("0".to_string())).unwrap().image_interval,
            None
        );
        assert_eq!(
            PollConfig::parse(Some(" 5 ".to_string())).unwrap().image_interval,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn poll_rejects_garbage() {
        assert!(PollConfig::parse(Some("soon".to_string())).is_err());
    }
}
