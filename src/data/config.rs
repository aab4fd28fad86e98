use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE_NAME: &str = "resume-explorer.cfg";

/// The configuration as stored on disk; every field is optional so older or
/// hand-written files still load.
#[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfigFs {
    service_url: Option<String>,
    request_timeout_secs: Option<u64>,
    pdfium_library: Option<PathBuf>,
    listings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the marketplace document service.
    pub service_url: String,
    pub request_timeout: Duration,
    /// pdfium shared library to load instead of the system one.
    pub pdfium_library: Option<PathBuf>,
    /// JSON file holding the listings shown on the Explore page.
    pub listings_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_fs(ConfigFs::default())
    }
}

impl Config {
    pub fn from_fs(fs: ConfigFs) -> Self {
        Self {
            service_url: fs
                .service_url
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_owned()),
            request_timeout: Duration::from_secs(
                fs.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            pdfium_library: fs.pdfium_library,
            listings_path: fs.listings_path,
        }
    }

    pub fn as_fs(&self) -> ConfigFs {
        ConfigFs {
            service_url: Some(self.service_url.clone()),
            request_timeout_secs: Some(self.request_timeout.as_secs()),
            pdfium_library: self.pdfium_library.clone(),
            listings_path: self.listings_path.clone(),
        }
    }

    /// Loads the config from the user's config directory, falling back to the
    /// defaults when there is none (or it can't be read).
    pub fn load() -> Self {
        match get_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                warn!("{err:#}; using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let inner = |path: &Path| -> Result<ConfigFs> {
            if path.exists() {
                let mut file = std::fs::File::open(path)?;
                let mut str = String::new();
                file.read_to_string(&mut str)?;
                let de: ConfigFs = serde_json::from_str(&str)?;
                Ok(de)
            } else {
                bail!("cfg does not exist on disk");
            }
        };
        match inner(path) {
            Ok(fs) => {
                info!("Loaded configuration from {}", path.display());
                Self::from_fs(fs)
            }
            Err(err) => {
                debug!("Not using {}: {err}", path.display());
                Self::from_fs(ConfigFs::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = get_config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Couldn't create '{}'", parent.display()))?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.as_fs())?)?;
        Ok(())
    }
}

/// `<config dir>/resume-explorer/resume-explorer.cfg`
pub fn get_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Couldn't find the user's config directory")?;
    path.push("resume-explorer");
    path.push(CONFIG_FILE_NAME);
    Ok(path)
}
