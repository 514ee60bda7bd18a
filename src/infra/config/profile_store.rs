use std::fs;
use std::path::PathBuf;

use idxbench_domain::ConnectionProfile;

use super::profile_file::{CURRENT_VERSION, ProfileConfigFile};

const CONFIG_FILE_NAME: &str = "connection.toml";

#[derive(Debug, Clone)]
pub enum ProfileStoreError {
    VersionMismatch { found: u32, expected: u32 },
    ReadError(String),
    WriteError(String),
    InvalidFormat(String),
    IoError(String),
}

impl std::fmt::Display for ProfileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionMismatch { found, expected } => {
                write!(
                    f,
                    "Config version mismatch: found {}, expected {}",
                    found, expected
                )
            }
            Self::ReadError(msg) => write!(f, "Read error: {}", msg),
            Self::WriteError(msg) => write!(f, "Write error: {}", msg),
            Self::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ProfileStoreError {}

/// Persists the single connection profile as a versioned TOML file under the
/// user config directory.
pub struct TomlProfileStore {
    config_dir: PathBuf,
}

impl TomlProfileStore {
    pub fn new() -> Result<Self, ProfileStoreError> {
        let config_dir = get_config_dir()?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn config_file_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(&self) -> Result<Option<ConnectionProfile>, ProfileStoreError> {
        let path = self.config_file_path();

        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| ProfileStoreError::ReadError(e.to_string()))?;

        let config: ProfileConfigFile = toml::from_str(&content)
            .map_err(|e| ProfileStoreError::InvalidFormat(e.to_string()))?;

        if config.version != CURRENT_VERSION {
            return Err(ProfileStoreError::VersionMismatch {
                found: config.version,
                expected: CURRENT_VERSION,
            });
        }

        Ok(Some(config.to_profile()))
    }

    pub fn save(&self, profile: &ConnectionProfile) -> Result<(), ProfileStoreError> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| ProfileStoreError::IoError(e.to_string()))?;
        }

        let config = ProfileConfigFile::from_profile(profile);
        let content = toml::to_string_pretty(&config)
            .map_err(|e| ProfileStoreError::WriteError(e.to_string()))?;

        let content_with_header = format!(
            "# idxbench connection configuration\n# WARNING: Password is stored in plain text\n\n{}",
            content
        );

        let path = self.config_file_path();
        fs::write(&path, content_with_header)
            .map_err(|e| ProfileStoreError::WriteError(e.to_string()))?;

        set_file_permissions(&path)?;

        Ok(())
    }

    pub fn storage_path(&self) -> PathBuf {
        self.config_file_path()
    }
}

fn get_config_dir() -> Result<PathBuf, ProfileStoreError> {
    let config_base = dirs::config_dir()
        .ok_or_else(|| ProfileStoreError::IoError("Could not find config directory".into()))?;
    Ok(config_base.join("idxbench"))
}

#[cfg(unix)]
fn set_file_permissions(path: &std::path::Path) -> Result<(), ProfileStoreError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms).map_err(|e| ProfileStoreError::IoError(e.to_string()))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &std::path::Path) -> Result<(), ProfileStoreError> {
    Ok(())
}
