use serde::{Deserialize, Serialize};

use idxbench_domain::ConnectionProfile;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileConfigFile {
    pub version: u32,
    pub connection: ProfileConfigEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileConfigEntry {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ProfileConfigFile {
    pub fn from_profile(profile: &ConnectionProfile) -> Self {
        Self {
            version: CURRENT_VERSION,
            connection: ProfileConfigEntry {
                host: profile.host.clone(),
                port: profile.port,
                database: profile.database.clone(),
                user: profile.user.clone(),
                password: profile.password.clone(),
            },
        }
    }

    pub fn to_profile(&self) -> ConnectionProfile {
        ConnectionProfile {
            host: self.connection.host.clone(),
            port: self.connection.port,
            database: self.connection.database.clone(),
            user: self.connection.user.clone(),
            password: self.connection.password.clone(),
        }
    }
}
