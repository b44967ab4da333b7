//! Safe contract versions

use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::chain_ids;
use crate::error::Error;

/// Versions older than this use the L1 singleton unconditionally.
const LEGACY_VERSION: &str = "<1.3.0";

/// Releases the creation flow knows how to encode for.
const SAFE_VERSIONS: [&str; 3] = ["1.3.0", "1.2.0", "1.1.1"];

/// A supported Safe contract release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafeVersion {
    V1_1_1,
    V1_2_0,
    V1_3_0,
    V1_4_1,
}

impl SafeVersion {
    /// Version used for new Safes unless configured otherwise
    pub const LATEST: SafeVersion = SafeVersion::V1_3_0;

    pub fn as_str(&self) -> &'static str {
        match self {
            SafeVersion::V1_1_1 => "1.1.1",
            SafeVersion::V1_2_0 => "1.2.0",
            SafeVersion::V1_3_0 => "1.3.0",
            SafeVersion::V1_4_1 => "1.4.1",
        }
    }

    /// Returns true for releases that predate the L1/L2 singleton split
    pub fn is_legacy(&self) -> bool {
        is_legacy_version(self.as_str())
    }
}

impl fmt::Display for SafeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafeVersion {
    type Err = Error;

    /// Parses a version string; build metadata such as `+L2` is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed =
            Version::parse(s.trim()).map_err(|_| Error::UnsupportedVersion(s.to_string()))?;
        match (parsed.major, parsed.minor, parsed.patch) {
            (1, 1, 1) => Ok(SafeVersion::V1_1_1),
            (1, 2, 0) => Ok(SafeVersion::V1_2_0),
            (1, 3, 0) => Ok(SafeVersion::V1_3_0),
            (1, 4, 1) => Ok(SafeVersion::V1_4_1),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }
}

impl Serialize for SafeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SafeVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns true if `version` satisfies `<1.3.0`. Unparseable input is not legacy.
pub fn is_legacy_version(version: &str) -> bool {
    satisfies(version, LEGACY_VERSION)
}

/// Returns true if `version` matches one of the known Safe releases.
pub fn is_valid_safe_version(version: Option<&str>) -> bool {
    match version {
        Some(v) => SAFE_VERSIONS
            .iter()
            .any(|known| satisfies(v, &format!("={known}"))),
        None => false,
    }
}

/// Whether an already deployed Safe reporting `version` runs the L1 singleton.
///
/// Mainnet Safes and legacy versions always do.
pub fn existing_safe_uses_l1_singleton(chain_id: u64, version: &str) -> bool {
    chain_id == chain_ids::MAINNET || is_legacy_version(version)
}

fn satisfies(version: &str, req: &str) -> bool {
    match (Version::parse(version.trim()), VersionReq::parse(req)) {
        (Ok(version), Ok(req)) => req.matches(&version),
        _ => false,
    }
}
