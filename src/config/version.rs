//! Shopify Admin API version definitions.
//!
//! The top-level `pages`, `blogs` and `articles` connections used by the
//! content tools only exist from `2024-10` onwards, so that is the oldest
//! named version.

use crate::error::ConfigError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify releases new API versions quarterly (January, April, July,
/// October). Named variants cover the known stable releases; `Unstable`
/// targets the development channel and `Custom` carries any other
/// well-formed release. Versions compare chronologically, with `Unstable`
/// after every release.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::ApiVersion;
///
/// let version: ApiVersion = "2025-10".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2025_10);
/// assert_eq!(version.to_string(), "2025-10");
/// assert!(ApiVersion::latest().is_stable());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2024-10 (October 2024)
    V2024_10,
    /// API version 2025-01 (January 2025)
    V2025_01,
    /// API version 2025-04 (April 2025)
    V2025_04,
    /// API version 2025-07 (July 2025)
    V2025_07,
    /// API version 2025-10 (October 2025)
    V2025_10,
    /// API version 2026-01 (January 2026)
    V2026_01,
    /// API version 2026-04 (April 2026)
    V2026_04,
    /// API version 2026-07 (July 2026)
    V2026_07,
    /// API version 2026-10 (October 2026)
    V2026_10,
    /// Unstable API version for development and testing.
    Unstable,
    /// Custom version string for future or unrecognized versions.
    Custom(String),
}

impl ApiVersion {
    /// Named stable versions, oldest first.
    const STABLE: [Self; 9] = [
        Self::V2024_10,
        Self::V2025_01,
        Self::V2025_04,
        Self::V2025_07,
        Self::V2025_10,
        Self::V2026_01,
        Self::V2026_04,
        Self::V2026_07,
        Self::V2026_10,
    ];

    /// Returns the latest stable API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2026_10
    }

    /// Returns the oldest version inside Shopify's twelve month support
    /// window.
    #[must_use]
    pub const fn minimum_supported() -> Self {
        Self::V2025_10
    }

    /// Returns all supported stable versions in chronological order.
    #[must_use]
    pub fn supported_versions() -> Vec<Self> {
        Self::STABLE
            .into_iter()
            .filter(Self::is_supported)
            .collect()
    }

    /// Returns `true` if this is a named stable version.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Unstable | Self::Custom(_))
    }

    /// Returns `true` if this version is within Shopify's support window.
    ///
    /// `Unstable` is always considered supported.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !self.is_deprecated()
    }

    /// Returns `true` if this version is older than
    /// [`minimum_supported`](Self::minimum_supported).
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        *self < Self::minimum_supported()
    }

    /// Returns the version string used in API paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::V2024_10 => "2024-10",
            Self::V2025_01 => "2025-01",
            Self::V2025_04 => "2025-04",
            Self::V2025_07 => "2025-07",
            Self::V2025_10 => "2025-10",
            Self::V2026_01 => "2026-01",
            Self::V2026_04 => "2026-04",
            Self::V2026_07 => "2026-07",
            Self::V2026_10 => "2026-10",
            Self::Unstable => "unstable",
            Self::Custom(s) => s,
        }
    }

    fn is_valid_version_format(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };

        year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && matches!(month, "01" | "04" | "07" | "10")
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unstable, Self::Unstable) => Ordering::Equal,
            (Self::Unstable, _) => Ordering::Greater,
            (_, Self::Unstable) => Ordering::Less,
            // `YYYY-MM` strings sort chronologically
            _ => self
                .as_str()
                .cmp(other.as_str())
                .then_with(|| other.is_stable().cmp(&self.is_stable())),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if s == "unstable" {
            return Ok(Self::Unstable);
        }
        if let Some(known) = Self::STABLE.into_iter().find(|v| v.as_str() == s) {
            return Ok(known);
        }
        if Self::is_valid_version_format(&s) {
            return Ok(Self::Custom(s));
        }
        Err(ConfigError::InvalidApiVersion { version: s })
    }
}
