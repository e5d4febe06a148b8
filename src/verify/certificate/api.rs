// ABOUTME: cert-manager API group/version selection from a detected release.
// ABOUTME: A lookup over parsed version ranges instead of string prefixes.

use std::fmt;

use crate::types::ComponentVersion;

/// API group/version pairs cert-manager has served Issuers and
/// Certificates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertManagerApi {
    /// `cert-manager.io/v1`, from v1.0.0.
    V1,
    /// `cert-manager.io/v1alpha2`, v0.11 through v0.16.
    V1Alpha2,
    /// `certmanager.k8s.io/v1alpha1`, before v0.11.
    V1Alpha1,
}

/// Lowest release serving each API, highest first.
const API_RANGES: &[(ComponentVersion, CertManagerApi)] = &[
    (ComponentVersion::new(1, 0, 0), CertManagerApi::V1),
    (ComponentVersion::new(0, 11, 0), CertManagerApi::V1Alpha2),
    (ComponentVersion::new(0, 0, 0), CertManagerApi::V1Alpha1),
];

impl CertManagerApi {
    /// Used when the release could not be determined.
    pub const FALLBACK: CertManagerApi = CertManagerApi::V1Alpha2;

    /// Pick the API for a detected version string such as an image tag.
    pub fn for_version(version: Option<&str>) -> Self {
        match version.map(str::parse::<ComponentVersion>) {
            Some(Ok(parsed)) => Self::for_release(parsed),
            _ => Self::FALLBACK,
        }
    }

    pub fn for_release(release: ComponentVersion) -> Self {
        API_RANGES
            .iter()
            .find(|(min, _)| release >= *min)
            .map(|(_, api)| *api)
            .unwrap_or(Self::FALLBACK)
    }

    pub fn group(&self) -> &'static str {
        match self {
            CertManagerApi::V1 | CertManagerApi::V1Alpha2 => "cert-manager.io",
            CertManagerApi::V1Alpha1 => "certmanager.k8s.io",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            CertManagerApi::V1 => "v1",
            CertManagerApi::V1Alpha2 => "v1alpha2",
            CertManagerApi::V1Alpha1 => "v1alpha1",
        }
    }
}

impl fmt::Display for CertManagerApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group(), self.version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_releases_use_v1() {
        assert_eq!(CertManagerApi::for_version(Some("v1.14.4")), CertManagerApi::V1);
        assert_eq!(CertManagerApi::for_version(Some("v1.0.0")), CertManagerApi::V1);
    }

    #[test]
    fn later_majors_use_v1() {
        assert_eq!(CertManagerApi::for_version(Some("v2.1.0")), CertManagerApi::V1);
    }

    #[test]
    fn pre_v1_releases_use_alpha_apis() {
        assert_eq!(
            CertManagerApi::for_version(Some("v0.16.1")),
            CertManagerApi::V1Alpha2
        );
        assert_eq!(
            CertManagerApi::for_version(Some("v0.11.0")),
            CertManagerApi::V1Alpha2
        );
        assert_eq!(
            CertManagerApi::for_version(Some("v0.10.1")),
            CertManagerApi::V1Alpha1
        );
    }

    #[test]
    fn unknown_versions_fall_back_to_legacy() {
        assert_eq!(CertManagerApi::for_version(None), CertManagerApi::V1Alpha2);
        assert_eq!(
            CertManagerApi::for_version(Some("latest")),
            CertManagerApi::V1Alpha2
        );
        assert_eq!(CertManagerApi::for_version(Some("")), CertManagerApi::V1Alpha2);
    }

    #[test]
    fn renders_api_version() {
        assert_eq!(CertManagerApi::V1.to_string(), "cert-manager.io/v1");
        assert_eq!(
            CertManagerApi::V1Alpha1.to_string(),
            "certmanager.k8s.io/v1alpha1"
        );
    }
}
