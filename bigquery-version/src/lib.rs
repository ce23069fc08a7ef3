//! Version information for the BigQuery client library.
//!
//! The version is available as a single comparable integer ([version]) and as
//! a [semver](https://semver.org) string ([version_string]). Both are fixed when
//! the crate is built: the major, minor, patch and pre-release components come
//! from the Cargo package version, and the build metadata suffix comes from the
//! build script (`GIT_REVISION`).
//!
//! Every public item lives in a module named after the major and minor
//! version, `v{MAJOR}_{MINOR}`, and is re-exported from the crate root.
//! Callers should use the short paths (`bigquery_version::version()`); the
//! qualified paths exist for code that has to pin a specific release. Patch
//! releases share a module, they are interchangeable at link time.
//!
//! The integer encoding is `patch + 100 * (minor + 100 * major)`, so minor and
//! patch must both stay below 100. This is checked while building, never at
//! runtime:
//!
//! ```compile_fail
//! bigquery_version::generate_version_consts!(major: 2, minor: 100, patch: 0, pre_release: "");
//! ```
//!
//! ```compile_fail
//! bigquery_version::generate_version_consts!(major: 2, minor: 0, patch: 100, pre_release: "");
//! ```
//!
//! ```compile_fail
//! const _: u32 = bigquery_version::encode(1, 0, 100);
//! ```
//!
//! Pre-release labels follow the semver grammar, so numeric identifiers with
//! a leading zero are refused as well:
//!
//! ```compile_fail
//! bigquery_version::generate_version_consts!(major: 1, minor: 0, patch: 0, pre_release: "rc.01");
//! ```
//!
//! while the largest valid components are accepted:
//!
//! ```
//! bigquery_version::generate_version_consts!(major: 2, minor: 99, patch: 99, pre_release: "rc1");
//! assert_eq!(VERSION, 29999);
//! assert_eq!(VERSION_CORE, "2.99.99-rc1");
//! assert_eq!(NAMESPACE, "v2_99");
//! ```

extern crate static_assertions as sa;

pub use bigquery_version_macros::{generate_version_consts, inline_namespace};

// Also compiled into build.rs, which uses the sanitizer.
#[allow(dead_code)]
mod grammar;
mod version;

inline_namespace! {
    use std::sync::OnceLock;

    use log::debug;

    pub mod meta {
        //! Constants generated from the Cargo package version of this crate.
        bigquery_version_macros::generate_version_consts!();
    }

    /// Exclusive upper bound of the minor component.
    pub const MAX_MINOR_VERSIONS: u32 = 100;

    /// Exclusive upper bound of the patch component.
    pub const MAX_PATCH_VERSIONS: u32 = 100;

    /// The BigQuery client library major version.
    ///
    /// See <https://semver.org/spec/v2.0.0.html> for details.
    pub const fn version_major() -> u32 {
        meta::VERSION_MAJOR
    }

    /// The BigQuery client library minor version.
    ///
    /// See <https://semver.org/spec/v2.0.0.html> for details.
    pub const fn version_minor() -> u32 {
        meta::VERSION_MINOR
    }

    /// The BigQuery client library patch version.
    ///
    /// See <https://semver.org/spec/v2.0.0.html> for details.
    pub const fn version_patch() -> u32 {
        meta::VERSION_PATCH
    }

    /// The BigQuery client library pre-release label, empty for a release.
    ///
    /// See <https://semver.org/spec/v2.0.0.html> for details.
    pub const fn version_pre_release() -> &'static str {
        meta::VERSION_PRE_RELEASE
    }

    /// A single integer representing the major, minor and patch version.
    pub const fn version() -> u32 {
        meta::VERSION
    }

    /// The version as a string, in `MAJOR.MINOR.PATCH[-PRE][+REV]` format.
    pub fn version_string() -> &'static str {
        static VERSION_STRING: OnceLock<String> = OnceLock::new();
        VERSION_STRING.get_or_init(|| {
            let s = VERSION.to_string();
            debug!("bigquery-version {} in namespace {}", s, NAMESPACE);
            s
        })
    }

    /// Name of the versioned module holding this crate's public items.
    pub const NAMESPACE: &str = meta::NAMESPACE;

    /// The version of this build.
    pub const VERSION: Version<'static> = Version {
        major: meta::VERSION_MAJOR,
        minor: meta::VERSION_MINOR,
        patch: meta::VERSION_PATCH,
        pre_release: meta::VERSION_PRE_RELEASE,
        rev: env!("GIT_REVISION"),
    };

    /// A semantic version plus optional build metadata.
    ///
    /// Displays as `MAJOR.MINOR.PATCH[-PRE][+REV]`. Equality includes the
    /// build metadata; use [Version::is_link_compatible] to ask whether two
    /// builds share a namespace.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Version<'a> {
        pub major: u32,
        pub minor: u32,
        pub patch: u32,
        pub pre_release: &'a str,
        pub rev: &'a str,
    }

    #[derive(Debug, thiserror::Error)]
    pub enum VersionError {
        #[error("version minor {minor} must be < {}", MAX_MINOR_VERSIONS)]
        MinorOutOfRange { minor: u64 },
        #[error("version patch {patch} must be < {}", MAX_PATCH_VERSIONS)]
        PatchOutOfRange { patch: u64 },
        #[error("version major {major} does not fit the u32 encoding")]
        MajorOutOfRange { major: u64 },
        #[error("pre-release label {0:?} must be dot-separated [0-9A-Za-z] identifiers, numbers without leading zeros")]
        InvalidPreRelease(String),
        #[error("build metadata {0:?} must be dot-separated [0-9A-Za-z] identifiers")]
        InvalidBuildMetadata(String),
        #[error("malformed version string: {0}")]
        Parse(#[from] semver::Error),
    }

    /// Encodes a version as `patch + 100 * (minor + 100 * major)`.
    ///
    /// Panics when minor or patch is out of range or the result overflows,
    /// which fails the build when evaluated in a const context.
    pub const fn encode(major: u32, minor: u32, patch: u32) -> u32 {
        assert!(minor < MAX_MINOR_VERSIONS, "version minor must be < MAX_MINOR_VERSIONS");
        assert!(patch < MAX_PATCH_VERSIONS, "version patch must be < MAX_PATCH_VERSIONS");
        let encoded = (major as u64 * MAX_MINOR_VERSIONS as u64 + minor as u64)
            * MAX_PATCH_VERSIONS as u64
            + patch as u64;
        assert!(encoded <= u32::MAX as u64, "version major does not fit the u32 encoding");
        encoded as u32
    }

    /// The checked form of [encode], for components that are not build
    /// configuration.
    pub fn try_encode(major: u64, minor: u64, patch: u64) -> Result<u32, VersionError> {
        if minor >= MAX_MINOR_VERSIONS as u64 {
            return Err(VersionError::MinorOutOfRange { minor });
        }
        if patch >= MAX_PATCH_VERSIONS as u64 {
            return Err(VersionError::PatchOutOfRange { patch });
        }
        major
            .checked_mul(MAX_MINOR_VERSIONS as u64)
            .and_then(|v| v.checked_add(minor))
            .and_then(|v| v.checked_mul(MAX_PATCH_VERSIONS as u64))
            .and_then(|v| v.checked_add(patch))
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(VersionError::MajorOutOfRange { major })
    }

    /// Splits an encoded version back into `(major, minor, patch)`.
    pub const fn decode(encoded: u32) -> (u32, u32, u32) {
        (
            encoded / (MAX_MINOR_VERSIONS * MAX_PATCH_VERSIONS),
            encoded / MAX_PATCH_VERSIONS % MAX_MINOR_VERSIONS,
            encoded % MAX_PATCH_VERSIONS,
        )
    }

    /// Parses the version string of some build, accepting exactly the strings
    /// [version_string] can produce for a valid configuration.
    pub fn parse_version(s: &str) -> Result<semver::Version, VersionError> {
        crate::version::parse(s)
    }
}

sa::const_assert!(meta::VERSION_MINOR < MAX_MINOR_VERSIONS);
sa::const_assert!(meta::VERSION_PATCH < MAX_PATCH_VERSIONS);
sa::const_assert_eq!(
    meta::VERSION,
    encode(meta::VERSION_MAJOR, meta::VERSION_MINOR, meta::VERSION_PATCH)
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accessors_follow_the_package_version() {
        assert_eq!(
            version_major().to_string(),
            env!("CARGO_PKG_VERSION_MAJOR")
        );
        assert_eq!(
            version_minor().to_string(),
            env!("CARGO_PKG_VERSION_MINOR")
        );
        assert_eq!(
            version_patch().to_string(),
            env!("CARGO_PKG_VERSION_PATCH")
        );
        assert_eq!(version_pre_release(), env!("CARGO_PKG_VERSION_PRE"));
    }

    #[test]
    fn version_is_the_encoded_triple() {
        assert_eq!(
            version(),
            version_patch() + 100 * (version_minor() + 100 * version_major())
        );
        assert_eq!(decode(version()), (version_major(), version_minor(), version_patch()));
    }

    #[test]
    fn encode_examples() {
        assert_eq!(encode(2, 37, 0), 23700);
        assert_eq!(encode(1, 5, 12), 10512);
        assert_eq!(encode(0, 0, 0), 0);
        assert_eq!(decode(23700), (2, 37, 0));
        assert_eq!(decode(10512), (1, 5, 12));
    }

    #[test]
    fn encoding_is_injective_over_the_valid_range() {
        for major in [0, 1, 2, 17, 429_495] {
            let mut seen = std::collections::HashSet::new();
            for minor in 0..MAX_MINOR_VERSIONS {
                for patch in 0..MAX_PATCH_VERSIONS {
                    let encoded = encode(major, minor, patch);
                    assert!(seen.insert(encoded));
                    assert_eq!(decode(encoded), (major, minor, patch));
                }
            }
        }
    }

    #[test]
    fn encoding_preserves_release_order() {
        assert!(encode(1, 99, 99) < encode(2, 0, 0));
        assert!(encode(2, 36, 99) < encode(2, 37, 0));
        assert!(encode(2, 37, 0) < encode(2, 37, 1));
    }

    #[test]
    #[should_panic(expected = "version minor must be < MAX_MINOR_VERSIONS")]
    fn encode_rejects_minor_at_runtime_too() {
        let minor = std::hint::black_box(100);
        encode(1, minor, 0);
    }

    #[test]
    fn try_encode_reports_the_offending_component() {
        assert!(matches!(
            try_encode(1, 100, 0),
            Err(VersionError::MinorOutOfRange { minor: 100 })
        ));
        assert!(matches!(
            try_encode(1, 0, 100),
            Err(VersionError::PatchOutOfRange { patch: 100 })
        ));
        assert!(matches!(
            try_encode(429_496, 99, 99),
            Err(VersionError::MajorOutOfRange { major: 429_496 })
        ));
        assert!(matches!(
            try_encode(u64::MAX, 0, 0),
            Err(VersionError::MajorOutOfRange { .. })
        ));
        assert_eq!(try_encode(429_496, 0, 0).unwrap(), 4_294_960_000);
        assert_eq!(try_encode(2, 37, 0).unwrap(), 23700);
    }

    #[test]
    fn errors_name_the_limit() {
        assert_eq!(
            VersionError::MinorOutOfRange { minor: 100 }.to_string(),
            "version minor 100 must be < 100"
        );
        assert_eq!(
            VersionError::PatchOutOfRange { patch: 123 }.to_string(),
            "version patch 123 must be < 100"
        );
    }

    #[test]
    fn namespace_excludes_patch() {
        assert_eq!(
            NAMESPACE,
            format!("v{}_{}", version_major(), version_minor())
        );
        assert_eq!(NAMESPACE, VERSION.namespace());
    }

    #[test]
    fn public_items_live_in_the_namespace() {
        let path = std::any::type_name::<Version<'static>>();
        assert!(path.contains(&format!("::{NAMESPACE}::")), "{path}");
        let path = std::any::type_name::<VersionError>();
        assert!(path.contains(&format!("::{NAMESPACE}::")), "{path}");
    }
}
