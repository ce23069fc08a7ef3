use core::fmt;

use crate::grammar::{is_identifier_list, is_pre_release};
use crate::{try_encode, Version, VersionError};

fn check_pre_release(pre: &str) -> Result<(), VersionError> {
    if pre.is_empty() || is_pre_release(pre) {
        Ok(())
    } else {
        Err(VersionError::InvalidPreRelease(pre.to_string()))
    }
}

fn check_build_metadata(rev: &str) -> Result<(), VersionError> {
    if rev.is_empty() || is_identifier_list(rev) {
        Ok(())
    } else {
        Err(VersionError::InvalidBuildMetadata(rev.to_string()))
    }
}

impl<'a> Version<'a> {
    /// A final release with no build metadata.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release: "",
            rev: "",
        }
    }

    pub const fn with_pre_release(self, pre_release: &'a str) -> Self {
        Version {
            pre_release,
            ..self
        }
    }

    pub const fn with_rev(self, rev: &'a str) -> Self {
        Version { rev, ..self }
    }

    /// Checks the range of each component and the grammar of the labels.
    pub fn validate(&self) -> Result<(), VersionError> {
        check_pre_release(self.pre_release)?;
        check_build_metadata(self.rev)?;
        try_encode(self.major.into(), self.minor.into(), self.patch.into())?;
        Ok(())
    }

    /// The integer encoding of the major, minor and patch components.
    pub fn encoded(&self) -> Result<u32, VersionError> {
        try_encode(self.major.into(), self.minor.into(), self.patch.into())
    }

    /// The versioned module name, `v{MAJOR}_{MINOR}`.
    pub fn namespace(&self) -> String {
        format!("v{}_{}", self.major, self.minor)
    }

    /// Builds sharing a major and minor version share a namespace and may
    /// replace one another at link time; any other pair must stay apart.
    pub fn is_link_compatible(&self, other: &Version<'_>) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// Converts to a [semver::Version], for precedence comparisons that take
    /// the pre-release label into account.
    pub fn to_semver(&self) -> Result<semver::Version, VersionError> {
        self.validate()?;
        parse(&self.to_string())
    }
}

impl fmt::Display for Version<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "-{}", self.pre_release)?;
        }
        if !self.rev.is_empty() {
            write!(f, "+{}", self.rev)?;
        }
        Ok(())
    }
}

pub(crate) fn parse(s: &str) -> Result<semver::Version, VersionError> {
    let v = semver::Version::parse(s)?;
    check_pre_release(v.pre.as_str())?;
    check_build_metadata(v.build.as_str())?;
    try_encode(v.major, v.minor, v.patch)?;
    Ok(v)
}
