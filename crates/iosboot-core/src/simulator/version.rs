//! Ordering of dot-separated OS versions

use semver::Version;

/// Parse an OS version such as `17`, `17.2` or `v17.2.1`
///
/// Missing components are treated as zero so that `17.2` sorts between
/// `17.1.5` and `17.2.1`.
pub fn parse_os_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim().strip_prefix('v').unwrap_or(version_str.trim());
    let mut parts = cleaned.split('.').map(|p| p.parse::<u64>());

    let major = parts.next()?.ok()?;
    let minor = parts.next().transpose().ok()?.unwrap_or(0);
    let patch = parts.next().transpose().ok()?.unwrap_or(0);
    if parts.next().is_some() {
        return None;
    }
    Some(Version::new(major, minor, patch))
}

/// Highest version among `versions`; unparseable entries are ignored
pub fn newest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter_map(|v| parse_os_version(v).map(|parsed| (parsed, v)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v)
}
