use semver::Version;

/// True when `remote` is strictly newer than `current` under semantic-version
/// ordering.
///
/// An unparsable remote version is never newer. An unparsable or empty
/// installed version loses to any parsable remote version, so a plugin whose
/// installed version could not be determined still receives updates.
#[must_use]
pub fn is_newer(remote: &str, current: &str) -> bool {
    match (parse_lenient(remote), parse_lenient(current)) {
        (Some(remote), Some(current)) => remote > current,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Parse a version string, tolerating a `v` prefix and missing minor or
/// patch components ("2" and "2.1" read as "2.0.0" and "2.1.0").
#[must_use]
pub fn parse_lenient(input: &str) -> Option<Version> {
    let input = input.trim();
    let input = input.strip_prefix('v').unwrap_or(input);
    if input.is_empty() {
        return None;
    }
    if let Ok(version) = Version::parse(input) {
        return Some(version);
    }

    // Pad a bare "X" or "X.Y" core, keeping any pre-release/build suffix.
    let boundary = input.find(['-', '+']).unwrap_or(input.len());
    let (core, suffix) = input.split_at(boundary);

    let mut components = [0u64; 3];
    let mut count = 0;
    for part in core.split('.') {
        if count == components.len() {
            return None;
        }
        components[count] = part.parse().ok()?;
        count += 1;
    }

    let padded = format!(
        "{}.{}.{}{}",
        components[0], components[1], components[2], suffix
    );
    Version::parse(&padded).ok()
}
