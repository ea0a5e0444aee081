//! Parser for the build-info `key: value` text file.
//!
//! A trivial key-prefix scan: each line maps onto one `BuildInformation`
//! field; unknown keys and lines without a colon are ignored.

use crate::model::BuildInformation;

/// Parse build information from the text of a build-info file.
pub fn parse_build_info(text: &str) -> BuildInformation {
    let mut build_info = BuildInformation::default();

    for line in text.lines() {
        let Some(value) = line_value(line) else {
            continue;
        };
        // Longer prefixes first: `version.release` must win over `id`-style
        // bare keys, matching how the dump tool orders its checks.
        if line.starts_with("fingerprint") {
            build_info.fingerprint = Some(value);
        } else if line.starts_with("brand") {
            build_info.brand = Some(value);
        } else if line.starts_with("product") {
            build_info.product = Some(value);
        } else if line.starts_with("device") {
            build_info.device = Some(value);
        } else if line.starts_with("version.release") {
            build_info.version_release = Some(value);
        } else if line.starts_with("id") {
            build_info.id = Some(value);
        } else if line.starts_with("version.incremental") {
            build_info.version_incremental = Some(value);
        } else if line.starts_with("type") {
            build_info.build_type = Some(value);
        } else if line.starts_with("tags") {
            build_info.tags = Some(value);
        } else if line.starts_with("sdk") {
            build_info.sdk = Some(value);
        } else if line.starts_with("platform minor version") {
            build_info.platform_minor = Some(value);
        } else if line.starts_with("codename") {
            build_info.codename = Some(value);
        }
    }

    build_info
}

/// Value after the first colon, trimmed; `None` when the line has no colon.
fn line_value(line: &str) -> Option<String> {
    line.split_once(':').map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_keys_onto_fields() {
        let text = "fingerprint: google/car/emulator:userdebug\n\
                    brand: google\n\
                    product: car_emulator\n\
                    device: emulator_car64_x86_64\n\
                    version.release: 14\n\
                    id: UD1A.230803.022\n\
                    version.incremental: 10819197\n\
                    type: userdebug\n\
                    tags: dev-keys\n\
                    sdk: 34\n\
                    platform minor version: 0\n\
                    codename: REL\n";

        let build_info = parse_build_info(text);
        assert_eq!(
            build_info.fingerprint.as_deref(),
            Some("google/car/emulator:userdebug")
        );
        assert_eq!(build_info.brand.as_deref(), Some("google"));
        assert_eq!(build_info.version_release.as_deref(), Some("14"));
        assert_eq!(build_info.id.as_deref(), Some("UD1A.230803.022"));
        assert_eq!(build_info.version_incremental.as_deref(), Some("10819197"));
        assert_eq!(build_info.build_type.as_deref(), Some("userdebug"));
        assert_eq!(build_info.platform_minor.as_deref(), Some("0"));
        assert_eq!(build_info.codename.as_deref(), Some("REL"));
    }

    #[test]
    fn ignores_unknown_keys_and_lines_without_colon() {
        let text = "unknown_key: value\nno colon here\nbrand: acme\n";
        let build_info = parse_build_info(text);
        assert_eq!(build_info.brand.as_deref(), Some("acme"));
        assert!(build_info.fingerprint.is_none());
        assert!(build_info.device.is_none());
    }

    #[test]
    fn value_keeps_embedded_colons_out_but_trims_whitespace() {
        // Only the first colon splits key from value
        let build_info = parse_build_info("brand:   spaced value  \n");
        assert_eq!(build_info.brand.as_deref(), Some("spaced value"));
    }
}
