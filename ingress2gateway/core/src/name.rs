/// The name used for routes and listeners that match every host.
pub const ALL_HOSTS: &str = "all-hosts";

/// Derives a DNS-label-safe name from a hostname.
///
/// Every run of characters outside `[a-zA-Z0-9]` collapses into a single `-`
/// and a leading separator is dropped, so `*.example.com` becomes
/// `example-com`. The empty host maps to [`ALL_HOSTS`].
pub fn name_from_host(host: &str) -> String {
    if host.is_empty() {
        return ALL_HOSTS.to_string();
    }

    let mut name = String::with_capacity(host.len());
    let mut in_separator = false;
    for c in host.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
            in_separator = false;
        } else if !in_separator {
            // A separator is only kept once something precedes it.
            if !name.is_empty() {
                name.push('-');
            }
            in_separator = true;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo.bar.com", "foo-bar-com")]
    #[case("", "all-hosts")]
    #[case("-abc.de", "abc-de")]
    #[case("*.example.com", "example-com")]
    #[case("a..b", "a-b")]
    #[case("trailing.", "trailing-")]
    #[case("UPPER.Case", "UPPER-Case")]
    fn sanitizes(#[case] host: &str, #[case] expected: &str) {
        assert_eq!(name_from_host(host), expected, "{host:?}");
    }

    #[test]
    fn separators_only() {
        // Nothing survives sanitization, but the host was not empty.
        assert_eq!(name_from_host("*."), "");
    }
}
