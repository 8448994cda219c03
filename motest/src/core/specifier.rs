//! Classification of raw import specifiers.

/// Scheme prefix for package-alias imports (`mo:<alias>/<subpath>`).
pub const PACKAGE_SCHEME: &str = "mo:";

/// A raw import specifier classified by addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
    /// `mo:<alias>/<subpath>`; `subpath` is empty for `mo:<alias>`.
    Package { alias: &'a str, subpath: &'a str },
    /// Another URI scheme (`ic:`, `canister:`). Names an actor, not a source file.
    External { scheme: &'a str },
    /// Path relative to the importing module's directory.
    Relative(&'a str),
}

impl<'a> Specifier<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if let Some(rest) = raw.strip_prefix(PACKAGE_SCHEME) {
            let (alias, subpath) = rest.split_once('/').unwrap_or((rest, ""));
            return Specifier::Package { alias, subpath };
        }
        if let Some((scheme, _)) = raw.split_once(':')
            && !scheme.is_empty()
            && scheme.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Specifier::External { scheme };
        }
        Specifier::Relative(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_alias_with_nested_subpath() {
        assert_eq!(
            Specifier::parse("mo:base/Iter/Range"),
            Specifier::Package {
                alias: "base",
                subpath: "Iter/Range"
            }
        );
    }

    #[test]
    fn parses_bare_package_alias() {
        assert_eq!(
            Specifier::parse("mo:matchers"),
            Specifier::Package {
                alias: "matchers",
                subpath: ""
            }
        );
    }

    #[test]
    fn other_schemes_are_external() {
        assert_eq!(
            Specifier::parse("canister:ledger"),
            Specifier::External { scheme: "canister" }
        );
        assert_eq!(
            Specifier::parse("ic:aaaaa-aa"),
            Specifier::External { scheme: "ic" }
        );
    }

    #[test]
    fn plain_paths_are_relative() {
        assert_eq!(Specifier::parse("../src/lib"), Specifier::Relative("../src/lib"));
        assert_eq!(Specifier::parse("Utils"), Specifier::Relative("Utils"));
    }
}
