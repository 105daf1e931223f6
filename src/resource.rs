//! Resource kinds and display references shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of unattached network resources the tool knows how to reap.
///
/// The set is closed on purpose: operator selections arrive with free-form
/// kind strings, and anything that does not parse into this enum takes the
/// explicit unsupported branch in the deletion executor instead of falling
/// through silently.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An elastic IP address allocation with no instance or interface bound.
    Address,
    /// A network interface in the `available` state.
    Interface,
}

impl ResourceKind {
    /// Every supported kind, in canonical order.
    pub const ALL: [Self; 2] = [Self::Address, Self::Interface];

    /// Returns the canonical string form used in requests and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Interface => "interface",
        }
    }

    /// Parses a kind string from the deletion-request boundary.
    ///
    /// Returns `None` for unknown kinds; callers decide how to surface the
    /// unsupported branch.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "address" => Some(Self::Address),
            "interface" => Some(Self::Interface),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully qualified reference to one resource for operator display.
///
/// The kind is kept as a raw string so references to unsupported kinds can
/// still be rendered in failure lists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceRef {
    /// Region the resource lives in.
    pub region: String,
    /// Kind string as it appeared in the request.
    pub kind: String,
    /// Provider identifier of the resource.
    pub identifier: String,
}

impl ResourceRef {
    /// Builds a reference from its three parts.
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        kind: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.region, self.kind, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("address", Some(ResourceKind::Address))]
    #[case("interface", Some(ResourceKind::Interface))]
    #[case("volume", None)]
    #[case("", None)]
    #[case("Address", None)]
    fn parse_accepts_only_canonical_kinds(
        #[case] input: &str,
        #[case] expected: Option<ResourceKind>,
    ) {
        assert_eq!(ResourceKind::parse(input), expected);
    }

    #[rstest]
    fn resource_ref_renders_display_triple() {
        let reference = ResourceRef::new("ap-northeast-2", "address", "eipalloc-1");
        assert_eq!(reference.to_string(), "ap-northeast-2:address:eipalloc-1");
    }

    #[rstest]
    fn kind_round_trips_through_its_string_form() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
        }
    }
}
