//! Reference category adaptation and ownership inference.

use std::fmt;

use crate::{RefMarker, RefSuffix};

/// Operator to prefix to a variable to move it between reference categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefTransform {
    /// No adaptation needed.
    Identity,
    /// Take the address (`&`).
    AddressOf,
    /// Dereference (`*`).
    Deref,
}

impl RefTransform {
    pub fn as_str(self) -> &'static str {
        match self {
            RefTransform::Identity => "",
            RefTransform::AddressOf => "&",
            RefTransform::Deref => "*",
        }
    }

    /// Prefix the operator to an expression.
    pub fn apply(self, var: &str) -> String {
        format!("{}{}", self.as_str(), var)
    }
}

impl fmt::Display for RefTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute how to adapt a value from `src` to `dst` reference category.
///
/// The common prefix is stripped first; what remains on each side is
/// classified by its first marker (value when empty).
///
/// ```
/// use gluegen_core::{RefSuffix, RefTransform, ref_transform};
///
/// let r = |s| RefSuffix::parse(s).unwrap();
/// assert_eq!(ref_transform(&r("&"), &r("*")), RefTransform::AddressOf);
/// assert_eq!(ref_transform(&r("*"), &r("")), RefTransform::Deref);
/// assert_eq!(ref_transform(&r("&&"), &r("&")), RefTransform::Identity);
/// ```
pub fn ref_transform(src: &RefSuffix, dst: &RefSuffix) -> RefTransform {
    let src = src.markers();
    let dst = dst.markers();
    let common = src.iter().zip(dst).take_while(|(a, b)| a == b).count();

    match (src.get(common), dst.get(common)) {
        (Some(RefMarker::Ref), Some(RefMarker::Ptr)) => RefTransform::AddressOf,
        (Some(RefMarker::Ref), _) => RefTransform::Identity,
        (Some(RefMarker::Ptr), Some(RefMarker::Ptr)) => RefTransform::Identity,
        (Some(RefMarker::Ptr), _) => RefTransform::Deref,
        (None, Some(RefMarker::Ptr)) => RefTransform::AddressOf,
        (None, _) => RefTransform::Identity,
    }
}

/// Expression adapting `var` from `from` to `to` reference category.
pub fn transform_var(var: &str, from: &RefSuffix, to: &RefSuffix) -> String {
    ref_transform(from, to).apply(var)
}

/// Who is responsible for a value's lifetime once it crosses into the host
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipPolicy {
    /// The runtime only borrows the value.
    NonOwning,
    /// The runtime receives its own copy.
    Copy,
    /// The runtime takes ownership and must destroy the value.
    Owning,
}

impl OwnershipPolicy {
    /// Every policy, in the order of the emitted enumeration.
    pub const ALL: [OwnershipPolicy; 3] = [
        OwnershipPolicy::NonOwning,
        OwnershipPolicy::Copy,
        OwnershipPolicy::Owning,
    ];

    /// Policy for a value returned with the given reference suffix.
    ///
    /// Values are copied; pointers and references are only borrowed.
    /// Constructor results do not go through here, they are always `Owning`.
    pub fn for_return(ref_suffix: &RefSuffix) -> Self {
        if ref_suffix.is_empty() {
            OwnershipPolicy::Copy
        } else {
            OwnershipPolicy::NonOwning
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OwnershipPolicy::NonOwning => "NonOwning",
            OwnershipPolicy::Copy => "Copy",
            OwnershipPolicy::Owning => "Owning",
        }
    }
}

impl fmt::Display for OwnershipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
