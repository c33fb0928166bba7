use core::fmt;

/// Errors reported by [`OSAvlSet`](crate::OSAvlSet) and [`Navigator`](crate::Navigator).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// A structural invariant was found broken while restructuring the tree.
    ///
    /// Raised when a rotation is asked to pivot on a missing node, or when a parent does not
    /// actually own the child it is asked to replace. The operation that reported it must not
    /// be retried.
    InvalidStructure {
        /// The operation that detected the violation.
        context: &'static str,
    },
    /// An accessor was called on a navigator that is not positioned on a live node.
    InvalidNavigation {
        /// The accessor that was called.
        accessor: &'static str,
    },
}

impl Error {
    pub(crate) const fn structure(context: &'static str) -> Self {
        Self::InvalidStructure { context }
    }

    pub(crate) const fn navigation(accessor: &'static str) -> Self {
        Self::InvalidNavigation { accessor }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStructure { context } => write!(f, "invalid tree structure: {context}"),
            Self::InvalidNavigation { accessor } => {
                write!(f, "`{accessor}` - navigator points outside the tree")
            }
        }
    }
}

impl core::error::Error for Error {}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_operation() {
        let err = Error::structure("rotate_right: local root is inactive");
        assert_eq!(err.to_string(), "invalid tree structure: rotate_right: local root is inactive");

        let err = Error::navigation("Navigator::key");
        assert_eq!(err.to_string(), "`Navigator::key` - navigator points outside the tree");
    }
}
