use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the walker keeps track of the dataverses it still has to visit.
///
/// Both strategies visit the same containers and produce the same records in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Traversal {
    /// Descend with async recursion. Memory grows with the depth of the tree.
    #[default]
    Recursive,

    /// Keep pending dataverses on an explicit stack.
    Iterative,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_names() {
        assert_eq!(Traversal::default(), Traversal::Recursive);
        assert_eq!(Traversal::Iterative.to_string(), "iterative");
        assert_eq!(Traversal::from_str("recursive").unwrap(), Traversal::Recursive);
        let _ = Traversal::from_str("breadth-first").unwrap_err();
    }
}
