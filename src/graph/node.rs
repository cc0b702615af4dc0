//! The node abstraction stored by [`Dag`](super::Dag).

use std::fmt;
use std::hash::Hash;

/// Anything that can be stored in a [`Dag`](super::Dag).
///
/// The graph only ever asks a node for its identifier. Any other data the
/// node carries is opaque to the graph and is handed back untouched.
///
/// # Example
///
/// ```rust
/// use assetdeps::graph::Node;
///
/// struct Stylesheet {
///     name: String,
///     bytes: usize,
/// }
///
/// impl Node for Stylesheet {
///     type Id = String;
///
///     fn id(&self) -> &String {
///         &self.name
///     }
/// }
///
/// let sheet = Stylesheet { name: "reset".into(), bytes: 512 };
/// assert_eq!(sheet.id(), "reset");
/// ```
pub trait Node {
    /// Unique, comparable identifier of the node.
    type Id: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    /// Returns the identifier the node is keyed by.
    fn id(&self) -> &Self::Id;
}

macro_rules! self_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                type Id = $ty;

                fn id(&self) -> &Self::Id {
                    self
                }
            }
        )*
    };
}

// Plain values are their own identifier.
self_identified!(String, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_identify_themselves() {
        assert_eq!(String::from("grid").id(), "grid");
        assert_eq!(*7_u32.id(), 7);
        assert_eq!(*42_usize.id(), 42);
    }
}
