//! Node-definition macros.
//!
//! Schema crates describe their node kinds declaratively and get the
//! runtime wiring generated: the bookkeeping field, the [`TreeNode`]
//! reflection impl, the decoder impls, a `#[must_use]` constructor, and
//! `Default`. [`tree_nodes!`] declares concrete kinds; [`tree_kinds!`]
//! declares the refinement enums that group them, with kind-directed
//! decoding that tries each variant in declaration order.
//!
//! A kind prefixed with `[erroneous]` is an error-recovery placeholder:
//! its constructor marks the node erroneous from birth, so it can carry
//! a source location through recovery but can never pass the
//! well-formedness check.
//!
//! [`TreeNode`]: crate::node::TreeNode

/// Declares one concrete node kind.
#[macro_export]
macro_rules! tree_node {
    // The marker arm matches the literal `[erroneous]` token; keeping it
    // out of the main matcher avoids an ambiguous optional group in front
    // of the `vis` fragment.
    (
        $(#[$outer:meta])*
        [erroneous]
        $vis:vis struct $name:ident { $($fields:tt)* }
    ) => {
        $crate::tree_node! {
            @node erroneous
            $(#[$outer])*
            $vis struct $name { $($fields)* }
        }
    };

    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident { $($fields:tt)* }
    ) => {
        $crate::tree_node! {
            @node regular
            $(#[$outer])*
            $vis struct $name { $($fields)* }
        }
    };

    (
        @node $kind:ident
        $(#[$outer:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $vis struct $name {
            pub data: $crate::node::NodeData,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }

        impl $name {
            #[must_use]
            pub fn new( $( $field_name : $field_ty ),* ) -> Self {
                $name {
                    data: $crate::tree_node!(@data $kind),
                    $( $field_name, )*
                }
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                $name {
                    data: $crate::tree_node!(@data $kind),
                    $( $field_name: ::core::default::Default::default(), )*
                }
            }
        }

        impl $crate::node::TreeNode for $name {
            fn kind_name(&self) -> &'static str {
                stringify!($name)
            }

            fn data(&self) -> &$crate::node::NodeData {
                &self.data
            }

            fn data_mut(&mut self) -> &mut $crate::node::NodeData {
                &mut self.data
            }

            fn fields(&self) -> Vec<(&'static str, &dyn $crate::edge::TreeField)> {
                vec![
                    $( (
                        stringify!($field_name),
                        &self.$field_name as &dyn $crate::edge::TreeField,
                    ), )*
                ]
            }
        }

        impl $crate::codec::DecodeNode for $name {
            fn decode_node(
                kind: &str,
                map: &$crate::codec::Value,
                ctx: &$crate::codec::DecodeContext<'_>,
            ) -> Result<Option<Self>, $crate::errors::FormatError> {
                if kind != stringify!($name) {
                    return Ok(None);
                }
                Ok(Some($name {
                    data: $crate::tree_node!(
                        @decoded $kind $crate::codec::decode_node_data(map, ctx)?
                    ),
                    $(
                        // Absent fields decode to their unset state, so
                        // older serializations stay readable after a
                        // schema gains a field.
                        $field_name: match map.get(stringify!($field_name)) {
                            Some(value) => $crate::codec::Decode::decode_field(value, ctx)?,
                            None => ::core::default::Default::default(),
                        },
                    )*
                }))
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_field(
                value: &$crate::codec::Value,
                ctx: &$crate::codec::DecodeContext<'_>,
            ) -> Result<Self, $crate::errors::FormatError> {
                $crate::codec::decode_kind_dispatch(value, ctx)
            }
        }
    };

    (@data erroneous) => {
        $crate::node::NodeData::new_erroneous()
    };

    (@data regular) => {
        $crate::node::NodeData::new()
    };

    // An error-recovery kind is erroneous from birth, even when the
    // serialized map carries no marker.
    (@decoded erroneous $data:expr) => {{
        let mut data = $data;
        data.erroneous = true;
        data
    }};

    (@decoded regular $data:expr) => {
        $data
    };
}

/// Declares a block of concrete node kinds.
#[macro_export]
macro_rules! tree_nodes {
    () => {};

    (
        $(#[$outer:meta])*
        [erroneous]
        $vis:vis struct $name:ident { $($fields:tt)* }
        $($rest:tt)*
    ) => {
        $crate::tree_node! {
            $(#[$outer])*
            [erroneous]
            $vis struct $name { $($fields)* }
        }
        $crate::tree_nodes! { $($rest)* }
    };

    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident { $($fields:tt)* }
        $($rest:tt)*
    ) => {
        $crate::tree_node! {
            $(#[$outer])*
            $vis struct $name { $($fields)* }
        }
        $crate::tree_nodes! { $($rest)* }
    };
}

/// Declares one refinement enum grouping more specific kinds.
///
/// The enum has no identity of its own; reflection and decoding delegate
/// to whichever variant is held. `From` impls are generated per variant
/// so construction sites can stay terse.
#[macro_export]
macro_rules! tree_kind {
    (
        $(#[$outer:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident ( $arm_ty:ty )
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm($arm_ty),
            )*
        }

        impl $crate::node::TreeNode for $name {
            fn kind_name(&self) -> &'static str {
                match self {
                    $( $name::$arm(node) => $crate::node::TreeNode::kind_name(node), )*
                }
            }

            fn data(&self) -> &$crate::node::NodeData {
                match self {
                    $( $name::$arm(node) => $crate::node::TreeNode::data(node), )*
                }
            }

            fn data_mut(&mut self) -> &mut $crate::node::NodeData {
                match self {
                    $( $name::$arm(node) => $crate::node::TreeNode::data_mut(node), )*
                }
            }

            fn fields(&self) -> Vec<(&'static str, &dyn $crate::edge::TreeField)> {
                match self {
                    $( $name::$arm(node) => $crate::node::TreeNode::fields(node), )*
                }
            }
        }

        $(
            impl ::core::convert::From<$arm_ty> for $name {
                fn from(node: $arm_ty) -> Self {
                    $name::$arm(node)
                }
            }
        )*

        impl $crate::codec::DecodeNode for $name {
            fn decode_node(
                kind: &str,
                map: &$crate::codec::Value,
                ctx: &$crate::codec::DecodeContext<'_>,
            ) -> Result<Option<Self>, $crate::errors::FormatError> {
                $(
                    if let Some(node) =
                        <$arm_ty as $crate::codec::DecodeNode>::decode_node(kind, map, ctx)?
                    {
                        return Ok(Some($name::$arm(node)));
                    }
                )*
                Ok(None)
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_field(
                value: &$crate::codec::Value,
                ctx: &$crate::codec::DecodeContext<'_>,
            ) -> Result<Self, $crate::errors::FormatError> {
                $crate::codec::decode_kind_dispatch(value, ctx)
            }
        }
    };
}

/// Declares a block of refinement enums.
#[macro_export]
macro_rules! tree_kinds {
    (
        $(
            $(#[$outer:meta])*
            $vis:vis enum $name:ident { $($arms:tt)* }
        )+
    ) => {
        $(
            $crate::tree_kind! {
                $(#[$outer])*
                $vis enum $name { $($arms)* }
            }
        )+
    };
}
