//! Helper macro for port error enums.
//!
//! Each variant gets a snake_case constructor taking `impl Into<_>` fields.
//! A variant may be tagged `; transient` (retrying later may succeed) or
//! `; not_found` (the requested key is absent); the tags back the generated
//! `is_transient` and `is_not_found` predicates.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@tagged transient transient) => { true };
    (@tagged not_found not_found) => { true };
    (@tagged $wanted:ident $($tag:ident)?) => { false };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $message:expr $(; $tag:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Whether retrying the same call later may succeed.
            pub fn is_transient(&self) -> bool {
                match self {
                    $( Self::$variant { .. } => define_port_error!(@tagged transient $($tag)?), )*
                }
            }

            /// Whether the failure concerns a missing record rather than the
            /// backing system.
            pub fn is_not_found(&self) -> bool {
                match self {
                    $( Self::$variant { .. } => define_port_error!(@tagged not_found $($tag)?), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
