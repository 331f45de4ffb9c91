//! Macro for declaring port error enums.

/// Declare a port error enum whose variants all carry named fields.
///
/// Each variant gets a `thiserror` message and a snake_case constructor that
/// takes every field as `impl Into<T>`, so adapters can pass `&str` or any
/// error message they already hold:
///
/// ```ignore
/// define_port_error! {
///     pub enum StoreError {
///         Query { message: String } => "query failed: {message}",
///     }
/// }
/// let err = StoreError::query("timeout");
/// ```
macro_rules! define_port_error {
    // Fold the field list into constructor parameters and initialisers.
    (@fold $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };
    (@fold $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fold
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),+ },
            )*
        }

        impl $name {
            $(
                define_port_error!(@fold $variant () () $($field : $ty,)+);
            )*
        }
    };
}

pub(crate) use define_port_error;
