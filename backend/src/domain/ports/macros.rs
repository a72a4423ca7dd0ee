//! `define_port_error!` generates port error enums with snake_case
//! constructors whose parameters accept anything convertible into the field
//! type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
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
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
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
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum UploadPortError {
            Offline => "upload target offline",
            Io { message: String } => "io: {message}",
            Rejected { status: u16 } => "rejected with {status}",
            Throttled { message: String, status: u16 } => "throttled: {message} ({status})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(UploadPortError::offline(), UploadPortError::Offline);
        assert_eq!(UploadPortError::offline().to_string(), "upload target offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(UploadPortError::io("disk full").to_string(), "io: disk full");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(UploadPortError::rejected(413_u16).to_string(), "rejected with 413");
    }

    #[test]
    fn mixed_fields_follow_declaration_order() {
        let err = UploadPortError::throttled("slow down", 429_u16);
        assert_eq!(err.to_string(), "throttled: slow down (429)");
    }
}
