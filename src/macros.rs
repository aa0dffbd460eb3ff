//! # Macros Module
//!
//! Internal macros that stamp out per-type trait impls.

/// Implements the sealed `NativeType` trait for each `rust_type => DataType variant` pair.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_native_type {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl private::Sealed for $t {}
            impl NativeType for $t {
                const DATA_TYPE: $crate::DataType = $crate::DataType::$variant;
            }
        )+
    };
}

/// Implements `Array`, `PartialEq` and `From<Arc<ArrayData>>` for an array view that
/// stores its `Arc<ArrayData>` in a field named `data` and exposes `from_data`.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_array {
    ($name:ident $(<$g:ident : $bound:path>)?) => {
        impl$(<$g: $bound>)? $crate::traits::array::Array for $name$(<$g>)? {
            #[inline]
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #[inline]
            fn data(&self) -> &std::sync::Arc<$crate::structs::data::ArrayData> {
                &self.data
            }
        }

        impl$(<$g: $bound>)? PartialEq for $name$(<$g>)? {
            fn eq(&self, other: &Self) -> bool {
                $crate::equal::array_equal(self, other)
            }
        }

        impl$(<$g: $bound>)? From<std::sync::Arc<$crate::structs::data::ArrayData>> for $name$(<$g>)? {
            fn from(data: std::sync::Arc<$crate::structs::data::ArrayData>) -> Self {
                Self::from_data(data)
            }
        }
    };
}
