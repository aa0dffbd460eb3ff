//! # ArrayBuilder Trait Module
//!
//! Mutable, single-writer capability shared by every builder.
//!
//! A builder accumulates a validity bitmap, a length, a null count and its own
//! value buffers, and may own child builders for nested types. `finish_data`
//! hands the accumulated buffers over to new [`ArrayData`] without copying and
//! resets the builder so it can be reused.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::data::ArrayData;
use crate::traits::array::{ArrayRef, make_array};

pub trait ArrayBuilder: Any + Send + Sync + Debug {
    /// Logical type of the arrays this builder produces.
    fn data_type(&self) -> DataType;

    /// Number of slots appended so far.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn null_count(&self) -> usize;

    /// Slots that fit without reallocating.
    fn capacity(&self) -> usize;

    fn append_null(&mut self);

    /// Ensures room for `additional` more slots, growing to the next power of two.
    fn reserve(&mut self, additional: usize);

    /// Sets the slot capacity to `capacity`, but never below the minimum builder
    /// capacity. Shrinking below `len()` truncates.
    fn resize(&mut self, capacity: usize);

    /// Moves the accumulated buffers into new data and resets the builder.
    fn finish_data(&mut self) -> ArrayData;

    /// [`ArrayBuilder::finish_data`] wrapped in the matching array view.
    fn finish(&mut self) -> ArrayRef {
        make_array(Arc::new(self.finish_data()))
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_box_any(self: Box<Self>) -> Box<dyn Any>;
}

impl ArrayBuilder for Box<dyn ArrayBuilder> {
    fn data_type(&self) -> DataType {
        (**self).data_type()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn null_count(&self) -> usize {
        (**self).null_count()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn append_null(&mut self) {
        (**self).append_null()
    }

    fn reserve(&mut self, additional: usize) {
        (**self).reserve(additional)
    }

    fn resize(&mut self, capacity: usize) {
        (**self).resize(capacity)
    }

    fn finish_data(&mut self) -> ArrayData {
        (**self).finish_data()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    fn into_box_any(self: Box<Self>) -> Box<dyn Any> {
        (*self).into_box_any()
    }
}
