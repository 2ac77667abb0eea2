//! Column plan: which setter (if any) receives each column of one result
//! set. Computed once per result set, applied to every row.

use sqlmap_core::errors::BindError;

use super::descriptor::{FieldBinding, Record, RecordDescriptor};
use crate::result_set::{Cell, ResultSet};

pub(crate) struct ColumnPlan<'a, T: 'static> {
    /// One slot per column; `None` sends the column to the discard sink.
    slots: Vec<Option<&'static FieldBinding<T>>>,
    columns: &'a [String],
}

impl<'a, T: Record> ColumnPlan<'a, T> {
    pub(crate) fn build(result_set: &'a ResultSet) -> Result<Self, BindError> {
        let descriptor: &'static RecordDescriptor<T> = T::descriptor();
        descriptor.check()?;

        let columns = result_set.columns();
        let slots: Vec<_> = columns.iter().map(|c| descriptor.field_for(c)).collect();
        let discarded = slots.iter().filter(|s| s.is_none()).count();
        if discarded > 0 {
            tracing::trace!(
                record = descriptor.type_name(),
                discarded,
                "columns without a bound field discarded"
            );
        }
        Ok(Self { slots, columns })
    }

    /// Bind one row into a fresh record.
    pub(crate) fn bind_row(&self, row: &[Cell]) -> Result<T, BindError> {
        let mut record = T::default();
        for ((slot, cell), column) in self.slots.iter().zip(row).zip(self.columns) {
            let Some(binding) = slot else {
                continue;
            };
            (binding.set)(&mut record, cell.as_deref()).map_err(|message| BindError::Scan {
                column: column.clone(),
                field: binding.field.to_string(),
                message,
            })?;
        }
        Ok(record)
    }
}
