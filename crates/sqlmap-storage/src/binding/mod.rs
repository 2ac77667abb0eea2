//! Result binding: rows into typed records matched by binding name.
//!
//! Each record type carries a `RecordDescriptor` (see [`record!`](crate::record));
//! per result set a column plan maps every column to a setter or to the
//! discard sink, so columns the record does not declare are ignored.

pub mod column;
pub mod descriptor;
mod plan;

use std::sync::Arc;

use sqlmap_core::errors::BindError;

pub use column::FromColumn;
pub use descriptor::{FieldBinding, Record, RecordDescriptor, Setter};

use crate::result_set::ResultSet;
use plan::ColumnPlan;

/// One element of a record list: the record itself or an owning pointer
/// to it. `record!` implements this for the record type; `Box<T>` and
/// `Arc<T>` are covered here.
pub trait RecordSlot {
    type Record: Record;

    fn from_record(record: Self::Record) -> Self;
}

impl<T: Record> RecordSlot for Box<T> {
    type Record = T;

    fn from_record(record: T) -> Self {
        Box::new(record)
    }
}

impl<T: Record> RecordSlot for Arc<T> {
    type Record = T;

    fn from_record(record: T) -> Self {
        Arc::new(record)
    }
}

/// A growable list of records.
pub trait RecordList {
    type Item: Record;

    /// Append every record, in order.
    fn extend_records(&mut self, records: Vec<Self::Item>);
}

impl<S: RecordSlot> RecordList for Vec<S> {
    type Item = S::Record;

    fn extend_records(&mut self, records: Vec<S::Record>) {
        self.extend(records.into_iter().map(S::from_record));
    }
}

/// Append one record per row to `dest`. Returns the number appended.
///
/// Every row is bound before anything is appended, so a failure leaves
/// `dest` as it was.
pub fn bind_list<L: RecordList>(dest: &mut L, result_set: &ResultSet) -> Result<usize, BindError> {
    let plan = ColumnPlan::<L::Item>::build(result_set)?;
    let records = result_set
        .rows()
        .iter()
        .map(|row| plan.bind_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    let count = records.len();
    dest.extend_records(records);
    Ok(count)
}

/// Bind exactly one row into `dest`.
///
/// Zero rows fail with `NoRecordFound` and leave `dest` untouched. More than
/// one row binds the first into `dest` and then fails with
/// `MultipleRecordsFound`.
pub fn bind_one<T: Record>(dest: &mut T, result_set: &ResultSet) -> Result<(), BindError> {
    let plan = ColumnPlan::<T>::build(result_set)?;
    let first = result_set.rows().first().ok_or(BindError::NoRecordFound)?;
    *dest = plan.bind_row(first)?;
    if result_set.len() > 1 {
        return Err(BindError::MultipleRecordsFound);
    }
    Ok(())
}
