//! Validation, record handling and CRUD sequencing over a `RowStore`.

mod crud;
pub mod records;
pub mod validation;
pub use crud::CrudService;
pub use records::{
    conv_table_names, conv_values, get_body_record, validate_records, validate_sql_keys,
    validate_sql_values, BodyRecord, KvRecord,
};
pub use validation::{Validator, ValidatorRegistry};
