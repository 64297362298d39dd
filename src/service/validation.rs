//! Per-parameter validators. Each normalizes a raw query/path string or rejects it.

use crate::error::AppError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// A normalize-or-reject function for one named parameter.
pub type Validator = Arc<dyn Fn(&str) -> Result<String, AppError> + Send + Sync>;

fn id_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

fn table_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex"))
}

fn invalid(name: &str, raw: &str) -> AppError {
    AppError::Validation(format!("invalid {} \"{}\"", name, raw))
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn not_ident_char(c: char) -> bool {
    !is_ident_char(c)
}

/// Non-empty and made only of `[A-Za-z0-9_]`.
pub fn is_valid_ident(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(not_ident_char)
}

/// Id column name; defaults to `id`.
pub fn validate_id_field(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Ok("id".into());
    }
    if id_field_re().is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(invalid("id_field", raw))
    }
}

/// Comma-separated column list, returned verbatim; defaults to `*`.
pub fn validate_fields(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Ok("*".into());
    }
    if raw.split(',').all(is_valid_ident) {
        Ok(raw.to_string())
    } else {
        Err(invalid("fields", raw))
    }
}

pub fn validate_table_name(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Err(AppError::Validation("table_name is required".into()));
    }
    if table_name_re().is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(invalid("table_name", raw))
    }
}

/// A single signed decimal i64; leading zeros and an explicit `+` are dropped.
pub fn validate_id(raw: &str) -> Result<String, AppError> {
    raw.parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|_| invalid("id", raw))
}

/// Comma-separated ids, each normalized as by `validate_id`. Order and
/// duplicates are kept.
pub fn validate_ids(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    let mut out = Vec::new();
    for item in raw.split(',') {
        let n = item.parse::<i64>().map_err(|_| invalid("ids", raw))?;
        out.push(n.to_string());
    }
    Ok(out.join(","))
}

/// Row limit. Numeric values outside `1..max` clamp to `max` instead of failing;
/// padding, a `+` sign and non-numeric input are rejected.
pub fn validate_limit(raw: &str, max: i64) -> Result<String, AppError> {
    if raw.is_empty() {
        return Ok(max.to_string());
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("limit", raw));
    }
    let n = match raw.parse::<i64>() {
        Ok(n) if n > 0 && n < max => n,
        // out of i64 range, negative, zero, or at/above the ceiling
        _ => max,
    };
    Ok(n.to_string())
}

/// Signed row offset; an explicit `+` is dropped.
pub fn validate_offset(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Ok("0".into());
    }
    raw.parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|_| invalid("offset", raw))
}

/// Name-to-validator table. Immutable once built.
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<&'static str, Validator>,
}

impl ValidatorRegistry {
    /// Registers the standard parameters; `limit` clamps to `max_recs`.
    pub fn new(max_recs: i64) -> Self {
        let mut validators: HashMap<&'static str, Validator> = HashMap::new();
        validators.insert("id_field", Arc::new(validate_id_field));
        validators.insert("fields", Arc::new(validate_fields));
        validators.insert("table_name", Arc::new(validate_table_name));
        validators.insert("id", Arc::new(validate_id));
        validators.insert("ids", Arc::new(validate_ids));
        validators.insert("limit", Arc::new(move |raw: &str| validate_limit(raw, max_recs)));
        validators.insert("offset", Arc::new(validate_offset));
        ValidatorRegistry { validators }
    }

    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &&'static str> {
        self.validators.keys()
    }

    pub fn validate(&self, name: &str, raw: &str) -> Result<String, AppError> {
        let validator = self
            .get(name)
            .ok_or_else(|| AppError::Validation(format!("unrecognized parameter \"{}\"", name)))?;
        (validator.as_ref())(raw)
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry").field("names", &names).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `(input, expected output, expected success)`; output is ignored on failure.
    pub(crate) type Case = (&'static str, &'static str, bool);

    pub(crate) fn run_validator<F>(name: &str, f: F, cases: &[Case])
    where
        F: Fn(&str) -> Result<String, AppError>,
    {
        for (i, (arg, want, ok)) in cases.iter().enumerate() {
            match f(arg) {
                Ok(res) => assert!(*ok && res == *want, "#{} {}({:?}) = Ok({:?}); expected ({:?}, {})", i, name, arg, res, want, ok),
                Err(e) => assert!(!*ok, "#{} {}({:?}) failed: {}; expected {:?}", i, name, arg, e, want),
            }
        }
    }

    pub(crate) const ID_FIELD_CASES: &[Case] = &[
        ("", "id", true),
        ("x", "x", true),
        ("X", "X", true),
        ("_", "_", true),
        ("row_id2", "row_id2", true),
        ("1", "", false),
        ("a.b", "", false),
    ];

    pub(crate) const FIELDS_CASES: &[Case] = &[
        ("", "*", true),
        ("f1", "f1", true),
        ("f1,f2", "f1,f2", true),
        ("f1,", "", false),
        (",f1,", "", false),
        ("f1,,f2", "", false),
        (" f1,", "", false),
        ("f1 ", "", false),
        ("f1;f2", "", false),
    ];

    pub(crate) const TABLE_NAME_CASES: &[Case] = &[
        ("", "", false),
        ("a", "a", true),
        ("1", "", false),
        ("a-2", "", false),
        (".", "", false),
        ("xyz", "xyz", true),
        ("t_2", "t_2", true),
        ("_t", "", false),
    ];

    pub(crate) const ID_CASES: &[Case] = &[
        ("", "", false),
        (" ", "", false),
        ("0", "0", true),
        ("-1", "-1", true),
        ("0x21", "", false),
        ("00021", "21", true),
        ("1 ", "", false),
        (" 1", "", false),
        ("2,1", "", false),
        ("1_000_000", "", false),
        ("1000", "1000", true),
        ("1000000", "1000000", true),
        ("1000000000", "1000000000", true),
        ("1000000000000", "1000000000000", true),
        ("1000000000000000", "1000000000000000", true),
        ("1000000000000000000000", "", false),
    ];

    pub(crate) const IDS_CASES: &[Case] = &[
        ("", "", true),
        (" ", "", false),
        ("0x21", "", false),
        ("00021", "21", true),
        ("0", "0", true),
        ("-1", "-1", true),
        ("0,0,1,1,1", "0,0,1,1,1", true),
        ("3,001,2", "3,1,2", true),
        ("1 ", "", false),
        (" 1", "", false),
        ("1, -1", "", false),
        ("2,1,", "", false),
        (",2", "", false),
        ("1_000_000", "", false),
        ("1000", "1000", true),
        ("1000000000000", "1000000000000", true),
    ];

    const MAX: i64 = 7;

    const LIMIT_CASES: &[Case] = &[
        ("", "7", true),
        (" ", "", false),
        (" 1", "", false),
        ("1 ", "", false),
        ("1", "1", true),
        ("6", "6", true),
        ("7", "7", true),
        ("0", "7", true),
        ("-1", "7", true),
        ("100000", "7", true),
        ("1000000000000", "7", true),
        ("99999999999999999999999", "7", true),
        ("-99999999999999999999999", "7", true),
        ("abc", "", false),
        ("1.5", "", false),
        ("+5", "", false),
        ("-", "", false),
    ];

    const OFFSET_CASES: &[Case] = &[
        ("", "0", true),
        ("0", "0", true),
        ("12345678", "12345678", true),
        ("-12345678", "-12345678", true),
        ("+12345678", "12345678", true),
        ("12345678.", "", false),
        (" 12345678", "", false),
        ("12345678 ", "", false),
        ("1000000000000", "1000000000000", true),
    ];

    #[test]
    fn id_field() {
        run_validator("validate_id_field", validate_id_field, ID_FIELD_CASES);
    }

    #[test]
    fn fields() {
        run_validator("validate_fields", validate_fields, FIELDS_CASES);
    }

    #[test]
    fn table_name() {
        run_validator("validate_table_name", validate_table_name, TABLE_NAME_CASES);
    }

    #[test]
    fn id() {
        run_validator("validate_id", validate_id, ID_CASES);
    }

    #[test]
    fn ids() {
        run_validator("validate_ids", validate_ids, IDS_CASES);
    }

    #[test]
    fn limit() {
        run_validator("validate_limit", |raw| validate_limit(raw, MAX), LIMIT_CASES);
    }

    #[test]
    fn offset() {
        run_validator("validate_offset", validate_offset, OFFSET_CASES);
    }

    #[test]
    fn ident_chars() {
        for c in ['&', '|', '\0', '.', ',', '/', ' ', '-', 'é'] {
            assert!(not_ident_char(c), "{:?}", c);
        }
        for c in ['a', 'z', 'A', 'Z', '0', '9', '_'] {
            assert!(is_ident_char(c), "{:?}", c);
        }
    }

    #[test]
    fn valid_ident() {
        let cases = [
            ("_ABCXYZabcxyz0123456789", true),
            ("_ABCabc0123.", false),
            ("abc.def", false),
            ("abc:def", false),
            ("abc/def", false),
            ("abc!def", false),
            ("abc?def", false),
            ("abc$def", false),
            ("", false),
        ];
        for (s, want) in cases {
            assert_eq!(is_valid_ident(s), want, "{:?}", s);
        }
    }

    #[test]
    fn registry_dispatches_by_name() {
        let reg = ValidatorRegistry::new(MAX);
        assert_eq!(reg.validate("limit", "").unwrap(), "7");
        assert_eq!(reg.validate("id", "0042").unwrap(), "42");
        assert_eq!(reg.validate("fields", "").unwrap(), "*");
        assert!(matches!(reg.validate("nofield", ""), Err(AppError::Validation(_))));
        let mut names: Vec<_> = reg.names().copied().collect();
        names.sort();
        assert_eq!(
            names,
            vec!["fields", "id", "id_field", "ids", "limit", "offset", "table_name"]
        );
    }
}
