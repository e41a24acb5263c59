//! The tagged value union bound into statements.
//!
//! Every parameter flowing through the builder is an [`SqlValue`], so
//! coercion and escaping pattern-match exhaustively instead of inspecting
//! runtime types. The union covers the scalar stack the execution seam can
//! bind natively (via the [`ToSql`] bridge at the bottom of this module);
//! anything else reaches the engine through [`SqlValue::Raw`].

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::schema::PgEnum;
use crate::types::SqlType;

/// A dynamically-typed SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(uuid::Uuid),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    Json(serde_json::Value),
    /// An enumeration label plus its declared type name.
    Enum {
        ty: &'static str,
        label: &'static str,
    },
    /// A pre-rendered SQL expression, inlined verbatim in both render modes
    /// and never bound as a parameter.
    Raw(String),
}

impl SqlValue {
    /// Wrap an enumeration value using its declared external label.
    pub fn from_enum<E: PgEnum>(value: &E) -> Self {
        let variant = value.variant();
        Self::Enum {
            ty: E::type_name(),
            label: variant.label(),
        }
    }

    /// A raw SQL expression, e.g. `NOW()` or `DEFAULT`.
    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Raw(expr.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// The SQL type inferred from the native value, when one exists.
    ///
    /// Null, raw fragments and enum labels carry no inferable type; enums
    /// resolve through their column's type override instead.
    pub fn inferred_type(&self) -> Option<SqlType> {
        Some(match self {
            Self::Null | Self::Raw(_) | Self::Enum { .. } => return None,
            Self::Bool(_) => SqlType::Boolean,
            Self::Int(_) => SqlType::BigInt,
            Self::Float(_) => SqlType::Double,
            Self::Text(_) => SqlType::Text,
            Self::Bytes(_) => SqlType::Bytea,
            Self::Date(_) => SqlType::Date,
            Self::Time(_) => SqlType::Time,
            Self::Timestamp(_) => SqlType::Timestamp,
            Self::TimestampTz(_) => SqlType::TimestampTz,
            Self::Uuid(_) => SqlType::Uuid,
            #[cfg(feature = "rust_decimal")]
            Self::Decimal(_) => SqlType::Numeric,
            Self::Json(_) => SqlType::Jsonb,
        })
    }

    /// Render as literal SQL text.
    ///
    /// `escape` controls quoting of text-like values; enum labels carry
    /// their own representation and quote themselves, raw fragments are
    /// emitted verbatim.
    pub fn render_literal(&self, out: &mut String, escape: bool) {
        match self {
            Self::Null => out.push_str("NULL"),
            Self::Bool(v) => out.push_str(if *v { "TRUE" } else { "FALSE" }),
            Self::Int(v) => {
                out.push_str(&v.to_string());
            }
            Self::Float(v) => {
                out.push_str(&v.to_string());
            }
            Self::Text(s) => {
                if escape {
                    push_quoted_text(out, s);
                } else {
                    out.push_str(s);
                }
            }
            Self::Bytes(bytes) => {
                out.push_str("'\\x");
                for byte in bytes {
                    out.push_str(&format!("{byte:02x}"));
                }
                out.push('\'');
            }
            Self::Date(d) => {
                push_quoted_text(out, &d.format("%Y-%m-%d").to_string());
            }
            Self::Time(t) => {
                push_quoted_text(out, &t.format("%H:%M:%S%.6f").to_string());
            }
            Self::Timestamp(ts) => {
                push_quoted_text(out, &ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string());
            }
            Self::TimestampTz(ts) => {
                push_quoted_text(out, &ts.to_rfc3339_opts(SecondsFormat::Micros, true));
            }
            Self::Uuid(u) => {
                push_quoted_text(out, &u.to_string());
            }
            #[cfg(feature = "rust_decimal")]
            Self::Decimal(d) => {
                out.push_str(&d.to_string());
            }
            Self::Json(j) => {
                push_quoted_text(out, &j.to_string());
            }
            Self::Enum { label, .. } => {
                push_quoted_text(out, label);
            }
            Self::Raw(expr) => out.push_str(expr),
        }
    }
}

/// Append `s` wrapped in single quotes, doubling any embedded quote.
pub(crate) fn push_quoted_text(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
            out.push('\'');
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        Self::Int(v.into())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::TimestampTz(v)
    }
}

impl From<uuid::Uuid> for SqlValue {
    fn from(v: uuid::Uuid) -> Self {
        Self::Uuid(v)
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for SqlValue {
    fn from(v: rust_decimal::Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// A nullable wrapper unwraps to its underlying value; `None` becomes NULL.
impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) => v.to_sql(ty, out),
            Self::Int(v) => {
                // Narrow to the wire width the statement expects.
                if *ty == Type::INT2 {
                    (*v as i16).to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    (*v as i32).to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Self::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Self::Text(v) => v.to_sql(ty, out),
            Self::Bytes(v) => v.to_sql(ty, out),
            Self::Date(v) => v.to_sql(ty, out),
            Self::Time(v) => v.to_sql(ty, out),
            Self::Timestamp(v) => v.to_sql(ty, out),
            Self::TimestampTz(v) => v.to_sql(ty, out),
            Self::Uuid(v) => v.to_sql(ty, out),
            #[cfg(feature = "rust_decimal")]
            Self::Decimal(v) => v.to_sql(ty, out),
            Self::Json(v) => v.to_sql(ty, out),
            Self::Enum { label, .. } => label.to_sql(ty, out),
            Self::Raw(_) => Err("raw SQL fragments cannot be bound as parameters".into()),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Best-effort pass-through: unknown engine-specific types stay
        // usable without new schema metadata.
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_escaping() {
        let mut out = String::new();
        SqlValue::from("it's").render_literal(&mut out, true);
        assert_eq!(out, "'it''s'");
    }

    #[test]
    fn text_unescaped_when_flag_cleared() {
        let mut out = String::new();
        SqlValue::from("NOW()").render_literal(&mut out, false);
        assert_eq!(out, "NOW()");
    }

    #[test]
    fn null_renders_keyword() {
        let mut out = String::new();
        SqlValue::Null.render_literal(&mut out, true);
        assert_eq!(out, "NULL");
    }

    #[test]
    fn bytes_render_hex() {
        let mut out = String::new();
        SqlValue::from(vec![0xde, 0xad, 0x01]).render_literal(&mut out, true);
        assert_eq!(out, r"'\xdead01'");
    }

    #[test]
    fn bool_and_int() {
        let mut out = String::new();
        SqlValue::from(true).render_literal(&mut out, true);
        out.push(',');
        SqlValue::from(42).render_literal(&mut out, true);
        assert_eq!(out, "TRUE,42");
    }

    #[test]
    fn date_quoted() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut out = String::new();
        SqlValue::from(date).render_literal(&mut out, true);
        assert_eq!(out, "'2024-03-09'");
    }

    #[test]
    fn option_unwraps_to_null() {
        let none: Option<i64> = None;
        assert_eq!(SqlValue::from(none), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5i64)), SqlValue::Int(5));
    }

    #[test]
    fn inference() {
        assert_eq!(SqlValue::from(1i32).inferred_type(), Some(SqlType::BigInt));
        assert_eq!(SqlValue::from("x").inferred_type(), Some(SqlType::Text));
        assert_eq!(SqlValue::Null.inferred_type(), None);
        assert_eq!(SqlValue::raw("DEFAULT").inferred_type(), None);
    }

    #[test]
    fn json_renders_escaped() {
        let value = serde_json::json!({"k": "v"});
        let mut out = String::new();
        SqlValue::from(value).render_literal(&mut out, true);
        assert_eq!(out, r#"'{"k":"v"}'"#);
    }
}
