//! SQL type tags for the target engine.
//!
//! [`SqlType`] is the closed set of engine types the builder knows how to
//! render and bind. Free-form type strings on a column descriptor are passed
//! through verbatim; [`SqlType::parse`] is the only place an unknown type
//! name becomes a hard [`StmtError::UnsupportedType`].

use crate::error::{StmtError, StmtResult};

/// A PostgreSQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Char,
    VarChar,
    Text,
    Bytea,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    Jsonb,
    SmallSerial,
    Serial,
    BigSerial,
}

impl SqlType {
    /// Translate an explicit type string into a [`SqlType`].
    ///
    /// Unknown names fail with [`StmtError::UnsupportedType`]; this is the
    /// strict path, unlike value coercion which degrades to a pass-through
    /// binding.
    pub fn parse(s: &str) -> StmtResult<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "bool" | "boolean" => Self::Boolean,
            "smallint" | "int2" => Self::SmallInt,
            "int" | "integer" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::BigInt,
            "real" | "float4" => Self::Real,
            "double" | "double precision" | "float8" => Self::Double,
            "numeric" | "decimal" => Self::Numeric,
            "char" | "character" => Self::Char,
            "varchar" | "character varying" => Self::VarChar,
            "text" => Self::Text,
            "bytea" => Self::Bytea,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" | "timestamp without time zone" => Self::Timestamp,
            "timestamptz" | "timestamp with time zone" => Self::TimestampTz,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "smallserial" => Self::SmallSerial,
            "serial" => Self::Serial,
            "bigserial" => Self::BigSerial,
            _ => return Err(StmtError::unsupported_type(s)),
        })
    }

    /// The engine type name without length or precision.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE PRECISION",
            Self::Numeric => "NUMERIC",
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::Text => "TEXT",
            Self::Bytea => "BYTEA",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampTz => "TIMESTAMPTZ",
            Self::Uuid => "UUID",
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::SmallSerial => "SMALLSERIAL",
            Self::Serial => "SERIAL",
            Self::BigSerial => "BIGSERIAL",
        }
    }

    /// Render with optional length and precision, e.g. `VARCHAR(255)` or
    /// `NUMERIC(10,2)`.
    pub fn render(&self, length: Option<u32>, precision: Option<u32>) -> String {
        match (length, precision) {
            (Some(l), Some(p)) => format!("{}({},{})", self.name(), l, p),
            (Some(l), None) => format!("{}({})", self.name(), l),
            _ => self.name().to_string(),
        }
    }

    /// The serial-family substitute for an auto-increment column of this
    /// type, if the engine has one.
    pub fn serial_substitute(&self) -> Option<SqlType> {
        match self {
            Self::SmallInt => Some(Self::SmallSerial),
            Self::Integer => Some(Self::Serial),
            Self::BigInt => Some(Self::BigSerial),
            _ => None,
        }
    }
}

/// The resolved type of a bound parameter: a known engine type or a
/// free-form name carried through from a column descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Sql(SqlType),
    Custom(&'static str),
}
