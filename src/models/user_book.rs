//! Per-user reading status of a book

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::book::Book;

/// Reading status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Read,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want_to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want_to_read" => Ok(ReadingStatus::WantToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "read" => Ok(ReadingStatus::Read),
            _ => Err(format!("Invalid reading status: {}", s)),
        }
    }
}

// SQLx conversion, stored as text
impl sqlx::Type<Postgres> for ReadingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for ReadingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ReadingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Association row between a user and a book
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct UserBook {
    pub user_id: i32,
    pub book_id: i32,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book together with the user's status for it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBookEntry {
    pub status: ReadingStatus,
    pub updated_at: DateTime<Utc>,
    pub book: Book,
}

/// Set status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatus {
    pub status: ReadingStatus,
}

/// Query for a user's books, optionally filtered by status
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserBookQuery {
    pub status: Option<ReadingStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Number of books per status
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: ReadingStatus,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [ReadingStatus::WantToRead, ReadingStatus::Reading, ReadingStatus::Read] {
            assert_eq!(status.as_str().parse::<ReadingStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("finished".parse::<ReadingStatus>().is_err());
        assert!(serde_json::from_str::<SetStatus>(r#"{"status":"finished"}"#).is_err());
    }
}
