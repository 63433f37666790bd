//! Genre model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::not_blank;

/// Genre record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    /// Unique name (case-sensitive)
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create genre request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[validate(
        custom(function = "not_blank", message = "Genre name is required"),
        length(max = 100, message = "Genre name must be at most 100 characters")
    )]
    pub name: String,
    pub description: Option<String>,
}

/// Update genre request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGenre {
    #[validate(
        custom(function = "not_blank", message = "Genre name must not be blank"),
        length(max = 100, message = "Genre name must be at most 100 characters")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_validation() {
        let ok = CreateGenre {
            name: "Science Fiction".into(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let blank = CreateGenre {
            name: " ".into(),
            description: None,
        };
        assert!(blank.validate().is_err());

        let long = CreateGenre {
            name: "x".repeat(101),
            description: None,
        };
        assert!(long.validate().is_err());
    }
}
