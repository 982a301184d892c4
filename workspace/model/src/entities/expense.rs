use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single expense record, optionally owned by a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    /// The day the expense occurred. Defaults to the creation day.
    pub date: NaiveDate,
    pub category: Category,
    /// The owning user. Nullable, and not backed by a database-level foreign
    /// key: deleting a user leaves their expenses behind with the original id.
    pub user_id: Option<i32>,
}

/// The fixed set of expense categories.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    #[sea_orm(string_value = "Food")]
    Food,
    #[sea_orm(string_value = "Education")]
    Education,
    #[sea_orm(string_value = "Entertainment")]
    Entertainment,
}

/// Error returned when parsing a category name that is not in the allowed set.
#[derive(Debug, Error)]
#[error("Invalid category '{0}': expected one of Food, Education, Entertainment")]
pub struct InvalidCategory(String);

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Education" => Ok(Self::Education),
            "Entertainment" => Ok(Self::Entertainment),
            other => Err(InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Food => "Food",
            Self::Education => "Education",
            Self::Entertainment => "Entertainment",
        };
        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_categories() {
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("Education".parse::<Category>().unwrap(), Category::Education);
        assert_eq!(
            "Entertainment".parse::<Category>().unwrap(),
            Category::Entertainment
        );
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let error = "Shopping".parse::<Category>().unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid category 'Shopping': expected one of Food, Education, Entertainment"
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("food".parse::<Category>().is_err());
    }

    #[test]
    fn display_matches_stored_value() {
        assert_eq!(Category::Food.to_string(), "Food");
        assert_eq!(Category::Education.to_string(), "Education");
        assert_eq!(Category::Entertainment.to_string(), "Entertainment");
    }
}
