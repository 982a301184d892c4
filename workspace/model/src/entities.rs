//! This file serves as the root for all SeaORM entity modules.
//! The budget manager stores two kinds of records: users and the expenses
//! they own, linked by a nullable `user_id` column on the expense side.

pub mod expense;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::expense::Entity as Expense;
    pub use super::user::Entity as User;
}
