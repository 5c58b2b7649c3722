//! Diesel row structs for the `users` table.
//!
//! These models are internal to the persistence layer; conversions to and
//! from domain types happen in the repository adapter.

use diesel::prelude::*;

use crate::domain::user::{NewUser, User, UserId};

use super::schema::users;

/// Row as selected from the `users` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub family: String,
    pub email: String,
    pub age: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            family: row.family,
            email: row.email,
            age: row.age,
        }
    }
}

/// Insertable row; the database assigns the id.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub family: &'a str,
    pub email: &'a str,
    pub age: i32,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            name: &user.name,
            family: &user.family,
            email: &user.email,
            age: user.age,
        }
    }
}

/// Full-row changeset used when overwriting an existing user.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub name: &'a str,
    pub family: &'a str,
    pub email: &'a str,
    pub age: i32,
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            family: &user.family,
            email: &user.email,
            age: user.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn row_converts_to_domain_user() {
        let row = UserRow {
            id: 5,
            name: "Ann".into(),
            family: "Lee".into(),
            email: "ann@x.com".into(),
            age: 30,
        };

        let user = User::from(row);
        assert_eq!(user.id, UserId::new(5));
        assert_eq!(user.email, "ann@x.com");
    }

    #[rstest]
    fn insertable_row_borrows_the_draft() {
        let draft = NewUser::new("Ann", "Lee", "ann@x.com", 30).expect("valid draft");
        let row = NewUserRow::from(&draft);
        assert_eq!(row.name, "Ann");
        assert_eq!(row.age, 30);
    }
}
