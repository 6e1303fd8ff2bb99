pub mod events;
pub mod profiles;

/// Postgres SQLSTATE for unique-constraint breaches. The email pre-check is
/// advisory; the constraint is what actually closes the race window between
/// validation and persistence.
const UNIQUE_VIOLATION: &str = "23505";

pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
