//! Guest Repository
//!
//! Guests are owner scoped. Intolerances live in `guest_intolerance` and are
//! attached after the row query. Deleting a guest goes through the seating
//! engine so vacated seat buckets are compacted.

use std::collections::HashMap;

use shared::error::ErrorCode;
use shared::models::{
    Guest, GuestCreate, GuestSeat, GuestUpdate, GuestWithSeat, Intolerance, Plan, Side,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{ServiceError, ServiceResult};

const GUEST_COLUMNS: &str = "g.id, g.name, g.category_id, g.other_text";

#[derive(sqlx::FromRow)]
struct GuestSeatRow {
    id: i64,
    name: String,
    category_id: Option<i64>,
    other_text: Option<String>,
    table_id: Option<i64>,
    table_name: Option<String>,
    side: Option<Side>,
    position: Option<i32>,
}

impl GuestSeatRow {
    fn into_guest_with_seat(self, intolerances: Vec<Intolerance>) -> GuestWithSeat {
        let seat = match (self.table_id, self.side, self.position) {
            (Some(table_id), Some(side), Some(position)) => Some(GuestSeat {
                table_id,
                table_name: self.table_name.unwrap_or_default(),
                side,
                position,
            }),
            _ => None,
        };
        GuestWithSeat {
            guest: Guest {
                id: self.id,
                name: self.name,
                category_id: self.category_id,
                other_text: self.other_text,
                intolerances,
            },
            seat,
        }
    }
}

/// Intolerances of every guest of `user_id`, keyed by guest id
async fn intolerance_map(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<HashMap<i64, Vec<Intolerance>>, sqlx::Error> {
    let rows: Vec<(i64, Intolerance)> = sqlx::query_as(
        "SELECT gi.guest_id, gi.intolerance FROM guest_intolerance gi
         JOIN guest g ON g.id = gi.guest_id
         WHERE g.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, Vec<Intolerance>> = HashMap::new();
    for (guest_id, flag) in rows {
        map.entry(guest_id).or_default().push(flag);
    }
    for flags in map.values_mut() {
        flags.sort();
    }
    Ok(map)
}

async fn intolerances_of(
    conn: &mut SqliteConnection,
    guest_id: i64,
) -> Result<Vec<Intolerance>, sqlx::Error> {
    let mut flags: Vec<Intolerance> =
        sqlx::query_scalar("SELECT intolerance FROM guest_intolerance WHERE guest_id = ?")
            .bind(guest_id)
            .fetch_all(conn)
            .await?;
    flags.sort();
    Ok(flags)
}

async fn replace_intolerances(
    conn: &mut SqliteConnection,
    guest_id: i64,
    flags: &[Intolerance],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM guest_intolerance WHERE guest_id = ?")
        .bind(guest_id)
        .execute(&mut *conn)
        .await?;
    for flag in flags {
        sqlx::query("INSERT OR IGNORE INTO guest_intolerance (guest_id, intolerance) VALUES (?, ?)")
            .bind(guest_id)
            .bind(*flag)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Referenced category must exist and belong to the same owner
async fn check_category(
    conn: &mut SqliteConnection,
    user_id: i64,
    category_id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(category_id) = category_id
        && super::category::find(conn, user_id, category_id)
            .await?
            .is_none()
    {
        return Err(ErrorCode::CategoryNotFound.into());
    }
    Ok(())
}

pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<Guest>, sqlx::Error> {
    let mut guests = sqlx::query_as::<_, Guest>(&format!(
        "SELECT {GUEST_COLUMNS} FROM guest g WHERE g.user_id = ? ORDER BY g.category_id, g.id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut flags = intolerance_map(pool, user_id).await?;
    for guest in &mut guests {
        guest.intolerances = flags.remove(&guest.id).unwrap_or_default();
    }
    Ok(guests)
}

pub async fn find(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Option<Guest>, sqlx::Error> {
    let guest = sqlx::query_as::<_, Guest>(&format!(
        "SELECT {GUEST_COLUMNS} FROM guest g WHERE g.id = ? AND g.user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    match guest {
        Some(mut guest) => {
            guest.intolerances = intolerances_of(conn, guest.id).await?;
            Ok(Some(guest))
        }
        None => Ok(None),
    }
}

pub async fn exists(conn: &mut SqliteConnection, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM guest WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: &GuestCreate) -> ServiceResult<Guest> {
    let mut tx = pool.begin().await?;
    check_category(&mut tx, user_id, data.category_id).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO guest (user_id, name, category_id, other_text) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(data.name.trim())
    .bind(data.category_id)
    .bind(&data.other_text)
    .fetch_one(&mut *tx)
    .await?;
    replace_intolerances(&mut tx, id, &data.intolerances).await?;

    let guest = find(&mut tx, user_id, id)
        .await?
        .ok_or_else(|| ServiceError::db("guest missing after write"))?;
    tx.commit().await?;
    Ok(guest)
}

/// Full replacement of name, category, intolerances and note
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    data: &GuestUpdate,
) -> ServiceResult<Guest> {
    let mut tx = pool.begin().await?;
    check_category(&mut tx, user_id, data.category_id).await?;

    let rows = sqlx::query(
        "UPDATE guest SET name = ?, category_id = ?, other_text = ? WHERE id = ? AND user_id = ?",
    )
    .bind(data.name.trim())
    .bind(data.category_id)
    .bind(&data.other_text)
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(ErrorCode::GuestNotFound.into());
    }
    replace_intolerances(&mut tx, id, &data.intolerances).await?;

    let guest = find(&mut tx, user_id, id)
        .await?
        .ok_or_else(|| ServiceError::db("guest missing after write"))?;
    tx.commit().await?;
    Ok(guest)
}

/// Delete the guest row; seats must already be released by the caller
pub async fn delete_row(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM guest WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Every guest with their seat in `plan` (if any)
pub async fn list_with_seats(
    pool: &SqlitePool,
    user_id: i64,
    plan: Plan,
) -> Result<Vec<GuestWithSeat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GuestSeatRow>(&format!(
        "SELECT {GUEST_COLUMNS}, s.table_id, t.name AS table_name, s.side, s.position
         FROM guest g
         LEFT JOIN seat_assignment s ON s.guest_id = g.id AND s.plan = ?
         LEFT JOIN seating_table t ON t.id = s.table_id AND t.user_id = g.user_id
         WHERE g.user_id = ?
         ORDER BY g.id"
    ))
    .bind(plan)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    attach(pool, user_id, rows).await
}

/// Seated guests of `plan`, ordered by table, side code and position
pub async fn list_assigned(
    pool: &SqlitePool,
    user_id: i64,
    plan: Plan,
    table_id: Option<i64>,
) -> Result<Vec<GuestWithSeat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GuestSeatRow>(&format!(
        "SELECT {GUEST_COLUMNS}, s.table_id, t.name AS table_name, s.side, s.position
         FROM guest g
         JOIN seat_assignment s ON s.guest_id = g.id AND s.plan = ?
         JOIN seating_table t ON t.id = s.table_id AND t.user_id = g.user_id
         WHERE g.user_id = ? AND (? IS NULL OR s.table_id = ?)
         ORDER BY s.table_id, s.side, s.position"
    ))
    .bind(plan)
    .bind(user_id)
    .bind(table_id)
    .bind(table_id)
    .fetch_all(pool)
    .await?;

    attach(pool, user_id, rows).await
}

pub async fn list_unassigned(
    pool: &SqlitePool,
    user_id: i64,
    plan: Plan,
) -> Result<Vec<Guest>, sqlx::Error> {
    let mut guests = sqlx::query_as::<_, Guest>(&format!(
        "SELECT {GUEST_COLUMNS} FROM guest g
         WHERE g.user_id = ?
           AND NOT EXISTS (SELECT 1 FROM seat_assignment s WHERE s.guest_id = g.id AND s.plan = ?)
         ORDER BY g.category_id, g.id DESC"
    ))
    .bind(user_id)
    .bind(plan)
    .fetch_all(pool)
    .await?;

    let mut flags = intolerance_map(pool, user_id).await?;
    for guest in &mut guests {
        guest.intolerances = flags.remove(&guest.id).unwrap_or_default();
    }
    Ok(guests)
}

pub async fn count_unassigned(pool: &SqlitePool, user_id: i64, plan: Plan) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM guest g
         WHERE g.user_id = ?
           AND NOT EXISTS (SELECT 1 FROM seat_assignment s WHERE s.guest_id = g.id AND s.plan = ?)",
    )
    .bind(user_id)
    .bind(plan)
    .fetch_one(pool)
    .await
}

async fn attach(
    pool: &SqlitePool,
    user_id: i64,
    rows: Vec<GuestSeatRow>,
) -> Result<Vec<GuestWithSeat>, sqlx::Error> {
    let mut flags = intolerance_map(pool, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let intolerances = flags.remove(&row.id).unwrap_or_default();
            row.into_guest_with_seat(intolerances)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{db_with_user, other_user};
    use shared::models::CategoryCreate;

    fn guest(name: &str) -> GuestCreate {
        GuestCreate {
            name: name.to_string(),
            category_id: None,
            intolerances: vec![],
            other_text: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_intolerances() {
        let (db, owner) = db_with_user().await;
        let created = create(
            &db.pool,
            owner,
            &GuestCreate {
                name: "  Lucia ".into(),
                category_id: None,
                intolerances: vec![Intolerance::Vegan, Intolerance::Baby, Intolerance::Vegan],
                other_text: Some("no nuts".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(created.name, "Lucia");
        assert_eq!(
            created.intolerances,
            vec![Intolerance::Baby, Intolerance::Vegan]
        );
        assert_eq!(created.other_text.as_deref(), Some("no nuts"));

        let all = list(&db.pool, owner).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].intolerances.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_everything() {
        let (db, owner) = db_with_user().await;
        let family = crate::db::category::create(
            &db.pool,
            owner,
            &CategoryCreate {
                name: "Family".into(),
            },
        )
        .await
        .unwrap();
        let mut data = guest("Paolo");
        data.category_id = Some(family.id);
        data.intolerances = vec![Intolerance::GlutenFree];
        let created = create(&db.pool, owner, &data).await.unwrap();

        let updated = update(
            &db.pool,
            owner,
            created.id,
            &GuestUpdate {
                name: "Paolo R.".into(),
                category_id: None,
                intolerances: vec![Intolerance::Pregnant],
                other_text: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Paolo R.");
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.intolerances, vec![Intolerance::Pregnant]);
    }

    #[tokio::test]
    async fn test_foreign_category_rejected() {
        let (db, owner) = db_with_user().await;
        let other = other_user(&db).await;
        let theirs = crate::db::category::create(
            &db.pool,
            other,
            &CategoryCreate {
                name: "Theirs".into(),
            },
        )
        .await
        .unwrap();

        let mut data = guest("Anna");
        data.category_id = Some(theirs.id);
        let err = create(&db.pool, owner, &data).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CategoryNotFound);
        assert!(list(&db.pool, owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_foreign_guest_is_not_found() {
        let (db, owner) = db_with_user().await;
        let other = other_user(&db).await;
        let created = create(&db.pool, owner, &guest("Anna")).await.unwrap();

        let err = update(
            &db.pool,
            other,
            created.id,
            &GuestUpdate {
                name: "Hijack".into(),
                category_id: None,
                intolerances: vec![],
                other_text: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::GuestNotFound);
    }

    #[tokio::test]
    async fn test_unassigned_lists_without_seats() {
        let (db, owner) = db_with_user().await;
        create(&db.pool, owner, &guest("A")).await.unwrap();
        create(&db.pool, owner, &guest("B")).await.unwrap();

        assert_eq!(count_unassigned(&db.pool, owner, Plan::A).await.unwrap(), 2);
        assert_eq!(list_unassigned(&db.pool, owner, Plan::B).await.unwrap().len(), 2);
        assert!(list_assigned(&db.pool, owner, Plan::A, None).await.unwrap().is_empty());

        let with_seats = list_with_seats(&db.pool, owner, Plan::A).await.unwrap();
        assert_eq!(with_seats.len(), 2);
        assert!(with_seats.iter().all(|g| g.seat.is_none()));
    }
}
