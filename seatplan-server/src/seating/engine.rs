//! Seat Assignment Engine
//!
//! Every mutation runs as one SQLite transaction behind an in-process writer
//! lock, so the "count the bucket, then write" steps can't interleave and a
//! failure leaves nothing half-applied.
//!
//! Bucket rules:
//! - a guest holds at most one seat per plan
//! - positions in each (table, side, plan) bucket are exactly `1..=N`
//! - removing a seat shifts every later seat of its bucket down by one

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{MoveOutcome, Plan, SeatAssignment, SeatRequest, SeatingTable, Side};
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;

use super::policy::DropPolicy;
use crate::db::{guest, seat, table};
use crate::error::{ServiceError, ServiceResult};

/// Where a guest should sit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub table_id: i64,
    pub side: Side,
    /// Explicit slot; assigning to a side bucket ignores it
    pub position: Option<i32>,
}

impl From<&SeatRequest> for Destination {
    fn from(req: &SeatRequest) -> Self {
        Self {
            table_id: req.id_table,
            side: req.table_order,
            position: req.table_side_position,
        }
    }
}

#[derive(Clone)]
pub struct SeatingEngine {
    pool: SqlitePool,
    /// Serializes all seat mutations
    writer: Arc<Mutex<()>>,
}

impl SeatingEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Seat a guest, replacing any seat it already holds in `plan`
    ///
    /// Side buckets always append at `count + 1`; a client-supplied slot is
    /// ignored there. Round tables accept an explicit slot in
    /// `1..=count + 1`; an occupied slot evicts its occupant.
    pub async fn assign(
        &self,
        user_id: i64,
        guest_id: i64,
        dest: Destination,
        plan: Plan,
    ) -> ServiceResult<SeatAssignment> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        ensure_guest(&mut tx, user_id, guest_id).await?;
        let table = target_table(&mut tx, user_id, &dest, plan).await?;
        let position = if table.shape.is_round() {
            check_position(dest.position)?;
            dest.position
        } else {
            if let Some(requested) = dest.position {
                tracing::debug!(guest_id, table_id = table.id, requested, "Side slot ignored, appending");
            }
            None
        };

        release(&mut tx, guest_id, plan).await?;
        let count = seat::count_bucket(&mut tx, table.id, dest.side, plan).await?;

        let assigned = match position {
            Some(position) if position > count + 1 => {
                return Err(invalid_position(position, count + 1).into());
            }
            Some(position) => match seat::find_at(&mut tx, table.id, dest.side, position, plan).await? {
                Some(occupant) => {
                    tracing::info!(
                        guest_id = occupant.guest_id,
                        table_id = table.id,
                        plan = %plan,
                        position,
                        "Seat occupant evicted"
                    );
                    take_seat(&mut tx, guest_id, &occupant, plan).await?
                }
                None => seat::insert(&mut tx, guest_id, table.id, dest.side, position, plan).await?,
            },
            None => seat::insert(&mut tx, guest_id, table.id, dest.side, count + 1, plan).await?,
        };
        tx.commit().await?;

        tracing::info!(
            guest_id,
            table_id = assigned.table_id,
            plan = %plan,
            side = %assigned.side,
            position = assigned.position,
            "Guest seated"
        );
        Ok(assigned)
    }

    /// Remove the guest's seat in `plan` and close the gap
    ///
    /// A guest without a seat is not an error; `None` is returned and nothing
    /// changes.
    pub async fn unassign(
        &self,
        user_id: i64,
        guest_id: i64,
        plan: Plan,
    ) -> ServiceResult<Option<SeatAssignment>> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        ensure_guest(&mut tx, user_id, guest_id).await?;
        let removed = release(&mut tx, guest_id, plan).await?;
        tx.commit().await?;

        if let Some(ref seat) = removed {
            tracing::info!(
                guest_id,
                table_id = seat.table_id,
                plan = %plan,
                side = %seat.side,
                position = seat.position,
                "Guest unseated"
            );
        }
        Ok(removed)
    }

    /// Drop a guest onto a seat, applying the destination table's drop policy
    pub async fn move_guest(
        &self,
        user_id: i64,
        guest_id: i64,
        dest: Destination,
        plan: Plan,
    ) -> ServiceResult<MoveOutcome> {
        self.drop_onto(user_id, guest_id, dest, plan, None).await
    }

    /// Move restricted to rectangular and S tables (swap when occupied)
    pub async fn rect_drop_change(
        &self,
        user_id: i64,
        guest_id: i64,
        dest: Destination,
        plan: Plan,
    ) -> ServiceResult<MoveOutcome> {
        self.drop_onto(user_id, guest_id, dest, plan, Some(DropPolicy::SwapOnOccupiedRect))
            .await
    }

    /// Move the guest occupying seat row `seat_id` to `dest`
    ///
    /// The row must belong to `guest_id` in `plan`; the drop itself follows
    /// [`move_guest`](Self::move_guest).
    pub async fn move_seat(
        &self,
        user_id: i64,
        seat_id: i64,
        guest_id: i64,
        dest: Destination,
        plan: Plan,
    ) -> ServiceResult<MoveOutcome> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        let row = seat::find_by_id(&mut tx, user_id, seat_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::SeatNotFound).with_detail("seat_id", seat_id))?;
        if row.guest_id != guest_id {
            return Err(AppError::validation(format!("Seat {seat_id} belongs to another guest"))
                .with_detail("guest_id", row.guest_id)
                .into());
        }
        if row.plan != plan {
            return Err(AppError::new(ErrorCode::PlanMismatch)
                .with_detail("seat_plan", row.plan.as_str())
                .with_detail("plan", plan.as_str())
                .into());
        }

        let outcome = drop_in(&mut tx, user_id, guest_id, dest, plan, None).await?;
        tx.commit().await?;
        log_move(guest_id, plan, &outcome);
        Ok(outcome)
    }

    async fn drop_onto(
        &self,
        user_id: i64,
        guest_id: i64,
        dest: Destination,
        plan: Plan,
        required: Option<DropPolicy>,
    ) -> ServiceResult<MoveOutcome> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;
        let outcome = drop_in(&mut tx, user_id, guest_id, dest, plan, required).await?;
        tx.commit().await?;
        log_move(guest_id, plan, &outcome);
        Ok(outcome)
    }

    /// Exchange the seats of two seated guests
    pub async fn swap(
        &self,
        user_id: i64,
        guest_a: i64,
        guest_b: i64,
        plan: Plan,
    ) -> ServiceResult<MoveOutcome> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        ensure_guest(&mut tx, user_id, guest_a).await?;
        ensure_guest(&mut tx, user_id, guest_b).await?;
        let seat_a = seated(&mut tx, guest_a, plan).await?;
        if guest_a == guest_b {
            return Ok(MoveOutcome::Unchanged { seat: seat_a });
        }
        let seat_b = seated(&mut tx, guest_b, plan).await?;

        seat::set_seat(&mut tx, seat_b.id, seat_a.table_id, seat_a.side, seat_a.position).await?;
        let seat = seat::set_seat(&mut tx, seat_a.id, seat_b.table_id, seat_b.side, seat_b.position)
            .await?;
        tx.commit().await?;

        tracing::info!(
            guest_id = guest_a,
            other_guest_id = guest_b,
            table_id = seat.table_id,
            plan = %plan,
            side = %seat.side,
            position = seat.position,
            "Guests swapped"
        );
        Ok(MoveOutcome::Swapped { seat, with: guest_b })
    }

    /// Delete a guest, releasing its seat in every plan first
    pub async fn delete_guest(&self, user_id: i64, guest_id: i64) -> ServiceResult<()> {
        let _guard = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        ensure_guest(&mut tx, user_id, guest_id).await?;
        for plan in Plan::ALL {
            release(&mut tx, guest_id, plan).await?;
        }
        guest::delete_row(&mut tx, user_id, guest_id).await?;
        tx.commit().await?;

        tracing::info!(guest_id, "Guest deleted");
        Ok(())
    }

    /// Delete a table together with its seats and map placement
    pub async fn delete_table(&self, user_id: i64, table_id: i64) -> ServiceResult<()> {
        let _guard = self.writer.lock().await;
        table::delete(&self.pool, user_id, table_id).await
    }
}

/// Drop `guest_id` onto `dest` inside an open transaction
async fn drop_in(
    conn: &mut SqliteConnection,
    user_id: i64,
    guest_id: i64,
    dest: Destination,
    plan: Plan,
    required: Option<DropPolicy>,
) -> ServiceResult<MoveOutcome> {
    ensure_guest(conn, user_id, guest_id).await?;
    let table = target_table(conn, user_id, &dest, plan).await?;
    check_position(dest.position)?;
    let policy = DropPolicy::for_shape(table.shape);
    if let Some(required) = required
        && required != policy
    {
        return Err(AppError::with_message(
            ErrorCode::SideNotAllowed,
            format!("Table {} does not have sides", table.id),
        )
        .into());
    }

    let current = seat::find_for_guest(conn, guest_id, plan).await?;
    let occupant = match dest.position {
        Some(position) => seat::find_at(conn, table.id, dest.side, position, plan).await?,
        None => None,
    };

    let outcome = match occupant {
        Some(occupant) if occupant.guest_id == guest_id => MoveOutcome::Unchanged { seat: occupant },
        Some(occupant) => match (policy, current) {
            (DropPolicy::SwapOnOccupiedRect, Some(current)) => {
                seat::set_seat(
                    conn,
                    occupant.id,
                    current.table_id,
                    current.side,
                    current.position,
                )
                .await?;
                let seat = seat::set_seat(
                    conn,
                    current.id,
                    occupant.table_id,
                    occupant.side,
                    occupant.position,
                )
                .await?;
                MoveOutcome::Swapped {
                    seat,
                    with: occupant.guest_id,
                }
            }
            (DropPolicy::SwapOnOccupiedRect, None) => MoveOutcome::Overwrote {
                seat: take_seat(conn, guest_id, &occupant, plan).await?,
                evicted: occupant.guest_id,
            },
            (DropPolicy::OverwriteOnOccupiedRound, _) => {
                // Releasing the mover may shift the occupant down its bucket
                release(conn, guest_id, plan).await?;
                let occupant = seat::find_for_guest(conn, occupant.guest_id, plan)
                    .await?
                    .ok_or_else(|| ServiceError::db("occupant vanished during move"))?;
                MoveOutcome::Overwrote {
                    seat: take_seat(conn, guest_id, &occupant, plan).await?,
                    evicted: occupant.guest_id,
                }
            }
        },
        None => {
            // Empty slots only exist past the end of a dense bucket
            release(conn, guest_id, plan).await?;
            let count = seat::count_bucket(conn, table.id, dest.side, plan).await?;
            MoveOutcome::Relocated {
                seat: seat::insert(conn, guest_id, table.id, dest.side, count + 1, plan)
                    .await?,
            }
        }
    };
    Ok(outcome)
}

fn log_move(guest_id: i64, plan: Plan, outcome: &MoveOutcome) {
    let seat = outcome.seat();
    tracing::info!(
        guest_id,
        table_id = seat.table_id,
        plan = %plan,
        side = %seat.side,
        position = seat.position,
        outcome = outcome_name(outcome),
        "Guest moved"
    );
}

async fn ensure_guest(conn: &mut SqliteConnection, user_id: i64, guest_id: i64) -> ServiceResult<()> {
    if !guest::exists(conn, user_id, guest_id).await? {
        return Err(AppError::new(ErrorCode::GuestNotFound)
            .with_detail("guest_id", guest_id)
            .into());
    }
    Ok(())
}

/// Load the destination table and check plan and side against it
async fn target_table(
    conn: &mut SqliteConnection,
    user_id: i64,
    dest: &Destination,
    plan: Plan,
) -> ServiceResult<SeatingTable> {
    let table = table::find(conn, user_id, dest.table_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound).with_detail("table_id", dest.table_id))?;

    if table.plan != plan {
        return Err(AppError::new(ErrorCode::PlanMismatch)
            .with_detail("table_plan", table.plan.as_str())
            .with_detail("plan", plan.as_str())
            .into());
    }
    if !dest.side.allowed_for(table.shape) {
        return Err(AppError::new(ErrorCode::SideNotAllowed)
            .with_detail("table_order", dest.side.code())
            .into());
    }
    Ok(table)
}

/// Explicit slots are 1-based
fn check_position(position: Option<i32>) -> Result<(), AppError> {
    match position {
        Some(position) if position < 1 => {
            Err(AppError::new(ErrorCode::InvalidPosition).with_detail("position", position))
        }
        _ => Ok(()),
    }
}

async fn seated(conn: &mut SqliteConnection, guest_id: i64, plan: Plan) -> ServiceResult<SeatAssignment> {
    seat::find_for_guest(conn, guest_id, plan).await?.ok_or_else(|| {
        AppError::new(ErrorCode::GuestNotSeated)
            .with_detail("guest_id", guest_id)
            .into()
    })
}

/// Delete the guest's seat in `plan` (if any) and compact its bucket
async fn release(
    conn: &mut SqliteConnection,
    guest_id: i64,
    plan: Plan,
) -> Result<Option<SeatAssignment>, sqlx::Error> {
    let removed = seat::delete_for_guest(conn, guest_id, plan).await?;
    if let Some(ref r) = removed {
        seat::compact_after(conn, r.table_id, r.side, plan, r.position).await?;
    }
    Ok(removed)
}

/// Replace the occupant of a seat with `guest_id`; bucket size is unchanged
async fn take_seat(
    conn: &mut SqliteConnection,
    guest_id: i64,
    occupant: &SeatAssignment,
    plan: Plan,
) -> Result<SeatAssignment, sqlx::Error> {
    seat::delete_for_guest(conn, occupant.guest_id, plan).await?;
    seat::insert(
        conn,
        guest_id,
        occupant.table_id,
        occupant.side,
        occupant.position,
        plan,
    )
    .await
}

fn invalid_position(position: i32, max: i32) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidPosition,
        format!("Position {position} is out of range (1..={max})"),
    )
    .with_detail("position", position)
}

fn outcome_name(outcome: &MoveOutcome) -> &'static str {
    match outcome {
        MoveOutcome::Relocated { .. } => "relocated",
        MoveOutcome::Swapped { .. } => "swapped",
        MoveOutcome::Overwrote { .. } => "overwrote",
        MoveOutcome::Unchanged { .. } => "unchanged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::testing::{db_with_user, other_user};
    use shared::models::{GuestCreate, TableCreate, TableShape};

    struct Fixture {
        db: DbService,
        engine: SeatingEngine,
        owner: i64,
    }

    impl Fixture {
        async fn new() -> Self {
            let (db, owner) = db_with_user().await;
            let engine = SeatingEngine::new(db.pool.clone());
            Self { db, engine, owner }
        }

        async fn table(&self, shape: TableShape, plan: Plan) -> i64 {
            table::create(
                &self.db.pool,
                self.owner,
                &TableCreate {
                    name: "t".into(),
                    shape,
                    plan,
                },
            )
            .await
            .unwrap()
            .id
        }

        async fn guests(&self, n: usize) -> Vec<i64> {
            let mut ids = Vec::with_capacity(n);
            for i in 0..n {
                let created = guest::create(
                    &self.db.pool,
                    self.owner,
                    &GuestCreate {
                        name: format!("guest {i}"),
                        category_id: None,
                        intolerances: vec![],
                        other_text: None,
                    },
                )
                .await
                .unwrap();
                ids.push(created.id);
            }
            ids
        }

        async fn sit(&self, guest_id: i64, table_id: i64, side: Side, plan: Plan) -> SeatAssignment {
            self.engine
                .assign(self.owner, guest_id, at(table_id, side, None), plan)
                .await
                .unwrap()
        }

        async fn positions(&self, table_id: i64, side: Side, plan: Plan) -> Vec<i32> {
            let mut conn = self.db.pool.acquire().await.unwrap();
            seat::occupied_positions(&mut conn, table_id, side, plan)
                .await
                .unwrap()
        }

        async fn bucket(&self, table_id: i64, side: Side, plan: Plan) -> Vec<i64> {
            let mut conn = self.db.pool.acquire().await.unwrap();
            seat::list_bucket(&mut conn, table_id, side, plan)
                .await
                .unwrap()
                .into_iter()
                .map(|s| s.guest_id)
                .collect()
        }

        async fn seat_of(&self, guest_id: i64, plan: Plan) -> Option<SeatAssignment> {
            let mut conn = self.db.pool.acquire().await.unwrap();
            seat::find_for_guest(&mut conn, guest_id, plan).await.unwrap()
        }
    }

    fn at(table_id: i64, side: Side, position: Option<i32>) -> Destination {
        Destination {
            table_id,
            side,
            position,
        }
    }

    fn dense(n: usize) -> Vec<i32> {
        (1..=n as i32).collect()
    }

    #[tokio::test]
    async fn test_sides_stay_dense_through_assign_and_unassign() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(8).await;

        for (i, id) in g.iter().enumerate() {
            let side = if i % 2 == 0 { Side::Top } else { Side::Left };
            let seat = f.sit(*id, t, side, Plan::A).await;
            assert_eq!(seat.position, (i / 2) as i32 + 1);
        }
        assert_eq!(f.positions(t, Side::Top, Plan::A).await, dense(4));

        // middle, first, last
        for id in [g[2], g[0], g[6]] {
            f.engine.unassign(f.owner, id, Plan::A).await.unwrap();
        }
        assert_eq!(f.positions(t, Side::Top, Plan::A).await, dense(1));
        assert_eq!(f.bucket(t, Side::Top, Plan::A).await, vec![g[4]]);
        assert_eq!(f.positions(t, Side::Left, Plan::A).await, dense(4));

        // re-seating a guest elsewhere compacts its old side
        f.sit(g[3], t, Side::Bottom, Plan::A).await;
        assert_eq!(f.positions(t, Side::Left, Plan::A).await, dense(3));
        assert_eq!(f.bucket(t, Side::Left, Plan::A).await, vec![g[1], g[5], g[7]]);
        assert_eq!(f.positions(t, Side::Bottom, Plan::A).await, dense(1));
    }

    #[tokio::test]
    async fn test_unassign_unseated_guest_is_noop() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::SShaped, Plan::A).await;
        let g = f.guests(3).await;
        f.sit(g[0], t, Side::Right, Plan::A).await;
        f.sit(g[1], t, Side::Right, Plan::A).await;

        let removed = f.engine.unassign(f.owner, g[2], Plan::A).await.unwrap();
        assert!(removed.is_none());
        let removed = f.engine.unassign(f.owner, g[0], Plan::B).await.unwrap();
        assert!(removed.is_none());
        assert_eq!(f.bucket(t, Side::Right, Plan::A).await, vec![g[0], g[1]]);
    }

    #[tokio::test]
    async fn test_assign_then_unassign_restores_bucket() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::B).await;
        let g = f.guests(3).await;
        f.sit(g[0], t, Side::Bottom, Plan::B).await;
        f.sit(g[1], t, Side::Bottom, Plan::B).await;
        let before = f.bucket(t, Side::Bottom, Plan::B).await;

        let seat = f.sit(g[2], t, Side::Bottom, Plan::B).await;
        assert_eq!(seat.position, 3);
        f.engine.unassign(f.owner, g[2], Plan::B).await.unwrap();

        assert_eq!(f.bucket(t, Side::Bottom, Plan::B).await, before);
        assert_eq!(f.positions(t, Side::Bottom, Plan::B).await, dense(2));
    }

    #[tokio::test]
    async fn test_swap_exchanges_triples() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(2).await;
        let a = f.sit(g[0], t, Side::Top, Plan::A).await;
        let b = f.sit(g[1], t, Side::Bottom, Plan::A).await;

        let outcome = f.engine.swap(f.owner, g[0], g[1], Plan::A).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Swapped { with, .. } if with == g[1]));

        let a_now = f.seat_of(g[0], Plan::A).await.unwrap();
        let b_now = f.seat_of(g[1], Plan::A).await.unwrap();
        assert_eq!((a_now.table_id, a_now.side, a_now.position), (t, Side::Bottom, 1));
        assert_eq!((b_now.table_id, b_now.side, b_now.position), (t, Side::Top, 1));
        assert_eq!(a_now.id, a.id);
        assert_eq!(b_now.id, b.id);
        assert_eq!(f.positions(t, Side::Top, Plan::A).await, dense(1));
        assert_eq!(f.positions(t, Side::Bottom, Plan::A).await, dense(1));
    }

    #[tokio::test]
    async fn test_swap_requires_both_seated() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(2).await;
        f.sit(g[0], t, Side::Top, Plan::A).await;

        let err = f.engine.swap(f.owner, g[0], g[1], Plan::A).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::GuestNotSeated);
        let same = f.engine.swap(f.owner, g[0], g[0], Plan::A).await.unwrap();
        assert!(matches!(same, MoveOutcome::Unchanged { .. }));
    }

    #[tokio::test]
    async fn test_drop_on_occupied_rect_seat_swaps() {
        let f = Fixture::new().await;
        let t1 = f.table(TableShape::Rectangular, Plan::A).await;
        let t2 = f.table(TableShape::SShaped, Plan::A).await;
        let g = f.guests(3).await;
        f.sit(g[0], t1, Side::Left, Plan::A).await;
        f.sit(g[1], t2, Side::Top, Plan::A).await;
        f.sit(g[2], t2, Side::Top, Plan::A).await;

        let outcome = f
            .engine
            .rect_drop_change(f.owner, g[0], at(t2, Side::Top, Some(2)), Plan::A)
            .await
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Swapped { with, .. } if with == g[2]));
        assert_eq!(f.bucket(t2, Side::Top, Plan::A).await, vec![g[1], g[0]]);
        assert_eq!(f.bucket(t1, Side::Left, Plan::A).await, vec![g[2]]);
    }

    #[tokio::test]
    async fn test_unseated_drop_on_rect_seat_evicts() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(2).await;
        f.sit(g[0], t, Side::Right, Plan::A).await;

        let outcome = f
            .engine
            .move_guest(f.owner, g[1], at(t, Side::Right, Some(1)), Plan::A)
            .await
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Overwrote { evicted, .. } if evicted == g[0]));
        assert!(f.seat_of(g[0], Plan::A).await.is_none());
        assert_eq!(f.bucket(t, Side::Right, Plan::A).await, vec![g[1]]);
    }

    #[tokio::test]
    async fn test_drop_on_occupied_round_seat_overwrites() {
        let f = Fixture::new().await;
        let round = f.table(TableShape::Round, Plan::A).await;
        let g = f.guests(4).await;
        for id in &g[..3] {
            f.sit(*id, round, Side::Ring, Plan::A).await;
        }

        // g[0] sits at 1; dropping it on slot 3 first closes its own gap,
        // so the occupant it replaces (g[2]) is then at slot 2
        let outcome = f
            .engine
            .move_guest(f.owner, g[0], at(round, Side::Ring, Some(3)), Plan::A)
            .await
            .unwrap();
        match outcome {
            MoveOutcome::Overwrote { seat, evicted } => {
                assert_eq!(evicted, g[2]);
                assert_eq!(seat.position, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(f.seat_of(g[2], Plan::A).await.is_none());
        assert_eq!(f.bucket(round, Side::Ring, Plan::A).await, vec![g[1], g[0]]);
        assert_eq!(f.positions(round, Side::Ring, Plan::A).await, dense(2));

        // an unseated guest overwrites too
        let outcome = f
            .engine
            .move_guest(f.owner, g[3], at(round, Side::Ring, Some(1)), Plan::A)
            .await
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Overwrote { evicted, .. } if evicted == g[1]));
        assert_eq!(f.bucket(round, Side::Ring, Plan::A).await, vec![g[3], g[0]]);
    }

    #[tokio::test]
    async fn test_move_to_empty_seat_relocates() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(3).await;
        f.sit(g[0], t, Side::Top, Plan::A).await;
        f.sit(g[1], t, Side::Top, Plan::A).await;
        f.sit(g[2], t, Side::Left, Plan::A).await;

        let outcome = f
            .engine
            .move_guest(f.owner, g[0], at(t, Side::Left, Some(9)), Plan::A)
            .await
            .unwrap();
        match outcome {
            MoveOutcome::Relocated { seat } => assert_eq!((seat.side, seat.position), (Side::Left, 2)),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(f.bucket(t, Side::Top, Plan::A).await, vec![g[1]]);
        assert_eq!(f.positions(t, Side::Top, Plan::A).await, dense(1));

        let unchanged = f
            .engine
            .move_guest(f.owner, g[0], at(t, Side::Left, Some(2)), Plan::A)
            .await
            .unwrap();
        assert!(matches!(unchanged, MoveOutcome::Unchanged { .. }));
    }

    #[tokio::test]
    async fn test_round_assign_with_explicit_slot() {
        let f = Fixture::new().await;
        let round = f.table(TableShape::Round, Plan::A).await;
        let g = f.guests(3).await;

        let first = f
            .engine
            .assign(f.owner, g[0], at(round, Side::Ring, Some(1)), Plan::A)
            .await
            .unwrap();
        assert_eq!(first.position, 1);

        let err = f
            .engine
            .assign(f.owner, g[1], at(round, Side::Ring, Some(5)), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPosition);

        // occupied slot: occupant is evicted
        f.engine
            .assign(f.owner, g[1], at(round, Side::Ring, Some(1)), Plan::A)
            .await
            .unwrap();
        assert!(f.seat_of(g[0], Plan::A).await.is_none());

        let appended = f.sit(g[2], round, Side::Ring, Plan::A).await;
        assert_eq!(appended.position, 2);
    }

    #[tokio::test]
    async fn test_assign_validation() {
        let f = Fixture::new().await;
        let round = f.table(TableShape::Round, Plan::A).await;
        let rect = f.table(TableShape::Rectangular, Plan::A).await;
        let rect_b = f.table(TableShape::Rectangular, Plan::B).await;
        let g = f.guests(1).await;
        let stranger = other_user(&f.db).await;

        let cases = [
            (at(round, Side::Top, None), Plan::A, ErrorCode::SideNotAllowed),
            (at(rect, Side::Ring, None), Plan::A, ErrorCode::SideNotAllowed),
            (at(round, Side::Ring, Some(0)), Plan::A, ErrorCode::InvalidPosition),
            (at(rect_b, Side::Top, None), Plan::A, ErrorCode::PlanMismatch),
            (at(rect + 100, Side::Top, None), Plan::A, ErrorCode::TableNotFound),
        ];
        for (dest, plan, code) in cases {
            let err = f.engine.assign(f.owner, g[0], dest, plan).await.unwrap_err();
            assert_eq!(err.code(), code, "{dest:?}");
        }

        let err = f
            .engine
            .assign(stranger, g[0], at(rect, Side::Top, None), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::GuestNotFound);
        assert!(f.seat_of(g[0], Plan::A).await.is_none());
    }

    #[tokio::test]
    async fn test_side_assign_ignores_client_slot() {
        let f = Fixture::new().await;
        let rect = f.table(TableShape::Rectangular, Plan::A).await;
        let s_table = f.table(TableShape::SShaped, Plan::A).await;
        let g = f.guests(3).await;

        // clients send the slot they think is next; the server decides
        let first = f
            .engine
            .assign(f.owner, g[0], at(rect, Side::Top, Some(1)), Plan::A)
            .await
            .unwrap();
        assert_eq!(first.position, 1);
        let second = f
            .engine
            .assign(f.owner, g[1], at(rect, Side::Top, Some(1)), Plan::A)
            .await
            .unwrap();
        assert_eq!(second.position, 2);
        let far = f
            .engine
            .assign(f.owner, g[2], at(s_table, Side::Bottom, Some(0)), Plan::A)
            .await
            .unwrap();
        assert_eq!((far.table_id, far.position), (s_table, 1));

        assert_eq!(f.bucket(rect, Side::Top, Plan::A).await, vec![g[0], g[1]]);
        assert_eq!(f.positions(rect, Side::Top, Plan::A).await, dense(2));
    }

    #[tokio::test]
    async fn test_move_seat_by_row_id() {
        let f = Fixture::new().await;
        let rect = f.table(TableShape::Rectangular, Plan::A).await;
        let round = f.table(TableShape::Round, Plan::A).await;
        let g = f.guests(3).await;
        let row = f.sit(g[0], rect, Side::Left, Plan::A).await;
        f.sit(g[1], rect, Side::Left, Plan::A).await;
        f.sit(g[2], round, Side::Ring, Plan::A).await;

        let outcome = f
            .engine
            .move_seat(f.owner, row.id, g[0], at(round, Side::Ring, None), Plan::A)
            .await
            .unwrap();
        match outcome {
            MoveOutcome::Relocated { seat } => assert_eq!((seat.table_id, seat.position), (round, 2)),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(f.bucket(rect, Side::Left, Plan::A).await, vec![g[1]]);
        assert_eq!(f.positions(rect, Side::Left, Plan::A).await, dense(1));

        // the old row is gone, and rows are checked against guest and plan
        let gone = f
            .engine
            .move_seat(f.owner, row.id, g[0], at(rect, Side::Top, None), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(gone.code(), ErrorCode::SeatNotFound);

        let other = f.seat_of(g[1], Plan::A).await.unwrap();
        let err = f
            .engine
            .move_seat(f.owner, other.id, g[0], at(rect, Side::Top, None), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        let err = f
            .engine
            .move_seat(f.owner, other.id, g[1], at(rect, Side::Top, None), Plan::B)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanMismatch);

        let stranger = other_user(&f.db).await;
        let err = f
            .engine
            .move_seat(stranger, other.id, g[1], at(rect, Side::Top, None), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SeatNotFound);
    }

    #[tokio::test]
    async fn test_rect_drop_change_rejects_round_tables() {
        let f = Fixture::new().await;
        let round = f.table(TableShape::Round, Plan::A).await;
        let g = f.guests(1).await;
        let err = f
            .engine
            .rect_drop_change(f.owner, g[0], at(round, Side::Ring, Some(1)), Plan::A)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SideNotAllowed);
    }

    #[tokio::test]
    async fn test_plans_are_independent() {
        let f = Fixture::new().await;
        let a = f.table(TableShape::Rectangular, Plan::A).await;
        let b = f.table(TableShape::Round, Plan::B).await;
        let g = f.guests(1).await;
        f.sit(g[0], a, Side::Top, Plan::A).await;
        f.sit(g[0], b, Side::Ring, Plan::B).await;

        f.engine.unassign(f.owner, g[0], Plan::A).await.unwrap();
        assert!(f.seat_of(g[0], Plan::A).await.is_none());
        assert_eq!(f.seat_of(g[0], Plan::B).await.unwrap().table_id, b);
    }

    #[tokio::test]
    async fn test_delete_guest_compacts_every_plan() {
        let f = Fixture::new().await;
        let a = f.table(TableShape::Rectangular, Plan::A).await;
        let b = f.table(TableShape::Round, Plan::B).await;
        let g = f.guests(3).await;
        for id in &g {
            f.sit(*id, a, Side::Left, Plan::A).await;
            f.sit(*id, b, Side::Ring, Plan::B).await;
        }

        f.engine.delete_guest(f.owner, g[0]).await.unwrap();
        assert_eq!(f.bucket(a, Side::Left, Plan::A).await, vec![g[1], g[2]]);
        assert_eq!(f.positions(a, Side::Left, Plan::A).await, dense(2));
        assert_eq!(f.positions(b, Side::Ring, Plan::B).await, dense(2));

        let err = f.engine.delete_guest(f.owner, g[0]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::GuestNotFound);
    }

    #[tokio::test]
    async fn test_concurrent_assigns_get_distinct_positions() {
        let f = Fixture::new().await;
        let t = f.table(TableShape::Rectangular, Plan::A).await;
        let g = f.guests(10).await;

        let mut handles = Vec::new();
        for id in g.clone() {
            let engine = f.engine.clone();
            let owner = f.owner;
            handles.push(tokio::spawn(async move {
                engine
                    .assign(owner, id, at(t, Side::Top, None), Plan::A)
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(f.positions(t, Side::Top, Plan::A).await, dense(10));
    }
}
