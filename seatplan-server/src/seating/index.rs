//! Global Index Assigner
//!
//! Numbers every seated guest of a plan `1..=K`, walking tables by ascending
//! id and, inside a table, ring slots by position or the four sides in
//! [`INDEX_SIDE_ORDER`](super::policy::INDEX_SIDE_ORDER). Nothing is cached;
//! every read recomputes from a fresh snapshot.

use std::collections::{BTreeMap, HashSet};

use shared::models::{Plan, SeatAssignment, SeatingTable};
use sqlx::SqlitePool;

use super::policy::index_rank;
use crate::db::seat;

/// Tables and seats of one plan, read together
#[derive(Debug, Clone, Default)]
pub struct PlanSnapshot {
    pub tables: Vec<SeatingTable>,
    pub seats: Vec<SeatAssignment>,
}

impl PlanSnapshot {
    /// Both reads share one transaction so they see the same state
    pub async fn load(pool: &SqlitePool, user_id: i64, plan: Plan) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let tables = sqlx::query_as::<_, SeatingTable>(
            "SELECT id, name, shape, plan FROM seating_table WHERE user_id = ? AND plan = ? ORDER BY id",
        )
        .bind(user_id)
        .bind(plan)
        .fetch_all(&mut *tx)
        .await?;

        let mut seats = Vec::new();
        for t in &tables {
            seats.extend(seat::list_for_table(&mut tx, t.id, plan).await?);
        }
        tx.commit().await?;
        Ok(Self { tables, seats })
    }

    pub fn global_indexes(&self) -> BTreeMap<i64, u32> {
        assign_global_indexes(&self.tables, &self.seats)
    }
}

/// Seats in numbering order; seats whose table is missing are skipped
pub fn ordered_seats<'a>(
    tables: &[SeatingTable],
    seats: &'a [SeatAssignment],
) -> Vec<&'a SeatAssignment> {
    let known: HashSet<i64> = tables.iter().map(|t| t.id).collect();
    let mut ordered: Vec<&SeatAssignment> = seats
        .iter()
        .filter(|s| known.contains(&s.table_id))
        .collect();
    ordered.sort_by_key(|s| (s.table_id, index_rank(s.side), s.position, s.guest_id));
    ordered
}

/// Map of guest id to its 1-based global index; unseated guests are absent
pub fn assign_global_indexes(
    tables: &[SeatingTable],
    seats: &[SeatAssignment],
) -> BTreeMap<i64, u32> {
    ordered_seats(tables, seats)
        .into_iter()
        .zip(1u32..)
        .map(|(seat, index)| (seat.guest_id, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Side, TableShape};

    fn table(id: i64, shape: TableShape) -> SeatingTable {
        SeatingTable {
            id,
            name: format!("T{id}"),
            shape,
            plan: Plan::A,
        }
    }

    fn seat(guest_id: i64, table_id: i64, side: Side, position: i32) -> SeatAssignment {
        SeatAssignment {
            id: guest_id * 10,
            guest_id,
            table_id,
            side,
            position,
            plan: Plan::A,
        }
    }

    #[test]
    fn test_round_then_rect_example() {
        let tables = vec![table(1, TableShape::Round), table(2, TableShape::Rectangular)];
        let seats = vec![
            seat(30, 2, Side::Left, 1),
            seat(20, 2, Side::Top, 1),
            seat(10, 1, Side::Ring, 1),
        ];
        let index = assign_global_indexes(&tables, &seats);
        assert_eq!(index[&10], 1);
        assert_eq!(index[&20], 2);
        assert_eq!(index[&30], 3);
    }

    #[test]
    fn test_right_before_bottom() {
        let tables = vec![table(5, TableShape::SShaped)];
        let seats = vec![
            seat(1, 5, Side::Bottom, 1),
            seat(2, 5, Side::Right, 2),
            seat(3, 5, Side::Right, 1),
            seat(4, 5, Side::Left, 1),
            seat(5, 5, Side::Top, 2),
            seat(6, 5, Side::Top, 1),
        ];
        let index = assign_global_indexes(&tables, &seats);
        let order: Vec<i64> = {
            let mut pairs: Vec<_> = index.iter().collect();
            pairs.sort_by_key(|(_, i)| **i);
            pairs.into_iter().map(|(g, _)| *g).collect()
        };
        assert_eq!(order, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_tables_walk_by_id_not_input_order() {
        let tables = vec![table(9, TableShape::Round), table(3, TableShape::Round)];
        let seats = vec![seat(1, 9, Side::Ring, 1), seat(2, 3, Side::Ring, 1)];
        let index = assign_global_indexes(&tables, &seats);
        assert_eq!(index[&2], 1);
        assert_eq!(index[&1], 2);
    }

    #[test]
    fn test_deterministic_bijection() {
        let tables = vec![
            table(1, TableShape::Rectangular),
            table(2, TableShape::Round),
            table(4, TableShape::SShaped),
        ];
        let mut seats = Vec::new();
        let mut guest = 100;
        for (t, sides) in [
            (1, Side::RECT_SIDES.to_vec()),
            (2, vec![Side::Ring]),
            (4, Side::RECT_SIDES.to_vec()),
        ] {
            for side in sides {
                for position in 1..=3 {
                    seats.push(seat(guest, t, side, position));
                    guest += 1;
                }
            }
        }

        let first = assign_global_indexes(&tables, &seats);
        seats.reverse();
        let second = assign_global_indexes(&tables, &seats);
        assert_eq!(first, second);

        let mut values: Vec<u32> = first.values().copied().collect();
        values.sort_unstable();
        assert_eq!(values, (1..=seats.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_unknown_tables_and_empty_snapshot() {
        let tables = vec![table(1, TableShape::Round)];
        let seats = vec![seat(1, 1, Side::Ring, 1), seat(2, 99, Side::Ring, 1)];
        let index = assign_global_indexes(&tables, &seats);
        assert_eq!(index.len(), 1);
        assert!(!index.contains_key(&2));
        assert!(PlanSnapshot::default().global_indexes().is_empty());
    }

    #[tokio::test]
    async fn test_table_delete_unseats_guests() {
        use crate::db::table;
        use crate::db::testing::db_with_user;
        use crate::seating::{Destination, SeatingEngine};
        use shared::models::{GuestCreate, TableCreate};

        let (db, owner) = db_with_user().await;
        let engine = SeatingEngine::new(db.pool.clone());
        let mut tables = Vec::new();
        for shape in [TableShape::Round, TableShape::Rectangular] {
            let created = table::create(
                &db.pool,
                owner,
                &TableCreate {
                    name: "t".into(),
                    shape,
                    plan: Plan::A,
                },
            )
            .await
            .unwrap();
            tables.push(created);
        }
        let mut guests = Vec::new();
        for name in ["a", "b", "c"] {
            let g = crate::db::guest::create(
                &db.pool,
                owner,
                &GuestCreate {
                    name: name.into(),
                    category_id: None,
                    intolerances: vec![],
                    other_text: None,
                },
            )
            .await
            .unwrap();
            guests.push(g.id);
        }
        let seats = [
            (guests[0], tables[0].id, Side::Ring),
            (guests[1], tables[1].id, Side::Top),
            (guests[2], tables[1].id, Side::Left),
        ];
        for (g, t, side) in seats {
            engine
                .assign(
                    owner,
                    g,
                    Destination {
                        table_id: t,
                        side,
                        position: None,
                    },
                    Plan::A,
                )
                .await
                .unwrap();
        }

        let snapshot = PlanSnapshot::load(&db.pool, owner, Plan::A).await.unwrap();
        let index = snapshot.global_indexes();
        assert_eq!(index.get(&guests[0]), Some(&1));
        assert_eq!(index.get(&guests[1]), Some(&2));
        assert_eq!(index.get(&guests[2]), Some(&3));

        table::delete(&db.pool, owner, tables[0].id).await.unwrap();
        let snapshot = PlanSnapshot::load(&db.pool, owner, Plan::A).await.unwrap();
        assert!(snapshot.seats.iter().all(|s| s.table_id != tables[0].id));
        let index = snapshot.global_indexes();
        assert_eq!(index.get(&guests[0]), None);
        assert_eq!(index.get(&guests[1]), Some(&1));
        assert_eq!(index.get(&guests[2]), Some(&2));
    }
}
