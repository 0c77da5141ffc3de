//! Seating chart
//!
//! Flat, printable rows in global-index order. Tables without guests still
//! get one row so they show up on the printout.

use std::collections::HashMap;

use shared::models::{Guest, SeatingChartRow};

use super::index::{PlanSnapshot, ordered_seats};

pub fn build_chart(snapshot: &PlanSnapshot, guests: &[Guest]) -> Vec<SeatingChartRow> {
    let by_id: HashMap<i64, &Guest> = guests.iter().map(|g| (g.id, g)).collect();
    let ordered = ordered_seats(&snapshot.tables, &snapshot.seats);

    let mut tables: Vec<_> = snapshot.tables.iter().collect();
    tables.sort_by_key(|t| t.id);

    let mut rows = Vec::with_capacity(ordered.len() + tables.len());
    let mut next_index = 1u32;
    for table in tables {
        let mut seated = ordered.iter().filter(|s| s.table_id == table.id).peekable();
        if seated.peek().is_none() {
            rows.push(SeatingChartRow {
                global_index: None,
                table_id: table.id,
                table_name: table.name.clone(),
                table_shape: table.shape,
                side: None,
                side_label: None,
                position: None,
                guest_id: None,
                guest_name: None,
                intolerances: Vec::new(),
                other_text: None,
            });
            continue;
        }
        for seat in seated {
            let guest = by_id.get(&seat.guest_id);
            rows.push(SeatingChartRow {
                global_index: Some(next_index),
                table_id: table.id,
                table_name: table.name.clone(),
                table_shape: table.shape,
                side: Some(seat.side),
                side_label: Some(seat.side.label().to_string()),
                position: Some(seat.position),
                guest_id: Some(seat.guest_id),
                guest_name: guest.map(|g| g.name.clone()),
                intolerances: guest.map(|g| g.intolerances.clone()).unwrap_or_default(),
                other_text: guest.and_then(|g| g.other_text.clone()),
            });
            next_index += 1;
        }
    }
    rows
}
