use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, Utc};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use serde::Serialize;

use crate::entities::booking::{self, BookingState};
use crate::entities::payment;
use crate::entities::room::{self, RoomStatus};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_rooms: u64,
    pub occupied_rooms: u64,
    pub current_guests: usize,
    pub monthly_revenue: f64,
    pub pending_payments: u64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RoomTypeAvailability {
    pub room_type: String,
    pub total_rooms: u64,
    pub booked: u64,
    pub available: u64,
}

pub async fn dashboard_stats<C: ConnectionTrait>(db: &C) -> AppResult<DashboardStats> {
    let total_rooms = room::Entity::find().count(db).await?;
    let occupied_rooms = room::Entity::find()
        .filter(room::Column::Status.eq(RoomStatus::Occupied))
        .count(db)
        .await?;

    let current_guests = booking::Entity::find()
        .filter(booking::Column::ReceptionistStatus.eq(BookingState::CheckedIn))
        .all(db)
        .await?
        .iter()
        .map(|b| b.user_id)
        .collect::<HashSet<_>>()
        .len();

    let since: DateTimeWithTimeZone = (Utc::now() - Duration::days(30)).into();
    let monthly_revenue: f64 = payment::Entity::find()
        .filter(payment::Column::PaymentDate.gte(since))
        .all(db)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum();

    let pending_payments = booking::Entity::find()
        .filter(booking::Column::PaymentUploaded.eq(true))
        .filter(booking::Column::PaymentVerified.eq(false))
        .count(db)
        .await?;

    Ok(DashboardStats {
        total_rooms,
        occupied_rooms,
        current_guests,
        monthly_revenue,
        pending_payments,
    })
}

/// Per room type: how many rooms exist and how many are occupied right now.
pub fn summarize_by_type(rooms: &[room::Model]) -> Vec<RoomTypeAvailability> {
    let mut by_type: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for room in rooms {
        let entry = by_type.entry(room.room_type.as_str()).or_default();
        entry.0 += 1;
        if room.status == RoomStatus::Occupied {
            entry.1 += 1;
        }
    }

    by_type
        .into_iter()
        .map(|(room_type, (total, booked))| RoomTypeAvailability {
            room_type: room_type.to_string(),
            total_rooms: total,
            booked,
            available: total - booked,
        })
        .collect()
}

pub async fn availability_by_type<C: ConnectionTrait>(
    db: &C,
) -> AppResult<Vec<RoomTypeAvailability>> {
    let rooms = room::Entity::find().all(db).await?;
    Ok(summarize_by_type(&rooms))
}
