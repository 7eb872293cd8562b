use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a booking entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    /// Requested by a guest, awaiting a receptionist decision.
    #[sea_orm(string_value = "online")]
    Online,
    /// Entered at the desk with payment taken up front.
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Canonical lifecycle state of a booking.
///
/// ```text
/// pending ──accept──▶ accepted ──check-in──▶ checked-in ──check-out──▶ checked-out
///    │                   │
///    └──decline──▶ declined        (cancel is allowed from any state)
/// ```
///
/// Manual bookings are created directly in `accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
pub enum BookingState {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
    #[sea_orm(string_value = "checked-in")]
    CheckedIn,
    #[sea_orm(string_value = "checked-out")]
    CheckedOut,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingState {
    /// States that no longer hold a room for their date range.
    pub const RELEASED: [BookingState; 2] = [BookingState::Declined, BookingState::Cancelled];

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingState::Declined | BookingState::CheckedOut | BookingState::Cancelled
        )
    }

    /// Guest-facing lifecycle label.
    pub fn guest_label(self) -> &'static str {
        match self {
            BookingState::Pending | BookingState::Accepted => "Pending",
            BookingState::CheckedIn => "Checked In",
            BookingState::CheckedOut => "Checked Out",
            BookingState::Declined | BookingState::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Unpaid")]
    Unpaid,
    #[sea_orm(string_value = "Paid")]
    Paid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub guest_name: String,
    pub room_number: Option<String>,
    pub room_type: String,
    pub checkin_date: Date,
    pub checkout_date: Date,
    pub phone: String,
    pub booking_type: BookingType,
    pub receptionist_status: BookingState,
    pub payment_status: PaymentStatus,
    pub payment_uploaded: bool,
    pub payment_verified: bool,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_image: Option<String>,
    pub gcash_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
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
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    #[sea_orm(has_one = "super::rating::Entity")]
    Rating,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rating.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
