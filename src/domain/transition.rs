use crate::domain::{PaymentStatus, ReservationStatus};

/// What happens to the payment row when a reservation changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    /// Insert or update the row with status Pending and a freshly
    /// recomputed amount.
    UpsertPending,
    /// Insert or update the row with status Successful and a freshly
    /// recomputed amount.
    UpsertSuccessful,
    /// Leave the row untouched. A Successful payment is never reversed;
    /// refunds are out of scope.
    Preserve,
    /// Delete the row if present.
    Delete,
}

/// What happens to the passenger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerAction {
    /// Insert the row, or update it in place when one already exists.
    Upsert,
    /// Ensure no row exists.
    Remove,
}

/// What happens to the seat the reservation ends up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAction {
    Claim,
    Release,
}

/// The full action set for one lifecycle transition. The booking service
/// applies a plan as a single database transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub payment: PaymentAction,
    pub passenger: PassengerAction,
    pub seat: SeatAction,
}

/// Plan for creating a reservation. Creating a Canceled reservation has no
/// meaningful action set and is rejected upstream, so this returns `None`.
pub fn create_plan(requested: ReservationStatus) -> Option<TransitionPlan> {
    match requested {
        ReservationStatus::Confirmed => Some(TransitionPlan {
            payment: PaymentAction::UpsertSuccessful,
            passenger: PassengerAction::Upsert,
            seat: SeatAction::Claim,
        }),
        ReservationStatus::Pending => Some(TransitionPlan {
            payment: PaymentAction::UpsertPending,
            passenger: PassengerAction::Remove,
            seat: SeatAction::Claim,
        }),
        ReservationStatus::Canceled => None,
    }
}

/// Plan for updating a reservation to `requested`, given the status of its
/// current payment row (if any). Pure function of its inputs; the prior
/// reservation status never changes the outcome, only the payment does.
pub fn update_plan(
    requested: ReservationStatus,
    prior_payment: Option<PaymentStatus>,
) -> TransitionPlan {
    let paid = prior_payment == Some(PaymentStatus::Successful);

    match requested {
        ReservationStatus::Confirmed => TransitionPlan {
            payment: PaymentAction::UpsertSuccessful,
            passenger: PassengerAction::Upsert,
            seat: SeatAction::Claim,
        },
        ReservationStatus::Pending => TransitionPlan {
            // A payment that already went through stays Successful even if
            // the booking drops back to Pending.
            payment: if paid {
                PaymentAction::Preserve
            } else {
                PaymentAction::UpsertPending
            },
            passenger: PassengerAction::Remove,
            seat: SeatAction::Claim,
        },
        ReservationStatus::Canceled => TransitionPlan {
            // No refund flow: a Successful payment survives cancellation.
            payment: if paid {
                PaymentAction::Preserve
            } else {
                PaymentAction::Delete
            },
            passenger: PassengerAction::Remove,
            seat: SeatAction::Release,
        },
    }
}
