use crate::models::booking::{
    BookingDetail, BookingRow, ConfirmBookingRequest, ConfirmBookingResponse, MyBookingsResponse,
};
use crate::models::seat::{build_seat_map, project_occupancy, SeatMapResponse};
use crate::models::selection::SeatPick;
use crate::services::selection_service::SelectionService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::showtime;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::MySqlPool;
use std::collections::HashSet;
use validator::Validate;

pub struct BookingService {
    pool: MySqlPool,
    selection_service: SelectionService,
}

impl BookingService {
    pub fn new(pool: MySqlPool) -> Self {
        BookingService {
            selection_service: SelectionService::new(pool.clone()),
            pool,
        }
    }

    /// Seat ids held by non-expired bookings for one show.
    pub async fn locked_seat_ids(
        &self,
        movie_id: &str,
        show_date: NaiveDate,
        showtime_label: &str,
        now: NaiveDateTime,
    ) -> AppResult<HashSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT seat_id FROM booked_seat
            WHERE movie_id = ? AND show_date = ? AND showtime = ? AND expires_at > ?
            "#,
        )
        .bind(movie_id)
        .bind(show_date)
        .bind(showtime_label)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// The polling view of a show's auditorium: the fixed seat map projected
    /// against active bookings and the caller's own picks for that show.
    pub async fn seat_view(
        &self,
        user_id: i32,
        movie_id: &str,
        show_date: NaiveDate,
        showtime_label: &str,
    ) -> AppResult<SeatMapResponse> {
        if !showtime::is_listed(showtime_label) {
            return Err(AppError::BadRequest(format!(
                "Unknown showtime: {}",
                showtime_label
            )));
        }

        let locked = self
            .locked_seat_ids(movie_id, show_date, showtime_label, Utc::now().naive_utc())
            .await?;

        // the caller's picks only count for the show they were made for
        let selection = self.selection_service.load(user_id).await?;
        let selected = if selection.movie_id.as_deref() == Some(movie_id)
            && selection.show_date == Some(show_date)
            && selection.showtime.as_deref() == Some(showtime_label)
        {
            selection.seat_ids()
        } else {
            HashSet::new()
        };

        let mut seats = build_seat_map();
        project_occupancy(&mut seats, &locked, &selected);
        Ok(SeatMapResponse { seats })
    }

    /// Persist a booking after the gateway reports payment success.
    ///
    /// The occupancy check below and the insert are two separate steps with
    /// no lock between them: two callers confirming the same seat at the
    /// same instant can both pass the check. This matches the source
    /// system's behavior and is a documented gap, not a guarantee.
    pub async fn confirm_booking(
        &self,
        user_id: i32,
        request: ConfirmBookingRequest,
    ) -> AppResult<ConfirmBookingResponse> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let selection = self.selection_service.load(user_id).await?;
        if !selection.is_complete() {
            return Err(AppError::BadRequest(
                "Booking details missing: pick a show and seats first".into(),
            ));
        }

        let movie_id = selection.movie_id.clone().unwrap_or_default();
        let movie_title = selection
            .movie_title
            .clone()
            .unwrap_or_else(|| "Untitled Movie".to_string());
        let show_date = selection
            .show_date
            .ok_or_else(|| AppError::BadRequest("No show date selected".into()))?;
        let showtime_label = selection
            .showtime
            .clone()
            .ok_or_else(|| AppError::BadRequest("No showtime selected".into()))?;

        let start = showtime::show_start(show_date, &showtime_label)?;
        let expires_at = showtime::expires_at(start);
        let now = Utc::now().naive_utc();
        if expires_at <= now {
            return Err(AppError::BadRequest(
                "This show has already ended".into(),
            ));
        }

        // optimistic re-check against current occupancy
        let locked = self
            .locked_seat_ids(&movie_id, show_date, &showtime_label, now)
            .await?;
        let clashing: Vec<String> = selection
            .seat_ids()
            .intersection(&locked)
            .cloned()
            .collect();
        if !clashing.is_empty() {
            return Err(AppError::Conflict(format!(
                "Seats no longer available: {}",
                clashing.join(", ")
            )));
        }

        let total_paid = selection.total();
        let seats_json = serde_json::to_string(&selection.seats)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO booking
                (user_id, user_name, user_email, movie_id, movie_title,
                 show_date, showtime, seats, total_paid, payment_id,
                 created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&movie_id)
        .bind(&movie_title)
        .bind(show_date)
        .bind(&showtime_label)
        .bind(&seats_json)
        .bind(total_paid)
        .bind(&request.payment_id)
        .bind(now)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        let booking_id = result.last_insert_id() as i32;

        for pick in &selection.seats {
            sqlx::query(
                r#"
                INSERT INTO booked_seat
                    (booking_id, movie_id, show_date, showtime, seat_id, expires_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(booking_id)
            .bind(&movie_id)
            .bind(show_date)
            .bind(&showtime_label)
            .bind(&pick.id)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "booking {} confirmed for user {} ({} seats)",
            booking_id,
            user_id,
            selection.seats.len()
        );

        self.selection_service.clear(user_id).await?;

        Ok(ConfirmBookingResponse {
            booking: BookingDetail {
                booking_id,
                movie_id,
                movie_title,
                show_date,
                showtime: showtime_label,
                seats: selection.seats.clone(),
                total_paid,
                payment_id: request.payment_id,
                expires_at,
            },
            booking_status: "Confirmed".to_string(),
        })
    }

    /// The caller's bookings, newest first, split into active and expired.
    pub async fn my_bookings(&self, user_id: i32) -> AppResult<MyBookingsResponse> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, user_name, user_email, movie_id, movie_title,
                   show_date, showtime, seats, total_paid, payment_id,
                   created_at, expires_at
            FROM booking
            WHERE user_id = ?
            ORDER BY show_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let details = rows
            .into_iter()
            .map(booking_detail)
            .collect::<AppResult<Vec<_>>>()?;
        let (active, expired) = partition_by_expiry(details, Utc::now().naive_utc());

        Ok(MyBookingsResponse { active, expired })
    }

    /// Drop booked-seat rows whose hold window has passed. Bookings
    /// themselves are kept as history.
    pub async fn sweep_expired(&self, now: NaiveDateTime) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM booked_seat WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub fn selection(&self) -> &SelectionService {
        &self.selection_service
    }
}

fn booking_detail(row: BookingRow) -> AppResult<BookingDetail> {
    let seats: Vec<SeatPick> = serde_json::from_str(&row.seats)
        .map_err(|e| AppError::DatabaseError(format!("corrupt seats payload: {}", e)))?;
    Ok(BookingDetail {
        booking_id: row.id,
        movie_id: row.movie_id,
        movie_title: row.movie_title,
        show_date: row.show_date,
        showtime: row.showtime,
        seats,
        total_paid: row.total_paid,
        payment_id: row.payment_id,
        expires_at: row.expires_at,
    })
}

fn partition_by_expiry(
    details: Vec<BookingDetail>,
    now: NaiveDateTime,
) -> (Vec<BookingDetail>, Vec<BookingDetail>) {
    details.into_iter().partition(|b| b.expires_at > now)
}
