use crate::models::seat::build_seat_map;
use crate::models::selection::Selection;
use crate::utils::error::{AppError, AppResult};
use crate::utils::showtime;
use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;

/// Session-scoped selection store. The selection itself is a plain value
/// object; this service owns the explicit load/save lifecycle against the
/// `booking_session` table, one row per user.
pub struct SelectionService {
    pool: MySqlPool,
}

impl SelectionService {
    pub fn new(pool: MySqlPool) -> Self {
        SelectionService { pool }
    }

    pub async fn load(&self, user_id: i32) -> AppResult<Selection> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM booking_session WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((payload,)) => serde_json::from_str(&payload)
                .map_err(|e| AppError::DatabaseError(format!("corrupt selection payload: {}", e))),
            None => Ok(Selection::default()),
        }
    }

    pub async fn save(&self, user_id: i32, selection: &Selection) -> AppResult<()> {
        let payload = serde_json::to_string(selection)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO booking_session (user_id, payload, updated_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE payload = VALUES(payload), updated_at = VALUES(updated_at)
            "#,
        )
        .bind(user_id)
        .bind(&payload)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn clear(&self, user_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM booking_session WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Point the caller's selection at a show. Seat picks from a different
    /// show are dropped by the selection itself.
    pub async fn set_show(
        &self,
        user_id: i32,
        movie_id: String,
        movie_title: String,
        show_date: NaiveDate,
        showtime_label: String,
    ) -> AppResult<Selection> {
        if !showtime::is_listed(&showtime_label) {
            return Err(AppError::BadRequest(format!(
                "Unknown showtime: {}",
                showtime_label
            )));
        }
        if movie_id.trim().is_empty() {
            return Err(AppError::ValidationError("movie_id is required".into()));
        }

        let mut selection = self.load(user_id).await?;
        selection.set_show(movie_id, movie_title, show_date, showtime_label);
        self.save(user_id, &selection).await?;
        Ok(selection)
    }

    /// Toggle one seat in the caller's selection. A seat held by an active
    /// booking for the same show cannot be picked.
    pub async fn toggle_seat(&self, user_id: i32, seat_id: &str) -> AppResult<Selection> {
        let mut selection = self.load(user_id).await?;

        let (movie_id, show_date, showtime_label) = match (
            selection.movie_id.clone(),
            selection.show_date,
            selection.showtime.clone(),
        ) {
            (Some(m), Some(d), Some(t)) => (m, d, t),
            _ => {
                return Err(AppError::BadRequest(
                    "Select a movie, date and showtime before picking seats".into(),
                ))
            }
        };

        let seat = build_seat_map()
            .into_iter()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| AppError::NotFound(format!("Seat {} does not exist", seat_id)))?;

        let already_picked = selection.seat_ids().contains(seat_id);
        if !already_picked {
            let locked: Option<(i32,)> = sqlx::query_as(
                r#"
                SELECT id FROM booked_seat
                WHERE movie_id = ? AND show_date = ? AND showtime = ?
                  AND seat_id = ? AND expires_at > ?
                LIMIT 1
                "#,
            )
            .bind(&movie_id)
            .bind(show_date)
            .bind(&showtime_label)
            .bind(seat_id)
            .bind(Utc::now().naive_utc())
            .fetch_optional(&self.pool)
            .await?;

            if locked.is_some() {
                return Err(AppError::Conflict(format!(
                    "Seat {} is already booked",
                    seat_id
                )));
            }
        }

        selection.toggle(&seat);
        self.save(user_id, &selection).await?;
        Ok(selection)
    }
}
