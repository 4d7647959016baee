use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use ctor::dtor;
use movie_booking_system::models::booking::ConfirmBookingRequest;
use movie_booking_system::models::seat::SeatStatus;
use movie_booking_system::models::user::UserRegistrationRequest;
use movie_booking_system::services::booking_service::BookingService;
use movie_booking_system::services::selection_service::SelectionService;
use movie_booking_system::services::user_service::UserService;
use movie_booking_system::utils::error::AppError;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool as Pool;
use std::sync::atomic::{AtomicU32, Ordering};

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

static SEQ: AtomicU32 = AtomicU32::new(0);

fn unique(prefix: &str) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

// a date far enough out that show start + 6h is always in the future
fn future_show_date() -> NaiveDate {
    (Utc::now() + Duration::days(30)).date_naive()
}

async fn register_user(pool: &Pool) -> Result<i32> {
    let user_service = UserService::new(pool.clone());
    let user_id = user_service
        .register_user(UserRegistrationRequest {
            username: unique("booker"),
            password: "hunter2!".to_string(),
        })
        .await?;
    Ok(user_id)
}

async fn pick_show_and_seats(
    selection_service: &SelectionService,
    user_id: i32,
    movie_id: &str,
    date: NaiveDate,
    showtime: &str,
    seats: &[&str],
) -> Result<()> {
    selection_service
        .set_show(
            user_id,
            movie_id.to_string(),
            "Interstellar".to_string(),
            date,
            showtime.to_string(),
        )
        .await?;
    for seat in seats {
        selection_service.toggle_seat(user_id, seat).await?;
    }
    Ok(())
}

fn confirm_request() -> ConfirmBookingRequest {
    ConfirmBookingRequest {
        payment_id: unique("pay"),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    }
}

#[tokio::test]
async fn confirmed_booking_locks_seats_for_other_bookers() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let selection_service = SelectionService::new(pool.clone());

    let booker = register_user(&pool).await?;
    let other = register_user(&pool).await?;
    let movie_id = unique("movie");
    let date = future_show_date();

    pick_show_and_seats(&selection_service, booker, &movie_id, date, "8:00 PM", &["A1", "D5"])
        .await?;

    let response = booking_service
        .confirm_booking(booker, confirm_request())
        .await?;
    assert_eq!(response.booking_status, "Confirmed");
    assert_eq!(response.booking.seats.len(), 2);
    // A1 is tier 1, D5 is tier 2
    assert_eq!(response.booking.total_paid, Decimal::from(3));

    // the booker's selection is consumed by checkout
    let selection = selection_service.load(booker).await?;
    assert!(selection.seats.is_empty());

    // another booker polling the same show sees the seats locked
    let view = booking_service
        .seat_view(other, &movie_id, date, "8:00 PM")
        .await?;
    for id in ["A1", "D5"] {
        let seat = view.seats.iter().find(|s| s.id == id).unwrap();
        assert_eq!(seat.status, SeatStatus::Locked, "{} should be locked", id);
    }
    let free = view.seats.iter().find(|s| s.id == "A2").unwrap();
    assert_eq!(free.status, SeatStatus::Available);

    Ok(())
}

#[tokio::test]
async fn locked_seat_cannot_be_toggled() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let selection_service = SelectionService::new(pool.clone());

    let booker = register_user(&pool).await?;
    let other = register_user(&pool).await?;
    let movie_id = unique("movie");
    let date = future_show_date();

    pick_show_and_seats(&selection_service, booker, &movie_id, date, "6:30 PM", &["C3"]).await?;
    booking_service
        .confirm_booking(booker, confirm_request())
        .await?;

    selection_service
        .set_show(
            other,
            movie_id.clone(),
            "Interstellar".to_string(),
            date,
            "6:30 PM".to_string(),
        )
        .await?;
    let err = selection_service.toggle_seat(other, "C3").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // the same seat at a different showtime is untouched
    selection_service
        .set_show(
            other,
            movie_id,
            "Interstellar".to_string(),
            date,
            "9:30 PM".to_string(),
        )
        .await?;
    assert!(selection_service.toggle_seat(other, "C3").await.is_ok());

    Ok(())
}

#[tokio::test]
async fn concurrent_checkout_clash_is_caught_at_confirm() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let selection_service = SelectionService::new(pool.clone());

    let slow = register_user(&pool).await?;
    let fast = register_user(&pool).await?;
    let movie_id = unique("movie");
    let date = future_show_date();

    // both bookers pick E4 before either pays
    pick_show_and_seats(&selection_service, slow, &movie_id, date, "5:00 PM", &["E4"]).await?;
    pick_show_and_seats(&selection_service, fast, &movie_id, date, "5:00 PM", &["E4"]).await?;

    booking_service
        .confirm_booking(fast, confirm_request())
        .await?;

    let err = booking_service
        .confirm_booking(slow, confirm_request())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn confirm_requires_a_complete_selection_and_valid_contact() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let selection_service = SelectionService::new(pool.clone());
    let booker = register_user(&pool).await?;

    // nothing selected yet
    let err = booking_service
        .confirm_booking(booker, confirm_request())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    pick_show_and_seats(
        &selection_service,
        booker,
        &unique("movie"),
        future_show_date(),
        "2:00 PM",
        &["F6"],
    )
    .await?;

    let err = booking_service
        .confirm_booking(
            booker,
            ConfirmBookingRequest {
                payment_id: unique("pay"),
                name: "Ada Lovelace".to_string(),
                email: "not-an-email".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    Ok(())
}

#[tokio::test]
async fn expired_bookings_leave_active_views_and_get_swept() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let booker = register_user(&pool).await?;
    let movie_id = unique("movie");
    let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let expired_at = date.and_hms_opt(20, 0, 0).unwrap();

    // seed a long-finished booking directly; confirm() refuses past shows
    let result = sqlx::query(
        r#"
        INSERT INTO booking
            (user_id, user_name, user_email, movie_id, movie_title,
             show_date, showtime, seats, total_paid, payment_id,
             created_at, expires_at)
        VALUES (?, 'Ada Lovelace', 'ada@example.com', ?, 'Interstellar',
                ?, '2:00 PM', ?, 2.00, 'pay_old', ?, ?)
        "#,
    )
    .bind(booker)
    .bind(&movie_id)
    .bind(date)
    .bind(r#"[{"id":"G7","price":"2"}]"#)
    .bind(expired_at)
    .bind(expired_at)
    .execute(&pool)
    .await?;
    let booking_id = result.last_insert_id() as i32;

    sqlx::query(
        r#"
        INSERT INTO booked_seat
            (booking_id, movie_id, show_date, showtime, seat_id, expires_at)
        VALUES (?, ?, ?, '2:00 PM', 'G7', ?)
        "#,
    )
    .bind(booking_id)
    .bind(&movie_id)
    .bind(date)
    .bind(expired_at)
    .execute(&pool)
    .await?;

    // the expired record is history, not occupancy
    let bookings = booking_service.my_bookings(booker).await?;
    assert!(bookings.active.is_empty());
    assert_eq!(bookings.expired.len(), 1);
    assert_eq!(bookings.expired[0].seats[0].id, "G7");

    let locked = booking_service
        .locked_seat_ids(&movie_id, date, "2:00 PM", Utc::now().naive_utc())
        .await?;
    assert!(locked.is_empty());

    let swept = booking_service.sweep_expired(Utc::now().naive_utc()).await?;
    assert!(swept >= 1);

    Ok(())
}

#[tokio::test]
async fn seat_view_rejects_unknown_showtimes() -> Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };

    let booking_service = BookingService::new(pool.clone());
    let booker = register_user(&pool).await?;

    let err = booking_service
        .seat_view(booker, "550", future_show_date(), "1:00 AM")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}
