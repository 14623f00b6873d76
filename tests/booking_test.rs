//! Booking, lifecycle and session flows against a real SQLite store.

mod common;

use futures::future::join_all;
use tokio_test::{assert_err, assert_ok};

use hospital_booking::domain::{AppointmentStatus, BookingRequest, DoctorStatus, UserRole};
use hospital_booking::errors::AppError;
use hospital_booking::services::ServiceContainer;

use common::{TestApp, PASSWORD};

fn slot(doctor_id: uuid::Uuid, date: &str, time: &str) -> BookingRequest {
    BookingRequest {
        doctor_id: Some(doctor_id),
        date: Some(date.into()),
        time: Some(time.into()),
    }
}

#[tokio::test]
async fn test_concurrent_bookings_for_one_slot_admit_exactly_one() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;

    let mut patients = Vec::new();
    for name in ["Ann", "Bob", "Cat", "Dan", "Eve"] {
        patients.push(app.patient(name).await);
    }

    let appointments = app.services.appointments();
    let results = join_all(patients.iter().map(|patient| {
        let appointments = appointments.clone();
        let request = slot(doctor.id, "2025-06-01", "10:00");
        let patient_id = patient.id;
        async move { appointments.book(patient_id, request).await }
    }))
    .await;

    let booked = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::SlotConflict)))
        .count();

    assert_eq!(booked, 1);
    assert_eq!(conflicts, patients.len() - 1);
}

#[tokio::test]
async fn test_spawned_bookings_for_one_slot_admit_exactly_one() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr Grey").await;
    let first = app.patient("Ann").await;
    let second = app.patient("Bob").await;

    let handles: Vec<_> = [first.id, second.id]
        .into_iter()
        .map(|patient_id| {
            let appointments = app.services.appointments();
            let request = slot(doctor.id, "2025-06-02", "09:30");
            tokio::spawn(async move { appointments.book(patient_id, request).await })
        })
        .collect();

    let mut booked = 0;
    for handle in handles {
        if handle.await.expect("task panicked").is_ok() {
            booked += 1;
        }
    }

    assert_eq!(booked, 1);
}

#[tokio::test]
async fn test_rejected_slot_can_be_booked_again() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let ann = app.patient("Ann").await;
    let bob = app.patient("Bob").await;
    let appointments = app.services.appointments();

    let first = assert_ok!(
        appointments
            .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );
    assert_eq!(first.status, AppointmentStatus::Pending);

    let taken = appointments
        .book(bob.id, slot(doctor.id, "2025-06-01", "10:00"))
        .await;
    assert!(matches!(taken, Err(AppError::SlotConflict)));

    assert_ok!(
        appointments
            .set_status(doctor.id, first.id, AppointmentStatus::Rejected)
            .await
    );

    let rebooked = assert_ok!(
        appointments
            .book(bob.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );
    assert_eq!(rebooked.patient_id, bob.id);
}

#[tokio::test]
async fn test_completed_slot_stays_taken_and_counts_as_experience() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let ann = app.patient("Ann").await;
    let bob = app.patient("Bob").await;
    let appointments = app.services.appointments();

    let booked = assert_ok!(
        appointments
            .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );
    assert_ok!(
        appointments
            .set_status(doctor.id, booked.id, AppointmentStatus::Completed)
            .await
    );

    let again = appointments
        .book(bob.id, slot(doctor.id, "2025-06-01", "10:00:00"))
        .await;
    assert!(matches!(again, Err(AppError::SlotConflict)));

    let listed = assert_ok!(app.services.doctors().get_doctor(doctor.id).await);
    assert_eq!(listed.experience_count, 1);
}

#[tokio::test]
async fn test_resolved_appointment_is_immutable() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let other = app.doctor("Dr Grey").await;
    let ann = app.patient("Ann").await;
    let appointments = app.services.appointments();

    let booked = assert_ok!(
        appointments
            .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );

    let foreign = appointments
        .set_status(other.id, booked.id, AppointmentStatus::Completed)
        .await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    assert_ok!(
        appointments
            .set_status(doctor.id, booked.id, AppointmentStatus::Completed)
            .await
    );

    let second = appointments
        .set_status(doctor.id, booked.id, AppointmentStatus::Rejected)
        .await;
    assert!(matches!(second, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_leave_blocks_booking_until_return_is_approved() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let ann = app.patient("Ann").await;
    let doctors = app.services.doctors();
    let appointments = app.services.appointments();

    assert_eq!(
        assert_ok!(doctors.request_leave(doctor.id).await),
        DoctorStatus::LeaveRequested
    );

    let pending = appointments
        .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
        .await;
    assert!(matches!(pending, Err(AppError::DoctorUnavailable)));

    assert_eq!(
        assert_ok!(doctors.review_status(doctor.id, DoctorStatus::OnLeave).await),
        DoctorStatus::OnLeave
    );
    let blocked = appointments
        .book(ann.id, slot(doctor.id, "2025-06-01", "11:00"))
        .await;
    assert!(matches!(blocked, Err(AppError::DoctorUnavailable)));

    assert_ok!(doctors.request_return(doctor.id).await);
    let still_blocked = appointments
        .book(ann.id, slot(doctor.id, "2025-06-01", "11:00"))
        .await;
    assert!(matches!(still_blocked, Err(AppError::DoctorUnavailable)));

    assert_eq!(
        assert_ok!(doctors.review_status(doctor.id, DoctorStatus::Active).await),
        DoctorStatus::Active
    );
    assert_ok!(
        appointments
            .book(ann.id, slot(doctor.id, "2025-06-01", "11:00"))
            .await
    );
}

#[tokio::test]
async fn test_review_without_pending_request_is_invalid() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let doctors = app.services.doctors();

    let result = doctors.review_status(doctor.id, DoctorStatus::OnLeave).await;
    assert!(matches!(result, Err(AppError::InvalidTransition { .. })));

    assert_ok!(doctors.request_leave(doctor.id).await);
    let twice = doctors.request_leave(doctor.id).await;
    assert!(matches!(twice, Err(AppError::InvalidTransition { .. })));
}

#[tokio::test]
async fn test_concurrent_reviews_apply_once() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let doctors = app.services.doctors();
    assert_ok!(doctors.request_leave(doctor.id).await);

    let results = join_all([DoctorStatus::OnLeave, DoctorStatus::Active].map(|target| {
        let doctors = doctors.clone();
        async move { doctors.review_status(doctor.id, target).await }
    }))
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
}

#[tokio::test]
async fn test_register_then_login_issues_patient_claims() {
    let app = TestApp::new().await;
    let auth = app.services.auth();

    let user = assert_ok!(
        auth.register("Ann".into(), "  Ann@Example.com ".into(), PASSWORD.into())
            .await
    );
    assert_eq!(user.email, "ann@example.com");
    assert_eq!(user.role, UserRole::Patient);

    let duplicate = auth
        .register("Ann".into(), "ann@example.com".into(), PASSWORD.into())
        .await;
    assert!(matches!(duplicate, Err(AppError::DuplicateEmail)));

    let session = assert_ok!(auth.login("ANN@example.com".into(), PASSWORD.into()).await);
    assert_eq!(session.role, UserRole::Patient);
    assert_eq!(session.expires_in, 3600);

    let claims = assert_ok!(auth.verify_token(&session.token));
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.role, UserRole::Patient);
    assert_eq!(claims.name, "Ann");

    assert_err!(auth.login("ann@example.com".into(), "wrong-password".into()).await);
    let unknown = auth
        .login("nobody@example.com".into(), PASSWORD.into())
        .await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_views_name_both_parties() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let ann = app.patient("Ann").await;
    let appointments = app.services.appointments();

    assert_ok!(
        appointments
            .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );

    let queue = assert_ok!(appointments.doctor_queue(doctor.id).await);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].patient_name, "Ann");
    assert_eq!(queue[0].patient_email, "ann@example.com");

    let history = assert_ok!(appointments.patient_history(ann.id).await);
    assert_eq!(history[0].doctor_name, "Dr House");
    assert_eq!(history[0].specialization, "Cardiology");

    let ledger = assert_ok!(appointments.list_all().await);
    assert_eq!(ledger[0].doctor_name, "Dr House");
    assert_eq!(ledger[0].patient_name, "Ann");

    let record = assert_ok!(app.services.users().patient_record(ann.id).await);
    assert_eq!(record.profile.email, "ann@example.com");
    assert_eq!(record.history[0].status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_removed_doctor_leaves_history_with_unknown_name() {
    let app = TestApp::new().await;
    let doctor = app.doctor("Dr House").await;
    let ann = app.patient("Ann").await;

    assert_ok!(
        app.services
            .appointments()
            .book(ann.id, slot(doctor.id, "2025-06-01", "10:00"))
            .await
    );
    assert_ok!(app.services.doctors().remove(doctor.id).await);

    let history = assert_ok!(app.services.appointments().patient_history(ann.id).await);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].doctor_name, "Unknown");

    let gone = app.services.doctors().remove(doctor.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}
