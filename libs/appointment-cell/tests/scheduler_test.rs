use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio_test::{assert_err, assert_ok};

use appointment_cell::*;
use doctor_cell::{Doctor, DoctorChanges, DoctorId, DoctorRepository, InMemoryDoctorRepository, NewDoctor};
use shared_database::DatabaseError;
use shared_utils::test_utils::{test_date, test_time, FixedClock};

struct TestClinic {
    scheduler: AppointmentScheduler,
    doctors: Arc<InMemoryDoctorRepository>,
    appointments: Arc<InMemoryAppointmentRepository>,
}

impl TestClinic {
    fn new() -> Self {
        let doctors = Arc::new(InMemoryDoctorRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let scheduler = AppointmentScheduler::new(
            doctors.clone(),
            appointments.clone(),
            FixedClock::shared("2024-01-01", "08:00"),
        );

        Self {
            scheduler,
            doctors,
            appointments,
        }
    }

    async fn add_doctor(&self, name: &str, from: &str, to: &str) -> DoctorId {
        let doctor = self
            .doctors
            .insert_doctor(NewDoctor {
                name: name.to_string(),
                specialization: "General Practice".to_string(),
                gender: "female".to_string(),
                location: "Room 1".to_string(),
                available_from: test_time(from),
                available_to: test_time(to),
            })
            .await
            .expect("Failed to seed doctor");
        doctor.id
    }

    async fn book(&self, patient: &str, doctor_id: DoctorId, date: &str, time: &str) -> Result<Appointment, AppointmentError> {
        self.scheduler
            .create_appointment(CreateAppointmentRequest {
                patient_name: patient.to_string(),
                doctor_id,
                appointment_date: test_date(date),
                appointment_time: test_time(time),
            })
            .await
    }
}

#[tokio::test]
async fn test_create_appointment_is_booked() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;

    let appointment = assert_ok!(clinic.book("John Doe", doctor_id, "2024-01-01", "10:30").await);

    assert_eq!(appointment.id, 1);
    assert_eq!(appointment.status, AppointmentStatus::Booked);
    assert_eq!(appointment.doctor_id, doctor_id);
    assert_eq!(appointment.appointment_time, test_time("10:30"));
    assert_eq!(appointment.created_at, test_date("2024-01-01").and_time(test_time("08:00")).and_utc());
}

#[tokio::test]
async fn test_create_appointment_at_window_edges() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;

    assert_ok!(clinic.book("Early", doctor_id, "2024-01-01", "09:00").await);
    assert_ok!(clinic.book("Late", doctor_id, "2024-01-01", "17:00").await);
    assert_eq!(clinic.appointments.count().await, 2);
}

#[tokio::test]
async fn test_create_appointment_outside_window_persists_nothing() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;

    for time in ["08:59", "17:01", "23:00"] {
        let err = assert_err!(clinic.book("John Doe", doctor_id, "2024-01-01", time).await);
        assert_matches!(err, AppointmentError::DoctorUnavailable(_));
    }

    assert_eq!(clinic.appointments.count().await, 0);
}

#[tokio::test]
async fn test_create_appointment_for_unknown_doctor() {
    let clinic = TestClinic::new();

    let err = assert_err!(clinic.book("John Doe", 12, "2024-01-01", "10:00").await);

    assert_matches!(err, AppointmentError::DoctorNotFound(12));
    assert_eq!(err.to_string(), "Doctor with ID 12 not found");
    assert_eq!(clinic.appointments.count().await, 0);
}

#[tokio::test]
async fn test_list_appointments_sorted_by_date_then_time() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;

    clinic.book("C", doctor_id, "2024-01-02", "09:00").await.unwrap();
    clinic.book("B", doctor_id, "2024-01-01", "17:00").await.unwrap();
    clinic.book("A", doctor_id, "2024-01-01", "09:00").await.unwrap();

    let order: Vec<_> = clinic
        .scheduler
        .list_appointments()
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.appointment_date, a.appointment_time))
        .collect();

    assert_eq!(
        order,
        vec![
            (test_date("2024-01-01"), test_time("09:00")),
            (test_date("2024-01-01"), test_time("17:00")),
            (test_date("2024-01-02"), test_time("09:00")),
        ]
    );
}

#[tokio::test]
async fn test_update_time_revalidates_window() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let appointment = clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();

    let moved = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                appointment_time: Some(test_time("16:00")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.appointment_time, test_time("16:00"));

    let err = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                appointment_time: Some(test_time("18:00")),
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppointmentError::DoctorUnavailable(_));

    let stored = clinic.scheduler.get_appointment(appointment.id).await.unwrap();
    assert_eq!(stored.appointment_time, test_time("16:00"));
    assert_eq!(stored.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_update_date_only_keeps_time_and_checks_doctor() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let appointment = clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();

    let moved = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                appointment_date: Some(test_date("2024-02-15")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.appointment_date, test_date("2024-02-15"));
    assert_eq!(moved.appointment_time, test_time("10:00"));

    clinic.doctors.delete_doctor(doctor_id).await.unwrap();
    let err = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                appointment_date: Some(test_date("2024-03-01")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppointmentError::DoctorNotFound(id) if id == doctor_id);
}

#[tokio::test]
async fn test_status_only_update_does_not_need_doctor() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let appointment = clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();
    clinic.doctors.delete_doctor(doctor_id).await.unwrap();

    let completed = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(completed.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn test_update_with_invalid_status_changes_nothing() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let appointment = clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();

    let err = clinic
        .scheduler
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                appointment_date: Some(test_date("2024-01-05")),
                status: Some("done".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::InvalidStatus(value) if value == "done");
    assert_eq!(clinic.scheduler.get_appointment(appointment.id).await.unwrap(), appointment);
}

#[tokio::test]
async fn test_update_missing_appointment() {
    let clinic = TestClinic::new();

    let err = clinic
        .scheduler
        .update_appointment(3, UpdateAppointmentRequest::default())
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::NotFound(3));
}

#[tokio::test]
async fn test_remove_nonexistent_appointment_leaves_store_untouched() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();

    let err = clinic.scheduler.remove_appointment(999).await.unwrap_err();

    assert_matches!(err, AppointmentError::NotFound(999));
    assert_eq!(clinic.appointments.count().await, 1);
}

#[tokio::test]
async fn test_second_remove_fails_with_not_found() {
    let clinic = TestClinic::new();
    let doctor_id = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let appointment = clinic.book("John Doe", doctor_id, "2024-01-01", "10:00").await.unwrap();

    assert_ok!(clinic.scheduler.remove_appointment(appointment.id).await);
    assert_matches!(
        clinic.scheduler.remove_appointment(appointment.id).await,
        Err(AppointmentError::NotFound(id)) if id == appointment.id
    );
}

#[tokio::test]
async fn test_search_appointments() {
    let clinic = TestClinic::new();
    let smith = clinic.add_doctor("Dr. Smith", "09:00", "17:00").await;
    let patel = clinic.add_doctor("Dr. Patel", "09:00", "17:00").await;

    clinic.book("John Doe", smith, "2024-01-01", "10:00").await.unwrap();
    clinic.book("Jane Smith", patel, "2024-01-01", "11:00").await.unwrap();
    let johnny = clinic.book("Johnny Bravo", patel, "2024-01-02", "09:30").await.unwrap();
    clinic
        .scheduler
        .update_appointment(
            johnny.id,
            UpdateAppointmentRequest {
                status: Some("canceled".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let by_patient = clinic
        .scheduler
        .search_appointments(&AppointmentSearchQuery {
            patient_name: Some("JOHN".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_patient.len(), 2);

    let by_doctor_name = clinic
        .scheduler
        .search_appointments(&AppointmentSearchQuery {
            doctor_name: Some("patel".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_doctor_name.len(), 2);
    assert!(by_doctor_name.iter().all(|a| a.doctor_id == patel));

    let by_date_and_status = clinic
        .scheduler
        .search_appointments(&AppointmentSearchQuery {
            date: Some(test_date("2024-01-02")),
            status: Some("Canceled".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_date_and_status.len(), 1);
    assert_eq!(by_date_and_status[0].patient_name, "Johnny Bravo");

    let bad_status = clinic
        .scheduler
        .search_appointments(&AppointmentSearchQuery {
            status: Some("pending".to_string()),
            ..Default::default()
        })
        .await;
    assert_matches!(bad_status, Err(AppointmentError::InvalidStatus(_)));
}

/// Directory whose lookups take a while, so a reschedule stays in flight.
struct SlowDirectory {
    inner: InMemoryDoctorRepository,
    lookup_delay: Duration,
}

#[async_trait]
impl DoctorRepository for SlowDirectory {
    async fn get_doctor_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DatabaseError> {
        tokio::time::sleep(self.lookup_delay).await;
        self.inner.get_doctor_by_id(id).await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, DatabaseError> {
        self.inner.list_doctors().await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, DatabaseError> {
        self.inner.insert_doctor(doctor).await
    }

    async fn update_doctor(&self, id: DoctorId, changes: DoctorChanges) -> Result<Option<Doctor>, DatabaseError> {
        self.inner.update_doctor(id, changes).await
    }

    async fn delete_doctor(&self, id: DoctorId) -> Result<bool, DatabaseError> {
        self.inner.delete_doctor(id).await
    }
}

#[tokio::test]
async fn test_cancel_during_reschedule_is_kept() {
    let directory = Arc::new(SlowDirectory {
        inner: InMemoryDoctorRepository::new(),
        lookup_delay: Duration::from_millis(50),
    });
    let doctor = directory
        .insert_doctor(NewDoctor {
            name: "Dr. Smith".to_string(),
            specialization: "General Practice".to_string(),
            gender: "female".to_string(),
            location: "Room 1".to_string(),
            available_from: test_time("09:00"),
            available_to: test_time("17:00"),
        })
        .await
        .unwrap();
    let scheduler = Arc::new(AppointmentScheduler::new(
        directory,
        Arc::new(InMemoryAppointmentRepository::new()),
        FixedClock::shared("2024-01-01", "08:00"),
    ));
    let booked = scheduler
        .create_appointment(CreateAppointmentRequest {
            patient_name: "John Doe".to_string(),
            doctor_id: doctor.id,
            appointment_date: test_date("2024-01-01"),
            appointment_time: test_time("10:00"),
        })
        .await
        .unwrap();

    let reschedule = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move {
            scheduler
                .update_appointment(
                    booked.id,
                    UpdateAppointmentRequest {
                        appointment_time: Some(test_time("11:00")),
                        ..Default::default()
                    },
                )
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let canceled = scheduler
        .update_appointment(
            booked.id,
            UpdateAppointmentRequest {
                status: Some("canceled".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(canceled.status, AppointmentStatus::Canceled);
    assert_eq!(canceled.appointment_time, test_time("10:00"));

    let moved = reschedule.await.unwrap().unwrap();
    assert_eq!(moved.appointment_time, test_time("11:00"));
    assert_eq!(moved.status, AppointmentStatus::Canceled);

    let stored = scheduler.get_appointment(booked.id).await.unwrap();
    assert_eq!(stored.appointment_time, test_time("11:00"));
    assert_eq!(stored.status, AppointmentStatus::Canceled);
}
