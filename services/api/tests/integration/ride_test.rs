use chrono::Utc;
use uuid::Uuid;

use rapido_api::error::ApiError;
use rapido_api::usecase::ride::{
    CancelRideUseCase, CreateRideInput, CreateRideUseCase, GetRideUseCase, ListUserRidesUseCase,
};
use rapido_domain::ride::RideStatus;
use rapido_domain::user::UserRole;

use crate::helpers::{MockRideRepo, MockUserRepo, test_ride, test_user};

fn setup() -> (MockUserRepo, MockRideRepo, Uuid) {
    let rider = test_user("rider", UserRole::User);
    let rider_id = rider.id;
    let users = MockUserRepo::with_users(vec![rider]);
    let rides = MockRideRepo::new(users.clone());
    (users, rides, rider_id)
}

fn create_input(owner_id: Uuid) -> CreateRideInput {
    CreateRideInput {
        owner_id,
        pickup_location: "A".into(),
        dropoff_location: "B".into(),
    }
}

#[tokio::test]
async fn should_create_cancel_and_refuse_second_cancel() {
    let (users, rides, rider_id) = setup();
    let created = CreateRideUseCase {
        users,
        rides: rides.clone(),
    }
    .execute(create_input(rider_id))
    .await
    .unwrap();

    assert_eq!(created.current_status, RideStatus::Pending);
    assert_eq!(created.fare.to_string(), "100.00");
    assert_eq!(created.user_id, rider_id);

    let cancel = CancelRideUseCase {
        rides: rides.clone(),
    };
    let cancelled = cancel.execute(created.id, rider_id).await.unwrap();
    assert_eq!(cancelled.current_status, RideStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let again = cancel.execute(created.id, rider_id).await;
    assert!(matches!(
        again,
        Err(ApiError::InvalidTransition {
            from: RideStatus::Cancelled,
            to: RideStatus::Cancelled,
        })
    ));
}

#[tokio::test]
async fn should_cancel_accepted_ride() {
    let (_, rides, rider_id) = setup();
    let ride = rides.insert(test_ride(rider_id, RideStatus::Accepted, Utc::now()));

    let cancelled = CancelRideUseCase { rides }
        .execute(ride.id, rider_id)
        .await
        .unwrap();
    assert_eq!(cancelled.current_status, RideStatus::Cancelled);
}

#[tokio::test]
async fn should_refuse_cancel_for_finished_rides_and_keep_status() {
    let (_, rides, rider_id) = setup();
    for status in [RideStatus::Completed, RideStatus::Rejected] {
        let ride = rides.insert(test_ride(rider_id, status, Utc::now()));
        let result = CancelRideUseCase {
            rides: rides.clone(),
        }
        .execute(ride.id, rider_id)
        .await;

        assert!(matches!(result, Err(ApiError::InvalidTransition { .. })));
        assert_eq!(rides.status_of(ride.id), Some(status));
    }
}

#[tokio::test]
async fn should_return_ride_not_found_for_unknown_ride() {
    let (_, rides, rider_id) = setup();
    let cancel = CancelRideUseCase {
        rides: rides.clone(),
    }
    .execute(Uuid::now_v7(), rider_id)
    .await;
    assert!(matches!(cancel, Err(ApiError::RideNotFound)));

    let get = GetRideUseCase { rides }.execute(Uuid::now_v7()).await;
    assert!(matches!(get, Err(ApiError::RideNotFound)));
}

#[tokio::test]
async fn should_reject_ride_for_unknown_owner_or_blank_locations() {
    let (users, rides, rider_id) = setup();
    let usecase = CreateRideUseCase {
        users,
        rides: rides.clone(),
    };

    let unknown = usecase.execute(create_input(Uuid::now_v7())).await;
    assert!(matches!(unknown, Err(ApiError::UserNotFound)));

    let blank = usecase
        .execute(CreateRideInput {
            owner_id: rider_id,
            pickup_location: "  ".into(),
            dropoff_location: "B".into(),
        })
        .await;
    assert!(matches!(blank, Err(ApiError::InvalidInput(_))));
    assert!(rides.rides.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_list_only_the_owners_rides() {
    let (_, rides, rider_id) = setup();
    let other = Uuid::now_v7();
    rides.insert(test_ride(rider_id, RideStatus::Pending, Utc::now()));
    rides.insert(test_ride(rider_id, RideStatus::Completed, Utc::now()));
    rides.insert(test_ride(other, RideStatus::Pending, Utc::now()));

    let listed = ListUserRidesUseCase { rides }
        .execute(rider_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|r| r.user_id == rider_id));
}

#[tokio::test]
async fn should_keep_long_locations_intact() {
    let (users, rides, rider_id) = setup();
    let origin = format!("{} Main Street", "Block 7 ".repeat(40));

    let created = CreateRideUseCase {
        users,
        rides: rides.clone(),
    }
    .execute(CreateRideInput {
        owner_id: rider_id,
        pickup_location: origin.clone(),
        dropoff_location: "B".into(),
    })
    .await
    .unwrap();

    assert!(origin.trim().chars().count() > 255);
    assert_eq!(created.pickup_location, origin.trim());
    let stored = GetRideUseCase { rides }.execute(created.id).await.unwrap();
    assert_eq!(stored.pickup_location, origin.trim());
}
