//! SeaORM repository implementations

mod booking_repository;

pub use booking_repository::SeaOrmBookingRepository;
