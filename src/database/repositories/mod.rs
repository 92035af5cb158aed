//! Repository implementations for database operations

pub mod audit;
pub mod event;
pub mod multimedia;
pub mod reservation;
pub mod user;

pub use audit::AuditRepository;
pub use event::EventRepository;
pub use multimedia::MultimediaRepository;
pub use reservation::ReservationRepository;
pub use user::UserRepository;
