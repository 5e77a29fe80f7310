pub mod booking;
pub mod review;
pub mod tour;
pub mod user;

pub use review::ReviewService;
