pub mod events;
pub mod geo;
pub mod patients;
pub mod products;
pub mod users;
