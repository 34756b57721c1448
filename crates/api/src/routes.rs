pub mod events;
pub mod geo;
pub mod health;
pub mod patients;
pub mod products;
pub mod users;
