mod events_test;
mod middleware_test;
mod patients_test;
mod products_test;
mod users_test;
