use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::filter::{Condition, ListOptions};
use crate::models::{
    DbAccount, DbCity, DbCounty, DbEvent, DbPatient, DbProduct, DbProfile, DbProposedTime,
    DbToken, DbUser,
};
use praxis_core::models::event::{CreateEventRequest, ProposeTimeRequest, UpdateEventRequest};
use praxis_core::models::geo::{CreateCityRequest, CreateCountyRequest};
use praxis_core::models::patient::{CreatePatientRequest, UpdatePatientRequest};
use praxis_core::models::product::{CreateProductRequest, UpdateProductRequest};
use praxis_core::models::token::TokenType;
use praxis_core::models::user::{
    CreateUserRequest, LinkAccountRequest, UpdateUserRequest, UpsertProfileRequest,
};

// Mock repositories for testing

mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            request: CreateUserRequest,
            password_hash: Option<String>,
        ) -> eyre::Result<DbUser>;

        pub async fn get_user_by_id(&self, id: Uuid) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(&self, email: String) -> eyre::Result<Option<DbUser>>;

        pub async fn update_user(
            &self,
            id: Uuid,
            request: UpdateUserRequest,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn list_users(&self, options: ListOptions) -> eyre::Result<Vec<DbUser>>;

        pub async fn count_users(&self, filter: Option<Condition>) -> eyre::Result<i64>;

        pub async fn upsert_profile(
            &self,
            user_id: Uuid,
            request: UpsertProfileRequest,
        ) -> eyre::Result<DbProfile>;

        pub async fn get_profile_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbProfile>>;

        pub async fn link_account(
            &self,
            user_id: Uuid,
            request: LinkAccountRequest,
        ) -> eyre::Result<DbAccount>;

        pub async fn list_accounts_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbAccount>>;

        pub async fn unlink_account(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub TokenRepo {
        pub async fn create_token(
            &self,
            user_id: Uuid,
            kind: TokenType,
            token: String,
            expires: DateTime<Utc>,
        ) -> eyre::Result<DbToken>;

        pub async fn get_token_by_value(&self, token: String) -> eyre::Result<Option<DbToken>>;

        pub async fn consume_token(
            &self,
            token: String,
            kind: TokenType,
        ) -> eyre::Result<Option<DbToken>>;

        pub async fn delete_tokens_by_user_id(
            &self,
            user_id: Uuid,
            kind: TokenType,
        ) -> eyre::Result<u64>;
    }
}

mock! {
    pub PatientRepo {
        pub async fn create_patient(
            &self,
            request: CreatePatientRequest,
        ) -> eyre::Result<DbPatient>;

        pub async fn get_patient_by_id(&self, id: Uuid) -> eyre::Result<Option<DbPatient>>;

        pub async fn update_patient(
            &self,
            id: Uuid,
            request: UpdatePatientRequest,
        ) -> eyre::Result<Option<DbPatient>>;

        pub async fn list_patients(&self, options: ListOptions) -> eyre::Result<Vec<DbPatient>>;

        pub async fn count_patients(&self, filter: Option<Condition>) -> eyre::Result<i64>;
    }
}

mock! {
    pub EventRepo {
        pub async fn create_event(&self, request: CreateEventRequest) -> eyre::Result<DbEvent>;

        pub async fn get_event_by_id(&self, id: Uuid) -> eyre::Result<Option<DbEvent>>;

        pub async fn update_event(
            &self,
            id: Uuid,
            request: UpdateEventRequest,
        ) -> eyre::Result<Option<DbEvent>>;

        pub async fn cancel_event(&self, id: Uuid) -> eyre::Result<Option<DbEvent>>;

        pub async fn list_events(&self, options: ListOptions) -> eyre::Result<Vec<DbEvent>>;

        pub async fn count_events(&self, filter: Option<Condition>) -> eyre::Result<i64>;

        pub async fn count_events_by_status(
            &self,
            filter: Option<Condition>,
        ) -> eyre::Result<Vec<(String, i64)>>;

        pub async fn create_proposed_time(
            &self,
            event_id: Uuid,
            request: ProposeTimeRequest,
        ) -> eyre::Result<DbProposedTime>;

        pub async fn get_proposed_time_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbProposedTime>>;

        pub async fn list_proposed_times_by_event_id(
            &self,
            event_id: Uuid,
        ) -> eyre::Result<Vec<DbProposedTime>>;

        pub async fn set_proposed_time_notified(
            &self,
            id: Uuid,
            notified: bool,
        ) -> eyre::Result<Option<DbProposedTime>>;

        pub async fn decline_proposed_time(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbProposedTime>>;

        pub async fn accept_proposed_time(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<(DbEvent, DbProposedTime)>>;
    }
}

mock! {
    pub ProductRepo {
        pub async fn create_product(
            &self,
            event_id: Uuid,
            request: CreateProductRequest,
        ) -> eyre::Result<DbProduct>;

        pub async fn get_product_by_id(&self, id: Uuid) -> eyre::Result<Option<DbProduct>>;

        pub async fn list_products_by_event_id(
            &self,
            event_id: Uuid,
            include_deleted: bool,
        ) -> eyre::Result<Vec<DbProduct>>;

        pub async fn update_product(
            &self,
            id: Uuid,
            request: UpdateProductRequest,
        ) -> eyre::Result<Option<DbProduct>>;

        pub async fn soft_delete_product(&self, id: Uuid) -> eyre::Result<Option<DbProduct>>;
    }
}

mock! {
    pub GeoRepo {
        pub async fn create_county(
            &self,
            request: CreateCountyRequest,
        ) -> eyre::Result<DbCounty>;

        pub async fn get_county_by_id(&self, id: Uuid) -> eyre::Result<Option<DbCounty>>;

        pub async fn list_counties(&self) -> eyre::Result<Vec<DbCounty>>;

        pub async fn create_city(
            &self,
            county_id: Uuid,
            request: CreateCityRequest,
        ) -> eyre::Result<DbCity>;

        pub async fn list_cities_by_county_id(
            &self,
            county_id: Uuid,
        ) -> eyre::Result<Vec<DbCity>>;
    }
}
