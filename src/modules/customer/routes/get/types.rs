pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Params {
        /// Sort key. When given the lookup targets exactly one item.
        pub name: Option<String>,
    }

    pub struct Payload {
        pub id: String,
        pub name: Option<String>,
    }
}

pub mod response {
    use axum::{
        extract::{rejection::QueryRejection, Json},
        http::StatusCode,
        response::IntoResponse,
    };
    use serde_json::json;

    use crate::utils::storage::{Item, StoreError};

    pub enum Success {
        Customer(Item),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Customer(item) => (StatusCode::OK, Json(item)).into_response(),
            }
        }
    }

    pub enum Error {
        NotFound,
        Store(StoreError),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "message": "not found" })),
                )
                    .into_response(),
                Self::Store(err) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": err })),
                )
                    .into_response(),
            }
        }
    }

    impl From<QueryRejection> for Error {
        fn from(rejection: QueryRejection) -> Self {
            tracing::debug!("Rejected query string: {}", rejection.body_text());
            Self::Store(StoreError::validation(rejection.body_text()))
        }
    }

    pub type Response = Result<Success, Error>;
}
