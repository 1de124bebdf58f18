pub mod request {
    use axum::{
        async_trait,
        extract::{Form, FromRequest, Json, Request},
        http::header,
    };
    use serde::Deserialize;
    use serde_json::Value;
    use std::convert::Infallible;

    /// Create request body, read from JSON or a urlencoded form. Anything
    /// that does not decode is treated as an empty body.
    #[derive(Deserialize, Default, Debug, PartialEq)]
    pub struct Payload {
        #[serde(default)]
        pub id: Option<Value>,
        #[serde(default)]
        pub name: Option<Value>,
    }

    #[derive(Deserialize)]
    struct FormPayload {
        id: Option<String>,
        name: Option<String>,
    }

    fn is_form(req: &Request) -> bool {
        req.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false)
    }

    #[async_trait]
    impl<S: Send + Sync> FromRequest<S> for Payload {
        type Rejection = Infallible;

        async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
            let payload = if is_form(&req) {
                Form::<FormPayload>::from_request(req, state)
                    .await
                    .map(|Form(form)| Self {
                        id: form.id.map(Value::String),
                        name: form.name.map(Value::String),
                    })
                    .map_err(|err| err.body_text())
            } else {
                Json::<Self>::from_request(req, state)
                    .await
                    .map(|Json(payload)| payload)
                    .map_err(|err| err.body_text())
            };

            Ok(payload.unwrap_or_else(|reason| {
                tracing::debug!("Passing an empty customer body through: {}", reason);
                Self::default()
            }))
        }
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::utils::storage::{PutAck, StoreError};

    pub enum Success {
        Created(PutAck),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Created(ack) => (StatusCode::OK, Json(ack)).into_response(),
            }
        }
    }

    pub enum Error {
        Store(StoreError),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Store(err) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": err })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
