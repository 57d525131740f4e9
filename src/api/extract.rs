use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Request body accepted either as JSON or as a urlencoded form.
///
/// Rejections are reported through [`GatewayError`] so malformed bodies get
/// the same JSON error shape as provider failures.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| GatewayError::invalid_request(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| GatewayError::invalid_request(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        name: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body() {
        let Payload(probe) =
            Payload::<Probe>::from_request(request("application/json", r#"{"name":"Oslo"}"#), &())
                .await
                .unwrap();
        assert_eq!(probe.name, "Oslo");
    }

    #[tokio::test]
    async fn test_form_body() {
        let Payload(probe) = Payload::<Probe>::from_request(
            request("application/x-www-form-urlencoded", "name=Troms%C3%B8"),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(probe.name, "Tromsø");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_request() {
        let err = Payload::<Probe>::from_request(request("application/json", "{"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest { .. }));
    }
}
