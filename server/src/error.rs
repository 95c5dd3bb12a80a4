use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use kernel::{KernelError, Resource, Violation};
use serde_json::json;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidRequest => StatusCode::BAD_REQUEST,
            KernelError::Forbidden => StatusCode::FORBIDDEN,
            KernelError::Concurrency => StatusCode::CONFLICT,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0.current_context(), "Request rejected");
        }

        let resource = self.0.downcast_ref::<Resource>();
        let violation = self.0.downcast_ref::<Violation>();
        let message = violation
            .map(ToString::to_string)
            .or_else(|| resource.map(ToString::to_string))
            .unwrap_or_else(|| self.0.current_context().to_string());

        let mut body = json!({ "error": message });
        if let Some(resource) = resource {
            body["resource"] = json!(resource);
        }
        if let Some(violation) = violation {
            body["violation"] = json!(violation);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use kernel::prelude::entity::{BookId, OrderStatus};
    use kernel::{KernelError, Resource, Violation};
    use serde_json::{json, Value};

    use super::ErrorStatus;

    async fn render(report: Report<KernelError>) -> (StatusCode, Value) {
        let response = ErrorStatus::from(report).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let (status, body) = render(Resource::Order.into_report()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Order not found", "resource": "order" }));
    }

    #[tokio::test]
    async fn violations_carry_their_payload() {
        let report = Violation::WrongOrderStatus {
            expected: OrderStatus::Reserved,
            actual: OrderStatus::Created,
        }
        .into_report();
        let (status, body) = render(report).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["violation"],
            json!({ "kind": "wrong_order_status", "expected": "RESERVED", "actual": "CREATED" })
        );

        let id = uuid::Uuid::new_v4();
        let report = Violation::InsufficientCopies {
            book_ids: vec![BookId::new(id)],
        }
        .into_report();
        let (status, body) = render(report).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["violation"]["book_ids"], json!([id]));
    }

    #[tokio::test]
    async fn ownership_is_forbidden() {
        let (status, body) = render(Violation::OwnerMismatch.into_report()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["violation"]["kind"], "owner_mismatch");
    }

    #[tokio::test]
    async fn infrastructure_errors_hide_details() {
        let report = Report::new(KernelError::Internal).attach_printable("connection reset");
        let (status, body) = render(report).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal kernel error" }));

        let (status, _) = render(Report::new(KernelError::Concurrency)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = render(Report::new(KernelError::Timeout)).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }
}
