use application::service::{GetClientService, RegisterClientService};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{ClientTransformer, GetClientRequest, RegisterClientRequest};
use crate::response::ClientPresenter;

pub trait ClientRouter {
    fn route_client(self) -> Self;
}

impl ClientRouter for Router<AppModule> {
    fn route_client(self) -> Self {
        self.route(
            "/clients",
            post(
                |State(module): State<AppModule>, Json(req): Json<RegisterClientRequest>| async move {
                    Controller::new(ClientTransformer, ClientPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.handler().register_client(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/clients/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(ClientTransformer, ClientPresenter)
                        .intake(GetClientRequest::new(id))
                        .handle(|dto| async move { module.handler().get_client(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
