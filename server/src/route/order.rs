use application::service::{
    AcceptOrderService, CreateOrderService, EditOrderService, GetOrderService,
    RejectOrderService, ReserveOrderService, ReturnOrderService,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AcceptOrderRequest, ClientEmailHeader, CreateOrderRequest, GetClientOrdersRequest,
    GetOrderRequest, OrderBookRequest, OrderTransformer, RejectOrderRequest, ReserveOrderRequest,
    ReturnOrderRequest,
};
use crate::response::OrderPresenter;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), OrderPresenter)
                    .bypass(|| async move { module.handler().get_all_orders().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>,
                 TypedHeader(caller): TypedHeader<ClientEmailHeader>,
                 Json(req): Json<CreateOrderRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((caller, req))
                        .handle(|dto| async move { module.handler().create_order(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(GetOrderRequest::new(id))
                        .handle(|dto| async move { module.handler().get_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/books/:book_id",
            post(
                |State(module): State<AppModule>,
                 Path((id, book_id)): Path<(Uuid, Uuid)>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(OrderBookRequest::new(id, book_id))
                        .handle(|dto| async move { module.handler().add_book_to_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Path((id, book_id)): Path<(Uuid, Uuid)>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(OrderBookRequest::new(id, book_id))
                        .handle(|dto| async move {
                            module.handler().remove_book_from_order(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/reserve",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(caller): TypedHeader<ClientEmailHeader>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(ReserveOrderRequest::new(id, caller))
                        .handle(|dto| async move { module.handler().reserve_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/accept",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(staff): TypedHeader<ClientEmailHeader>,
                 Path(id): Path<Uuid>| async move {
                    tracing::debug!(order_id = %id, ?staff, "Accept requested");
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(AcceptOrderRequest::new(id))
                        .handle(|dto| async move { module.handler().accept_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/reject",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(staff): TypedHeader<ClientEmailHeader>,
                 Path(id): Path<Uuid>| async move {
                    tracing::debug!(order_id = %id, ?staff, "Reject requested");
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(RejectOrderRequest::new(id))
                        .handle(|dto| async move { module.handler().reject_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/return",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(caller): TypedHeader<ClientEmailHeader>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(ReturnOrderRequest::new(id, caller))
                        .handle(|dto| async move { module.handler().return_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/clients/:id/orders",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(GetClientOrdersRequest::new(id))
                        .handle(|dto| async move { module.handler().get_client_orders(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
