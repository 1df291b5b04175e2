use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::queue::QueueService;

pub fn queue_routes(state: Arc<QueueService>) -> Router {
    Router::new()
        .route("/", post(handlers::create_queue_entry).get(handlers::list_queue_entries))
        .route(
            "/{entry_id}",
            get(handlers::get_queue_entry)
                .patch(handlers::update_queue_status)
                .delete(handlers::remove_queue_entry),
        )
        .with_state(state)
}
