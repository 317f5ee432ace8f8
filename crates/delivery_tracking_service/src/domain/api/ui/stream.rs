use actix_web::{
    get,
    http::header,
    web::{Bytes, Data, Path},
    HttpResponse,
};
use shared::utils::logger::*;
use tokio::sync::broadcast::error::RecvError;

use crate::environment::AppState;

/// Server-sent event stream of the live push channel for one entity, e.g.
/// `location/{driverId}` or `order/{orderId}`.
#[get("/tracking/stream/{channel:.*}")]
pub async fn stream_events(data: Data<AppState>, path: Path<String>) -> HttpResponse {
    let channel = path.into_inner();
    let receiver = data.push_hub.subscribe(&channel);

    let events = futures::stream::unfold(receiver, move |mut receiver| {
        let channel = channel.clone();
        async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => {
                        let frame = Bytes::from(format!("data: {payload}\n\n"));
                        return Some((Ok::<_, actix_web::Error>(frame), receiver));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(tag = "[Live Push]", channel = %channel, skipped = %skipped, "slow subscriber");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        }
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
