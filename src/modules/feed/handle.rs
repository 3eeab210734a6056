use actix_web::{HttpRequest, get, web};

use crate::{
    api::{error, success},
    constants::EMPTY_FEED_MESSAGE,
    middlewares::get_claims,
    modules::{feed::model::FeedResponse, friend::handle::FriendSvc},
};

#[get("/feed")]
pub async fn get_feed(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<FeedResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let events = friend_service.feed(user_id).await?;

    let message = if events.is_empty() { EMPTY_FEED_MESSAGE } else { "Feed retrieved successfully" };
    Ok(success::Success::ok(Some(FeedResponse { events })).message(message))
}
