use actix_web::{HttpRequest, delete, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{FriendRequestsResponse, FriendshipResponse},
            repository_pg::FriendRepositoryPg,
            schema::{FriendshipEntity, FriendshipStatus},
            service::FriendService,
        },
        user::{repository_pg::UserRepositoryPg, schema::AccountSummary},
    },
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<AccountSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.list_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestsResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.friend_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/{user_id}")]
pub async fn get_friendship(
    friend_service: web::Data<FriendSvc>,
    other_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship = friend_service.friendship_view(user_id, *other_id).await?;

    Ok(success::Success::ok(Some(friendship)).message("Friendship retrieved successfully"))
}

#[post("/{user_id}")]
pub async fn add_friend(
    friend_service: web::Data<FriendSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship = friend_service.add_friend(user_id, *friend_id).await?;

    Ok(success::Success::created(Some(friendship)).message("Friend request sent successfully"))
}

#[post("/{user_id}/accept")]
pub async fn accept_friend(
    friend_service: web::Data<FriendSvc>,
    sender_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship =
        friend_service.respond(user_id, *sender_id, FriendshipStatus::Accepted).await?;

    Ok(success::Success::ok(Some(friendship)).message("Friend request accepted successfully"))
}

#[post("/{user_id}/reject")]
pub async fn reject_friend(
    friend_service: web::Data<FriendSvc>,
    sender_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship =
        friend_service.respond(user_id, *sender_id, FriendshipStatus::Rejected).await?;

    Ok(success::Success::ok(Some(friendship)).message("Friend request rejected successfully"))
}

#[delete("/{user_id}")]
pub async fn remove_friend(
    friend_service: web::Data<FriendSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.remove_friend(user_id, *friend_id).await?;
    Ok(success::Success::no_content())
}
