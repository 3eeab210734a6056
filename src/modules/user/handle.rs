use actix_web::{
    HttpRequest,
    cookie::{Cookie, time},
    delete, get, patch, post, web,
};
use uuid::Uuid;

use crate::{
    ENV,
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::handle::FriendSvc,
        user::{model, schema::AccountSummary, service::UserService},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

fn refresh_cookie(value: String, max_age: i64) -> Cookie<'static> {
    Cookie::build("refresh_token", value)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

fn expired_refresh_cookie() -> Cookie<'static> {
    let mut cookie = refresh_cookie(String::new(), 0);
    cookie.set_expires(time::OffsetDateTime::UNIX_EPOCH);
    cookie
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[patch("/profile")]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    profile: ValidatedJson<model::UpdateProfileModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.update_profile(id, profile.0).await?;
    Ok(success::Success::ok(Some(user)).message("Profile updated successfully"))
}

#[delete("/profile")]
pub async fn delete_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_claims(&req)?.sub;
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    user_service.delete_account(id, refresh_token).await?;

    Ok(success::Success::no_content().cookies(vec![expired_refresh_cookie()]))
}

#[get("")]
pub async fn list_users(
    friend_service: web::Data<FriendSvc>,
    query: ValidatedQuery<model::SearchQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<AccountSummary>>, error::Error> {
    let id = get_claims(&req)?.sub;
    let users = friend_service.find_candidates(id, &query.0.search).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_id(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<model::SignUpResponse>, error::Error> {
    let id = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(model::SignUpResponse { id })).message("Signup successful"))
}

#[post("/signin")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let (access_token, refresh_token) = user_service.sign_in(user_data.0).await?;
    let cookie = refresh_cookie(refresh_token, ENV.refresh_token_expiration as i64);

    Ok(success::Success::ok(Some(model::SignInResponse { access_token }))
        .message("Signin successful")
        .cookies(vec![cookie]))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    let (access_token, refresh_token) = user_service.refresh(refresh_token).await?;
    let cookie = refresh_cookie(refresh_token, ENV.refresh_token_expiration as i64);

    Ok(success::Success::ok(Some(model::SignInResponse { access_token }))
        .message("Refresh successful")
        .cookies(vec![cookie]))
}

#[get("/signout")]
pub async fn sign_out(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;

    Ok(success::Success::no_content().cookies(vec![expired_refresh_cookie()]))
}
