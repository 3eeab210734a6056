use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    // `/requests` goes before `/{user_id}` so it is not read as an id
    cfg.service(
        scope("/friends")
            .service(list_friends)
            .service(list_friend_requests)
            .service(get_friendship)
            .service(add_friend)
            .service(accept_friend)
            .service(reject_friend)
            .service(remove_friend),
    );
}
