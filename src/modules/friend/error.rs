use crate::{api::error::SystemError, modules::friend::schema::FriendshipStatus};

#[derive(thiserror::Error, Debug)]
pub enum FriendshipError {
    #[error("No friendship exists between these users")]
    NotFound,
    #[error("User not found")]
    AccountNotFound,
    #[error("A friendship already exists between these users")]
    DuplicateRelationship,
    #[error("Cannot move a {from} friendship to {to}")]
    InvalidTransition { from: FriendshipStatus, to: FriendshipStatus },
    #[error("A user cannot befriend themselves")]
    SelfRelationship,
    #[error("Only the receiver can respond to a friend request")]
    NotReceiver,
    #[error(transparent)]
    Store(#[from] SystemError),
}
