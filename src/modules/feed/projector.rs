use std::collections::HashMap;

use uuid::Uuid;

use crate::modules::{
    feed::model::FeedEvent,
    friend::schema::FriendshipEntity,
    user::schema::AccountSummary,
};

/// Turns friendship history into feed events, oldest first.
///
/// Every friendship yields a request event dated `created`. One that has been
/// accepted or rejected (`updated != created` and not pending) also yields a
/// response event dated `updated`. Friendships whose accounts are missing from
/// `accounts` are skipped.
pub fn build_feed(
    friendships: &[FriendshipEntity],
    accounts: &HashMap<Uuid, AccountSummary>,
) -> Vec<FeedEvent> {
    let mut events = Vec::with_capacity(friendships.len() * 2);

    for friendship in friendships {
        let (Some(sender), Some(receiver)) =
            (accounts.get(&friendship.sender_id), accounts.get(&friendship.receiver_id))
        else {
            continue;
        };

        events.push(FeedEvent {
            heading: format!("{} added {} as a friend", sender.first_name, receiver.first_name),
            date: friendship.created,
            subject: sender.clone(),
            related_account: receiver.clone(),
        });

        if friendship.has_response() {
            events.push(FeedEvent {
                heading: format!(
                    "{} {} {}'s friendship",
                    receiver.first_name,
                    friendship.status.label(),
                    sender.first_name
                ),
                date: friendship.updated,
                subject: receiver.clone(),
                related_account: sender.clone(),
            });
        }
    }

    // stable: a request stays ahead of its response when both share a timestamp
    events.sort_by_key(|event| event.date);
    events
}
