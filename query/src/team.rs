//! Team hooks: the member directory and invitations.

use reqwest::Method;

use crate::client::use_api_client;
use crate::models::User;
use crate::options::{MutationOptions, ResourceOptions};
use crate::use_mutation::{use_mutation, MutationHandle};
use crate::use_resource::{use_api, use_resource, ResourceHandle};
use crate::validation::UserForm;

/// Every member of the workspace.
pub fn use_team_members() -> ResourceHandle<Vec<User>> {
    use_api(
        "users",
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch team members")),
    )
}

/// A single member by id.
pub fn use_member(id: impl Fn() -> String + 'static) -> ResourceHandle<User> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let id = id();
            async move { client.get_json(&format!("users/{id}")).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch member")),
    )
}

/// Invite a member from a validated [`UserForm`].
pub fn use_invite_member() -> MutationHandle<UserForm, User> {
    let client = use_api_client();
    use_mutation(
        move |form: UserForm| {
            let client = client.clone();
            async move {
                client
                    .send_json::<UserForm, User>(Method::POST, "users", Some(&form))
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to invite member")),
    )
}
