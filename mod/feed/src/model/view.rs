use serde::Serialize;

use openfeed_core::CurrentUser;

use crate::model::Post;

/// A post plus who liked it, as rendered in list and detail bodies.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,

    /// Ids of the users who currently like this post.
    pub liked_by: Vec<String>,
}

/// A connection with its resolved following set.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub id: String,
    pub owner_id: String,

    /// Ids of the users the owner follows.
    pub following: Vec<String>,
}

/// Per-request view context shared by the feed pages.
///
/// Built once per authenticated request and embedded in every response
/// body that needs the acting user's connection.
#[derive(Debug, Clone, Serialize)]
pub struct ViewContext {
    pub user: CurrentUser,
    pub connection: ConnectionView,
}
