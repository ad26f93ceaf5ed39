//! News posts with comments and likes.

mod domain;
mod resources;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::handlers::cascade;
use crate::api::{resource_routes, ApiState};
use crate::store::{tally, CountRows, RecordId, RowCounts, SchoolStore, StoreError, Table};

pub use domain::{CommentStatus, NewsCategory, NewsComment, NewsLike, NewsPost, PostStatus};
pub use resources::{NewsCategories, NewsComments, NewsLikes, NewsPosts, PostFilter};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsTables {
    pub categories: Table<NewsCategory>,
    pub posts: Table<NewsPost>,
    pub comments: Table<NewsComment>,
    pub likes: Table<NewsLike>,
}

impl CountRows for NewsTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.categories)?;
        tally(counts, &self.posts)?;
        tally(counts, &self.comments)?;
        tally(counts, &self.likes)
    }
}

/// Remove a deleted user's comments and likes and unlink the posts they wrote.
pub(crate) fn forget_user(store: &SchoolStore, user: RecordId) -> Result<(), StoreError> {
    cascade::<NewsComments>(store, |comment| comment.author == user)?;
    let news = &store.news;
    news.likes.remove_where(|like| like.user == user)?;
    news.posts.modify_where(
        |post| post.author == Some(user),
        |post| post.author = None,
    )?;
    Ok(())
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .merge(resource_routes::<NewsCategories>())
        .merge(resource_routes::<NewsPosts>())
        .merge(resource_routes::<NewsComments>())
        .merge(resource_routes::<NewsLikes>())
}
