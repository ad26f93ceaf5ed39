use std::cmp::Ordering;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{CommentStatus, NewsCategory, NewsComment, NewsLike, NewsPost};
use crate::api::handlers::cascade;
use crate::api::resource::with_fields;
use crate::api::{Access, ApiError, NoFilter, Resource, Viewer};
use crate::store::{
    available_slug, ensure_exists, ensure_optional, RecordId, SchoolStore, StoreError, Table,
};

pub struct NewsCategories;

impl Resource for NewsCategories {
    type Record = NewsCategory;
    type Filter = NoFilter;

    const PATH: &'static str = "categories";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<NewsCategory> {
        &store.news.categories
    }

    fn ordering(a: &NewsCategory, b: &NewsCategory) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn on_delete(store: &SchoolStore, category: &NewsCategory) -> Result<(), StoreError> {
        store.news.posts.modify_where(
            |post| post.category == Some(category.id),
            |post| post.category = None,
        )?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostFilter {
    pub category: Option<RecordId>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

pub struct NewsPosts;

impl Resource for NewsPosts {
    type Record = NewsPost;
    type Filter = PostFilter;

    const PATH: &'static str = "posts";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<NewsPost> {
        &store.news.posts
    }

    fn ordering(a: &NewsPost, b: &NewsPost) -> Ordering {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| b.created_at.cmp(&a.created_at))
    }

    fn visible(_: &SchoolStore, post: &NewsPost, _: &Viewer) -> Result<bool, StoreError> {
        Ok(post.is_published())
    }

    fn matches(post: &NewsPost, filter: &PostFilter) -> bool {
        filter.category.map_or(true, |id| post.category == Some(id))
            && filter.tag.as_deref().map_or(true, |tag| post.has_tag(tag))
            && filter
                .featured
                .map_or(true, |featured| post.is_featured == featured)
    }

    fn prepare(
        store: &SchoolStore,
        post: &mut NewsPost,
        stored: Option<&NewsPost>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if post.slug.trim().is_empty() {
            post.slug = available_slug(&store.news.posts, post.id, &post.title, |row| {
                row.slug.as_str()
            })?;
        }
        if stored.is_none() {
            post.author = viewer.user_id();
        }
        if post.is_published() && post.published_at.is_none() {
            post.published_at = Some(Utc::now());
        }
        Ok(())
    }

    fn check_references(store: &SchoolStore, post: &NewsPost) -> Result<(), StoreError> {
        ensure_optional(&store.news.categories, "category", post.category)
    }

    fn on_delete(store: &SchoolStore, post: &NewsPost) -> Result<(), StoreError> {
        cascade::<NewsComments>(store, |comment| comment.post == post.id)?;
        store.news.likes.remove_where(|like| like.post == post.id)?;
        Ok(())
    }

    fn present(store: &SchoolStore, post: &NewsPost) -> Result<Value, ApiError> {
        let news = &store.news;
        let likes = news.likes.count(|like| like.post == post.id)?;
        let comments = news.comments.count(|comment| {
            comment.post == post.id && comment.status == CommentStatus::Approved
        })?;
        with_fields(
            post,
            [
                ("tag_list", json!(post.tag_list())),
                ("likes_count", json!(likes)),
                ("comments_count", json!(comments)),
            ],
        )
    }
}

pub struct NewsComments;

impl Resource for NewsComments {
    type Record = NewsComment;
    type Filter = NoFilter;

    const PATH: &'static str = "comments";
    const ACCESS: Access = Access::Authenticated;

    fn table(store: &SchoolStore) -> &Table<NewsComment> {
        &store.news.comments
    }

    fn ordering(a: &NewsComment, b: &NewsComment) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    /// Staff see the moderation queue; everyone else only approved comments.
    fn visible(
        _: &SchoolStore,
        comment: &NewsComment,
        viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(viewer.is_staff() || comment.status == CommentStatus::Approved)
    }

    fn prepare(
        store: &SchoolStore,
        comment: &mut NewsComment,
        stored: Option<&NewsComment>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            comment.author = viewer.require_user()?.user_id;
        }
        if let Some(parent) = comment.parent {
            if parent == comment.id {
                return Err(ApiError::invalid("parent", "A comment cannot reply to itself."));
            }
            let same_post = store
                .news
                .comments
                .get(parent)?
                .map_or(true, |parent| parent.post == comment.post);
            if !same_post {
                return Err(ApiError::invalid(
                    "parent",
                    "Replies must belong to the same post.",
                ));
            }
        }
        Ok(())
    }

    fn check_references(store: &SchoolStore, comment: &NewsComment) -> Result<(), StoreError> {
        ensure_exists(&store.news.posts, "post", comment.post)?;
        ensure_optional(&store.news.comments, "parent", comment.parent)
    }

    fn on_delete(store: &SchoolStore, comment: &NewsComment) -> Result<(), StoreError> {
        cascade::<NewsComments>(store, |reply| reply.parent == Some(comment.id))?;
        Ok(())
    }
}

pub struct NewsLikes;

impl Resource for NewsLikes {
    type Record = NewsLike;
    type Filter = NoFilter;

    const PATH: &'static str = "likes";
    const ACCESS: Access = Access::Authenticated;

    fn table(store: &SchoolStore) -> &Table<NewsLike> {
        &store.news.likes
    }

    fn ordering(a: &NewsLike, b: &NewsLike) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn visible(_: &SchoolStore, like: &NewsLike, viewer: &Viewer) -> Result<bool, StoreError> {
        Ok(viewer.user_id() == Some(like.user))
    }

    fn prepare(
        _: &SchoolStore,
        like: &mut NewsLike,
        stored: Option<&NewsLike>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            like.user = viewer.require_user()?.user_id;
        }
        Ok(())
    }

    fn check_references(store: &SchoolStore, like: &NewsLike) -> Result<(), StoreError> {
        ensure_exists(&store.news.posts, "post", like.post)
    }
}
