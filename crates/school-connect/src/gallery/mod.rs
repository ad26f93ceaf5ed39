//! Photo gallery.

mod domain;

use std::cmp::Ordering;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::handlers::{collect, required_param};
use crate::api::resource::with_fields;
use crate::api::{resource_routes, Access, ApiError, ApiState, NoFilter, Resource, Viewer};
use crate::store::{tally, CountRows, RecordId, RowCounts, SchoolStore, StoreError, Table};

pub use domain::{GalleryPhoto, PhotoCategory};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryTables {
    pub photos: Table<GalleryPhoto>,
}

impl CountRows for GalleryTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.photos)
    }
}

pub struct GalleryPhotos;

impl Resource for GalleryPhotos {
    type Record = GalleryPhoto;
    type Filter = NoFilter;

    const PATH: &'static str = "photos";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<GalleryPhoto> {
        &store.gallery.photos
    }

    fn ordering(a: &GalleryPhoto, b: &GalleryPhoto) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn visible(_: &SchoolStore, photo: &GalleryPhoto, _: &Viewer) -> Result<bool, StoreError> {
        Ok(photo.is_active)
    }

    fn prepare(
        _: &SchoolStore,
        photo: &mut GalleryPhoto,
        stored: Option<&GalleryPhoto>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            photo.uploaded_by = viewer.user_id();
        }
        Ok(())
    }

    fn present(_: &SchoolStore, photo: &GalleryPhoto) -> Result<Value, ApiError> {
        with_fields(photo, [("tag_list", json!(photo.tag_list()))])
    }
}

/// Unlink a deleted user from the photos they uploaded.
pub(crate) fn forget_user(store: &SchoolStore, user: RecordId) -> Result<(), StoreError> {
    store.gallery.photos.modify_where(
        |photo| photo.uploaded_by == Some(user),
        |photo| photo.uploaded_by = None,
    )?;
    Ok(())
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/photos/by_category", get(by_category))
        .route("/photos/by_tag", get(by_tag))
        .merge(resource_routes::<GalleryPhotos>())
}

#[derive(Debug, Default, Deserialize)]
struct PhotoQuery {
    category: Option<String>,
    tag: Option<String>,
}

async fn by_category(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<PhotoQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    let category = required_param(query.category, "Category parameter required")?;
    let photos = collect::<GalleryPhotos>(&state.store, &viewer, |photo| {
        photo.category.as_str() == category
    })?;
    Ok(Json(photos))
}

async fn by_tag(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<PhotoQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    let tag = required_param(query.tag, "Tag parameter required")?;
    let photos = collect::<GalleryPhotos>(&state.store, &viewer, |photo| photo.has_tag_like(&tag))?;
    Ok(Json(photos))
}
