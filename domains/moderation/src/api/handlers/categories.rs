//! Category management API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use parlor_auth::CurrentUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ModerationState;
use crate::domain::entities::Category;
use crate::domain::permissions::Requester;
use parlor_common::{Error, Result};

/// Request for creating a category
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,

    #[serde(default)]
    pub order: i32,
}

/// Query parameters for category deletion
#[derive(Debug, Deserialize)]
pub struct DeleteCategoryQuery {
    /// Category receiving the deleted category's posts
    pub migrate_to: String,
}

/// Response for category operations
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub order: i32,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            order: category.order,
        }
    }
}

/// Response for category deletion
#[derive(Debug, Serialize)]
pub struct DeleteCategoryResponse {
    /// Number of posts moved to the migration target
    pub migrated_posts: u64,
}

/// Create a category
///
/// **POST /v1/moderation/categories**
pub async fn create_category(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let requester = Requester::from(&user);
    if !state.evaluator.can_modify_categories(Some(&requester)).await {
        return Err(Error::Authorization(
            "Admin role required to manage categories".to_string(),
        ));
    }

    let category = state.dashboard.create_category(&body.name, body.order).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Delete a category, migrating its posts
///
/// **DELETE /v1/moderation/categories/{category_id}?migrate_to={target}**
pub async fn delete_category(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Path(category_id): Path<String>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<Json<DeleteCategoryResponse>> {
    let requester = Requester::from(&user);
    if !state.evaluator.can_modify_categories(Some(&requester)).await {
        return Err(Error::Authorization(
            "Admin role required to manage categories".to_string(),
        ));
    }

    let migrated_posts = state
        .dashboard
        .delete_category(&category_id, &query.migrate_to)
        .await?;
    Ok(Json(DeleteCategoryResponse { migrated_posts }))
}

/// List categories in display order
///
/// **GET /v1/moderation/categories**
pub async fn list_categories(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<Vec<CategoryResponse>>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    let categories = state.repos.categories.list_categories().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}
