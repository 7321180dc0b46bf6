//! Favorite product handlers.

use axum::{Json, extract::Path};
use serde::Serialize;
use tower_sessions::Session;

use clinica_backend::ApiResponse;
use clinica_core::ProductId;
use clinica_core::preferences::Favorites;

use crate::error::Result;
use crate::models::{load, save, session_keys};

/// Outcome of toggling a favorite.
#[derive(Debug, Serialize)]
pub struct FavoriteToggled {
    pub product_id: ProductId,
    pub favorite: bool,
    pub favorites: Favorites,
}

/// List favorite product ids.
pub async fn index(session: Session) -> Json<ApiResponse<Favorites>> {
    let favorites: Favorites = load(&session, session_keys::FAVORITES).await;
    Json(ApiResponse::ok(favorites))
}

/// Add or remove a product from the favorites.
pub async fn toggle(
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<FavoriteToggled>>> {
    let product_id = ProductId::new(product_id);
    let mut favorites: Favorites = load(&session, session_keys::FAVORITES).await;
    let favorite = favorites.toggle(product_id.clone());
    save(&session, session_keys::FAVORITES, &favorites).await?;

    let message = if favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(Json(ApiResponse::ok_with_message(
        FavoriteToggled {
            product_id,
            favorite,
            favorites,
        },
        message,
    )))
}
