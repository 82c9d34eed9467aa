mod auth;
mod cart;
mod health;
mod products;
mod profile;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{middleware::auth_middleware, AppState};

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let gated = Router::new()
        .route("/logout", post(auth::logout))
        .route(
            "/user",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route(
            "/cart/items/{id}",
            put(cart::update_cart_item).delete(cart::remove_from_cart),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(gated).with_state(state)
}
