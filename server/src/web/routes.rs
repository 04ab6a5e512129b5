// server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, cart_handlers, product_handlers, review_handlers};

// In a real deployment this might also check DB connectivity.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
// A resource whose path matches but whose method does not answers 405,
// which is the contract for unsupported methods on /cart.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(
        web::scope("/cart")
          .service(
            web::resource("")
              .route(web::get().to(cart_handlers::get_cart_handler))
              .route(web::post().to(cart_handlers::add_to_cart_handler)),
          )
          .service(
            web::resource("/{line_item_id}")
              .route(web::patch().to(cart_handlers::update_cart_item_handler))
              .route(web::put().to(cart_handlers::update_cart_item_handler))
              .route(web::delete().to(cart_handlers::remove_cart_item_handler)),
          ),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route(
            "/{product_id}/reviews",
            web::get().to(review_handlers::list_reviews_handler),
          ),
      )
      .service(web::scope("/reviews").route("", web::post().to(review_handlers::create_review_handler))),
  );
}
