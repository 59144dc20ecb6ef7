use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::DieselRepository;
use crate::routes::{ApiResponse, error_response};
use crate::services::products;

#[get("/products")]
/// List products with derived prices, sorted and paginated.
///
/// `sort_by` accepts stored columns and `final_price`, `savings`, `original_price`.
pub async fn list_products(
    params: web::Query<products::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::from(page)),
        Err(err) => error_response(err, "list products"),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(ApiResponse::data(product)),
        Err(err) => error_response(err, "load product"),
    }
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => HttpResponse::Created()
            .json(ApiResponse::data(product).with_message("Product created successfully")),
        Err(err) => error_response(err, "create product"),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    match products::update_product(
        repo.get_ref(),
        &user,
        product_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(product) => HttpResponse::Ok()
            .json(ApiResponse::data(product).with_message("Product updated successfully")),
        Err(err) => error_response(err, "update product"),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::delete_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Product deleted successfully")),
        Err(err) => error_response(err, "delete product"),
    }
}

#[get("/products/{product_id}/discounts")]
/// Active discounts of a product, in the order they are applied.
pub async fn list_product_discounts(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_product_discounts(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(discounts) => HttpResponse::Ok().json(ApiResponse::data(discounts)),
        Err(err) => error_response(err, "list product discounts"),
    }
}
