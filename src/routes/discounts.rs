use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::discounts::{AddDiscountForm, EditDiscountForm};
use crate::repository::DieselRepository;
use crate::routes::{ApiResponse, error_response};
use crate::services::discounts;

#[get("/discounts")]
pub async fn list_discounts(
    params: web::Query<discounts::DiscountsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discounts::list_discounts(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::from(page)),
        Err(err) => error_response(err, "list discounts"),
    }
}

// Registered before `/discounts/{discount_id}` so `active` is not parsed as an id.
#[get("/discounts/active")]
pub async fn list_active_discounts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discounts::list_active_discounts(repo.get_ref(), &user) {
        Ok(items) => HttpResponse::Ok().json(ApiResponse::data(items)),
        Err(err) => error_response(err, "list active discounts"),
    }
}

#[get("/discounts/{discount_id}")]
pub async fn show_discount(
    discount_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discounts::get_discount(repo.get_ref(), &user, discount_id.into_inner()) {
        Ok(details) => HttpResponse::Ok().json(ApiResponse::data(details)),
        Err(err) => error_response(err, "load discount"),
    }
}

#[post("/discounts")]
pub async fn create_discount(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddDiscountForm>,
) -> impl Responder {
    match discounts::create_discount(repo.get_ref(), &user, form.into_inner()) {
        Ok(details) => HttpResponse::Created()
            .json(ApiResponse::data(details).with_message("Discount created successfully")),
        Err(err) => error_response(err, "create discount"),
    }
}

#[put("/discounts/{discount_id}")]
pub async fn update_discount(
    discount_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditDiscountForm>,
) -> impl Responder {
    match discounts::update_discount(
        repo.get_ref(),
        &user,
        discount_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(details) => HttpResponse::Ok()
            .json(ApiResponse::data(details).with_message("Discount updated successfully")),
        Err(err) => error_response(err, "update discount"),
    }
}

#[delete("/discounts/{discount_id}")]
pub async fn delete_discount(
    discount_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discounts::delete_discount(repo.get_ref(), &user, discount_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Discount deleted successfully")),
        Err(err) => error_response(err, "delete discount"),
    }
}
