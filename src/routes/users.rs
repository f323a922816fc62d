use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::services::UserService;
use crate::utils::SafeIDI64;

static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(body.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.update_user(id.0, body.into_inner(), &req).await
}

pub async fn delete_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(id.0, &req).await
}

// 账号管理只对管理员开放，限流与资源接口共用同一配额
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(RequireRole::new_any(UserRole::admin_roles()))
            .wrap(RateLimit::api())
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_users))
                    .route(web::post().to(create_user)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user)),
            ),
    );
}
