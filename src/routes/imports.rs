use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ImportService;
use crate::utils::{SafeImportEntity, SafeSessionId};

// 懒加载的全局 ImportService 实例
static IMPORT_SERVICE: Lazy<ImportService> = Lazy::new(ImportService::new_lazy);

pub async fn upload(
    req: HttpRequest,
    entity: SafeImportEntity,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.upload(entity.0, payload, &req).await
}

pub async fn download_template(entity: SafeImportEntity) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.template(entity.0).await
}

pub async fn get_session(req: HttpRequest, id: SafeSessionId) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.get_session(id.0, &req).await
}

pub async fn stream_events(req: HttpRequest, id: SafeSessionId) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.stream_events(id.0, &req).await
}

// 配置路由
pub fn configure_import_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/imports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    // 模板路由需先于 /{id} 注册
                    .route("/templates/{entity}", web::get().to(download_template))
                    .route("/{id}/events", web::get().to(stream_events))
                    .service(
                        web::resource("/{entity}")
                            .guard(guard::Post())
                            .wrap(middlewares::RateLimit::imports())
                            .route(web::post().to(upload)),
                    )
                    .route("/{id}", web::get().to(get_session)),
            ),
    );
}
