use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, Scope, web};
use tracing::info;
use validator::Validate;

use super::store::{self, RemoveOutcome, UpdateOutcome};
use super::{CrudResource, ListParams};
use crate::errors::TutorHubError;
use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::SafeIDI64;
use crate::utils::validate::{field_error, field_errors};

fn get_storage(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

fn not_found<R: CrudResource>() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        format!("{} not found", R::LABEL),
    ))
}

pub async fn list<R: CrudResource>(
    req: HttpRequest,
    query: web::Query<ListParams<R::Filter>>,
) -> ActixResult<HttpResponse> {
    let storage = get_storage(&req);

    match store::list::<R>(storage.connection(), query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            format!("{} list retrieved successfully", R::LABEL),
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

pub async fn get_one<R: CrudResource>(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let storage = get_storage(&req);

    match store::find::<R, _>(storage.connection(), id.0).await {
        Ok(Some(model)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            R::to_output(model),
            format!("{} retrieved successfully", R::LABEL),
        ))),
        Ok(None) => Ok(not_found::<R>()),
        Err(e) => Ok(e.to_response()),
    }
}

pub async fn create<R: CrudResource>(
    req: HttpRequest,
    body: web::Json<R::Create>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(field_errors(&errors))));
    }

    let storage = get_storage(&req);

    match store::create::<R, _>(storage.connection(), body).await {
        Ok(model) => Ok(HttpResponse::Created().json(ApiResponse::success(
            R::to_output(model),
            format!("{} created successfully", R::LABEL),
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

pub async fn update<R: CrudResource>(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<R::Update>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(field_errors(&errors))));
    }

    let storage = get_storage(&req);

    match store::update::<R, _>(storage.connection(), id.0, body).await {
        Ok(UpdateOutcome::Updated(model)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            R::to_output(model),
            format!("{} updated successfully", R::LABEL),
        ))),
        Ok(UpdateOutcome::NotFound) => Ok(not_found::<R>()),
        Ok(UpdateOutcome::Invalid(err)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(vec![field_error(&err)]))),
        Err(e) => Ok(e.to_response()),
    }
}

pub async fn remove<R: CrudResource>(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let storage = get_storage(&req);

    match store::remove::<R>(storage.connection(), id.0).await {
        Ok(RemoveOutcome::Removed) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            format!("{} deleted successfully", R::LABEL),
        ))),
        Ok(RemoveOutcome::NotFound) => Ok(not_found::<R>()),
        Ok(RemoveOutcome::Restricted(models)) => {
            info!(
                "Refused to delete {} {}: referenced by {:?}",
                R::TABLE,
                id.0,
                models
            );
            Ok(TutorHubError::delete_restricted(format!(
                "{} is still referenced by: {}",
                R::LABEL,
                models.join(", ")
            ))
            .to_response())
        }
        Err(e) => Ok(e.to_response()),
    }
}

/// 注册资源的五个标准路由
pub fn configure_crud<R: CrudResource>(cfg: &mut web::ServiceConfig) {
    configure_crud_with::<R, _>(cfg, |scope| scope);
}

/// 注册标准路由，并在同一前缀下追加额外路由
///
/// 额外路由先于 `/{id}` 注册，避免被其匹配。
pub fn configure_crud_with<R, F>(cfg: &mut web::ServiceConfig, extra: F)
where
    R: CrudResource,
    F: FnOnce(Scope) -> Scope,
{
    let read = || RequireRole::new_any(R::read_roles());
    let write = || RequireRole::new_any(R::write_roles());

    let scope = extra(web::scope(R::PATH))
        .route("", web::get().to(list::<R>).wrap(read()))
        .route("", web::post().to(create::<R>).wrap(write()))
        .route("/{id}", web::get().to(get_one::<R>).wrap(read()))
        .route("/{id}", web::put().to(update::<R>).wrap(write()))
        .route("/{id}", web::delete().to(remove::<R>).wrap(write()));

    // 限流按用户计数，需要在 JWT 校验之后执行
    cfg.service(scope.wrap(RateLimit::api()).wrap(RequireJWT));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::{BranchResource, ClassTypeResource, fixtures};
    use crate::models::branches::requests::CreateBranchRequest;
    use crate::models::class_types::requests::UpdateClassTypeRequest;
    use crate::services::users::tests::{body_json, memory_storage, request_as};

    fn branch_body(name: &str) -> web::Json<CreateBranchRequest> {
        web::Json(CreateBranchRequest {
            name: name.into(),
            address: None,
            phone: None,
            notes: None,
            display_order: None,
        })
    }

    #[actix_web::test]
    async fn test_create_reports_field_details_then_creates() {
        let storage = memory_storage().await;

        let resp = create::<BranchResource>(request_as(storage.clone(), 1), branch_body("  "))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::ValidationFailed as i32);
        assert_eq!(json["details"][0]["field"], "name");

        let resp = create::<BranchResource>(request_as(storage.clone(), 1), branch_body("渋谷校"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["name"], "渋谷校");

        let resp = create::<BranchResource>(request_as(storage, 1), branch_body("渋谷校"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
    }

    #[actix_web::test]
    async fn test_missing_rows_use_not_found_envelope() {
        let storage = memory_storage().await;

        let resp = get_one::<BranchResource>(request_as(storage.clone(), 1), SafeIDI64(77))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::NotFound as i32);
        assert_eq!(json["error"], "Branch not found");

        let resp = update::<ClassTypeResource>(
            request_as(storage.clone(), 1),
            SafeIDI64(77),
            web::Json(UpdateClassTypeRequest::default()),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 404);

        let resp = remove::<BranchResource>(request_as(storage, 1), SafeIDI64(77))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_restricted_delete_names_dependents() {
        let storage = memory_storage().await;
        let branch = fixtures::branch(storage.connection(), "渋谷校").await;
        fixtures::teacher(storage.connection(), Some(branch.id), "佐藤", None).await;
        fixtures::student(storage.connection(), Some(branch.id), "田中", None).await;

        let resp = remove::<BranchResource>(request_as(storage.clone(), 1), SafeIDI64(branch.id))
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::DeleteRestricted as i32);
        assert_eq!(json["error"], "Branch is still referenced by: teachers, students");

        let resp = get_one::<BranchResource>(request_as(storage, 1), SafeIDI64(branch.id))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}
