use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use tracing::info;

use super::ImportService;
use super::runner::{ImportJob, run_import};
use super::sessions::{ImportGate, ImportSessionManager};
use crate::config::{AppConfig, ImportConfig};
use crate::errors::TutorHubError;
use crate::middlewares::RequireJWT;
use crate::models::imports::entities::ImportEntity;
use crate::models::imports::responses::ImportAcceptedResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 上传的文件
struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

/// 读取 `file` 字段，超过 `max_size` 字节时立即返回 413
async fn read_upload(
    payload: &mut Multipart,
    max_size: usize,
) -> Result<Option<UploadedFile>, TutorHubError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| TutorHubError::import_format(format!("读取上传字段失败: {e}")))?;

        if field.name() != Some("file") {
            continue;
        }
        if upload.is_some() {
            return Err(TutorHubError::import_format(
                "Only one file can be uploaded at a time",
            ));
        }

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload.csv")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| TutorHubError::import_format(format!("读取上传数据失败: {e}")))?;
            if bytes.len() + data.len() > max_size {
                return Err(TutorHubError::payload_too_large(format!(
                    "File exceeds the {max_size} byte limit"
                )));
            }
            bytes.extend_from_slice(&data);
        }
        upload = Some(UploadedFile { name, bytes });
    }

    Ok(upload)
}

pub async fn upload_import(
    service: &ImportService,
    entity: ImportEntity,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    accept_upload(
        service,
        entity,
        payload,
        request,
        &AppConfig::get().import,
        ImportSessionManager::get(),
    )
    .await
}

async fn accept_upload(
    service: &ImportService,
    entity: ImportEntity,
    mut payload: Multipart,
    request: &HttpRequest,
    config: &ImportConfig,
    sessions: &'static ImportSessionManager,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let Some(guard) = ImportGate::get().try_acquire(user_id) else {
        return Ok(TutorHubError::import_in_progress(
            "Another import is already running for this user",
        )
        .to_response());
    };

    let file = match read_upload(&mut payload, config.max_file_size).await {
        Ok(Some(file)) if !file.bytes.is_empty() => file,
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileInvalid,
                "No file content found in field 'file'",
            )));
        }
        Err(e) => return Ok(e.to_response()),
    };

    let session = sessions.create(user_id, entity, &file.name);
    info!(
        "User {} started {} import {} ({} bytes)",
        user_id,
        entity,
        session.id,
        file.bytes.len()
    );

    let storage = service.get_storage(request);
    let job = ImportJob {
        session_id: session.id,
        entity,
        bytes: file.bytes,
        max_rows: config.max_rows,
    };
    tokio::spawn(async move {
        // 任务结束时释放闸门
        let _guard = guard;
        run_import(storage, sessions, job).await;
    });

    let events_url = format!("/api/v1/imports/{}/events", session.id);
    Ok(HttpResponse::Accepted().json(ApiResponse::success(
        ImportAcceptedResponse {
            session,
            events_url,
        },
        "Import accepted",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::grades;
    use crate::models::imports::entities::ImportStatus;
    use crate::services::users::tests::{body_json, memory_storage, request_as};
    use actix_multipart::test::create_form_data_payload_and_headers;
    use actix_web::error::PayloadError;
    use actix_web::test::TestRequest;
    use actix_web::web::Bytes;
    use futures_util::stream;
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn form(field: &str, content: &'static str) -> Multipart {
        let (body, headers) = create_form_data_payload_and_headers(
            field,
            Some("grades.csv".to_string()),
            None,
            Bytes::from_static(content.as_bytes()),
        );
        Multipart::new(&headers, stream::iter([Ok::<_, PayloadError>(body)]))
    }

    fn limits(max_file_size: usize) -> ImportConfig {
        ImportConfig {
            max_file_size,
            ..Default::default()
        }
    }

    fn manager() -> &'static ImportSessionManager {
        Box::leak(Box::new(ImportSessionManager::new(8, 60)))
    }

    #[actix_web::test]
    async fn test_anonymous_upload_is_unauthorized() {
        let request = TestRequest::default().to_http_request();
        let resp = accept_upload(
            &ImportService::new_lazy(),
            ImportEntity::Grades,
            form("file", "Name\n中学1年\n"),
            &request,
            &limits(1024),
            manager(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_oversize_file_is_rejected_and_gate_released() {
        let user_id = 9101;
        let request = request_as(memory_storage().await, user_id);
        let resp = accept_upload(
            &ImportService::new_lazy(),
            ImportEntity::Grades,
            form("file", "Name\n中学1年\n中学2年\n"),
            &request,
            &limits(8),
            manager(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 413);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::ImportFileTooLarge as i32);
        assert!(!ImportGate::get().is_held(user_id));
    }

    #[actix_web::test]
    async fn test_second_upload_while_running_is_conflict() {
        let user_id = 9102;
        let _running = ImportGate::get().try_acquire(user_id).unwrap();
        let request = request_as(memory_storage().await, user_id);
        let resp = accept_upload(
            &ImportService::new_lazy(),
            ImportEntity::Grades,
            form("file", "Name\n中学1年\n"),
            &request,
            &limits(1024),
            manager(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 409);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::ImportInProgress as i32);
    }

    #[actix_web::test]
    async fn test_missing_file_field_is_bad_request() {
        let user_id = 9103;
        let request = request_as(memory_storage().await, user_id);
        let resp = accept_upload(
            &ImportService::new_lazy(),
            ImportEntity::Grades,
            form("attachment", "Name\n中学1年\n"),
            &request,
            &limits(1024),
            manager(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 400);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::ImportFileInvalid as i32);
        assert!(!ImportGate::get().is_held(user_id));
    }

    #[actix_web::test]
    async fn test_accepted_upload_runs_in_background() {
        let user_id = 9104;
        let storage = memory_storage().await;
        let sessions = manager();
        let request = request_as(storage.clone(), user_id);
        let resp = accept_upload(
            &ImportService::new_lazy(),
            ImportEntity::Grades,
            form("file", "Name\n中学1年\n中学2年\n"),
            &request,
            &limits(1024),
            sessions,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 202);
        let json = body_json(resp).await;
        let id = json["data"]["session"]["id"].as_str().unwrap().to_string();
        assert_eq!(json["data"]["session"]["file_name"], "grades.csv");
        assert_eq!(json["data"]["events_url"], format!("/api/v1/imports/{id}/events"));

        let id = uuid::Uuid::parse_str(&id).unwrap();
        let mut status = ImportStatus::Pending;
        for _ in 0..100 {
            status = sessions.find(id).unwrap().status;
            if status.is_finished() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert_eq!(status, ImportStatus::Succeeded);
        assert_eq!(grades::Entity::find().count(storage.connection()).await.unwrap(), 2);
    }
}
