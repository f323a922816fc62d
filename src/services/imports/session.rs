use std::convert::Infallible;

use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;
use uuid::Uuid;

use super::sessions::ImportSessionManager;
use crate::middlewares::RequireJWT;
use crate::models::imports::entities::{ImportEvent, ImportSession};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ImportSessionNotFound,
        "Import session not found",
    ))
}

/// 会话只对发起人和管理员可见，其他人视为不存在
fn can_view(request: &HttpRequest, session: &ImportSession) -> bool {
    let user_id = RequireJWT::extract_user_id(request);
    let role = RequireJWT::extract_user_role(request);
    user_id == Some(session.user_id) || role == Some(UserRole::Admin)
}

pub async fn get_session(id: Uuid, request: &HttpRequest) -> ActixResult<HttpResponse> {
    match ImportSessionManager::get().find(id) {
        Some(session) if can_view(request, &session) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(session, "Import session retrieved successfully"),
        )),
        _ => Ok(session_not_found()),
    }
}

/// 单个 SSE 帧
fn sse_frame(event: &ImportEvent) -> Bytes {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), data))
}

/// 订阅时先补发当前状态，让晚到的订阅者也能看到进度
fn snapshot_events(session: &ImportSession) -> Vec<ImportEvent> {
    let mut events = Vec::with_capacity(2);
    if session.summary.total > 0 {
        let summary = &session.summary;
        events.push(ImportEvent::Progress {
            session_id: session.id,
            processed: summary.processed,
            total: summary.total,
            created: summary.created,
            updated: summary.updated,
            skipped: summary.skipped,
            errors: summary.errors.len() as u64,
        });
    }
    events.push(ImportEvent::Status {
        session_id: session.id,
        status: session.status,
        error: session.error.clone(),
    });
    events
}

pub async fn stream_events(id: Uuid, request: &HttpRequest) -> ActixResult<HttpResponse> {
    event_stream(ImportSessionManager::get(), id, request)
}

/// 快照帧之后转发广播事件，收到终态事件即结束
fn event_stream(
    manager: &ImportSessionManager,
    id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some((session, rx)) = manager.subscribe(id) else {
        return Ok(session_not_found());
    };
    if !can_view(request, &session) {
        return Ok(session_not_found());
    }

    let head = stream::iter(
        snapshot_events(&session)
            .into_iter()
            .map(|event| Ok::<_, Infallible>(sse_frame(&event))),
    );

    // 已结束的会话只补发快照
    let receiver = (!session.status.is_finished()).then_some(rx);
    let tail = stream::unfold(receiver, |state| async move {
        let mut rx: broadcast::Receiver<ImportEvent> = state?;
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let next = if event.is_terminal() { None } else { Some(rx) };
                    return Some((Ok::<_, Infallible>(sse_frame(&event)), next));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("SSE subscriber lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(head.chain(tail)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::imports::entities::{ImportEntity, ImportStatus, ImportSummary};
    use crate::services::users::tests::{memory_storage, request_as};
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;
    use std::time::Duration;

    #[test]
    fn test_sse_frame_format() {
        let event = ImportEvent::Status {
            session_id: Uuid::nil(),
            status: ImportStatus::Running,
            error: None,
        };
        let frame = sse_frame(&event);
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.starts_with("event: status\ndata: {"));
        assert!(text.ends_with("}\n\n"));
    }

    #[test]
    fn test_snapshot_ends_with_status() {
        let manager = ImportSessionManager::new(4, 3600);
        let session = manager.create(1, ImportEntity::Grades, "g.csv");
        let events = snapshot_events(&session);
        assert_eq!(events.len(), 1);

        manager
            .transition(session.id, ImportStatus::Running, None)
            .unwrap();
        manager.record_progress(
            session.id,
            &ImportSummary {
                total: 10,
                processed: 10,
                ..Default::default()
            },
        );
        manager
            .transition(session.id, ImportStatus::Succeeded, None)
            .unwrap();

        let events = snapshot_events(&manager.find(session.id).unwrap());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "progress");
        assert!(events[1].is_terminal());
    }

    #[actix_web::test]
    async fn test_stream_closes_after_terminal_status() {
        let manager = ImportSessionManager::new(8, 60);
        let session = manager.create(31, ImportEntity::Subjects, "s.csv");
        manager
            .transition(session.id, ImportStatus::Running, None)
            .unwrap();

        let request = request_as(memory_storage().await, 31);
        let resp = event_stream(&manager, session.id, &request).unwrap();
        assert_eq!(resp.status(), 200);

        let finish = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            manager.record_progress(
                session.id,
                &ImportSummary {
                    total: 1,
                    processed: 1,
                    created: 1,
                    ..Default::default()
                },
            );
            manager
                .transition(session.id, ImportStatus::Succeeded, None)
                .unwrap();
        };
        let (body, ()) = tokio::time::timeout(Duration::from_secs(2), async {
            tokio::join!(to_bytes(resp.into_body()), finish)
        })
        .await
        .expect("stream did not end on terminal status");

        let body = body.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        let names: Vec<_> = text
            .lines()
            .filter_map(|line| line.strip_prefix("event: "))
            .collect();
        assert_eq!(names, vec!["status", "progress", "status"]);
        assert!(text.trim_end().ends_with(r#""status":"succeeded","error":null}"#));
    }

    #[actix_web::test]
    async fn test_finished_session_replays_snapshot_only() {
        let manager = ImportSessionManager::new(8, 60);
        let session = manager.create(32, ImportEntity::Subjects, "s.csv");
        manager
            .transition(session.id, ImportStatus::Running, None)
            .unwrap();
        manager
            .transition(session.id, ImportStatus::Failed, Some("bad header".into()))
            .unwrap();

        let resp = event_stream(&manager, session.id, &request_as(memory_storage().await, 32))
            .unwrap();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert_eq!(text.matches("event: ").count(), 1);
        assert!(text.contains("bad header"));

        // 其他非管理员用户看不到该会话
        let other = TestRequest::default().to_http_request();
        let resp = event_stream(&manager, session.id, &other).unwrap();
        assert_eq!(resp.status(), 404);
    }
}
