use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::crud::resources::{
    BoothResource, BranchResource, ClassSessionResource, ClassTypeResource, CourseResource,
    EvaluationResource, GradeResource, LineChannelResource, NotificationResource,
    StudentResource, SubjectResource, TeacherResource, TimeSlotResource,
};
use crate::crud::{CrudResource, configure_crud, configure_crud_with};
use crate::middlewares::RequireRole;
use crate::models::notifications::requests::ReminderRequest;
use crate::services::NotificationService;
use crate::utils::SafeIDI64;

// 懒加载的全局 NotificationService 实例
static NOTIFICATION_SERVICE: Lazy<NotificationService> = Lazy::new(NotificationService::new_lazy);

pub async fn enqueue_reminders(
    req: HttpRequest,
    body: web::Json<ReminderRequest>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .enqueue_reminders(body.into_inner(), &req)
        .await
}

pub async fn retry_notification(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.retry(id.0, &req).await
}

// 配置路由
pub fn configure_resource_routes(cfg: &mut web::ServiceConfig) {
    configure_crud::<BranchResource>(cfg);
    configure_crud::<SubjectResource>(cfg);
    configure_crud::<GradeResource>(cfg);
    configure_crud::<ClassTypeResource>(cfg);
    configure_crud::<EvaluationResource>(cfg);
    configure_crud::<BoothResource>(cfg);
    configure_crud::<TimeSlotResource>(cfg);
    configure_crud::<TeacherResource>(cfg);
    configure_crud::<StudentResource>(cfg);
    configure_crud::<CourseResource>(cfg);
    configure_crud::<ClassSessionResource>(cfg);
    configure_crud::<LineChannelResource>(cfg);
    configure_crud_with::<NotificationResource, _>(cfg, |scope| {
        let write = || RequireRole::new_any(NotificationResource::write_roles());
        scope
            .route(
                "/reminders",
                web::post().to(enqueue_reminders).wrap(write()),
            )
            .route(
                "/{id}/retry",
                web::post().to(retry_notification).wrap(write()),
            )
    });
}
