use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::requests::{UserListParams, UserListQuery},
};

pub async fn list_users(
    service: &UserService,
    params: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let query = UserListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        role: params.role,
        status: params.status,
        branch_id: params.branch_id,
        search: params.search,
    };

    match service
        .get_storage(request)
        .list_users_with_pagination(query)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::services::users::tests::{body_json, memory_storage, request_as};
    use actix_web::web;

    #[actix_web::test]
    async fn test_list_filters_by_branch_and_role() {
        let storage = memory_storage().await;
        let shibuya = fixtures::branch(storage.connection(), "渋谷校").await;
        for (name, role, branch_id) in [
            ("ito", UserRole::Staff, Some(shibuya.id)),
            ("abe", UserRole::Staff, None),
            ("oda", UserRole::Teacher, Some(shibuya.id)),
        ] {
            storage
                .create_user(CreateUserRequest {
                    username: name.into(),
                    email: format!("{name}@example.com"),
                    password: "hash".into(),
                    role,
                    display_name: None,
                    branch_id,
                })
                .await
                .unwrap();
        }

        let params = web::Query::<UserListParams>::from_query(&format!(
            "role=staff&branch_id={}",
            shibuya.id
        ))
        .unwrap()
        .into_inner();
        let req = request_as(storage, 1);
        let resp = UserService::new_lazy().list_users(params, &req).await.unwrap();
        assert_eq!(resp.status(), 200);

        let json = body_json(resp).await;
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["username"], "ito");
    }
}
