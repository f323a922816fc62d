use actix_web::{HttpResponse, Result as ActixResult};
use tracing::error;

use super::runner::columns_for;
use crate::errors::{Result, TutorHubError};
use crate::models::imports::entities::ImportEntity;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 生成带 BOM 的导入模板：表头 + 一行示例
pub fn template_csv(entity: ImportEntity) -> Result<Vec<u8>> {
    let columns = columns_for(entity);
    let mut wtr = csv::Writer::from_writer(UTF8_BOM.to_vec());

    wtr.write_record(columns.iter().map(|c| c.key))?;
    wtr.write_record(columns.iter().map(|c| c.example))?;

    wtr.into_inner()
        .map_err(|e| TutorHubError::serialization(format!("CSV 生成失败: {e}")))
}

pub async fn download_template(entity: ImportEntity) -> ActixResult<HttpResponse> {
    let data = match template_csv(entity) {
        Ok(data) => data,
        Err(e) => {
            error!("导入模板生成失败: {}", e);
            return Ok(e.to_response());
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{entity}_template.csv\""),
        ))
        .body(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::imports::encoding::decode_upload;
    use crate::services::imports::parser::parse_csv;
    use actix_web::body::to_bytes;
    use actix_web::http::header;

    #[test]
    fn test_templates_parse_back() {
        for entity in ImportEntity::ALL {
            let bytes = template_csv(*entity).unwrap();
            assert!(bytes.starts_with(&UTF8_BOM));

            let decoded = decode_upload(&bytes).unwrap();
            let columns = columns_for(*entity);
            let records = parse_csv(&decoded.text, columns).unwrap();
            assert_eq!(records.len(), 1, "{entity}");
            assert_eq!(records[0].row, 2);
            for column in columns.iter().filter(|c| c.required) {
                assert_eq!(records[0].get(column.key), Some(column.example), "{entity}");
            }
        }
    }

    #[actix_web::test]
    async fn test_template_response_headers() {
        let resp = download_template(ImportEntity::Booths).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"booths_template.csv\""
        );

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body[3..].to_vec()).unwrap();
        assert!(text.starts_with("branch,name,is_active,notes\n"));
    }
}
