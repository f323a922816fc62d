//! 各实体的导入列定义与按自然键写入

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use validator::Validate;

use super::parser::{ColumnSpec, CsvRecord};
use crate::crud::CrudResource;
use crate::crud::resources::{
    BoothResource, BranchResource, ClassTypeResource, EvaluationResource, GradeResource,
    StudentResource, SubjectResource, TeacherResource, normalize_email,
};
use crate::crud::store::{self, UpdateOutcome};
use crate::entity::{booths, branches, class_types, evaluations, grades, students, subjects, teachers};
use crate::models::booths::requests::{CreateBoothRequest, UpdateBoothRequest};
use crate::models::branches::requests::{CreateBranchRequest, UpdateBranchRequest};
use crate::models::class_types::requests::{CreateClassTypeRequest, UpdateClassTypeRequest};
use crate::models::evaluations::requests::{CreateEvaluationRequest, UpdateEvaluationRequest};
use crate::models::grades::entities::SchoolLevel;
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::models::imports::entities::{ImportRowError, ImportSummary};
use crate::models::students::entities::StudentStatus;
use crate::models::students::requests::{CreateStudentRequest, UpdateStudentRequest};
use crate::models::subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest};
use crate::models::teachers::requests::{CreateTeacherRequest, UpdateTeacherRequest};
use crate::utils::validate::{field_error, field_errors};

/// 单行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

/// 单行错误（行号由调用方补上）
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub field: Option<String>,
    pub message: String,
}

impl RowError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    fn row(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn db(err: DbErr) -> Self {
        Self::row(format!("Database error: {err}"))
    }
}

/// 可通过 CSV 导入的资源
#[async_trait]
pub trait ImportTarget: CrudResource {
    const COLUMNS: &'static [ColumnSpec];

    /// 文件内去重使用的自然键，缺少键字段时返回 None
    fn natural_key(record: &CsvRecord) -> Option<String>;

    /// 将记录转换为创建请求，外键名称在此解析为 id
    async fn build(db: &DatabaseConnection, record: &CsvRecord)
    -> Result<Self::Create, RowError>;

    /// 按自然键查找已有行
    async fn find_existing(
        db: &DatabaseConnection,
        req: &Self::Create,
    ) -> Result<Option<Self::Model>, DbErr>;

    /// 命中已有行时按创建请求覆盖，缺省字段保持原值
    fn into_update(req: Self::Create) -> Self::Update;
}

/// 依次导入所有记录，每处理完 `every` 行调用一次 `progress`
pub async fn import_records<T: ImportTarget>(
    db: &DatabaseConnection,
    records: Vec<CsvRecord>,
    every: u64,
    mut progress: impl FnMut(&ImportSummary) + Send,
) -> ImportSummary {
    let mut summary = ImportSummary {
        total: records.len() as u64,
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for record in records {
        match import_row::<T>(db, &record, &mut seen).await {
            Ok(RowOutcome::Created) => summary.created += 1,
            Ok(RowOutcome::Updated) => summary.updated += 1,
            Ok(RowOutcome::Skipped) => summary.skipped += 1,
            Err(errors) => summary.errors.extend(errors.into_iter().map(|e| ImportRowError {
                row: record.row,
                field: e.field,
                message: e.message,
            })),
        }
        summary.processed += 1;
        if every > 0 && summary.processed % every == 0 {
            progress(&summary);
        }
    }

    summary
}

async fn import_row<T: ImportTarget>(
    db: &DatabaseConnection,
    record: &CsvRecord,
    seen: &mut HashSet<String>,
) -> Result<RowOutcome, Vec<RowError>> {
    let key = T::natural_key(record);
    if let Some(key) = &key
        && seen.contains(key)
    {
        return Ok(RowOutcome::Skipped);
    }

    let req = T::build(db, record).await.map_err(|e| vec![e])?;
    if let Err(errors) = req.validate() {
        return Err(field_errors(&errors)
            .into_iter()
            .map(|e| RowError::field(&e.field, e.message))
            .collect());
    }

    let existing = T::find_existing(db, &req)
        .await
        .map_err(|e| vec![RowError::db(e)])?;

    let outcome = match existing {
        Some(model) => {
            match store::update_model::<T, _>(db, model, T::into_update(req)).await {
                Ok(UpdateOutcome::Updated(_)) => RowOutcome::Updated,
                Ok(UpdateOutcome::Invalid(err)) => {
                    let e = field_error(&err);
                    return Err(vec![RowError::field(&e.field, e.message)]);
                }
                Ok(UpdateOutcome::NotFound) => {
                    return Err(vec![RowError::row("Row disappeared during import")]);
                }
                Err(e) => return Err(vec![RowError::row(e.message())]),
            }
        }
        None => match store::create::<T, _>(db, req).await {
            Ok(_) => RowOutcome::Created,
            Err(e) => return Err(vec![RowError::row(e.message())]),
        },
    };

    if let Some(key) = key {
        seen.insert(key);
    }
    Ok(outcome)
}

// 字段读取

fn text(record: &CsvRecord, key: &str) -> Option<String> {
    record.get(key).map(str::to_string)
}

fn required_text(record: &CsvRecord, key: &str) -> String {
    record.get(key).unwrap_or_default().to_string()
}

fn number<N: FromStr>(record: &CsvRecord, key: &str) -> Result<Option<N>, RowError> {
    match record.get(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| RowError::field(key, format!("'{value}' is not a valid number"))),
        None => Ok(None),
    }
}

fn flag(record: &CsvRecord, key: &str) -> Result<Option<bool>, RowError> {
    let Some(value) = record.get(key) else {
        return Ok(None);
    };
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "有効" | "はい" | "○" => Ok(Some(true)),
        "false" | "0" | "no" | "n" | "無効" | "いいえ" | "×" => Ok(Some(false)),
        _ => Err(RowError::field(key, format!("'{value}' is not a valid boolean"))),
    }
}

fn choice<E: FromStr<Err = String>>(record: &CsvRecord, key: &str) -> Result<Option<E>, RowError> {
    match record.get(key) {
        Some(value) => E::from_str(&value.to_lowercase())
            .map(Some)
            .map_err(|e| RowError::field(key, e)),
        None => Ok(None),
    }
}

fn name_key(record: &CsvRecord) -> Option<String> {
    record.get("name").map(str::to_string)
}

// 人员优先按邮箱去重，没有邮箱时按姓名
fn person_key(record: &CsvRecord) -> Option<String> {
    match record.get("email") {
        Some(email) => Some(format!("email:{}", email.to_lowercase())),
        None => record.get("name").map(|name| format!("name:{name}")),
    }
}

async fn resolve_branch(
    db: &DatabaseConnection,
    record: &CsvRecord,
) -> Result<Option<i64>, RowError> {
    let Some(name) = record.get("branch") else {
        return Ok(None);
    };
    let branch = branches::Entity::find()
        .filter(branches::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(RowError::db)?;
    match branch {
        Some(branch) => Ok(Some(branch.id)),
        None => Err(RowError::field("branch", format!("Branch '{name}' not found"))),
    }
}

async fn resolve_grade(db: &DatabaseConnection, record: &CsvRecord) -> Result<Option<i64>, RowError> {
    let Some(name) = record.get("grade") else {
        return Ok(None);
    };
    let grade = grades::Entity::find()
        .filter(grades::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(RowError::db)?;
    match grade {
        Some(grade) => Ok(Some(grade.id)),
        None => Err(RowError::field("grade", format!("Grade '{name}' not found"))),
    }
}

// 同名授业类型取 id 最小者
async fn resolve_parent_type(
    db: &DatabaseConnection,
    record: &CsvRecord,
) -> Result<Option<i64>, RowError> {
    let Some(name) = record.get("parent") else {
        return Ok(None);
    };
    let parent = class_types::Entity::find()
        .filter(class_types::Column::Name.eq(name))
        .order_by_asc(class_types::Column::Id)
        .one(db)
        .await
        .map_err(RowError::db)?;
    match parent {
        Some(parent) => Ok(Some(parent.id)),
        None => Err(RowError::field(
            "parent",
            format!("Parent class type '{name}' not found"),
        )),
    }
}

const NOTES: ColumnSpec = ColumnSpec::optional("notes", &["Notes", "Memo", "備考", "メモ"], "");

#[async_trait]
impl ImportTarget for BranchResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Branch Name", "Name", "校舎名", "名称"], "渋谷校"),
        ColumnSpec::optional("address", &["Address", "住所"], "東京都渋谷区1-2-3"),
        ColumnSpec::optional("phone", &["Phone", "TEL", "電話番号"], "03-1234-5678"),
        ColumnSpec::optional("display_order", &["Display Order", "Order", "表示順"], "1"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        name_key(record)
    }

    async fn build(
        _db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateBranchRequest, RowError> {
        Ok(CreateBranchRequest {
            name: required_text(record, "name"),
            address: text(record, "address"),
            phone: text(record, "phone"),
            notes: text(record, "notes"),
            display_order: number(record, "display_order")?,
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateBranchRequest,
    ) -> Result<Option<branches::Model>, DbErr> {
        branches::Entity::find()
            .filter(branches::Column::Name.eq(req.name.trim()))
            .one(db)
            .await
    }

    fn into_update(req: CreateBranchRequest) -> UpdateBranchRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for SubjectResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Subject", "Name", "科目名", "科目"], "数学"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        name_key(record)
    }

    async fn build(
        _db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateSubjectRequest, RowError> {
        Ok(CreateSubjectRequest {
            name: required_text(record, "name"),
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateSubjectRequest,
    ) -> Result<Option<subjects::Model>, DbErr> {
        subjects::Entity::find()
            .filter(subjects::Column::Name.eq(req.name.trim()))
            .one(db)
            .await
    }

    fn into_update(req: CreateSubjectRequest) -> UpdateSubjectRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for GradeResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Grade", "Name", "学年名", "学年"], "中学1年"),
        ColumnSpec::optional("school_level", &["School Level", "学校区分"], "middle"),
        ColumnSpec::optional("grade_year", &["Grade Year", "Year", "年次"], "1"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        name_key(record)
    }

    async fn build(
        _db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateGradeRequest, RowError> {
        Ok(CreateGradeRequest {
            name: required_text(record, "name"),
            school_level: choice::<SchoolLevel>(record, "school_level")?,
            grade_year: number(record, "grade_year")?,
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateGradeRequest,
    ) -> Result<Option<grades::Model>, DbErr> {
        grades::Entity::find()
            .filter(grades::Column::Name.eq(req.name.trim()))
            .one(db)
            .await
    }

    fn into_update(req: CreateGradeRequest) -> UpdateGradeRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for ClassTypeResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required(
            "name",
            &["Class Type", "Name", "授業タイプ名", "授業タイプ"],
            "個別指導",
        ),
        ColumnSpec::optional("parent", &["Parent", "Parent Type", "親タイプ"], ""),
        ColumnSpec::optional("color", &["Color", "Colour", "色"], "#3B82F6"),
        NOTES,
    ];

    // 名称只在同一父类型下唯一
    fn natural_key(record: &CsvRecord) -> Option<String> {
        let name = record.get("name")?;
        Some(format!("{}/{}", record.get("parent").unwrap_or_default(), name))
    }

    async fn build(
        db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateClassTypeRequest, RowError> {
        Ok(CreateClassTypeRequest {
            name: required_text(record, "name"),
            parent_id: resolve_parent_type(db, record).await?,
            color: text(record, "color"),
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateClassTypeRequest,
    ) -> Result<Option<class_types::Model>, DbErr> {
        let parent = match req.parent_id {
            Some(parent_id) => class_types::Column::ParentId.eq(parent_id),
            None => class_types::Column::ParentId.is_null(),
        };
        class_types::Entity::find()
            .filter(class_types::Column::Name.eq(req.name.trim()))
            .filter(parent)
            .order_by_asc(class_types::Column::Id)
            .one(db)
            .await
    }

    fn into_update(req: CreateClassTypeRequest) -> UpdateClassTypeRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for EvaluationResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Evaluation", "Name", "評価名", "評価"], "A"),
        ColumnSpec::required("score", &["Score", "Points", "点数"], "90"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        name_key(record)
    }

    async fn build(
        _db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateEvaluationRequest, RowError> {
        let Some(score) = number(record, "score")? else {
            return Err(RowError::field("score", "Score is required"));
        };
        Ok(CreateEvaluationRequest {
            name: required_text(record, "name"),
            score,
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateEvaluationRequest,
    ) -> Result<Option<evaluations::Model>, DbErr> {
        evaluations::Entity::find()
            .filter(evaluations::Column::Name.eq(req.name.trim()))
            .one(db)
            .await
    }

    fn into_update(req: CreateEvaluationRequest) -> UpdateEvaluationRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for BoothResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("branch", &["Branch", "Branch Name", "校舎", "校舎名"], "渋谷校"),
        ColumnSpec::required("name", &["Booth", "Name", "ブース名", "ブース"], "ブース1"),
        ColumnSpec::optional("is_active", &["Active", "Is Active", "有効"], "true"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        Some(format!("{}/{}", record.get("branch")?, record.get("name")?))
    }

    async fn build(
        db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateBoothRequest, RowError> {
        let Some(branch_id) = resolve_branch(db, record).await? else {
            return Err(RowError::field("branch", "Branch is required"));
        };
        Ok(CreateBoothRequest {
            branch_id,
            name: required_text(record, "name"),
            is_active: flag(record, "is_active")?,
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateBoothRequest,
    ) -> Result<Option<booths::Model>, DbErr> {
        booths::Entity::find()
            .filter(booths::Column::BranchId.eq(req.branch_id))
            .filter(booths::Column::Name.eq(req.name.trim()))
            .one(db)
            .await
    }

    fn into_update(req: CreateBoothRequest) -> UpdateBoothRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for TeacherResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Name", "Teacher Name", "講師名", "氏名"], "佐藤 花子"),
        ColumnSpec::optional("kana_name", &["Kana", "Kana Name", "フリガナ", "ふりがな"], "サトウ ハナコ"),
        ColumnSpec::optional("branch", &["Branch", "校舎", "校舎名"], "渋谷校"),
        ColumnSpec::optional("email", &["Email", "E-mail", "メールアドレス", "メール"], "sato@example.com"),
        ColumnSpec::optional("phone", &["Phone", "TEL", "電話番号"], "090-1234-5678"),
        ColumnSpec::optional("line_id", &["LINE ID", "LINE", "LINE_ID"], ""),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        person_key(record)
    }

    async fn build(
        db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateTeacherRequest, RowError> {
        Ok(CreateTeacherRequest {
            user_id: None,
            branch_id: resolve_branch(db, record).await?,
            name: required_text(record, "name"),
            kana_name: text(record, "kana_name"),
            email: text(record, "email"),
            phone: text(record, "phone"),
            line_id: text(record, "line_id"),
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateTeacherRequest,
    ) -> Result<Option<teachers::Model>, DbErr> {
        let select = match normalize_email(req.email.clone()) {
            Some(email) => teachers::Entity::find().filter(teachers::Column::Email.eq(email)),
            None => teachers::Entity::find()
                .filter(teachers::Column::Name.eq(req.name.trim()))
                .filter(teachers::Column::Email.is_null()),
        };
        select.order_by_asc(teachers::Column::Id).one(db).await
    }

    fn into_update(req: CreateTeacherRequest) -> UpdateTeacherRequest {
        req.into()
    }
}

#[async_trait]
impl ImportTarget for StudentResource {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::required("name", &["Name", "Student Name", "生徒名", "氏名"], "田中 太郎"),
        ColumnSpec::optional("kana_name", &["Kana", "Kana Name", "フリガナ", "ふりがな"], "タナカ タロウ"),
        ColumnSpec::optional("branch", &["Branch", "校舎", "校舎名"], "渋谷校"),
        ColumnSpec::optional("grade", &["Grade", "学年"], "中学1年"),
        ColumnSpec::optional("school_name", &["School", "School Name", "学校名"], "渋谷中学校"),
        ColumnSpec::optional("email", &["Email", "E-mail", "メールアドレス", "メール"], ""),
        ColumnSpec::optional("parent_email", &["Parent Email", "保護者メール"], "parent@example.com"),
        ColumnSpec::optional("parent_phone", &["Parent Phone", "保護者電話番号"], "090-8765-4321"),
        ColumnSpec::optional("line_id", &["LINE ID", "LINE", "LINE_ID"], ""),
        ColumnSpec::optional("status", &["Status", "状態"], "enrolled"),
        NOTES,
    ];

    fn natural_key(record: &CsvRecord) -> Option<String> {
        person_key(record)
    }

    async fn build(
        db: &DatabaseConnection,
        record: &CsvRecord,
    ) -> Result<CreateStudentRequest, RowError> {
        Ok(CreateStudentRequest {
            user_id: None,
            branch_id: resolve_branch(db, record).await?,
            grade_id: resolve_grade(db, record).await?,
            name: required_text(record, "name"),
            kana_name: text(record, "kana_name"),
            school_name: text(record, "school_name"),
            email: text(record, "email"),
            parent_email: text(record, "parent_email"),
            parent_phone: text(record, "parent_phone"),
            line_id: text(record, "line_id"),
            status: choice::<StudentStatus>(record, "status")?,
            notes: text(record, "notes"),
        })
    }

    async fn find_existing(
        db: &DatabaseConnection,
        req: &CreateStudentRequest,
    ) -> Result<Option<students::Model>, DbErr> {
        let select = match normalize_email(req.email.clone()) {
            Some(email) => students::Entity::find().filter(students::Column::Email.eq(email)),
            None => students::Entity::find()
                .filter(students::Column::Name.eq(req.name.trim()))
                .filter(students::Column::Email.is_null()),
        };
        select.order_by_asc(students::Column::Id).one(db).await
    }

    fn into_update(req: CreateStudentRequest) -> UpdateStudentRequest {
        req.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::services::imports::parser::parse_csv;
    use sea_orm::PaginatorTrait;

    async fn run<T: ImportTarget>(db: &DatabaseConnection, csv: &str) -> ImportSummary {
        let records = parse_csv(csv, T::COLUMNS).unwrap();
        import_records::<T>(db, records, 50, |_| {}).await
    }

    #[tokio::test]
    async fn test_upsert_on_name_and_in_file_duplicates() {
        let db = fixtures::db().await;
        fixtures::branch(&db, "渋谷校").await;

        let csv = "校舎名,住所,表示順\n渋谷校,東京都渋谷区,2\n新宿校,,3\n新宿校,,4\n";
        let summary = run::<BranchResource>(&db, csv).await;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.errors.is_empty());

        let shibuya = branches::Entity::find()
            .filter(branches::Column::Name.eq("渋谷校"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shibuya.address.as_deref(), Some("東京都渋谷区"));
        assert_eq!(shibuya.display_order, 2);
        assert_eq!(branches::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_references_missing_from_row() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let existing = fixtures::teacher(&db, Some(branch.id), "佐藤 花子", None).await;

        let csv = "講師名,校舎,電話番号\n佐藤 花子,,090-1111-2222\n";
        let summary = run::<TeacherResource>(&db, csv).await;
        assert_eq!(summary.updated, 1);

        let teacher = teachers::Entity::find_by_id(existing.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teacher.branch_id, Some(branch.id));
        assert_eq!(teacher.phone.as_deref(), Some("090-1111-2222"));
    }

    #[tokio::test]
    async fn test_row_errors_are_collected() {
        let db = fixtures::db().await;
        let csv = "name,score\nA,90\nB,abc\nC,150\n,10\nD,80\n";
        let summary = run::<EvaluationResource>(&db, csv).await;

        assert_eq!(summary.processed, 5);
        assert_eq!(summary.created, 2);
        let rows: Vec<_> = summary.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![3, 4, 5]);
        assert_eq!(summary.errors[0].field.as_deref(), Some("score"));
        assert_eq!(summary.errors[1].field.as_deref(), Some("score"));
        assert_eq!(summary.errors[2].field.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_booths_resolve_branch_names() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;

        let csv = "校舎,ブース名,有効\n渋谷校,ブース1,有効\n池袋校,ブース1,\n渋谷校,ブース2,no\n";
        let summary = run::<BoothResource>(&db, csv).await;
        assert_eq!(summary.created, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 3);
        assert_eq!(summary.errors[0].field.as_deref(), Some("branch"));

        let inactive = booths::Entity::find()
            .filter(booths::Column::BranchId.eq(branch.id))
            .filter(booths::Column::Name.eq("ブース2"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(!inactive.is_active);
    }

    #[tokio::test]
    async fn test_students_match_on_email_then_name() {
        let db = fixtures::db().await;
        fixtures::grade(&db, "中学1年").await;
        fixtures::student(&db, None, "田中 太郎", None).await;

        let csv = "生徒名,学年,メールアドレス,状態\n\
                   田中 太郎,中学1年,,Paused\n\
                   鈴木 一郎,,Suzuki@Example.com,\n\
                   鈴木 次郎,,suzuki@example.com,\n\
                   山田 花子,高校3年,,\n";
        let summary = run::<StudentResource>(&db, csv).await;
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].field.as_deref(), Some("grade"));

        let tanaka = students::Entity::find()
            .filter(students::Column::Name.eq("田中 太郎"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tanaka.status, "paused");
        assert!(tanaka.grade_id.is_some());
        assert_eq!(students::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_progress_callback_every_n_rows() {
        let db = fixtures::db().await;
        let mut csv = String::from("name\n");
        for i in 0..5 {
            csv.push_str(&format!("科目{i}\n"));
        }
        let records = parse_csv(&csv, SubjectResource::COLUMNS).unwrap();

        let mut calls = Vec::new();
        let summary =
            import_records::<SubjectResource>(&db, records, 2, |s| calls.push(s.processed)).await;
        assert_eq!(summary.created, 5);
        assert_eq!(calls, vec![2, 4]);
    }
}
