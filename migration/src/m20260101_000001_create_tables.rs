use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 自增主键列
fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// 时间戳列（unix 秒）
fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

/// 外键约束
fn fk<T: IntoIden, C: IntoIden, RT: IntoIden, RC: IntoIden>(
    table: T,
    col: C,
    ref_table: RT,
    ref_col: RC,
    on_delete: ForeignKeyAction,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(table, col)
        .to(ref_table, ref_col)
        .on_delete(on_delete)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 分校表
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(pk(Branches::Id))
                    .col(
                        ColumnDef::new(Branches::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Branches::Address).string_len(255).null())
                    .col(ColumnDef::new(Branches::Phone).string_len(32).null())
                    .col(ColumnDef::new(Branches::Notes).text().null())
                    .col(
                        ColumnDef::new(Branches::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(Branches::CreatedAt))
                    .col(timestamp(Branches::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Users::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Users::DisplayName).string_len(100).null())
                    .col(ColumnDef::new(Users::BranchId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .foreign_key(&mut fk(
                        Users::Table,
                        Users::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        // 科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk(Subjects::Id))
                    .col(
                        ColumnDef::new(Subjects::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Notes).text().null())
                    .col(timestamp(Subjects::CreatedAt))
                    .col(timestamp(Subjects::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 年级表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(pk(Grades::Id))
                    .col(
                        ColumnDef::new(Grades::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Grades::SchoolLevel).string_len(16).not_null())
                    .col(ColumnDef::new(Grades::GradeYear).integer().null())
                    .col(ColumnDef::new(Grades::Notes).text().null())
                    .col(timestamp(Grades::CreatedAt))
                    .col(timestamp(Grades::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 授课类型表（支持父子层级）
        manager
            .create_table(
                Table::create()
                    .table(ClassTypes::Table)
                    .if_not_exists()
                    .col(pk(ClassTypes::Id))
                    .col(ColumnDef::new(ClassTypes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(ClassTypes::ParentId).big_integer().null())
                    .col(ColumnDef::new(ClassTypes::Color).string_len(7).null())
                    .col(ColumnDef::new(ClassTypes::Notes).text().null())
                    .col(timestamp(ClassTypes::CreatedAt))
                    .col(timestamp(ClassTypes::UpdatedAt))
                    .foreign_key(&mut fk(
                        ClassTypes::Table,
                        ClassTypes::ParentId,
                        ClassTypes::Table,
                        ClassTypes::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 评价表
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(pk(Evaluations::Id))
                    .col(
                        ColumnDef::new(Evaluations::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Evaluations::Score).integer().not_null())
                    .col(ColumnDef::new(Evaluations::Notes).text().null())
                    .col(timestamp(Evaluations::CreatedAt))
                    .col(timestamp(Evaluations::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 座位（隔间）表
        manager
            .create_table(
                Table::create()
                    .table(Booths::Table)
                    .if_not_exists()
                    .col(pk(Booths::Id))
                    .col(ColumnDef::new(Booths::BranchId).big_integer().not_null())
                    .col(ColumnDef::new(Booths::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Booths::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Booths::Notes).text().null())
                    .col(timestamp(Booths::CreatedAt))
                    .col(timestamp(Booths::UpdatedAt))
                    .foreign_key(&mut fk(
                        Booths::Table,
                        Booths::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 时间段表
        manager
            .create_table(
                Table::create()
                    .table(TimeSlots::Table)
                    .if_not_exists()
                    .col(pk(TimeSlots::Id))
                    .col(ColumnDef::new(TimeSlots::BranchId).big_integer().null())
                    .col(ColumnDef::new(TimeSlots::Name).string_len(50).not_null())
                    .col(ColumnDef::new(TimeSlots::StartTime).string_len(5).not_null())
                    .col(ColumnDef::new(TimeSlots::EndTime).string_len(5).not_null())
                    .col(ColumnDef::new(TimeSlots::Notes).text().null())
                    .col(timestamp(TimeSlots::CreatedAt))
                    .col(timestamp(TimeSlots::UpdatedAt))
                    .foreign_key(&mut fk(
                        TimeSlots::Table,
                        TimeSlots::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 讲师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(pk(Teachers::Id))
                    .col(ColumnDef::new(Teachers::UserId).big_integer().null())
                    .col(ColumnDef::new(Teachers::BranchId).big_integer().null())
                    .col(ColumnDef::new(Teachers::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Teachers::KanaName).string_len(100).null())
                    .col(ColumnDef::new(Teachers::Email).string().null().unique_key())
                    .col(ColumnDef::new(Teachers::Phone).string_len(32).null())
                    .col(ColumnDef::new(Teachers::LineId).string_len(64).null())
                    .col(ColumnDef::new(Teachers::Notes).text().null())
                    .col(timestamp(Teachers::CreatedAt))
                    .col(timestamp(Teachers::UpdatedAt))
                    .foreign_key(&mut fk(
                        Teachers::Table,
                        Teachers::UserId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .foreign_key(&mut fk(
                        Teachers::Table,
                        Teachers::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk(Students::Id))
                    .col(ColumnDef::new(Students::UserId).big_integer().null())
                    .col(ColumnDef::new(Students::BranchId).big_integer().null())
                    .col(ColumnDef::new(Students::GradeId).big_integer().null())
                    .col(ColumnDef::new(Students::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Students::KanaName).string_len(100).null())
                    .col(ColumnDef::new(Students::SchoolName).string_len(100).null())
                    .col(ColumnDef::new(Students::Email).string().null().unique_key())
                    .col(ColumnDef::new(Students::ParentEmail).string().null())
                    .col(ColumnDef::new(Students::ParentPhone).string_len(32).null())
                    .col(ColumnDef::new(Students::LineId).string_len(64).null())
                    .col(ColumnDef::new(Students::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Students::Notes).text().null())
                    .col(timestamp(Students::CreatedAt))
                    .col(timestamp(Students::UpdatedAt))
                    .foreign_key(&mut fk(
                        Students::Table,
                        Students::UserId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .foreign_key(&mut fk(
                        Students::Table,
                        Students::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        Students::Table,
                        Students::GradeId,
                        Grades::Table,
                        Grades::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 受讲（课程登记）表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk(Courses::Id))
                    .col(ColumnDef::new(Courses::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::ClassTypeId).big_integer().null())
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Courses::StartDate).string_len(10).not_null())
                    .col(ColumnDef::new(Courses::EndDate).string_len(10).null())
                    .col(
                        ColumnDef::new(Courses::SessionsPerWeek)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Courses::Notes).text().null())
                    .col(timestamp(Courses::CreatedAt))
                    .col(timestamp(Courses::UpdatedAt))
                    .foreign_key(&mut fk(
                        Courses::Table,
                        Courses::StudentId,
                        Students::Table,
                        Students::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        Courses::Table,
                        Courses::SubjectId,
                        Subjects::Table,
                        Subjects::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        Courses::Table,
                        Courses::ClassTypeId,
                        ClassTypes::Table,
                        ClassTypes::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        Courses::Table,
                        Courses::TeacherId,
                        Teachers::Table,
                        Teachers::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 授课安排表
        manager
            .create_table(
                Table::create()
                    .table(ClassSessions::Table)
                    .if_not_exists()
                    .col(pk(ClassSessions::Id))
                    .col(
                        ColumnDef::new(ClassSessions::BranchId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSessions::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSessions::StudentId).big_integer().null())
                    .col(ColumnDef::new(ClassSessions::SubjectId).big_integer().null())
                    .col(
                        ColumnDef::new(ClassSessions::ClassTypeId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ClassSessions::BoothId).big_integer().null())
                    .col(
                        ColumnDef::new(ClassSessions::EvaluationId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ClassSessions::Date).string_len(10).not_null())
                    .col(
                        ColumnDef::new(ClassSessions::StartTime)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSessions::EndTime).string_len(5).not_null())
                    .col(ColumnDef::new(ClassSessions::Status).string_len(16).not_null())
                    .col(ColumnDef::new(ClassSessions::Notes).text().null())
                    .col(timestamp(ClassSessions::CreatedAt))
                    .col(timestamp(ClassSessions::UpdatedAt))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::TeacherId,
                        Teachers::Table,
                        Teachers::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::StudentId,
                        Students::Table,
                        Students::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::SubjectId,
                        Subjects::Table,
                        Subjects::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::ClassTypeId,
                        ClassTypes::Table,
                        ClassTypes::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::BoothId,
                        Booths::Table,
                        Booths::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .foreign_key(&mut fk(
                        ClassSessions::Table,
                        ClassSessions::EvaluationId,
                        Evaluations::Table,
                        Evaluations::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // LINE 频道配置表
        manager
            .create_table(
                Table::create()
                    .table(LineChannels::Table)
                    .if_not_exists()
                    .col(pk(LineChannels::Id))
                    .col(ColumnDef::new(LineChannels::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(LineChannels::ChannelId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LineChannels::ChannelSecret).string().not_null())
                    .col(
                        ColumnDef::new(LineChannels::ChannelAccessToken)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LineChannels::BranchId).big_integer().null())
                    .col(
                        ColumnDef::new(LineChannels::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(LineChannels::Description).text().null())
                    .col(timestamp(LineChannels::CreatedAt))
                    .col(timestamp(LineChannels::UpdatedAt))
                    .foreign_key(&mut fk(
                        LineChannels::Table,
                        LineChannels::BranchId,
                        Branches::Table,
                        Branches::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 通知队列表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk(Notifications::Id))
                    .col(
                        ColumnDef::new(Notifications::RecipientType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::RecipientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::LineChannelId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::TargetDate).string_len(10).null())
                    .col(ColumnDef::new(Notifications::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Notifications::ProcessingAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Notifications::SentAt).big_integer().null())
                    .col(ColumnDef::new(Notifications::LastError).text().null())
                    .col(timestamp(Notifications::CreatedAt))
                    .col(timestamp(Notifications::UpdatedAt))
                    .foreign_key(&mut fk(
                        Notifications::Table,
                        Notifications::LineChannelId,
                        LineChannels::Table,
                        LineChannels::Id,
                        ForeignKeyAction::NoAction,
                    ))
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booths_branch_name")
                    .table(Booths::Table)
                    .col(Booths::BranchId)
                    .col(Booths::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_sessions_date")
                    .table(ClassSessions::Table)
                    .col(ClassSessions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_student_id")
                    .table(Courses::Table)
                    .col(Courses::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_status")
                    .table(Notifications::Table)
                    .col(Notifications::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LineChannels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimeSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Booths::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    BranchId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Branches {
    #[sea_orm(iden = "branches")]
    Table,
    Id,
    Name,
    Address,
    Phone,
    Notes,
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    Name,
    SchoolLevel,
    GradeYear,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassTypes {
    #[sea_orm(iden = "class_types")]
    Table,
    Id,
    Name,
    ParentId,
    Color,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    Name,
    Score,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Booths {
    #[sea_orm(iden = "booths")]
    Table,
    Id,
    BranchId,
    Name,
    IsActive,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimeSlots {
    #[sea_orm(iden = "time_slots")]
    Table,
    Id,
    BranchId,
    Name,
    StartTime,
    EndTime,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    UserId,
    BranchId,
    Name,
    KanaName,
    Email,
    Phone,
    LineId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    BranchId,
    GradeId,
    Name,
    KanaName,
    SchoolName,
    Email,
    ParentEmail,
    ParentPhone,
    LineId,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    StudentId,
    SubjectId,
    ClassTypeId,
    TeacherId,
    StartDate,
    EndDate,
    SessionsPerWeek,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassSessions {
    #[sea_orm(iden = "class_sessions")]
    Table,
    Id,
    BranchId,
    TeacherId,
    StudentId,
    SubjectId,
    ClassTypeId,
    BoothId,
    EvaluationId,
    Date,
    StartTime,
    EndTime,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LineChannels {
    #[sea_orm(iden = "line_channels")]
    Table,
    Id,
    Name,
    ChannelId,
    ChannelSecret,
    ChannelAccessToken,
    BranchId,
    IsActive,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    RecipientType,
    RecipientId,
    LineChannelId,
    NotificationType,
    Message,
    TargetDate,
    Status,
    ProcessingAttempts,
    SentAt,
    LastError,
    CreatedAt,
    UpdatedAt,
}
