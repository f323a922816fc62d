//! 预导入模块，方便使用

pub use super::booths::{ActiveModel as BoothActiveModel, Entity as Booths, Model as BoothModel};
pub use super::branches::{
    ActiveModel as BranchActiveModel, Entity as Branches, Model as BranchModel,
};
pub use super::class_sessions::{
    ActiveModel as ClassSessionActiveModel, Entity as ClassSessions, Model as ClassSessionModel,
};
pub use super::class_types::{
    ActiveModel as ClassTypeActiveModel, Entity as ClassTypes, Model as ClassTypeModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::line_channels::{
    ActiveModel as LineChannelActiveModel, Entity as LineChannels, Model as LineChannelModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::time_slots::{
    ActiveModel as TimeSlotActiveModel, Entity as TimeSlots, Model as TimeSlotModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
