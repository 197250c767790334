//! 班级存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::class_users::{
    ActiveModel as ClassUserActiveModel, Column as ClassUserColumn, Entity as ClassUsers,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    class_users::entities::ClassUserRole,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::{escape_like_pattern, random_code::generate_random_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// 邀请码长度
const INVITE_CODE_LEN: usize = 8;
const INVITE_CODE_ATTEMPTS: usize = 5;

impl SeaOrmStorage {
    /// 创建班级，任课教师同时写入班级成员
    pub async fn create_class_impl(&self, teacher_id: i64, req: CreateClassRequest) -> Result<Class> {
        let now = now_ts();
        let invite_code = self.unused_invite_code().await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let class = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            grade_level: Set(req.grade_level),
            invite_code: Set(invite_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("创建班级失败: {e}")))?;

        ClassUserActiveModel {
            class_id: Set(class.id),
            user_id: Set(teacher_id),
            role: Set(ClassUserRole::Teacher.to_string()),
            updated_at: Set(now),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("写入任课教师失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(class.into_class())
    }

    async fn unused_invite_code(&self) -> Result<String> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let code = generate_random_code(INVITE_CODE_LEN);
            if self.get_class_by_code_impl(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(ClassQuestError::conflict("无法生成唯一的邀请码"))
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过邀请码获取班级
    pub async fn get_class_by_code_impl(&self, invite_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::InviteCode.eq(invite_code))
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Classes::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        // 成员筛选
        if let Some(member_id) = query.member_id {
            let class_ids: Vec<i64> = ClassUsers::find()
                .select_only()
                .column(ClassUserColumn::ClassId)
                .filter(ClassUserColumn::UserId.eq(member_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    ClassQuestError::database_operation(format!("查询用户班级关联失败: {e}"))
                })?;

            if class_ids.is_empty() {
                return Ok(ClassListResponse {
                    pagination: PaginationInfo::new(page, size, 0, 0),
                    items: vec![],
                });
            }
            select = select.filter(Column::Id.is_in(class_ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            pagination: PaginationInfo::new(page, size, total, pages),
            items: classes.into_iter().map(|m| m.into_class()).collect(),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::class_users::entities::ClassUserRole;
    use crate::models::classes::requests::{ClassListQuery, CreateClassRequest};
    use crate::models::users::entities::UserRole;

    fn class_request(name: &str) -> CreateClassRequest {
        CreateClassRequest {
            teacher_id: None,
            name: name.to_string(),
            description: None,
            grade_level: Some(4),
        }
    }

    #[tokio::test]
    async fn test_create_class_enrolls_teacher() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "ms_kim", UserRole::Teacher).await;

        let class = storage
            .create_class_impl(teacher.id, class_request("4B Science"))
            .await
            .unwrap();
        assert_eq!(class.invite_code.len(), 8);

        let membership = storage
            .get_class_user_by_user_id_and_class_id_impl(teacher.id, class.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, ClassUserRole::Teacher);

        let found = storage
            .get_class_by_code_impl(&class.invite_code)
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(class.id));
    }

    #[tokio::test]
    async fn test_list_classes_by_member() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "mr_diaz", UserRole::Teacher).await;
        let student = seed_user(&storage, "sam", UserRole::Student).await;

        let joined = storage
            .create_class_impl(teacher.id, class_request("Math"))
            .await
            .unwrap();
        storage
            .create_class_impl(teacher.id, class_request("Art"))
            .await
            .unwrap();
        storage
            .join_class_impl(student.id, joined.id, ClassUserRole::Student)
            .await
            .unwrap();

        let mine = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                member_id: Some(student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.pagination.total, 1);
        assert_eq!(mine.items[0].id, joined.id);

        let taught = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                teacher_id: Some(teacher.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(taught.pagination.total, 2);
    }
}
