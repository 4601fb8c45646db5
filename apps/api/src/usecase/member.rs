//! # メンバーユースケース
//!
//! メンバーの登録・一覧・ステータス切り替えを実装する。

use std::sync::Arc;

use async_trait::async_trait;
use khidmat_domain::{
    admin::AdminId,
    member::{Member, MemberId, MemberName, MobileNo, NewMember},
};
use khidmat_infra::repository::{MemberRepository, MemberWithAdmin};
use serde::Serialize;

use crate::error::ApiError;

/// メンバー登録入力
#[derive(Debug, Clone)]
pub struct MemberInput {
    pub name:      String,
    pub mobile_no: String,
    pub address:   String,
}

/// ステータス切り替え結果
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleStatusResult {
    pub id:        MemberId,
    pub is_active: bool,
}

/// メンバーユースケーストレイト
#[async_trait]
pub trait MemberUseCase: Send + Sync {
    /// 新規メンバーを登録する
    ///
    /// 登録主体の管理者（トークン由来）がメンバーの所有者になる。
    async fn create_member(
        &self,
        input: MemberInput,
        admin_id: AdminId,
    ) -> Result<Member, ApiError>;

    /// 全メンバーを登録管理者名付きで取得する
    async fn list_members(&self) -> Result<Vec<MemberWithAdmin>, ApiError>;

    /// メンバーのアクティブフラグを反転する
    ///
    /// # 戻り値
    ///
    /// - `Err(ApiError::NotFound)`: メンバーが存在しない場合
    async fn toggle_status(&self, id: MemberId) -> Result<ToggleStatusResult, ApiError>;
}

/// メンバーユースケースの実装
pub struct MemberUseCaseImpl {
    member_repository: Arc<dyn MemberRepository>,
}

impl MemberUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(member_repository: Arc<dyn MemberRepository>) -> Self {
        Self { member_repository }
    }
}

#[async_trait]
impl MemberUseCase for MemberUseCaseImpl {
    async fn create_member(
        &self,
        input: MemberInput,
        admin_id: AdminId,
    ) -> Result<Member, ApiError> {
        let new_member = NewMember::new(
            MemberName::new(input.name)?,
            MobileNo::new(input.mobile_no)?,
            input.address,
            admin_id,
        )?;

        let member = self.member_repository.insert(&new_member).await?;
        Ok(member)
    }

    async fn list_members(&self) -> Result<Vec<MemberWithAdmin>, ApiError> {
        let members = self.member_repository.list_all().await?;
        Ok(members)
    }

    async fn toggle_status(&self, id: MemberId) -> Result<ToggleStatusResult, ApiError> {
        let Some(current) = self.member_repository.find_active_flag(id).await? else {
            return Err(ApiError::NotFound(format!(
                "メンバーが見つかりません: {id}"
            )));
        };

        let next = !current;
        self.member_repository.set_active_flag(id, next).await?;

        Ok(ToggleStatusResult {
            id,
            is_active: next,
        })
    }
}
