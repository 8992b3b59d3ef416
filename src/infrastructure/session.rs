//! 会话提供者
//!
//! 每个目标独占一个隔离会话：注入凭证、导航到目标页面后交给引擎，
//! 用完后无论成败都要释放。

use crate::error::Result;
use crate::infrastructure::surface::Surface;
use crate::models::target::Target;

#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    type Surface: Surface;

    /// 创建隔离会话并导航到目标页面
    ///
    /// 返回错误时，提供者自己负责清理已创建的资源
    async fn provision(&mut self, target: &Target) -> Result<Self::Surface>;

    /// 释放会话，不返回错误
    async fn release(&mut self, surface: Self::Surface);
}
