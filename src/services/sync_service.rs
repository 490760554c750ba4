use std::sync::Arc;

use crate::entities::member_entity as members;
use crate::error::AppResult;
use crate::external::GoogleSheetsClient;
use crate::models::{SheetsSyncResponse, SheetsTestResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct SyncService {
    pool: DatabaseConnection,
    sheets: Arc<Mutex<GoogleSheetsClient>>,
    configured: bool,
}

impl SyncService {
    pub fn new(pool: DatabaseConnection, sheets: Arc<Mutex<GoogleSheetsClient>>) -> Self {
        let configured = sheets.try_lock().map(|c| c.is_configured()).unwrap_or(false);
        Self {
            pool,
            sheets,
            configured,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// 测试 Google Sheets 连线, 返回试算表标题
    pub async fn test_connection(&self) -> AppResult<SheetsTestResponse> {
        let mut client = self.sheets.lock().await;
        let (title, _) = client.spreadsheet_info().await?;
        Ok(SheetsTestResponse { title })
    }

    /// 将全部会员镜像到试算表第一个工作表:
    /// 清空 A:D 后写入标题行 (介紹人 | 名字 | 專業別 | VIP) 与资料行。
    /// 介绍人与 VIP 数据库暂无对应字段, 留空。
    pub async fn sync_members(&self) -> AppResult<SheetsSyncResponse> {
        let member_list = members::Entity::find()
            .order_by_asc(members::Column::Id)
            .all(&self.pool)
            .await?;

        if member_list.is_empty() {
            log::info!("No members to sync to Google Sheets");
            return Ok(SheetsSyncResponse { count: 0 });
        }

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(member_list.len() + 1);
        rows.push(
            ["介紹人", "名字", "專業別", "VIP"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        for m in &member_list {
            rows.push(vec![
                String::new(),
                m.name.clone(),
                m.profession.clone().unwrap_or_default(),
                String::new(),
            ]);
        }

        let mut client = self.sheets.lock().await;
        let (_, sheet_name) = client.spreadsheet_info().await?;
        client.clear_range(&format!("{sheet_name}!A:D")).await?;
        client.update_rows(&format!("{sheet_name}!A1"), &rows).await?;

        log::info!("Synced {} members to Google Sheets", member_list.len());
        Ok(SheetsSyncResponse {
            count: member_list.len(),
        })
    }

    /// 背景镜像会员名单 (不阻塞当前请求), 失败只记 warn
    pub fn spawn_sync_members(&self) {
        if !self.configured {
            return;
        }
        let svc = self.clone();
        tokio::spawn(async move {
            if let Err(e) = svc.sync_members().await {
                log::warn!("Background sync to Google Sheets failed: {e:?}");
            }
        });
    }
}
