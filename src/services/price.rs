/*
 * Buff163 Price Bot
 * SPDX-License-Identifier: AGPL-3.0-or-later
 */

//! `/查价格 <item>`: look up the lowest Buff163 asking prices for an item

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ MAX_RESULTS, PRICE_COMMAND, PRICE_COMMAND_ALIAS, Settings };
use crate::plugins::{ CommandPlugin, ReplySink, collect_replies };
use crate::services::buff::{ BuffClient, BuffClientOptions, ListingSource, MarketItem };
use crate::{ log_debug, log_error, log_warn };

pub const DISABLED_MESSAGE: &str = "插件初始化失败或未配置 session_cookie，无法查询。";
pub const USAGE_MESSAGE: &str = "请输入要查询的饰品名称，例如：/查价格 AK-47 | 红线 (久经沙场)";
pub const NETWORK_ERROR_MESSAGE: &str = "查询失败，可能是网络问题或API配置错误。";
pub const PROCESSING_ERROR_MESSAGE: &str = "查询失败，处理市场数据时发生内部错误。";

const DIVIDER: &str = "--------------------";

pub fn searching_message(item_name: &str) -> String {
    format!("正在通过 API 搜索 '{}' 的饰品，请稍候...", item_name)
}

pub fn not_found_message(item_name: &str) -> String {
    format!("未找到与 '{}' 相关的饰品。", item_name)
}

/// Price lookup command
///
/// Without a session cookie the plugin stays registered but only answers
/// with [`DISABLED_MESSAGE`].
pub struct PricePlugin {
    source: Option<Arc<dyn ListingSource>>,
}

impl PricePlugin {
    pub fn new(settings: &Settings) -> Self {
        let Some(options) = BuffClientOptions::from_settings(&settings.buff) else {
            log_warn!("Buff163 session_cookie is not configured, price queries are disabled");
            return Self::disabled();
        };

        match BuffClient::new(options) {
            Ok(client) => Self::with_source(Arc::new(client)),
            Err(e) => {
                log_error!("Failed to create Buff163 client: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn with_source(source: Arc<dyn ListingSource>) -> Self {
        Self { source: Some(source) }
    }

    pub fn disabled() -> Self {
        Self { source: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Handle one `/查价格` invocation
    ///
    /// Emits a progress notice and then exactly one terminal message. Never
    /// fails; errors are logged and replaced by a generic message.
    pub async fn search_price(&self, item_name: &str, replies: &ReplySink) {
        let Some(source) = &self.source else {
            replies.plain(DISABLED_MESSAGE);
            return;
        };

        let item_name = item_name.trim();
        if item_name.is_empty() {
            replies.plain(USAGE_MESSAGE);
            return;
        }

        replies.plain(searching_message(item_name));

        match source.fetch_listings(item_name).await {
            Ok(items) => {
                let matches = match_items(&items, item_name, MAX_RESULTS);
                log_debug!(
                    "Price query '{}': {} listings, {} matched",
                    item_name,
                    items.len(),
                    matches.len()
                );

                if matches.is_empty() {
                    replies.plain(not_found_message(item_name));
                } else {
                    replies.plain(format_results(item_name, &matches));
                }
            }
            Err(e) => {
                log_error!("Buff163 price query failed for '{}': {}", item_name, e);
                if e.is_login_required() {
                    log_warn!("Buff163 rejected the session cookie, it has probably expired");
                }
                if e.is_processing_error() {
                    replies.plain(PROCESSING_ERROR_MESSAGE);
                } else {
                    replies.plain(NETWORK_ERROR_MESSAGE);
                }
            }
        }
    }

    /// Run [`search_price`](Self::search_price) and collect what it emitted
    pub async fn search_price_replies(&self, item_name: &str) -> Vec<String> {
        let (sink, rx) = ReplySink::channel();
        self.search_price(item_name, &sink).await;
        drop(sink);
        collect_replies(rx)
    }
}

#[async_trait]
impl CommandPlugin for PricePlugin {
    fn name(&self) -> &str {
        "buff163"
    }

    fn commands(&self) -> Vec<&str> {
        vec![PRICE_COMMAND, PRICE_COMMAND_ALIAS]
    }

    fn usage(&self) -> String {
        format!("/{} <饰品名称>   查询 Buff163 在售最低价 (别名 /{})", PRICE_COMMAND, PRICE_COMMAND_ALIAS)
    }

    async fn handle(&self, args: &str, replies: &ReplySink) {
        self.search_price(args, replies).await;
    }
}

/// Items whose name contains `query`, ignoring case, in source order
pub fn match_items<'a>(items: &'a [MarketItem], query: &str, limit: usize) -> Vec<&'a MarketItem> {
    let needle = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

pub fn format_results(item_name: &str, items: &[&MarketItem]) -> String {
    let mut output = String::new();

    output.push_str(&format!("找到以下与 '{}' 相关的饰品：\n", item_name));
    output.push_str(DIVIDER);
    output.push('\n');

    for item in items {
        output.push_str(&format!("名称: {}\n", item.name));
        output.push_str(&format!("价格: ¥ {}\n", item.sell_min_price));
        output.push_str(DIVIDER);
        output.push('\n');
    }

    output
}
